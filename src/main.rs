use cash_address::{AddressConverter, AddressError, Hash160Format};
use tracing_subscriber::filter;

fn describe(converter: &AddressConverter, input: &str) -> Result<(), AddressError> {
    let decoder = converter.decoder();
    let record = decoder.decode_hash160(input)?;
    let is_hash160 = record.format == Hash160Format::Hash160;
    let decoded = if is_hash160 {
        decoder.decode(&record.cash_address)?
    } else {
        decoder.decode(input)?
    };

    println!("Input                    : {input}");
    if is_hash160 {
        println!("Format                   : hash160");
    } else {
        println!("Format                   : {}", decoded.format);
    }
    println!("Network                  : {}", decoded.network);
    println!("Type                     : {}", decoded.address_type);
    println!("Legacy                   : {}", record.legacy_address);
    println!("CashAddr                 : {}", record.cash_address);
    println!("Hash160 (hex)            : {}", decoded.hash_hex());
    Ok(())
}

fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Logging failed, exiting...");

    let mut inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        inputs.push("1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu".to_string());
    }

    let converter = AddressConverter::default();
    let mut failed = false;
    for input in &inputs {
        match describe(&converter, input) {
            Ok(()) => println!(),
            // Nothing in the decode chain accepted the input
            Err(AddressError::UnsupportedAddressFormat(raw)) => {
                eprintln!("Unsupported address format “{raw}”");
                failed = true;
            }
            Err(e) => {
                eprintln!("Error for “{input}”: {e}");
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
