//! Request bodies for batch calls to an address indexer.

use crate::{AddressDecoder, AddressError};
use serde::{Deserialize, Serialize};

/// `{"addresses": [...]}`, with an optional page for transaction listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBatch {
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl AddressBatch {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            page: None,
        }
    }

    /// Build a batch, refusing any address the decoder does not accept.
    ///
    /// # Errors
    /// The first decode error encountered.
    pub fn validated<I, S>(decoder: &AddressDecoder, addresses: I) -> Result<Self, AddressError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let batch = Self::new(addresses);
        for address in &batch.addresses {
            decoder.decode(address)?;
        }
        Ok(batch)
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}
