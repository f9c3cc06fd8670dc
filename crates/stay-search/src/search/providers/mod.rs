//! Upstream listing sources.
//!
//! Adapters report failures through [`PropertyProvider::search`]; callers use
//! [`PropertyProvider::listings`], which turns any failure into an empty
//! contribution and records it.

mod agoda;
mod airbnb;
mod booking;
mod hotels;
mod rapidapi;

pub use agoda::AgodaProvider;
pub use airbnb::AirbnbProvider;
pub use booking::BookingProvider;
pub use hotels::HotelsProvider;
pub use rapidapi::{RapidApiClient, RapidApiEndpoint};

use async_trait::async_trait;
use tracing::debug;

use super::domain::{Property, ProviderQuery};
use super::observe::{self, FaultKind};

#[async_trait]
pub trait PropertyProvider: Send + Sync {
    /// Provider identifier used in logs and metrics.
    fn source_name(&self) -> &'static str;

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Property>, ProviderError>;

    async fn listings(&self, query: &ProviderQuery) -> Vec<Property> {
        match self.search(query).await {
            Ok(listings) if listings.is_empty() => {
                debug!(provider = self.source_name(), "provider found no listings");
                listings
            }
            Ok(listings) => {
                observe::provider_listings(self.source_name(), listings.len());
                listings
            }
            Err(err) => {
                observe::provider_fault(self.source_name(), err.kind(), &err);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream answered with status {0}")]
    Status(u16),
    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl ProviderError {
    pub fn kind(&self) -> FaultKind {
        match self {
            ProviderError::Transport(_) => FaultKind::Transport,
            ProviderError::Status(_) => FaultKind::Status,
            ProviderError::Payload(_) => FaultKind::Payload,
        }
    }
}
