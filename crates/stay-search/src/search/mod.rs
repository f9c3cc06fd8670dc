//! Multi-provider property search: bounds lookup, concurrent provider fan-out,
//! normalization and the sample-data fallback.

pub mod bounds;
pub mod domain;
pub mod fallback;
pub mod normalizer;
pub mod observe;
pub mod plausible;
pub mod providers;
pub mod router;
pub mod service;

pub use bounds::BoundsResolver;
pub use domain::{
    BoundingBox, ListingOrigin, NightlyPrice, Property, PropertyLocation, ProviderQuery,
    ResultSource, Room, SearchRequest, SearchResponse, StayDates,
};
pub use plausible::PlausibleValues;
pub use providers::{PropertyProvider, ProviderError};
pub use router::{search_router, SEARCH_PATH};
pub use service::{SearchError, SearchService, SearchSettings};
