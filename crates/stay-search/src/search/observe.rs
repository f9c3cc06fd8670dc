//! Structured reporting for faults that the search path deliberately absorbs.

use metrics::counter;
use std::fmt::Display;
use tracing::{info, warn};

pub const PROVIDER_FAULTS_TOTAL: &str = "stay_search_provider_faults_total";
pub const PROVIDER_LISTINGS_TOTAL: &str = "stay_search_provider_listings_total";
pub const NORMALIZATION_FALLBACKS_TOTAL: &str = "stay_search_normalization_fallbacks_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Transport,
    Status,
    Payload,
    Timeout,
    Panicked,
}

impl FaultKind {
    pub fn label(self) -> &'static str {
        match self {
            FaultKind::Transport => "transport",
            FaultKind::Status => "status",
            FaultKind::Payload => "payload",
            FaultKind::Timeout => "timeout",
            FaultKind::Panicked => "panicked",
        }
    }
}

/// A provider failed and its contribution was replaced by an empty list.
pub fn provider_fault(provider: &'static str, kind: FaultKind, detail: &dyn Display) {
    warn!(
        provider,
        kind = kind.label(),
        error = %detail,
        "provider contributed no listings"
    );
    counter!(PROVIDER_FAULTS_TOTAL, "provider" => provider, "kind" => kind.label()).increment(1);
}

pub fn provider_listings(provider: &'static str, count: usize) {
    info!(provider, count, "provider returned listings");
    counter!(PROVIDER_LISTINGS_TOTAL, "provider" => provider).increment(count as u64);
}

/// A raw record could not be mapped and was replaced by a placeholder.
pub fn normalization_fallback(provider: &'static str, detail: &dyn Display) {
    warn!(provider, error = %detail, "raw record replaced with placeholder listing");
    counter!(NORMALIZATION_FALLBACKS_TOTAL, "provider" => provider).increment(1);
}
