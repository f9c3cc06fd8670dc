use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::bounds::BoundsResolver;
use super::domain::{Property, ProviderQuery, ResultSource, SearchRequest, SearchResponse};
use super::fallback;
use super::observe::{self, FaultKind};
use super::plausible::PlausibleValues;
use super::providers::{
    AgodaProvider, AirbnbProvider, BookingProvider, HotelsProvider, PropertyProvider,
    ProviderError, RapidApiClient,
};
use crate::config::{ProviderConfig, ProviderCredential};

/// Runtime knobs for the aggregation step.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// `None` short-circuits every search to the sample catalog.
    pub credential: Option<ProviderCredential>,
    pub provider_timeout: Duration,
}

/// Fans a search out to every provider and merges what comes back.
pub struct SearchService {
    providers: Vec<Arc<dyn PropertyProvider>>,
    bounds: BoundsResolver,
    settings: SearchSettings,
}

impl SearchService {
    /// Providers are queried concurrently but merged in the order given here.
    pub fn new(providers: Vec<Arc<dyn PropertyProvider>>, settings: SearchSettings) -> Self {
        Self {
            providers,
            bounds: BoundsResolver,
            settings,
        }
    }

    /// Standard provider line-up: Booking, Hotels, Airbnb, Agoda.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let values = Arc::new(PlausibleValues::from_entropy());
        let client = RapidApiClient::new(config.request_timeout)?;

        let providers: Vec<Arc<dyn PropertyProvider>> = vec![
            Arc::new(BookingProvider::new(
                client.clone(),
                &config.booking_api_url,
                Arc::clone(&values),
            )),
            Arc::new(HotelsProvider::new(
                client,
                &config.hotels_api_url,
                Arc::clone(&values),
            )),
            Arc::new(AirbnbProvider::new(Arc::clone(&values))),
            Arc::new(AgodaProvider::new(values)),
        ];

        Ok(Self::new(
            providers,
            SearchSettings {
                credential: config.credential(),
                provider_timeout: config.request_timeout,
            },
        ))
    }

    pub fn has_credential(&self) -> bool {
        self.settings.credential.is_some()
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.search_on(request, Local::now().date_naive()).await
    }

    /// Same as [`search`](Self::search) with an explicit "today" for date defaults.
    pub async fn search_on(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
    ) -> Result<SearchResponse, SearchError> {
        let destination = request
            .destination()
            .ok_or(SearchError::MissingDestination)?;

        let Some(credential) = self.settings.credential.clone() else {
            info!(%destination, "no provider credential configured, serving sample listings");
            return Ok(SearchResponse {
                results: fallback::sample_listings(destination),
                source: ResultSource::Unconfigured,
                api_sources_count: None,
                total_results: None,
            });
        };

        let query = ProviderQuery {
            destination: destination.to_string(),
            stay: request.stay(today),
            guests: request.guests(),
            bounds: self.bounds.resolve(destination),
            credential,
        };

        let contributions = self.dispatch(query).await;
        let api_sources_count = contributions
            .iter()
            .filter(|listings| !listings.is_empty())
            .count();
        let mut results: Vec<Property> = contributions.into_iter().flatten().collect();

        let source = if results.is_empty() {
            info!(%destination, "no provider returned listings, serving sample listings");
            results = fallback::sample_listings(destination);
            ResultSource::Fallback
        } else {
            ResultSource::Live
        };

        info!(
            %destination,
            api_sources_count,
            total_results = results.len(),
            source = source.label(),
            "property search complete"
        );

        Ok(SearchResponse {
            total_results: Some(results.len()),
            api_sources_count: Some(api_sources_count),
            results,
            source,
        })
    }

    /// Runs every provider on its own task and waits for all of them. Each slot
    /// of the returned vector belongs to the provider at the same index.
    async fn dispatch(&self, query: ProviderQuery) -> Vec<Vec<Property>> {
        let query = Arc::new(query);
        let limit = self.settings.provider_timeout;

        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let query = Arc::clone(&query);
                let name = provider.source_name();
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(limit, provider.listings(&query)).await
                });
                (name, handle)
            })
            .collect();

        let mut contributions = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let listings = match handle.await {
                Ok(Ok(listings)) => listings,
                Ok(Err(elapsed)) => {
                    observe::provider_fault(name, FaultKind::Timeout, &elapsed);
                    Vec::new()
                }
                Err(join_error) => {
                    observe::provider_fault(name, FaultKind::Panicked, &join_error);
                    Vec::new()
                }
            };
            contributions.push(listings);
        }
        contributions
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Destination is required")]
    MissingDestination,
    #[error("{0}")]
    MalformedRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::domain::{NightlyPrice, PropertyLocation};
    use crate::search::normalizer::placeholder;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Behavior {
        Listings(usize),
        Fail,
        Hang,
        Panic,
    }

    struct Stub {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
        seen: Mutex<Option<ProviderQuery>>,
    }

    impl Stub {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            })
        }
    }

    fn listing(source: &'static str, index: usize, destination: &str) -> Property {
        Property {
            id: format!("{source}-{index}"),
            name: format!("{source} stay {index}"),
            location: PropertyLocation {
                city: destination.to_string(),
                address: String::new(),
                coordinates: [0.0, 0.0],
            },
            price: NightlyPrice::usd(120.0),
            images: vec!["https://img.test/1.jpg".to_string()],
            rating: 4.4,
            review_count: 12,
            amenities: vec!["WiFi".to_string()],
            description: String::new(),
            source: source.to_string(),
            property_type: "Hotel".to_string(),
            vacation_styles: vec!["Standard".to_string()],
            rooms: Vec::new(),
        }
    }

    #[async_trait]
    impl PropertyProvider for Stub {
        fn source_name(&self) -> &'static str {
            self.name
        }

        async fn search(&self, query: &ProviderQuery) -> Result<Vec<Property>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().expect("stub mutex poisoned") = Some(query.clone());
            match self.behavior {
                Behavior::Listings(count) => Ok((0..count)
                    .map(|index| listing(self.name, index, &query.destination))
                    .collect()),
                Behavior::Fail => Err(ProviderError::Status(502)),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(vec![listing(self.name, 0, &query.destination)])
                }
                Behavior::Panic => panic!("upstream adapter bug"),
            }
        }
    }

    fn settings(credential: Option<&str>) -> SearchSettings {
        SearchSettings {
            credential: credential.and_then(ProviderCredential::new),
            provider_timeout: Duration::from_millis(200),
        }
    }

    fn service(stubs: &[Arc<Stub>], credential: Option<&str>) -> SearchService {
        let providers = stubs
            .iter()
            .map(|stub| Arc::clone(stub) as Arc<dyn PropertyProvider>)
            .collect();
        SearchService::new(providers, settings(credential))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    #[tokio::test]
    async fn missing_destination_is_rejected() {
        let service = service(&[Stub::new("a", Behavior::Listings(1))], Some("key"));
        for request in [
            SearchRequest::default(),
            SearchRequest::for_destination(""),
            SearchRequest::for_destination("  "),
        ] {
            let err = service
                .search_on(&request, today())
                .await
                .expect_err("destination required");
            assert!(matches!(err, SearchError::MissingDestination));
            assert_eq!(err.to_string(), "Destination is required");
        }
    }

    #[tokio::test]
    async fn without_credential_providers_are_skipped() {
        let stub = Stub::new("a", Behavior::Listings(3));
        let service = service(&[Arc::clone(&stub)], None);
        let mut request = SearchRequest::for_destination("Paris");
        request.guests = Some(3);

        let response = service.search_on(&request, today()).await.expect("search");

        assert_eq!(response.source, ResultSource::Unconfigured);
        assert_eq!(response.results, fallback::sample_listings("Paris"));
        assert_eq!(response.results.len(), fallback::FALLBACK_LISTING_COUNT);
        assert!(response.api_sources_count.is_none());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn merges_in_dispatch_order_and_counts_contributors() {
        let stubs = [
            Stub::new("booking.com", Behavior::Listings(2)),
            Stub::new("hotels.com", Behavior::Fail),
            Stub::new("airbnb.com", Behavior::Listings(0)),
            Stub::new("agoda.com", Behavior::Listings(1)),
        ];
        let service = service(&stubs, Some("key"));

        let response = service
            .search_on(&SearchRequest::for_destination("Tokyo"), today())
            .await
            .expect("search");

        assert_eq!(response.source, ResultSource::Live);
        assert_eq!(response.api_sources_count, Some(2));
        assert_eq!(response.total_results, Some(3));
        let ids: Vec<_> = response.results.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["booking.com-0", "booking.com-1", "agoda.com-0"]);
        for stub in &stubs {
            assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn all_empty_falls_back_to_sample_listings() {
        let stubs = [
            Stub::new("booking.com", Behavior::Fail),
            Stub::new("hotels.com", Behavior::Listings(0)),
        ];
        let service = service(&stubs, Some("key"));

        let response = service
            .search_on(&SearchRequest::for_destination("Nowhereland"), today())
            .await
            .expect("search");

        assert_eq!(response.source, ResultSource::Fallback);
        assert!(response.source.is_synthetic());
        assert_eq!(response.results, fallback::sample_listings("Nowhereland"));
        assert_eq!(response.api_sources_count, Some(0));
        assert_eq!(response.total_results, Some(4));
    }

    #[tokio::test]
    async fn slow_provider_is_cut_off_by_timeout() {
        let stubs = [
            Stub::new("booking.com", Behavior::Hang),
            Stub::new("agoda.com", Behavior::Listings(2)),
        ];
        let service = service(&stubs, Some("key"));

        let started = std::time::Instant::now();
        let response = service
            .search_on(&SearchRequest::for_destination("Bali"), today())
            .await
            .expect("search");

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(response.api_sources_count, Some(1));
        assert!(response.results.iter().all(|p| p.source == "agoda.com"));
    }

    #[tokio::test]
    async fn panicking_provider_is_contained() {
        let stubs = [
            Stub::new("booking.com", Behavior::Panic),
            Stub::new("hotels.com", Behavior::Listings(1)),
        ];
        let service = service(&stubs, Some("key"));

        let response = service
            .search_on(&SearchRequest::for_destination("London"), today())
            .await
            .expect("search");

        assert_eq!(response.source, ResultSource::Live);
        assert_eq!(response.total_results, Some(1));
    }

    #[tokio::test]
    async fn providers_receive_resolved_query() {
        let stub = Stub::new("booking.com", Behavior::Listings(1));
        let service = service(&[Arc::clone(&stub)], Some("key"));

        service
            .search_on(
                &SearchRequest::for_destination("  I want to visit Bali next year "),
                today(),
            )
            .await
            .expect("search");

        let seen = stub
            .seen
            .lock()
            .expect("stub mutex poisoned")
            .clone()
            .expect("provider called");
        assert_eq!(seen.destination, "I want to visit Bali next year");
        assert_eq!(seen.guests, 2);
        assert_eq!(seen.stay.check_in, today());
        assert_eq!(seen.stay.check_out, today().succ_opt().expect("valid date"));
        assert_eq!(seen.bounds, BoundsResolver.resolve("bali"));
        assert_eq!(seen.credential.expose(), "key");
    }

    #[tokio::test]
    async fn normalized_placeholders_count_as_contributions() {
        struct Placeholders(Arc<PlausibleValues>);

        #[async_trait]
        impl PropertyProvider for Placeholders {
            fn source_name(&self) -> &'static str {
                "booking.com"
            }

            async fn search(
                &self,
                query: &ProviderQuery,
            ) -> Result<Vec<Property>, ProviderError> {
                Ok(vec![placeholder(
                    crate::search::normalizer::BOOKING,
                    &query.destination,
                    &self.0,
                )])
            }
        }

        let providers: Vec<Arc<dyn PropertyProvider>> =
            vec![Arc::new(Placeholders(Arc::new(PlausibleValues::seeded(5))))];
        let service = SearchService::new(providers, settings(Some("key")));

        let response = service
            .search_on(&SearchRequest::for_destination("Porto"), today())
            .await
            .expect("search");
        assert_eq!(response.source, ResultSource::Live);
        assert_eq!(response.results[0].name, "Hotel in Porto");
    }
}
