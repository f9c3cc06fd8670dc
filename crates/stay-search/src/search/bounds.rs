use super::domain::BoundingBox;
use tracing::debug;

/// Named regions in match priority order. The first key contained in the
/// destination wins, so "Paris to London" resolves to London.
const KNOWN_REGIONS: [(&str, BoundingBox); 5] = [
    ("bali", BoundingBox::new(8.138912, 8.482078, 114.5122, 115.712879)),
    ("london", BoundingBox::new(51.385064, 51.672343, -0.351486, 0.148271)),
    ("new york", BoundingBox::new(40.541722, 40.917577, -74.036508, -73.700272)),
    ("paris", BoundingBox::new(48.815573, 48.902145, 2.259635, 2.415665)),
    ("tokyo", BoundingBox::new(35.538577, 35.817813, 139.654656, 139.870667)),
];

/// Metro Manila; used whenever no named region matches.
pub const DEFAULT_BOUNDS: BoundingBox = BoundingBox::new(14.291283, 14.948423, 120.755688, 121.136864);

/// Maps free-text destinations to a bounding box without calling a geocoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsResolver;

impl BoundsResolver {
    pub fn resolve(&self, destination: &str) -> BoundingBox {
        let needle = destination.to_lowercase();
        match KNOWN_REGIONS
            .iter()
            .find(|(key, _)| needle.contains(key))
        {
            Some((key, bounds)) => {
                debug!(region = key, "using known bounds for destination");
                *bounds
            }
            None => {
                debug!(%destination, "no known region matched, using default bounds");
                DEFAULT_BOUNDS
            }
        }
    }
}
