//! Source of the synthetic-but-believable numbers used when an upstream record
//! omits a value, and for the sample listings.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const ID_TOKEN_LEN: usize = 13;
pub const MAX_RATING: f64 = 5.0;

pub struct PlausibleValues {
    rng: Mutex<StdRng>,
}

impl PlausibleValues {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic sequence for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with<T>(&self, draw: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        draw(&mut *guard)
    }

    /// Whole-dollar nightly price in `[min, min + span)`.
    pub fn price(&self, min: u32, span: u32) -> f64 {
        f64::from(self.with(|rng| rng.gen_range(min..min + span.max(1))))
    }

    /// 3.0 or 4.0, for records that carry no score at all.
    pub fn coarse_rating(&self) -> f64 {
        f64::from(self.with(|rng| rng.gen_range(3u32..5)))
    }

    /// `base` plus a random tenth in `0.0..=0.9`, capped at 5.0.
    pub fn rating_from(&self, base: f64) -> f64 {
        let tenths = self.with(|rng| rng.gen_range(0u32..10));
        let rating = base + f64::from(tenths) / 10.0;
        round_tenth(rating.min(MAX_RATING))
    }

    pub fn review_count(&self, min: u32, span: u32) -> u32 {
        self.with(|rng| rng.gen_range(min..min + span.max(1)))
    }

    /// Lowercase alphanumeric suffix for provider-prefixed ids.
    pub fn id_token(&self) -> String {
        self.with(|rng| {
            (0..ID_TOKEN_LEN)
                .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
                .collect()
        })
    }
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generators_repeat() {
        let first = PlausibleValues::seeded(7);
        let second = PlausibleValues::seeded(7);
        for _ in 0..20 {
            assert_eq!(first.price(100, 200), second.price(100, 200));
            assert_eq!(first.id_token(), second.id_token());
        }
    }

    #[test]
    fn values_stay_in_documented_ranges() {
        let values = PlausibleValues::seeded(42);
        for _ in 0..500 {
            let price = values.price(100, 200);
            assert!((100.0..300.0).contains(&price));

            let coarse = values.coarse_rating();
            assert!(coarse == 3.0 || coarse == 4.0);

            let rating = values.rating_from(4.5);
            assert!((4.5..=MAX_RATING).contains(&rating));

            let reviews = values.review_count(50, 100);
            assert!((50..150).contains(&reviews));
        }
    }

    #[test]
    fn id_tokens_are_lowercase_alphanumeric() {
        let token = PlausibleValues::seeded(1).id_token();
        assert_eq!(token.len(), ID_TOKEN_LEN);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
