//! Rating aggregation.

use crate::review::{Rating, Review};

/// Something carrying a rating that can be re-rated by producing a new value.
pub trait Rateable: Sized {
    fn rating(&self) -> Rating;

    /// Return a copy of `self` carrying `rating`. The receiver is untouched.
    fn apply_rating(&self, rating: Rating) -> Self;
}

/// Aggregate rating of a review sequence: the arithmetic mean of the ratings,
/// rounded half-up, clamped to `0..=5`. An empty sequence is `NotRated`.
pub fn aggregate_rating(reviews: &[Review]) -> Rating {
    if reviews.is_empty() {
        return Rating::NotRated;
    }

    let count = reviews.len() as u64;
    let sum: u64 = reviews.iter().map(|r| u64::from(r.rating().value())).sum();

    // round(sum / count) half-up == floor((2 * sum + count) / (2 * count))
    let rounded = (2 * sum + count) / (2 * count);
    Rating::clamped(rounded.min(u64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviews(values: &[u8]) -> Vec<Review> {
        values
            .iter()
            .map(|v| Review::new(Rating::try_from(*v).unwrap(), ""))
            .collect()
    }

    #[test]
    fn empty_sequence_is_not_rated() {
        assert_eq!(aggregate_rating(&[]), Rating::NotRated);
    }

    #[test]
    fn mean_is_rounded() {
        // 17 / 4 = 4.25
        assert_eq!(aggregate_rating(&reviews(&[4, 5, 3, 5])), Rating::FourStar);
        // 7 / 4 = 1.75
        assert_eq!(aggregate_rating(&reviews(&[3, 2, 1, 1])), Rating::TwoStar);
        // 19 / 4 = 4.75
        assert_eq!(aggregate_rating(&reviews(&[4, 5, 5, 5])), Rating::FiveStar);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(aggregate_rating(&reviews(&[4, 5])), Rating::FiveStar);
        assert_eq!(aggregate_rating(&reviews(&[0, 1])), Rating::OneStar);
        assert_eq!(aggregate_rating(&reviews(&[2, 3])), Rating::ThreeStar);
    }

    #[test]
    fn single_review_is_its_own_aggregate() {
        for v in 0u8..=5 {
            let rs = reviews(&[v]);
            assert_eq!(aggregate_rating(&rs).value(), v);
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: aggregate equals the half-up rounded floating mean.
            #[test]
            fn matches_rounded_mean(values in prop::collection::vec(0u8..=5, 1..64)) {
                let rs = reviews(&values);
                let mean = values.iter().map(|v| f64::from(*v)).sum::<f64>() / values.len() as f64;
                let expected = (mean + 0.5).floor() as u8;
                prop_assert_eq!(aggregate_rating(&rs).value(), expected);
            }

            /// Property: aggregate lies between the smallest and largest rating.
            #[test]
            fn stays_within_bounds(values in prop::collection::vec(0u8..=5, 1..64)) {
                let rs = reviews(&values);
                let agg = aggregate_rating(&rs).value();
                let min = *values.iter().min().unwrap();
                let max = *values.iter().max().unwrap();
                prop_assert!(agg >= min && agg <= max);
            }

            /// Property: order of reviews does not change the aggregate.
            #[test]
            fn order_independent(values in prop::collection::vec(0u8..=5, 1..32)) {
                let forward = reviews(&values);
                let mut reversed_values = values.clone();
                reversed_values.reverse();
                let backward = reviews(&reversed_values);
                prop_assert_eq!(aggregate_rating(&forward), aggregate_rating(&backward));
            }
        }
    }
}
