//! Category rank scoring
//!
//! Converts one metric per team into a rank score. The best team earns
//! `max_points`, the next `max_points - 1`, and so on. Teams sharing a value
//! split the slots they occupy evenly, so ties never change the total pool of
//! points handed out.

use crate::models::{CategoryScore, TeamId};

/// Score one metric.
///
/// `max_points` defaults to the number of teams in `values`. An empty input
/// yields an empty score map.
pub fn score(values: &[(TeamId, f64)], max_points: Option<u32>) -> CategoryScore {
    let mut scores = CategoryScore::new();
    if values.is_empty() {
        return scores;
    }

    let max_points = max_points.map(i64::from).unwrap_or(values.len() as i64);

    let mut sorted = values.to_vec();
    sorted.sort_by(|(a_id, a), (b_id, b)| b.total_cmp(a).then_with(|| a_id.cmp(b_id)));

    let mut start = 0;
    while start < sorted.len() {
        let value = sorted[start].1;
        let end = sorted[start..]
            .iter()
            .position(|(_, v)| *v != value)
            .map_or(sorted.len(), |offset| start + offset);

        // Slots start..end carry max_points - start down to max_points - (end - 1)
        let slot_sum: i64 = (start..end).map(|i| max_points - i as i64).sum();
        let shared = slot_sum as f64 / (end - start) as f64;

        for (team_id, _) in &sorted[start..end] {
            scores.insert(*team_id, shared);
        }
        start = end;
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn teams(values: &[f64]) -> Vec<(TeamId, f64)> {
        values.iter().enumerate().map(|(i, v)| (TeamId(i as u32), *v)).collect()
    }

    #[test]
    fn test_tied_pair_shares_slots() {
        let scores = score(&teams(&[10.0, 8.0, 8.0, 5.0]), Some(4));

        assert_eq!(scores[&TeamId(0)], 4.0);
        assert_eq!(scores[&TeamId(1)], 2.5);
        assert_eq!(scores[&TeamId(2)], 2.5);
        assert_eq!(scores[&TeamId(3)], 1.0);
    }

    #[test]
    fn test_max_points_defaults_to_team_count() {
        let scores = score(&teams(&[3.0, 7.0, 5.0]), None);

        assert_eq!(scores[&TeamId(1)], 3.0);
        assert_eq!(scores[&TeamId(2)], 2.0);
        assert_eq!(scores[&TeamId(0)], 1.0);
    }

    #[test]
    fn test_fixed_league_size_override() {
        // Two teams scored on a twelve-team scale
        let scores = score(&teams(&[50.0, 60.0]), Some(12));

        assert_eq!(scores[&TeamId(1)], 12.0);
        assert_eq!(scores[&TeamId(0)], 11.0);
    }

    #[test]
    fn test_three_way_tie_at_bottom() {
        let scores = score(&teams(&[1.0, 0.0, 0.0, 0.0]), Some(4));

        assert_eq!(scores[&TeamId(0)], 4.0);
        for id in 1..4 {
            assert_eq!(scores[&TeamId(id)], 2.0);
        }
    }

    #[test]
    fn test_all_equal_values() {
        let scores = score(&teams(&[7.0; 5]), None);
        assert!(scores.values().all(|s| *s == 3.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(score(&[], Some(10)).is_empty());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![(TeamId(4), 9.0), (TeamId(2), 9.0), (TeamId(7), 1.0)];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(score(&forward, None), score(&reversed, None));
    }

    proptest! {
        #[test]
        fn prop_point_pool_is_conserved(values in prop::collection::vec(0u32..20, 1..16)) {
            let input: Vec<(TeamId, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (TeamId(i as u32), f64::from(*v)))
                .collect();
            let n = input.len() as f64;

            let scores = score(&input, None);
            let pool: f64 = scores.values().sum();

            prop_assert_eq!(scores.len(), input.len());
            prop_assert!((pool - n * (n + 1.0) / 2.0).abs() < 1e-9);
        }

        #[test]
        fn prop_equal_values_get_equal_scores(values in prop::collection::vec(0u32..5, 2..12)) {
            let input: Vec<(TeamId, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (TeamId(i as u32), f64::from(*v)))
                .collect();

            let scores = score(&input, None);

            for (a, va) in &input {
                for (b, vb) in &input {
                    if va == vb {
                        prop_assert_eq!(scores[a], scores[b]);
                    } else if va > vb {
                        prop_assert!(scores[a] > scores[b]);
                    }
                }
            }
        }
    }
}
