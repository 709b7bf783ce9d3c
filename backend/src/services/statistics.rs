use crate::utils::{compare_with_order_float, SortOrder};
use log::warn;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Fewer qualifying points than this and a correlation is meaningless.
pub const MIN_CORRELATION_POINTS: usize = 3;

/// Count, sum and mean of a nullable numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// Rows considered, including nulls
    pub count: usize,
    /// Rows with a value
    pub present: usize,
    pub sum: u64,
    /// Set once `sum` hit `u64::MAX`
    pub overflowed: bool,
}

impl Aggregate {
    pub fn over<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<u64>>,
    {
        values
            .into_iter()
            .fold(Aggregate::default(), |mut acc, value| {
                acc.count += 1;
                if let Some(value) = value {
                    acc.present += 1;
                    acc.sum = match acc.sum.checked_add(value) {
                        Some(sum) => sum,
                        None => {
                            warn!("Sum overflowed u64, clamping at u64::MAX; means are unreliable.");
                            acc.overflowed = true;
                            u64::MAX
                        }
                    };
                }
                acc
            })
    }

    /// Nulls are left out of the denominator. No mean once the sum overflowed.
    pub fn mean(&self) -> Option<f64> {
        if self.present == 0 || self.overflowed {
            return None;
        }
        Some(self.sum as f64 / self.present as f64)
    }
}

pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (count, sum) = values
        .into_iter()
        .fold((0usize, 0.0f64), |(count, sum), v| (count + 1, sum + v));
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Pearson correlation coefficient of `(x, y)` pairs.
///
/// Returns `None` below [`MIN_CORRELATION_POINTS`] or when either dimension
/// has zero variance.
pub fn pearson_correlation(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < MIN_CORRELATION_POINTS {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }

    let r = covariance / (variance_x.sqrt() * variance_y.sqrt());
    // float noise can push a perfect fit slightly past 1
    Some(r.clamp(-1.0, 1.0))
}

/// Group items by a key, keeping groups and their members in first-seen order.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&pos) => groups[pos].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// The `n` items with the largest key, descending.
///
/// Items without a key are not eligible. The sort is stable, so ties keep their
/// input order.
pub fn top_n<T, F>(items: impl IntoIterator<Item = T>, n: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut eligible: Vec<(f64, T)> = items
        .into_iter()
        .filter_map(|item| key(&item).map(|k| (k, item)))
        .collect();

    eligible.sort_by(|(a, _), (b, _)| compare_with_order_float(*a, *b, &SortOrder::Desc));
    eligible.truncate(n);
    eligible.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aggregate_excludes_nulls_from_mean() {
        let agg = Aggregate::over(vec![Some(10), None, Some(20)]);
        assert_eq!(agg.count, 3);
        assert_eq!(agg.present, 2);
        assert_eq!(agg.sum, 30);
        assert_eq!(agg.mean(), Some(15.0));
    }

    #[test]
    fn aggregate_of_nothing_is_undefined() {
        let agg = Aggregate::over(Vec::new());
        assert_eq!(agg.count, 0);
        assert_eq!(agg.sum, 0);
        assert_eq!(agg.mean(), None);

        let only_nulls = Aggregate::over(vec![None, None]);
        assert_eq!(only_nulls.count, 2);
        assert_eq!(only_nulls.mean(), None);
    }

    #[test]
    fn overflowing_sum_is_flagged() {
        let agg = Aggregate::over(vec![Some(u64::MAX), Some(1), Some(5)]);
        assert_eq!(agg.sum, u64::MAX);
        assert!(agg.overflowed);
        assert_eq!(agg.mean(), None);
        assert!(!Aggregate::over(vec![Some(1)]).overflowed);
    }

    #[test]
    fn float_mean() {
        assert_eq!(mean(vec![1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(Vec::new()), None);
    }

    #[test]
    fn perfect_linear_relation_correlates_to_one() {
        let points: Vec<(f64, f64)> = (1..=6)
            .map(|i| (i as f64, 1000.0 * i as f64 + 50.0))
            .collect();
        let r = pearson_correlation(&points).unwrap();
        assert!((r - 1.0).abs() < 1e-9);

        let inverse: Vec<(f64, f64)> = points.iter().map(|(x, y)| (*x, -y)).collect();
        let r = pearson_correlation(&inverse).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn correlation_needs_enough_points_and_variance() {
        assert_eq!(pearson_correlation(&[]), None);
        assert_eq!(pearson_correlation(&[(1.0, 2.0)]), None);
        assert_eq!(pearson_correlation(&[(1.0, 2.0), (2.0, 4.0)]), None);
        assert_eq!(
            pearson_correlation(&[(3.0, 1.0), (3.0, 5.0), (3.0, 9.0)]),
            None
        );
        assert_eq!(
            pearson_correlation(&[(1.0, 7.0), (2.0, 7.0), (3.0, 7.0)]),
            None
        );
    }

    #[test]
    fn group_by_keeps_first_seen_order() {
        let words = vec!["beta", "alpha", "bravo", "apple", "charlie"];
        let groups = group_by(words, |w| w.chars().next());

        assert_eq!(
            groups,
            vec![
                (Some('b'), vec!["beta", "bravo"]),
                (Some('a'), vec!["alpha", "apple"]),
                (Some('c'), vec!["charlie"]),
            ]
        );
    }

    #[test]
    fn top_n_is_stable_and_does_not_pad() {
        let items = vec![("a", Some(5.0)), ("b", None), ("c", Some(9.0)), ("d", Some(5.0))];

        let top = top_n(items.clone(), 5, |(_, v)| *v);
        let names: Vec<&str> = top.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["c", "a", "d"]);

        let top_two = top_n(items, 2, |(_, v)| *v);
        assert_eq!(top_two.len(), 2);
        assert_eq!(top_two[1].0, "a");
    }

    #[test]
    fn top_n_of_empty_input_is_empty() {
        let empty: Vec<(&str, Option<f64>)> = Vec::new();
        let top = top_n(empty, 3, |(_, v)| *v);
        assert!(top.is_empty());
    }
}
