use crate::utils::{compare_with_order_float, round2, SortOrder};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const NO_VIEWS_LABEL: &str = "No Views";
pub const NO_LIKES_LABEL: &str = "No Likes";

/// Likes relative to views, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngagementRate {
    /// View count missing or zero, the ratio is undefined.
    NoViews,
    /// Views but no likes. The rate is 0 but reported as its own bucket.
    NoLikes,
    /// Percentage rounded to two decimals.
    Rate(f64),
}

impl EngagementRate {
    pub fn compute(like_count: Option<u64>, view_count: Option<u64>) -> Self {
        let views = match view_count {
            Some(views) if views > 0 => views,
            _ => return EngagementRate::NoViews,
        };
        let likes = match like_count {
            Some(likes) if likes > 0 => likes,
            _ => return EngagementRate::NoLikes,
        };

        EngagementRate::Rate(round2(likes as f64 / views as f64 * 100.0))
    }

    /// Numeric rate, counting `NoLikes` as 0. `None` for `NoViews`.
    pub fn value(&self) -> Option<f64> {
        match self {
            EngagementRate::NoViews => None,
            EngagementRate::NoLikes => Some(0.0),
            EngagementRate::Rate(rate) => Some(*rate),
        }
    }

    /// Only actual percentages, both sentinels excluded.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            EngagementRate::Rate(rate) => Some(*rate),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            EngagementRate::NoViews => NO_VIEWS_LABEL.to_string(),
            EngagementRate::NoLikes => NO_LIKES_LABEL.to_string(),
            EngagementRate::Rate(rate) => format!("{rate:.2}%"),
        }
    }

    /// Bucket order for the distribution: percentages descending, then
    /// `NoLikes`, then `NoViews` at the very bottom.
    fn compare_buckets(&self, other: &Self) -> Ordering {
        match (self, other) {
            (EngagementRate::Rate(a), EngagementRate::Rate(b)) => {
                compare_with_order_float(*a, *b, &SortOrder::Desc)
            }
            _ => self.sink_rank().cmp(&other.sink_rank()),
        }
    }

    fn sink_rank(&self) -> u8 {
        match self {
            EngagementRate::Rate(_) => 0,
            EngagementRate::NoLikes => 1,
            EngagementRate::NoViews => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementBucket {
    pub bucket: String,
    pub videos: usize,
}

/// Count rates per exact rounded percentage plus the two sentinel buckets.
pub fn engagement_distribution<I>(rates: I) -> Vec<EngagementBucket>
where
    I: IntoIterator<Item = EngagementRate>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(EngagementRate, EngagementBucket)> = Vec::new();

    for rate in rates {
        let label = rate.label();
        match index.get(&label) {
            Some(&pos) => buckets[pos].1.videos += 1,
            None => {
                index.insert(label.clone(), buckets.len());
                buckets.push((
                    rate,
                    EngagementBucket {
                        bucket: label,
                        videos: 1,
                    },
                ));
            }
        }
    }

    buckets.sort_by(|(a, _), (b, _)| a.compare_buckets(b));
    buckets.into_iter().map(|(_, bucket)| bucket).collect()
}
