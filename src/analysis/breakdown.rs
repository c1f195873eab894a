use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::segment::top_n;
use crate::analysis::{AggregateBucket, Ranked, WindowAggregates};
use crate::types::{MonthKey, QuarterKey};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesBreakdown {
    pub by_region: Vec<Ranked<String>>,
    pub by_body_type: Vec<Ranked<String>>,
    pub by_month: Vec<Ranked<MonthKey>>,
    pub by_quarter: Vec<Ranked<QuarterKey>>,
}

pub fn newest_first<K: Copy + Ord>(bucket: &AggregateBucket<K>) -> Vec<Ranked<K>> {
    let mut periods = bucket
        .iter()
        .map(|(key, sales)| Ranked { name: *key, sales })
        .collect::<Vec<_>>();
    periods.sort_by(|a, b| b.name.cmp(&a.name));
    periods
}

pub fn breakdown(aggregates: &WindowAggregates) -> SalesBreakdown {
    let out = SalesBreakdown {
        by_region: top_n(&aggregates.regions, None),
        by_body_type: top_n(&aggregates.body_types, None),
        by_month: newest_first(&aggregates.months),
        by_quarter: newest_first(&aggregates.quarters),
    };
    debug!(
        regions = out.by_region.len(),
        months = out.by_month.len(),
        "built sales breakdown"
    );
    out
}
