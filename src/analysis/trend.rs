use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::analysis::{CityGrowth, REFERENCE_WINDOW_MONTHS};
use crate::types::MonthKey;

pub const MIN_ACTIVE_MONTHS: usize = 4;

// first half holds floor(n / 2) entries
pub fn growth_between_halves(values: &[u64]) -> f64 {
    let split = values.len() / 2;
    let first: u64 = values[..split].iter().sum();
    let second: u64 = values[split..].iter().sum();
    if first == 0 {
        return 0.0;
    }
    (second as f64 - first as f64) / first as f64 * 100.0
}

pub fn city_growth(
    city_name: &str,
    sales_total: u64,
    monthly: Option<&BTreeMap<MonthKey, u64>>,
) -> CityGrowth {
    let counts = monthly
        .map(|months| months.values().copied().collect::<Vec<_>>())
        .unwrap_or_default();
    let active_months = counts.len();
    let insufficient_data = active_months < MIN_ACTIVE_MONTHS;
    let growth_rate_percent = if insufficient_data {
        0.0
    } else {
        growth_between_halves(&counts)
    };
    CityGrowth {
        city_name: city_name.to_string(),
        sales_total,
        growth_rate_percent,
        average_monthly_sales: sales_total as f64 / REFERENCE_WINDOW_MONTHS,
        active_months,
        insufficient_data,
    }
}

pub fn analyze_city_growth<'a>(
    candidates: impl IntoIterator<Item = (&'a str, u64)>,
    city_months: &HashMap<String, BTreeMap<MonthKey, u64>>,
) -> Vec<CityGrowth> {
    let out = candidates
        .into_iter()
        .map(|(city, total)| city_growth(city, total, city_months.get(city)))
        .collect::<Vec<_>>();
    debug!(
        cities = out.len(),
        insufficient = out.iter().filter(|c| c.insufficient_data).count(),
        "analyzed city growth"
    );
    out
}
