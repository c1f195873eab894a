use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::trend::analyze_city_growth;
use crate::analysis::{AggregateBucket, CityGrowth, Ranked, WindowAggregates};
use crate::types::{BodyFuelKey, ModelFuelKey};

pub const TOP_MODELS: usize = 5;
pub const TOP_CITIES: usize = 5;
pub const TOP_DEALERS: usize = 5;
pub const TOP_BODY_FUEL: usize = 3;
pub const POTENTIAL_CITIES: usize = 5;

pub const POTENTIAL_BAND_LOWER_PCT: u64 = 30;
pub const POTENTIAL_BAND_UPPER_PCT: u64 = 70;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segments {
    pub top_models: Vec<Ranked<ModelFuelKey>>,
    pub top_cities: Vec<Ranked<String>>,
    pub top_dealers: Vec<Ranked<String>>,
    pub top_fuel_types: Vec<Ranked<String>>,
    pub top_body_fuel: Vec<Ranked<BodyFuelKey>>,
    pub potential_cities: Vec<CityGrowth>,
}

pub fn top_n<K: Clone>(bucket: &AggregateBucket<K>, limit: Option<usize>) -> Vec<Ranked<K>> {
    let mut ranked = bucket
        .iter()
        .map(|(key, sales)| Ranked {
            name: key.clone(),
            sales,
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.sales.cmp(&a.sales));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Mean city volume as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityAverage {
    pub sum: u64,
    pub count: u64,
}

impl CityAverage {
    pub fn of(top_cities: &[Ranked<String>], cities: &AggregateBucket<String>) -> Self {
        if top_cities.is_empty() {
            return Self {
                sum: cities.total(),
                count: cities.len() as u64,
            };
        }
        Self {
            sum: top_cities.iter().map(|c| c.sales).sum(),
            count: top_cities.len() as u64,
        }
    }

    pub fn value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    pub fn band_contains(&self, sales: u64, lower_pct: u64, upper_pct: u64) -> bool {
        if self.count == 0 {
            return false;
        }
        let scaled = u128::from(sales) * u128::from(self.count) * 100;
        let sum = u128::from(self.sum);
        scaled >= u128::from(lower_pct) * sum && scaled <= u128::from(upper_pct) * sum
    }
}

pub fn compare_potential(a: &CityGrowth, b: &CityGrowth) -> Ordering {
    match (a.is_growing(), b.is_growing()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b
            .growth_rate_percent
            .partial_cmp(&a.growth_rate_percent)
            .unwrap_or(Ordering::Equal),
        (false, false) => b.sales_total.cmp(&a.sales_total),
    }
}

pub fn rank_potential_cities(cities: &mut [CityGrowth]) {
    cities.sort_by(compare_potential);
}

pub fn select_potential_cities(
    aggregates: &WindowAggregates,
    top_cities: &[Ranked<String>],
) -> Vec<CityGrowth> {
    let average = CityAverage::of(top_cities, &aggregates.cities);
    let candidates = aggregates
        .cities
        .iter()
        .filter(|(name, _)| !top_cities.iter().any(|top| &top.name == *name))
        .filter(|(_, sales)| {
            average.band_contains(*sales, POTENTIAL_BAND_LOWER_PCT, POTENTIAL_BAND_UPPER_PCT)
        })
        .map(|(name, sales)| (name.as_str(), sales));
    let mut potential = analyze_city_growth(candidates, &aggregates.city_months);
    rank_potential_cities(&mut potential);
    potential.truncate(POTENTIAL_CITIES);
    debug!(
        top_city_average = average.value(),
        potential = potential.len(),
        "selected potential cities"
    );
    potential
}

pub fn rank_city_trends(aggregates: &WindowAggregates) -> Vec<CityGrowth> {
    let all = aggregates
        .cities
        .iter()
        .map(|(name, sales)| (name.as_str(), sales));
    let mut cities = analyze_city_growth(all, &aggregates.city_months);
    rank_potential_cities(&mut cities);
    cities
}

pub fn segment(aggregates: &WindowAggregates) -> Segments {
    let top_cities = top_n(&aggregates.cities, Some(TOP_CITIES));
    let potential_cities = select_potential_cities(aggregates, &top_cities);
    Segments {
        top_models: top_n(&aggregates.models, Some(TOP_MODELS)),
        top_dealers: top_n(&aggregates.dealers, Some(TOP_DEALERS)),
        top_fuel_types: top_n(&aggregates.fuel_types, None),
        top_body_fuel: top_n(&aggregates.body_fuel, Some(TOP_BODY_FUEL)),
        top_cities,
        potential_cities,
    }
}
