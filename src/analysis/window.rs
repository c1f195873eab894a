use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::analysis::WindowAggregates;
use crate::types::SaleFact;

/// Counting map that keeps first-seen order for stable tie-breaks.
#[derive(Debug, Clone)]
pub struct AggregateBucket<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

impl<K> Default for AggregateBucket<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> AggregateBucket<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: K, count: u64) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }
}

impl<K> AggregateBucket<K> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }
}

pub fn aggregate(facts: &[SaleFact]) -> WindowAggregates {
    let mut out = WindowAggregates::default();
    for fact in facts {
        out.total_sales += 1;
        out.models.increment(fact.model_fuel());
        out.cities.increment(fact.city_name.clone());
        out.dealers.increment(fact.dealer_name.clone());
        out.fuel_types.increment(fact.fuel_type.clone());
        out.body_fuel.increment(fact.body_fuel());
        out.body_types.increment(fact.body_type.clone());
        out.regions.increment(fact.region_name.clone());
        out.months.increment(fact.month_key());
        out.quarters.increment(fact.quarter_key());
        *out
            .city_months
            .entry(fact.city_name.clone())
            .or_default()
            .entry(fact.month_key())
            .or_insert(0) += 1;
    }
    debug!(
        facts = out.total_sales,
        models = out.models.len(),
        cities = out.cities.len(),
        dealers = out.dealers.len(),
        regions = out.regions.len(),
        "aggregated sales window"
    );
    out
}
