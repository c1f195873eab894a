pub mod breakdown;
pub mod segment;
pub mod trend;
pub mod window;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{BodyFuelKey, ModelFuelKey, MonthKey, QuarterKey};

pub use window::{aggregate, AggregateBucket};

// monthly figures divide by six whatever the window length
pub const REFERENCE_WINDOW_MONTHS: f64 = 6.0;

#[derive(Debug, Clone, Default)]
pub struct WindowAggregates {
    pub total_sales: u64,
    pub models: AggregateBucket<ModelFuelKey>,
    pub cities: AggregateBucket<String>,
    pub dealers: AggregateBucket<String>,
    pub fuel_types: AggregateBucket<String>,
    pub body_fuel: AggregateBucket<BodyFuelKey>,
    pub body_types: AggregateBucket<String>,
    pub regions: AggregateBucket<String>,
    pub months: AggregateBucket<MonthKey>,
    pub quarters: AggregateBucket<QuarterKey>,
    pub city_months: HashMap<String, BTreeMap<MonthKey, u64>>,
}

impl WindowAggregates {
    pub fn is_empty(&self) -> bool {
        self.total_sales == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ranked<K> {
    pub name: K,
    pub sales: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityGrowth {
    pub city_name: String,
    pub sales_total: u64,
    pub growth_rate_percent: f64,
    pub average_monthly_sales: f64,
    pub active_months: usize,
    /// Growth rate is a placeholder zero below [`trend::MIN_ACTIVE_MONTHS`].
    pub insufficient_data: bool,
}

impl CityGrowth {
    pub fn is_growing(&self) -> bool {
        self.growth_rate_percent > 0.0
    }
}
