use std::fmt::{Display, Formatter};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// One historical sale, already joined across the model, dealer, city,
/// region and calendar dimensions by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleFact {
    pub model_name: String,
    pub fuel_type: String,
    pub body_type: String,
    pub city_name: String,
    pub region_name: String,
    pub dealer_name: String,
    pub year: i32,
    pub month: u32,
}

impl SaleFact {
    pub fn month_key(&self) -> MonthKey {
        MonthKey::new(self.year, self.month)
    }

    pub fn model_fuel(&self) -> ModelFuelKey {
        ModelFuelKey {
            model: self.model_name.clone(),
            fuel: self.fuel_type.clone(),
        }
    }

    pub fn body_fuel(&self) -> BodyFuelKey {
        BodyFuelKey {
            body: self.body_type.clone(),
            fuel: self.fuel_type.clone(),
        }
    }

    pub fn quarter_key(&self) -> QuarterKey {
        self.month_key().quarter()
    }
}

/// Calendar month. Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Months since year 0, so consecutive months differ by one.
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    pub fn quarter(&self) -> QuarterKey {
        QuarterKey {
            year: self.year,
            quarter: self.month.saturating_sub(1) / 3 + 1,
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuarterKey {
    pub year: i32,
    pub quarter: u32,
}

impl Display for QuarterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelFuelKey {
    pub model: String,
    pub fuel: String,
}

impl Display for ModelFuelKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.model, self.fuel)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyFuelKey {
    pub body: String,
    pub fuel: String,
}

impl Display for BodyFuelKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.body, self.fuel)
    }
}

/// Trailing span of calendar months ending at the month of `reference`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleWindow {
    pub reference: NaiveDate,
    pub months: u32,
}

impl SaleWindow {
    pub const DEFAULT_MONTHS: u32 = 6;

    pub fn trailing(reference: NaiveDate, months: u32) -> Self {
        Self {
            reference,
            months: months.max(1),
        }
    }

    pub fn last_month(&self) -> MonthKey {
        MonthKey::of(self.reference)
    }

    pub fn first_month(&self) -> MonthKey {
        let first_of_month = self.reference.with_day(1).unwrap_or(self.reference);
        first_of_month
            .checked_sub_months(Months::new(self.months.saturating_sub(1)))
            .map(MonthKey::of)
            .unwrap_or_else(|| MonthKey::new(i32::MIN, 1))
    }

    pub fn contains(&self, month: MonthKey) -> bool {
        month >= self.first_month() && month <= self.last_month()
    }
}
