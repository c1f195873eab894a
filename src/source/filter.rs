use serde::{Deserialize, Serialize};

use crate::types::SaleFact;

/// Names compare ASCII case-insensitively; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactFilter {
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub region: Option<String>,
    pub year: Option<i32>,
}

impl FactFilter {
    pub fn new(
        fuel_type: Option<String>,
        body_type: Option<String>,
        region: Option<String>,
        year: Option<i32>,
    ) -> Self {
        Self {
            fuel_type: normalize(fuel_type),
            body_type: normalize(body_type),
            region: normalize(region),
            year,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fuel_type.is_none()
            && self.body_type.is_none()
            && self.region.is_none()
            && self.year.is_none()
    }

    pub fn matches(&self, fact: &SaleFact) -> bool {
        field_matches(self.fuel_type.as_deref(), &fact.fuel_type)
            && field_matches(self.body_type.as_deref(), &fact.body_type)
            && field_matches(self.region.as_deref(), &fact.region_name)
            && self.year.map_or(true, |year| fact.year == year)
    }

    pub fn apply(&self, facts: Vec<SaleFact>) -> Vec<SaleFact> {
        if self.is_empty() {
            return facts;
        }
        facts.into_iter().filter(|fact| self.matches(fact)).collect()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |wanted| wanted.eq_ignore_ascii_case(actual))
}
