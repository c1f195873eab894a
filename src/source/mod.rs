pub mod csv;
pub mod filter;

use anyhow::Result;

use crate::types::{SaleFact, SaleWindow};

pub use self::csv::CsvSource;
pub use self::filter::FactFilter;

/// Supplies the sale facts that fall inside a trailing window.
pub trait SaleSource {
    fn fetch_window(&self, window: &SaleWindow) -> Result<Vec<SaleFact>>;

    fn fetch_filtered(&self, window: &SaleWindow, filter: &FactFilter) -> Result<Vec<SaleFact>> {
        Ok(filter.apply(self.fetch_window(window)?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct VecSource {
    facts: Vec<SaleFact>,
}

impl VecSource {
    pub fn new(facts: Vec<SaleFact>) -> Self {
        Self { facts }
    }
}

impl SaleSource for VecSource {
    fn fetch_window(&self, window: &SaleWindow) -> Result<Vec<SaleFact>> {
        Ok(self
            .facts
            .iter()
            .filter(|fact| window.contains(fact.month_key()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::source::{FactFilter, SaleSource, VecSource};
    use crate::types::{SaleFact, SaleWindow};

    fn fact(year: i32, month: u32) -> SaleFact {
        SaleFact {
            model_name: "Corsa".to_string(),
            fuel_type: "Petrol".to_string(),
            body_type: "Hatchback".to_string(),
            city_name: "Antalya".to_string(),
            region_name: "Mediterranean".to_string(),
            dealer_name: "Sahil Oto".to_string(),
            year,
            month,
        }
    }

    #[test]
    fn filters_to_trailing_window() {
        let source = VecSource::new(vec![
            fact(2023, 9),
            fact(2023, 10),
            fact(2024, 1),
            fact(2024, 3),
            fact(2024, 4),
        ]);
        let window = SaleWindow::trailing(
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            6,
        );
        let facts = source.fetch_window(&window).expect("fetch");
        let months = facts
            .iter()
            .map(|f| f.month_key().to_string())
            .collect::<Vec<_>>();
        assert_eq!(months, vec!["2023-10", "2024-01", "2024-03"]);
    }

    #[test]
    fn filtered_fetch_applies_window_then_filter() {
        let source = VecSource::new(vec![fact(2023, 9), fact(2023, 12), fact(2024, 2)]);
        let window = SaleWindow::trailing(
            NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            6,
        );
        let filter = FactFilter::new(None, None, None, Some(2024));
        let facts = source.fetch_filtered(&window, &filter).expect("fetch");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].month_key().to_string(), "2024-02");

        let other_region = FactFilter::new(None, None, Some("Aegean".to_string()), None);
        assert!(source
            .fetch_filtered(&window, &other_region)
            .expect("fetch")
            .is_empty());
    }
}
