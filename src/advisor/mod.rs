pub mod recommendations;
pub mod summary;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advisor::recommendations::build_recommendations;
use crate::advisor::summary::summarize;
use crate::analysis::segment::segment;
use crate::analysis::{aggregate, CityGrowth, Ranked};
use crate::error::AdvisorError;
use crate::source::SaleSource;
use crate::types::{BodyFuelKey, ModelFuelKey, SaleFact, SaleWindow};

pub const DEFAULT_TARGET_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesTarget {
    pub target_sales: Option<u64>,
    pub target_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub total_sales: u64,
    pub monthly_average: i64,
    pub target_monthly_average: i64,
    pub shortfall: i64,
    pub gap_percentage: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ModelFocus,
    CityCampaign,
    DealerPilot,
    LocalPromotion,
}

impl RecommendationKind {
    pub fn priority(self) -> u8 {
        match self {
            Self::ModelFocus => 1,
            Self::CityCampaign => 2,
            Self::DealerPilot => 3,
            Self::LocalPromotion => 4,
        }
    }

    pub fn as_slug(self) -> &'static str {
        match self {
            Self::ModelFocus => "model_focus",
            Self::CityCampaign => "city_campaign",
            Self::DealerPilot => "dealer_pilot",
            Self::LocalPromotion => "local_promotion",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: u8,
    pub title: String,
    pub description: String,
    pub metric: String,
    pub metric_label: String,
    pub supporting_entities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub analysis: AnalysisSummary,
    pub top_models: Vec<Ranked<ModelFuelKey>>,
    pub top_cities: Vec<Ranked<String>>,
    pub top_dealers: Vec<Ranked<String>>,
    pub top_fuel_types: Vec<Ranked<String>>,
    pub top_body_fuel_combinations: Vec<Ranked<BodyFuelKey>>,
    pub potential_cities: Vec<CityGrowth>,
    pub recommendations: Vec<Recommendation>,
}

/// Runs the pipeline over facts already restricted to the window.
pub fn compute_recommendations(
    facts: &[SaleFact],
    target: &SalesTarget,
) -> Result<RecommendationResult, AdvisorError> {
    target.validate()?;
    let aggregates = aggregate(facts);
    let analysis = summarize(aggregates.total_sales, target)?;
    let segments = segment(&aggregates);
    let recommendations = build_recommendations(&segments, aggregates.total_sales);

    Ok(RecommendationResult {
        analysis,
        top_models: segments.top_models,
        top_cities: segments.top_cities,
        top_dealers: segments.top_dealers,
        top_fuel_types: segments.top_fuel_types,
        top_body_fuel_combinations: segments.top_body_fuel,
        potential_cities: segments.potential_cities,
        recommendations,
    })
}

pub fn advise(
    source: &dyn SaleSource,
    window: &SaleWindow,
    target: &SalesTarget,
) -> Result<RecommendationResult> {
    target.validate()?;
    let facts = source.fetch_window(window)?;
    info!(
        facts = facts.len(),
        from = %window.first_month(),
        to = %window.last_month(),
        "fetched sales window"
    );
    Ok(compute_recommendations(&facts, target)?)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use chrono::NaiveDate;

    use crate::advisor::{advise, compute_recommendations, RecommendationKind, SalesTarget};
    use crate::error::AdvisorError;
    use crate::source::{SaleSource, VecSource};
    use crate::types::{SaleFact, SaleWindow};

    fn fact(city: &str, dealer: &str, month: u32) -> SaleFact {
        SaleFact {
            model_name: "Astra".to_string(),
            fuel_type: "Diesel".to_string(),
            body_type: "Sedan".to_string(),
            city_name: city.to_string(),
            region_name: "Aegean".to_string(),
            dealer_name: dealer.to_string(),
            year: 2024,
            month,
        }
    }

    fn repeat(city: &str, dealer: &str, count: usize) -> Vec<SaleFact> {
        (0..count)
            .map(|i| fact(city, dealer, (i % 6) as u32 + 1))
            .collect()
    }

    fn three_city_window() -> Vec<SaleFact> {
        let mut facts = repeat("A", "DA", 40);
        facts.extend(repeat("B", "DB", 35));
        facts.extend(repeat("C", "DC", 25));
        facts
    }

    #[test]
    fn three_city_scenario() {
        let facts = three_city_window();
        let result = compute_recommendations(&facts, &SalesTarget::new(Some(600), 6))
            .expect("recommendations");
        assert_eq!(result.analysis.total_sales, 100);
        let cities = result
            .top_cities
            .iter()
            .map(|c| (c.name.as_str(), c.sales))
            .collect::<Vec<_>>();
        assert_eq!(cities, vec![("A", 40), ("B", 35), ("C", 25)]);

        let campaign = result
            .recommendations
            .iter()
            .find(|r| r.kind == RecommendationKind::CityCampaign)
            .expect("city campaign fires");
        assert_eq!(campaign.metric, "100%");
        assert!(result
            .recommendations
            .iter()
            .all(|r| r.kind != RecommendationKind::DealerPilot));
        assert!(result.potential_cities.is_empty());
    }

    #[test]
    fn zero_target_is_invalid_argument() {
        let err = compute_recommendations(&three_city_window(), &SalesTarget::new(Some(0), 6))
            .expect_err("zero target rejected");
        assert!(matches!(err, AdvisorError::InvalidArgument(_)));
    }

    #[test]
    fn empty_window_degrades_to_zeroes() {
        let result =
            compute_recommendations(&[], &SalesTarget::new(Some(600), 6)).expect("empty window");
        assert_eq!(result.analysis.total_sales, 0);
        assert_eq!(result.analysis.gap_percentage, 0);
        assert!(result.recommendations.is_empty());
        assert!(result.top_fuel_types.is_empty());
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let mut facts = three_city_window();
        facts.extend(repeat("D", "DD", 12));
        facts.extend(repeat("E", "DE", 12));
        facts.extend(repeat("F", "DF", 9));
        let target = SalesTarget::new(Some(900), 6);
        let first = compute_recommendations(&facts, &target).expect("first run");
        let second = compute_recommendations(&facts, &target).expect("second run");
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[test]
    fn recommendation_type_serializes_as_slug() {
        let result = compute_recommendations(&three_city_window(), &SalesTarget::new(Some(600), 6))
            .expect("recommendations");
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["recommendations"][0]["type"], "model_focus");
        assert_eq!(json["top_body_fuel_combinations"][0]["name"]["body"], "Sedan");
    }

    struct FailingSource;

    impl SaleSource for FailingSource {
        fn fetch_window(&self, _window: &SaleWindow) -> anyhow::Result<Vec<SaleFact>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn advise_propagates_source_failures() {
        let window = SaleWindow::trailing(
            NaiveDate::from_ymd_opt(2024, 6, 30).expect("valid date"),
            6,
        );
        let err = advise(&FailingSource, &window, &SalesTarget::new(Some(10), 6))
            .expect_err("source failure surfaces");
        assert!(err.to_string().contains("connection refused"));

        let source = VecSource::new(three_city_window());
        let result =
            advise(&source, &window, &SalesTarget::new(Some(600), 6)).expect("in-memory source");
        assert_eq!(result.analysis.total_sales, 100);

        let err = advise(&source, &window, &SalesTarget::new(None, 6)).expect_err("no target");
        assert!(err.downcast_ref::<AdvisorError>().is_some());
    }
}
