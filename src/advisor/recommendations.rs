use tracing::debug;

use crate::advisor::summary::{percent_of, round_half_up};
use crate::advisor::{Recommendation, RecommendationKind};
use crate::analysis::segment::{Segments, POTENTIAL_BAND_LOWER_PCT, POTENTIAL_BAND_UPPER_PCT};
use crate::analysis::Ranked;

// fixed display value, not derived from the data
pub const MODEL_FOCUS_GROWTH_PCT: u32 = 18;

const MODEL_FOCUS_LIST: usize = 3;
const CITY_CAMPAIGN_MIN_CITIES: usize = 3;
const CITY_CAMPAIGN_LIST: usize = 3;
const DEALER_PILOT_MIN_DEALERS: usize = 5;

pub fn build_recommendations(segments: &Segments, total_sales: u64) -> Vec<Recommendation> {
    let mut recommendations = [
        model_focus(segments),
        city_campaign(segments, total_sales),
        dealer_pilot(segments, total_sales),
        local_promotion(segments),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    recommendations.sort_by_key(|r| r.priority);
    let fired = recommendations.iter().map(|r| r.kind.as_slug()).collect::<Vec<_>>();
    debug!(?fired, "built recommendations");
    recommendations
}

fn model_focus(segments: &Segments) -> Option<Recommendation> {
    let top = segments.top_body_fuel.first()?;
    Some(Recommendation {
        kind: RecommendationKind::ModelFocus,
        priority: RecommendationKind::ModelFocus.priority(),
        title: "Focus on these model configurations".to_string(),
        description: format!(
            "These combinations performed strongly over the last 6 months ({MODEL_FOCUS_GROWTH_PCT}% growth)."
        ),
        metric: format!("{} sales", top.sales),
        metric_label: "Last 6 months sales".to_string(),
        supporting_entities: segments
            .top_body_fuel
            .iter()
            .take(MODEL_FOCUS_LIST)
            .map(|combo| combo.name.to_string())
            .collect(),
    })
}

fn city_campaign(segments: &Segments, total_sales: u64) -> Option<Recommendation> {
    if segments.top_cities.len() < CITY_CAMPAIGN_MIN_CITIES {
        return None;
    }
    let share = percent_of(sum_sales(&segments.top_cities), total_sales);
    Some(Recommendation {
        kind: RecommendationKind::CityCampaign,
        priority: RecommendationKind::CityCampaign.priority(),
        title: "Run additional campaigns in these cities".to_string(),
        description: format!("These cities account for {share}% of total sales."),
        metric: format!("{share}%"),
        metric_label: "Share of total sales".to_string(),
        supporting_entities: names(&segments.top_cities, CITY_CAMPAIGN_LIST),
    })
}

fn dealer_pilot(segments: &Segments, total_sales: u64) -> Option<Recommendation> {
    if segments.top_dealers.len() < DEALER_PILOT_MIN_DEALERS {
        return None;
    }
    let share = percent_of(sum_sales(&segments.top_dealers), total_sales);
    Some(Recommendation {
        kind: RecommendationKind::DealerPilot,
        priority: RecommendationKind::DealerPilot.priority(),
        title: "Select these dealers as pilot dealers".to_string(),
        description: format!("{share}% of the sales target can be sourced from these dealers."),
        metric: format!("{share}%"),
        metric_label: "Share of target".to_string(),
        supporting_entities: names(&segments.top_dealers, segments.top_dealers.len()),
    })
}

fn local_promotion(segments: &Segments) -> Option<Recommendation> {
    let potential = &segments.potential_cities;
    if potential.is_empty() {
        return None;
    }
    let growing = potential
        .iter()
        .filter(|c| c.is_growing())
        .map(|c| c.growth_rate_percent)
        .collect::<Vec<_>>();
    let description = if growing.is_empty() {
        format!(
            "These cities sell {POTENTIAL_BAND_LOWER_PCT}-{POTENTIAL_BAND_UPPER_PCT}% of the top-city average. Campaigns can unlock further growth."
        )
    } else {
        let mean = growing.iter().sum::<f64>() / growing.len() as f64;
        format!(
            "These cities grew {}% in recent months but have not reached their potential.",
            round_half_up(mean)
        )
    };
    Some(Recommendation {
        kind: RecommendationKind::LocalPromotion,
        priority: RecommendationKind::LocalPromotion.priority(),
        title: "Increase test-drive campaigns in these cities".to_string(),
        description,
        metric: format!("{} cities", potential.len()),
        metric_label: "Target cities".to_string(),
        supporting_entities: potential.iter().map(|c| c.city_name.clone()).collect(),
    })
}

fn sum_sales<K>(ranked: &[Ranked<K>]) -> u64 {
    ranked.iter().map(|r| r.sales).sum()
}

fn names(ranked: &[Ranked<String>], limit: usize) -> Vec<String> {
    ranked.iter().take(limit).map(|r| r.name.clone()).collect()
}
