use std::fmt::Display;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::advisor::{AnalysisSummary, Recommendation};
use crate::analysis::breakdown::SalesBreakdown;
use crate::analysis::segment::Segments;
use crate::analysis::{CityGrowth, Ranked};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_summary_table(summary: &AnalysisSummary) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let gap_cell = if summary.gap_percentage > 0 {
        Cell::new(format!("{}%", summary.gap_percentage)).fg(Color::Red)
    } else {
        Cell::new(format!("{}%", summary.gap_percentage)).fg(Color::Green)
    };
    table.add_row(vec!["Total sales".to_string(), summary.total_sales.to_string()]);
    table.add_row(vec![
        "Monthly average".to_string(),
        summary.monthly_average.to_string(),
    ]);
    table.add_row(vec![
        "Target monthly average".to_string(),
        summary.target_monthly_average.to_string(),
    ]);
    table.add_row(vec!["Shortfall".to_string(), summary.shortfall.to_string()]);
    table.add_row(Row::from(vec![Cell::new("Gap"), gap_cell]));
    table.to_string()
}

pub fn render_ranked_table<K: Display>(label: &str, ranked: &[Ranked<K>]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Rank", label, "Sales"]);
    for (idx, entry) in ranked.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            entry.name.to_string(),
            entry.sales.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_rankings_table(segments: &Segments) -> String {
    [
        render_ranked_table("Model", &segments.top_models),
        render_ranked_table("City", &segments.top_cities),
        render_ranked_table("Dealer", &segments.top_dealers),
        render_ranked_table("Fuel Type", &segments.top_fuel_types),
        render_ranked_table("Body + Fuel", &segments.top_body_fuel),
    ]
    .join("\n")
}

pub fn render_breakdown_table(breakdown: &SalesBreakdown) -> String {
    [
        render_ranked_table("Region", &breakdown.by_region),
        render_ranked_table("Body Type", &breakdown.by_body_type),
        render_ranked_table("Month", &breakdown.by_month),
        render_ranked_table("Quarter", &breakdown.by_quarter),
    ]
    .join("\n")
}

pub fn render_recommendations_table(recommendations: &[Recommendation]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Priority", "Recommendation", "Metric", "Targets"]);
    for rec in recommendations {
        table.add_row(vec![
            rec.priority.to_string(),
            format!("{}\n{}", rec.title, rec.description),
            format!("{}\n({})", rec.metric, rec.metric_label),
            rec.supporting_entities.join(", "),
        ]);
    }
    table.to_string()
}

pub fn render_city_trends_table(cities: &[CityGrowth]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "City",
        "Sales",
        "Growth",
        "Avg / Month",
        "Active Months",
    ]);
    for city in cities {
        let growth_cell = if city.insufficient_data {
            Cell::new("n/a")
        } else if city.is_growing() {
            Cell::new(format!("{:+.1}%", city.growth_rate_percent)).fg(Color::Green)
        } else {
            Cell::new(format!("{:+.1}%", city.growth_rate_percent)).fg(Color::Red)
        };
        table.add_row(Row::from(vec![
            Cell::new(&city.city_name),
            Cell::new(city.sales_total),
            growth_cell,
            Cell::new(format!("{:.1}", city.average_monthly_sales)),
            Cell::new(city.active_months),
        ]));
    }
    table.to_string()
}
