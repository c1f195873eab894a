use std::fmt::Display;

use anyhow::Result;

use crate::advisor::Recommendation;
use crate::analysis::breakdown::SalesBreakdown;
use crate::analysis::segment::Segments;
use crate::analysis::{CityGrowth, Ranked};

pub fn recommendations_to_csv(recommendations: &[Recommendation]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "priority",
        "type",
        "title",
        "description",
        "metric",
        "metric_label",
        "entities",
    ])?;
    for rec in recommendations {
        writer.write_record([
            rec.priority.to_string(),
            rec.kind.as_slug().to_string(),
            rec.title.clone(),
            rec.description.clone(),
            rec.metric.clone(),
            rec.metric_label.clone(),
            rec.supporting_entities.join("; "),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn rankings_to_csv(segments: &Segments, breakdown: &SalesBreakdown) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["dimension", "rank", "name", "sales"])?;
    write_ranked(&mut writer, "model", &segments.top_models)?;
    write_ranked(&mut writer, "city", &segments.top_cities)?;
    write_ranked(&mut writer, "dealer", &segments.top_dealers)?;
    write_ranked(&mut writer, "fuel_type", &segments.top_fuel_types)?;
    write_ranked(&mut writer, "body_fuel", &segments.top_body_fuel)?;
    write_ranked(&mut writer, "region", &breakdown.by_region)?;
    write_ranked(&mut writer, "body_type", &breakdown.by_body_type)?;
    write_ranked(&mut writer, "month", &breakdown.by_month)?;
    write_ranked(&mut writer, "quarter", &breakdown.by_quarter)?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn city_trends_to_csv(cities: &[CityGrowth]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "city",
        "sales",
        "growth_rate_pct",
        "avg_monthly_sales",
        "active_months",
        "insufficient_data",
    ])?;
    for city in cities {
        writer.write_record([
            city.city_name.clone(),
            city.sales_total.to_string(),
            format!("{:.2}", city.growth_rate_percent),
            format!("{:.2}", city.average_monthly_sales),
            city.active_months.to_string(),
            city.insufficient_data.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

fn write_ranked<K: Display>(
    writer: &mut csv::Writer<Vec<u8>>,
    dimension: &str,
    ranked: &[Ranked<K>],
) -> Result<()> {
    for (idx, entry) in ranked.iter().enumerate() {
        writer.write_record([
            dimension.to_string(),
            (idx + 1).to_string(),
            entry.name.to_string(),
            entry.sales.to_string(),
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::advisor::{Recommendation, RecommendationKind};
    use crate::analysis::breakdown::SalesBreakdown;
    use crate::analysis::segment::Segments;
    use crate::analysis::Ranked;
    use crate::output::csv::{rankings_to_csv, recommendations_to_csv};
    use crate::types::MonthKey;

    #[test]
    fn quotes_entity_lists() {
        let rec = Recommendation {
            kind: RecommendationKind::CityCampaign,
            priority: 2,
            title: "Run additional campaigns in these cities".to_string(),
            description: "These cities account for 64% of total sales.".to_string(),
            metric: "64%".to_string(),
            metric_label: "Share of total sales".to_string(),
            supporting_entities: vec!["Istanbul".to_string(), "Ankara, Merkez".to_string()],
        };
        let out = recommendations_to_csv(&[rec]).expect("csv");
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("priority,type,title,description,metric,metric_label,entities")
        );
        assert_eq!(
            lines.next(),
            Some("2,city_campaign,Run additional campaigns in these cities,These cities account for 64% of total sales.,64%,Share of total sales,\"Istanbul; Ankara, Merkez\"")
        );
    }

    #[test]
    fn breakdown_rows_follow_rankings() {
        let segments = Segments {
            top_cities: vec![Ranked {
                name: "Bursa".to_string(),
                sales: 9,
            }],
            ..Segments::default()
        };
        let breakdown = SalesBreakdown {
            by_region: vec![Ranked {
                name: "Marmara".to_string(),
                sales: 9,
            }],
            by_month: vec![Ranked {
                name: MonthKey::new(2024, 5),
                sales: 4,
            }],
            ..SalesBreakdown::default()
        };
        let out = rankings_to_csv(&segments, &breakdown).expect("csv");
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "dimension,rank,name,sales",
                "city,1,Bursa,9",
                "region,1,Marmara,9",
                "month,1,2024-05,4",
            ]
        );
    }
}
