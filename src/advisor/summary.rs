use crate::advisor::{AnalysisSummary, SalesTarget};
use crate::analysis::REFERENCE_WINDOW_MONTHS;
use crate::error::AdvisorError;

/// Rounds halves toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn percent_of(part: u64, total: u64) -> i64 {
    if total == 0 {
        return 0;
    }
    round_half_up(part as f64 / total as f64 * 100.0)
}

impl SalesTarget {
    pub fn new(target_sales: Option<u64>, target_months: u32) -> Self {
        Self {
            target_sales,
            target_months,
        }
    }

    pub fn validate(&self) -> Result<(u64, u32), AdvisorError> {
        let target_sales = match self.target_sales {
            Some(sales) if sales > 0 => sales,
            _ => return Err(AdvisorError::invalid_argument("target sales is required")),
        };
        if self.target_months == 0 {
            return Err(AdvisorError::invalid_argument(
                "target months must be greater than zero",
            ));
        }
        Ok((target_sales, self.target_months))
    }
}

pub fn summarize(total_sales: u64, target: &SalesTarget) -> Result<AnalysisSummary, AdvisorError> {
    let (target_sales, target_months) = target.validate()?;
    let target_sales = target_sales as f64;
    let target_months = f64::from(target_months);

    let monthly_average = total_sales as f64 / REFERENCE_WINDOW_MONTHS;
    let target_monthly_average = target_sales / target_months;
    let shortfall = target_sales - monthly_average * target_months;
    let gap_percentage = if monthly_average > 0.0 {
        round_half_up((target_monthly_average - monthly_average) / monthly_average * 100.0)
    } else {
        0
    };

    Ok(AnalysisSummary {
        total_sales,
        monthly_average: round_half_up(monthly_average),
        target_monthly_average: round_half_up(target_monthly_average),
        shortfall: round_half_up(shortfall),
        gap_percentage,
    })
}

#[cfg(test)]
mod tests {
    use crate::advisor::summary::{percent_of, round_half_up, summarize};
    use crate::advisor::SalesTarget;

    #[test]
    fn rejects_missing_or_zero_target() {
        let missing = summarize(300, &SalesTarget::new(None, 6)).expect_err("missing target");
        assert!(missing.is_client_error());
        assert!(summarize(300, &SalesTarget::new(Some(0), 6)).is_err());
        assert!(summarize(300, &SalesTarget::new(Some(600), 0)).is_err());
    }

    #[test]
    fn computes_gap_against_target() {
        let summary = summarize(300, &SalesTarget::new(Some(600), 6)).expect("valid target");
        assert_eq!(summary.total_sales, 300);
        assert_eq!(summary.monthly_average, 50);
        assert_eq!(summary.target_monthly_average, 100);
        assert_eq!(summary.shortfall, 300);
        assert_eq!(summary.gap_percentage, 100);
    }

    #[test]
    fn monthly_average_always_uses_six_months() {
        // 120 over the window is 20/month; a 3-month target of 90 is 30/month
        let summary = summarize(120, &SalesTarget::new(Some(90), 3)).expect("valid target");
        assert_eq!(summary.monthly_average, 20);
        assert_eq!(summary.target_monthly_average, 30);
        assert_eq!(summary.shortfall, 30);
        assert_eq!(summary.gap_percentage, 50);
    }

    #[test]
    fn zero_sales_has_zero_gap() {
        let summary = summarize(0, &SalesTarget::new(Some(600), 6)).expect("valid target");
        assert_eq!(summary.monthly_average, 0);
        assert_eq!(summary.gap_percentage, 0);
        assert_eq!(summary.shortfall, 600);
    }

    #[test]
    fn rounding_and_percentages() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(66.4), 66);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(5, 0), 0);
    }
}
