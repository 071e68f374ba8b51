use std::collections::BTreeMap;

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A calendar month used for reporting queries.
///
/// Construction validates the month up front, so repository code can
/// derive query bounds without re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        first.checked_add_months(Months::new(1))?;
        Some(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Midnight on the 1st of the month.
    pub fn start(&self) -> NaiveDateTime {
        self.first_day().and_time(NaiveTime::MIN)
    }

    /// Midnight on the 1st of the following month (exclusive bound).
    pub fn end_exclusive(&self) -> NaiveDateTime {
        self.first_day()
            .checked_add_months(Months::new(1))
            .unwrap_or_default()
            .and_time(NaiveTime::MIN)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin",
    "Juillet", "Août", "Septembre", "Octobre", "Novembre", "Décembre",
];

/// Monthly statistical report over one month of consultations.
///
/// Derived on demand from the consultation store, never persisted.
/// Recomputing over identical data yields an identical value (the
/// per-category map is ordered for that reason).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBilan {
    pub month: u32,
    pub year: i32,
    pub total_count: u32,
    /// Sum of prices over paid consultations only.
    pub revenue: Decimal,
    pub per_category_counts: BTreeMap<String, u32>,
    /// Consultations per week of the month, five tracked buckets.
    pub weekly_evolution: [u32; 5],
    pub paid_count: u32,
    pub unpaid_count: u32,
    pub unpaid_amount: Decimal,
}

impl MonthlyBilan {
    pub fn empty(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            total_count: 0,
            revenue: Decimal::ZERO,
            per_category_counts: BTreeMap::new(),
            weekly_evolution: [0; 5],
            paid_count: 0,
            unpaid_count: 0,
            unpaid_amount: Decimal::ZERO,
        }
    }

    /// Percentage of consultations marked paid; 0 for an empty month.
    pub fn payment_rate(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        f64::from(self.paid_count) / f64::from(self.total_count) * 100.0
    }

    /// Average revenue per consultation, two decimal places; 0 for an
    /// empty month.
    pub fn average_price(&self) -> Decimal {
        if self.total_count == 0 {
            return Decimal::ZERO;
        }
        (self.revenue / Decimal::from(self.total_count)).round_dp(2)
    }

    pub fn month_name(&self) -> &'static str {
        (self.month as usize)
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i))
            .copied()
            .unwrap_or("Inconnu")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_rejects_invalid_month() {
        assert!(Period::new(0, 2024).is_none());
        assert!(Period::new(13, 2024).is_none());
        assert!(Period::new(12, 2024).is_some());
    }

    #[test]
    fn period_bounds_cover_the_whole_month() {
        let period = Period::new(3, 2024).unwrap();
        assert_eq!(period.start().to_string(), "2024-03-01 00:00:00");
        assert_eq!(period.end_exclusive().to_string(), "2024-04-01 00:00:00");
    }

    #[test]
    fn period_bounds_wrap_december() {
        let period = Period::new(12, 2024).unwrap();
        assert_eq!(period.end_exclusive().to_string(), "2025-01-01 00:00:00");
    }

    #[test]
    fn empty_bilan_has_zero_rates() {
        let bilan = MonthlyBilan::empty(3, 2024);
        assert_eq!(bilan.payment_rate(), 0.0);
        assert_eq!(bilan.average_price(), Decimal::ZERO);
    }

    #[test]
    fn average_price_rounds_to_two_decimals() {
        let mut bilan = MonthlyBilan::empty(3, 2024);
        bilan.total_count = 3;
        bilan.revenue = "250.00".parse().unwrap();
        assert_eq!(bilan.average_price().to_string(), "83.33");
    }

    #[test]
    fn month_name_is_localized() {
        assert_eq!(MonthlyBilan::empty(3, 2024).month_name(), "Mars");
        assert_eq!(MonthlyBilan::empty(8, 2024).month_name(), "Août");
    }
}
