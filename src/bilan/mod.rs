//! Monthly activity report ("bilan") — aggregation over one calendar
//! month of consultations.
//!
//! The aggregator issues synchronous reads against the consultation
//! store and returns a fully materialized [`MonthlyBilan`]. A store
//! failure is fatal for the request and propagates as a database error;
//! an empty month is a normal result with every counter at zero.

pub mod report;

use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

use crate::db::repository;
use crate::error::ServiceError;
use crate::models::{MonthlyBilan, Period};

/// Build the monthly bilan for `month`/`year`.
///
/// The month is validated before any query. Revenue is computed by its
/// own paid-only sum query; the paid/unpaid partition below walks the
/// fetched consultations independently.
pub fn monthly_bilan(conn: &Connection, month: u32, year: i32) -> Result<MonthlyBilan, ServiceError> {
    let period = validate_period(month, year)?;

    let consultations = repository::find_by_period(conn, period)?;
    let revenue = repository::sum_paid_revenue(conn, period)?;
    let per_category_counts = repository::category_counts(conn, period)?;
    let weekly_evolution = repository::weekly_counts(conn, period)?;

    let mut paid_count = 0;
    let mut unpaid_count = 0;
    let mut unpaid_amount = Decimal::ZERO;
    for consultation in &consultations {
        if consultation.paid {
            paid_count += 1;
        } else {
            unpaid_count += 1;
            unpaid_amount += consultation.price;
        }
    }

    debug!(
        month,
        year,
        total = consultations.len(),
        "Computed monthly bilan"
    );

    Ok(MonthlyBilan {
        month,
        year,
        total_count: consultations.len() as u32,
        revenue,
        per_category_counts,
        weekly_evolution,
        paid_count,
        unpaid_count,
        unpaid_amount,
    })
}

/// Month revenue alone (paid consultations only).
pub fn monthly_revenue(conn: &Connection, month: u32, year: i32) -> Result<Decimal, ServiceError> {
    let period = validate_period(month, year)?;
    Ok(repository::sum_paid_revenue(conn, period)?)
}

/// Percentage of the month's consultations marked paid.
pub fn payment_rate(conn: &Connection, month: u32, year: i32) -> Result<f64, ServiceError> {
    let period = validate_period(month, year)?;
    let consultations = repository::find_by_period(conn, period)?;
    if consultations.is_empty() {
        return Ok(0.0);
    }
    let paid = consultations.iter().filter(|c| c.paid).count();
    Ok(paid as f64 / consultations.len() as f64 * 100.0)
}

/// Consultations per week of the month, five tracked buckets.
pub fn weekly_evolution(conn: &Connection, month: u32, year: i32) -> Result<[u32; 5], ServiceError> {
    let period = validate_period(month, year)?;
    Ok(repository::weekly_counts(conn, period)?)
}

fn validate_period(month: u32, year: i32) -> Result<Period, ServiceError> {
    Period::new(month, year).ok_or_else(|| {
        ServiceError::validation(
            "month",
            format!("{month}/{year} is not a valid reporting period"),
        )
    })
}
