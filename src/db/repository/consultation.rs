use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::db::DatabaseError;
use crate::models::{Consultation, ConsultationDetail, Period};

use super::{decode_created_at, decode_datetime, encode_datetime};

const SELECT_CONSULTATION: &str = "SELECT id, date, description, price, patient_id, \
     category_id, doctor_id, paid, created_at FROM consultations";

const SELECT_DETAIL: &str = "SELECT c.id, c.date, c.description, c.price, c.patient_id, \
     c.category_id, c.doctor_id, c.paid, c.created_at, \
     p.name, p.phone, cat.designation, u.login \
     FROM consultations c \
     JOIN patients p ON c.patient_id = p.id \
     JOIN categories cat ON c.category_id = cat.id \
     JOIN users u ON c.doctor_id = u.id";

type ConsultationRow = (
    i64,
    String,
    Option<String>,
    String,
    i64,
    i64,
    i64,
    i64,
    Option<String>,
);

type DetailRow = (ConsultationRow, String, String, String, String);

fn map_row(row: &Row<'_>) -> rusqlite::Result<ConsultationRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn map_detail_row(row: &Row<'_>) -> rusqlite::Result<DetailRow> {
    Ok((
        map_row(row)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
    ))
}

fn decode_price(value: &str) -> Result<Decimal, DatabaseError> {
    value.parse().map_err(|_| DatabaseError::MalformedValue {
        column: "price",
        value: value.into(),
    })
}

fn consultation_from_row(row: ConsultationRow) -> Result<Consultation, DatabaseError> {
    let (id, date, description, price, patient_id, category_id, doctor_id, paid, created_at) = row;
    Ok(Consultation {
        id,
        date: decode_datetime("date", &date)?,
        description,
        price: decode_price(&price)?,
        patient_id,
        category_id,
        doctor_id,
        paid: paid != 0,
        created_at: decode_created_at(created_at),
    })
}

fn detail_from_row(row: DetailRow) -> Result<ConsultationDetail, DatabaseError> {
    let (consultation, patient_name, patient_phone, category_designation, doctor_login) = row;
    Ok(ConsultationDetail {
        consultation: consultation_from_row(consultation)?,
        patient_name,
        patient_phone,
        category_designation,
        doctor_login,
    })
}

fn collect_consultations(
    rows: rusqlite::MappedRows<'_, impl FnMut(&Row<'_>) -> rusqlite::Result<ConsultationRow>>,
) -> Result<Vec<Consultation>, DatabaseError> {
    let mut consultations = Vec::new();
    for row in rows {
        consultations.push(consultation_from_row(row?)?);
    }
    Ok(consultations)
}

fn collect_details(
    rows: rusqlite::MappedRows<'_, impl FnMut(&Row<'_>) -> rusqlite::Result<DetailRow>>,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let mut details = Vec::new();
    for row in rows {
        details.push(detail_from_row(row?)?);
    }
    Ok(details)
}

/// Half-open [midnight, next midnight) bounds for one calendar day.
fn day_bounds(day: NaiveDate) -> (String, String) {
    let start = day.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1);
    (encode_datetime(&start), encode_datetime(&end))
}

fn period_bounds(period: Period) -> (String, String) {
    (
        encode_datetime(&period.start()),
        encode_datetime(&period.end_exclusive()),
    )
}

pub fn insert_consultation(
    conn: &Connection,
    consultation: &Consultation,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO consultations (date, description, price, patient_id, category_id, \
         doctor_id, paid) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            encode_datetime(&consultation.date),
            consultation.description,
            consultation.price.to_string(),
            consultation.patient_id,
            consultation.category_id,
            consultation.doctor_id,
            consultation.paid as i32,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_consultation_by_id(
    conn: &Connection,
    id: i64,
) -> Result<Option<Consultation>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_CONSULTATION} WHERE id = ?1"),
            params![id],
            map_row,
        )
        .optional()?;
    row.map(consultation_from_row).transpose()
}

pub fn update_consultation(
    conn: &Connection,
    consultation: &Consultation,
) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "UPDATE consultations SET date = ?1, description = ?2, price = ?3, patient_id = ?4, \
         category_id = ?5, doctor_id = ?6, paid = ?7 WHERE id = ?8",
        params![
            encode_datetime(&consultation.date),
            consultation.description,
            consultation.price.to_string(),
            consultation.patient_id,
            consultation.category_id,
            consultation.doctor_id,
            consultation.paid as i32,
            consultation.id,
        ],
    )?;
    Ok(affected > 0)
}

pub fn delete_consultation(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let affected = conn.execute("DELETE FROM consultations WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

/// One-way payment flag transition.
pub fn mark_consultation_paid(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "UPDATE consultations SET paid = 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(affected > 0)
}

pub fn list_consultation_details(
    conn: &Connection,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_DETAIL} ORDER BY c.date DESC"))?;
    let rows = stmt.query_map([], map_detail_row)?;
    collect_details(rows)
}

pub fn consultation_details_by_date(
    conn: &Connection,
    day: NaiveDate,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let (start, end) = day_bounds(day);
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DETAIL} WHERE c.date >= ?1 AND c.date < ?2 ORDER BY c.date ASC"
    ))?;
    let rows = stmt.query_map(params![start, end], map_detail_row)?;
    collect_details(rows)
}

pub fn consultation_details_by_doctor_and_date(
    conn: &Connection,
    doctor_id: i64,
    day: NaiveDate,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let (start, end) = day_bounds(day);
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DETAIL} WHERE c.doctor_id = ?1 AND c.date >= ?2 AND c.date < ?3 \
         ORDER BY c.date ASC"
    ))?;
    let rows = stmt.query_map(params![doctor_id, start, end], map_detail_row)?;
    collect_details(rows)
}

pub fn consultation_details_by_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DETAIL} WHERE c.patient_id = ?1 ORDER BY c.date DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], map_detail_row)?;
    collect_details(rows)
}

pub fn unpaid_consultation_details(
    conn: &Connection,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DETAIL} WHERE c.paid = 0 ORDER BY c.date DESC"
    ))?;
    let rows = stmt.query_map([], map_detail_row)?;
    collect_details(rows)
}

/// Appointments one or two days after the reference date, for call-back
/// reminders.
pub fn consultation_details_for_reminder(
    conn: &Connection,
    reference: NaiveDate,
) -> Result<Vec<ConsultationDetail>, DatabaseError> {
    let start = (reference + Duration::days(1)).and_time(NaiveTime::MIN);
    let end = (reference + Duration::days(3)).and_time(NaiveTime::MIN);
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DETAIL} WHERE c.date >= ?1 AND c.date < ?2 ORDER BY c.date ASC"
    ))?;
    let rows = stmt.query_map(
        params![encode_datetime(&start), encode_datetime(&end)],
        map_detail_row,
    )?;
    collect_details(rows)
}

pub fn consultations_by_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<Consultation>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_CONSULTATION} WHERE doctor_id = ?1 ORDER BY date ASC"
    ))?;
    let rows = stmt.query_map(params![doctor_id], map_row)?;
    collect_consultations(rows)
}

/// Whether the patient has no other consultation within half an hour of
/// the given slot.
pub fn patient_slot_free(
    conn: &Connection,
    patient_id: i64,
    date: &NaiveDateTime,
) -> Result<bool, DatabaseError> {
    let start = *date - Duration::minutes(30);
    let end = *date + Duration::minutes(30);
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM consultations WHERE patient_id = ?1 AND date BETWEEN ?2 AND ?3",
        params![patient_id, encode_datetime(&start), encode_datetime(&end)],
        |row| row.get(0),
    )?;
    Ok(count == 0)
}

/// All consultations of one calendar month, oldest first.
pub fn find_by_period(
    conn: &Connection,
    period: Period,
) -> Result<Vec<Consultation>, DatabaseError> {
    let (start, end) = period_bounds(period);
    let mut stmt = conn.prepare(&format!(
        "{SELECT_CONSULTATION} WHERE date >= ?1 AND date < ?2 ORDER BY date ASC"
    ))?;
    let rows = stmt.query_map(params![start, end], map_row)?;
    collect_consultations(rows)
}

/// Month revenue: sum of prices over paid consultations only.
///
/// Prices are decimal text, so the fold happens in Rust rather than as
/// a SQLite SUM over floats.
pub fn sum_paid_revenue(conn: &Connection, period: Period) -> Result<Decimal, DatabaseError> {
    let (start, end) = period_bounds(period);
    let mut stmt = conn
        .prepare("SELECT price FROM consultations WHERE date >= ?1 AND date < ?2 AND paid = 1")?;
    let rows = stmt.query_map(params![start, end], |row| row.get::<_, String>(0))?;

    let mut total = Decimal::ZERO;
    for price in rows {
        total += decode_price(&price?)?;
    }
    Ok(total)
}

/// Consultations per category designation for one month.
pub fn category_counts(
    conn: &Connection,
    period: Period,
) -> Result<BTreeMap<String, u32>, DatabaseError> {
    let (start, end) = period_bounds(period);
    let mut stmt = conn.prepare(
        "SELECT cat.designation, COUNT(*) FROM consultations c \
         JOIN categories cat ON c.category_id = cat.id \
         WHERE c.date >= ?1 AND c.date < ?2 \
         GROUP BY cat.designation",
    )?;
    let rows = stmt.query_map(params![start, end], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (designation, count) = row?;
        counts.insert(designation, count);
    }
    Ok(counts)
}

/// Consultations per week of the month, five tracked buckets.
pub fn weekly_counts(conn: &Connection, period: Period) -> Result<[u32; 5], DatabaseError> {
    let (start, end) = period_bounds(period);
    let mut stmt =
        conn.prepare("SELECT date FROM consultations WHERE date >= ?1 AND date < ?2")?;
    let rows = stmt.query_map(params![start, end], |row| row.get::<_, String>(0))?;

    let mut buckets = [0u32; 5];
    for raw in rows {
        let raw = raw?;
        let date = decode_datetime("date", &raw)?.date();
        if let Some(slot) = week_slot(date) {
            buckets[slot] += 1;
        }
    }
    Ok(buckets)
}

/// Week bucket of a date within its month: ISO week of the date minus
/// ISO week of the 1st of the month, one-based. Dates landing outside
/// the five tracked buckets — a partial sixth week, or an ISO week
/// number that wraps at the year boundary — are not counted.
fn week_slot(date: NaiveDate) -> Option<usize> {
    let first = date.with_day(1)?;
    let index = i64::from(date.iso_week().week()) - i64::from(first.iso_week().week()) + 1;
    if (1..=5).contains(&index) {
        Some(index as usize - 1)
    } else {
        None
    }
}
