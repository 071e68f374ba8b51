//! Consultation scheduling and payment tracking.
//!
//! Booking rules: a new consultation must be in the future, priced
//! above zero, reference existing patient/category/doctor rows and not
//! collide with another consultation of the same patient within half an
//! hour. Past consultations are frozen — no update, no cancellation.
//! Payment is a one-way transition.

use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use tracing::info;

use crate::db::repository;
use crate::error::ServiceError;
use crate::models::{Consultation, ConsultationDetail, Period};
use crate::validation;

pub fn book_consultation(
    conn: &Connection,
    mut consultation: Consultation,
) -> Result<Consultation, ServiceError> {
    validate_consultation(&consultation, true)?;

    if repository::get_patient_by_id(conn, consultation.patient_id)?.is_none() {
        return Err(ServiceError::not_found("patient", consultation.patient_id));
    }
    if repository::get_category_by_id(conn, consultation.category_id)?.is_none() {
        return Err(ServiceError::not_found("category", consultation.category_id));
    }
    if repository::get_user_by_id(conn, consultation.doctor_id)?.is_none() {
        return Err(ServiceError::not_found("doctor", consultation.doctor_id));
    }

    if !repository::patient_slot_free(conn, consultation.patient_id, &consultation.date)? {
        return Err(ServiceError::business(
            "the patient already has a consultation within this time slot",
        ));
    }

    consultation.paid = false;
    consultation.id = repository::insert_consultation(conn, &consultation)?;
    info!("Booked consultation {}", consultation.id);
    Ok(consultation)
}

pub fn get_consultation(conn: &Connection, id: i64) -> Result<Consultation, ServiceError> {
    repository::get_consultation_by_id(conn, id)?
        .ok_or(ServiceError::not_found("consultation", id))
}

pub fn list_consultations(conn: &Connection) -> Result<Vec<ConsultationDetail>, ServiceError> {
    Ok(repository::list_consultation_details(conn)?)
}

pub fn consultations_on(
    conn: &Connection,
    day: NaiveDate,
) -> Result<Vec<ConsultationDetail>, ServiceError> {
    Ok(repository::consultation_details_by_date(conn, day)?)
}

pub fn count_consultations_on(conn: &Connection, day: NaiveDate) -> Result<usize, ServiceError> {
    Ok(repository::consultation_details_by_date(conn, day)?.len())
}

pub fn doctor_day_schedule(
    conn: &Connection,
    doctor_id: i64,
    day: NaiveDate,
) -> Result<Vec<ConsultationDetail>, ServiceError> {
    Ok(repository::consultation_details_by_doctor_and_date(conn, doctor_id, day)?)
}

/// Today's and future consultations of one doctor, oldest first.
pub fn upcoming_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<Consultation>, ServiceError> {
    let today = Local::now().date_naive();
    let mut consultations = repository::consultations_by_doctor(conn, doctor_id)?;
    consultations.retain(|c| c.date.date() >= today);
    Ok(consultations)
}

pub fn consultations_of_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<ConsultationDetail>, ServiceError> {
    Ok(repository::consultation_details_by_patient(conn, patient_id)?)
}

pub fn update_consultation(
    conn: &Connection,
    consultation: Consultation,
) -> Result<Consultation, ServiceError> {
    let existing = get_consultation(conn, consultation.id)?;
    if existing.is_past() {
        return Err(ServiceError::business("cannot modify a past consultation"));
    }

    validate_consultation(&consultation, false)?;
    repository::update_consultation(conn, &consultation)?;
    Ok(consultation)
}

pub fn cancel_consultation(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    let existing = get_consultation(conn, id)?;
    if existing.is_past() {
        return Err(ServiceError::business("cannot cancel a past consultation"));
    }

    repository::delete_consultation(conn, id)?;
    info!("Cancelled consultation {id}");
    Ok(())
}

/// One-way payment transition; paying twice is refused.
pub fn record_payment(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    let consultation = get_consultation(conn, id)?;
    if consultation.paid {
        return Err(ServiceError::business("this consultation is already paid"));
    }

    repository::mark_consultation_paid(conn, id)?;
    info!("Recorded payment for consultation {id}");
    Ok(())
}

pub fn unpaid_consultations(conn: &Connection) -> Result<Vec<ConsultationDetail>, ServiceError> {
    Ok(repository::unpaid_consultation_details(conn)?)
}

/// Patients to call back: appointments one or two days after the
/// reference date.
pub fn reminder_list(
    conn: &Connection,
    reference: NaiveDate,
) -> Result<Vec<ConsultationDetail>, ServiceError> {
    Ok(repository::consultation_details_for_reminder(conn, reference)?)
}

pub fn consultations_of_month(
    conn: &Connection,
    month: u32,
    year: i32,
) -> Result<Vec<Consultation>, ServiceError> {
    let period = Period::new(month, year).ok_or_else(|| {
        ServiceError::validation("month", format!("{month}/{year} is not a valid period"))
    })?;
    Ok(repository::find_by_period(conn, period)?)
}

fn validate_consultation(
    consultation: &Consultation,
    is_new: bool,
) -> Result<(), ServiceError> {
    // Only new bookings are held to the no-past-date rule; an update
    // may reschedule within the day.
    if is_new && consultation.date < Local::now().naive_local() {
        return Err(ServiceError::validation(
            "date",
            "the date cannot be in the past",
        ));
    }
    if !validation::is_positive_price(consultation.price) {
        return Err(ServiceError::validation(
            "price",
            "the price must be greater than 0",
        ));
    }
    if consultation.patient_id <= 0 {
        return Err(ServiceError::validation("patient", "the patient is required"));
    }
    if consultation.category_id <= 0 {
        return Err(ServiceError::validation(
            "category",
            "the category is required",
        ));
    }
    if consultation.doctor_id <= 0 {
        return Err(ServiceError::validation("doctor", "the doctor is required"));
    }
    Ok(())
}
