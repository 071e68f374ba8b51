//! Patient records — business rules over the patient repository.

use rusqlite::Connection;
use tracing::info;

use crate::db::repository;
use crate::error::ServiceError;
use crate::models::Patient;
use crate::validation;

pub fn create_patient(conn: &Connection, mut patient: Patient) -> Result<Patient, ServiceError> {
    normalize(&mut patient);
    validate_patient(&patient)?;

    if repository::get_patient_by_phone(conn, &patient.phone)?.is_some() {
        return Err(ServiceError::business(
            "a patient with this phone number already exists",
        ));
    }
    if let Some(ref email) = patient.email {
        if repository::get_patient_by_email(conn, email)?.is_some() {
            return Err(ServiceError::business(
                "a patient with this email already exists",
            ));
        }
    }

    patient.id = repository::insert_patient(conn, &patient)?;
    info!("Created patient {}", patient.id);
    Ok(patient)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, ServiceError> {
    repository::get_patient_by_id(conn, id)?.ok_or(ServiceError::not_found("patient", id))
}

pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, ServiceError> {
    Ok(repository::get_all_patients(conn)?)
}

/// Blank criteria falls back to the full listing.
pub fn search_patients(conn: &Connection, criteria: &str) -> Result<Vec<Patient>, ServiceError> {
    if !validation::is_not_blank(criteria) {
        return list_patients(conn);
    }
    Ok(repository::search_patients(conn, criteria.trim())?)
}

pub fn update_patient(conn: &Connection, mut patient: Patient) -> Result<Patient, ServiceError> {
    get_patient(conn, patient.id)?;
    normalize(&mut patient);
    validate_patient(&patient)?;

    if let Some(other) = repository::get_patient_by_phone(conn, &patient.phone)? {
        if other.id != patient.id {
            return Err(ServiceError::business(
                "another patient already has this phone number",
            ));
        }
    }
    if let Some(ref email) = patient.email {
        if let Some(other) = repository::get_patient_by_email(conn, email)? {
            if other.id != patient.id {
                return Err(ServiceError::business(
                    "another patient already has this email",
                ));
            }
        }
    }

    repository::update_patient(conn, &patient)?;
    Ok(patient)
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), ServiceError> {
    get_patient(conn, id)?;
    repository::delete_patient(conn, id)?;
    info!("Deleted patient {id}");
    Ok(())
}

pub fn count_patients(conn: &Connection) -> Result<i64, ServiceError> {
    Ok(repository::count_patients(conn)?)
}

/// An empty email field means "no email".
fn normalize(patient: &mut Patient) {
    patient.name = patient.name.trim().to_string();
    patient.email = patient
        .email
        .take()
        .filter(|email| validation::is_not_blank(email));
}

fn validate_patient(patient: &Patient) -> Result<(), ServiceError> {
    if !validation::is_not_blank(&patient.name) {
        return Err(ServiceError::validation("name", "name is required"));
    }
    if patient.name.chars().count() > 100 {
        return Err(ServiceError::validation(
            "name",
            "name cannot exceed 100 characters",
        ));
    }
    if !validation::is_valid_phone(&patient.phone) {
        return Err(ServiceError::validation(
            "phone",
            "phone number must contain exactly 10 digits",
        ));
    }
    if let Some(ref email) = patient.email {
        if !validation::is_valid_email(email) {
            return Err(ServiceError::validation("email", "email address is invalid"));
        }
    }
    Ok(())
}
