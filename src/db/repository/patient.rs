use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::Patient;

use super::decode_created_at;

const SELECT_PATIENT: &str = "SELECT id, name, phone, email, created_at FROM patients";

type PatientRow = (i64, String, String, Option<String>, Option<String>);

fn map_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn patient_from_row(row: PatientRow) -> Patient {
    let (id, name, phone, email, created_at) = row;
    Patient {
        id,
        name,
        phone,
        email,
        created_at: decode_created_at(created_at),
    }
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, phone, email) VALUES (?1, ?2, ?3)",
        params![patient.name, patient.phone, patient.email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient_by_id(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(&format!("{SELECT_PATIENT} WHERE id = ?1"), params![id], map_row)
        .optional()?;
    Ok(row.map(patient_from_row))
}

pub fn get_patient_by_phone(
    conn: &Connection,
    phone: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_PATIENT} WHERE phone = ?1"),
            params![phone],
            map_row,
        )
        .optional()?;
    Ok(row.map(patient_from_row))
}

pub fn get_patient_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_PATIENT} WHERE email = ?1"),
            params![email],
            map_row,
        )
        .optional()?;
    Ok(row.map(patient_from_row))
}

pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SELECT_PATIENT} ORDER BY name ASC"))?;
    let rows = stmt.query_map([], map_row)?;
    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?));
    }
    Ok(patients)
}

/// Substring search over name, phone and email.
pub fn search_patients(conn: &Connection, criteria: &str) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_PATIENT} WHERE name LIKE '%' || ?1 || '%' \
         OR phone LIKE '%' || ?1 || '%' \
         OR email LIKE '%' || ?1 || '%' \
         ORDER BY name ASC"
    ))?;
    let rows = stmt.query_map(params![criteria], map_row)?;
    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?));
    }
    Ok(patients)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<bool, DatabaseError> {
    let affected = conn.execute(
        "UPDATE patients SET name = ?1, phone = ?2, email = ?3 WHERE id = ?4",
        params![patient.name, patient.phone, patient.email, patient.id],
    )?;
    Ok(affected > 0)
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let affected = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}
