use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An appointment/visit record with price and payment status.
///
/// Created with `paid = false`; payment is a one-way transition handled
/// by the scheduling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: i64,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub price: Decimal,
    pub patient_id: i64,
    pub category_id: i64,
    pub doctor_id: i64,
    pub paid: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl Consultation {
    pub fn new(
        date: NaiveDateTime,
        description: Option<String>,
        price: Decimal,
        patient_id: i64,
        category_id: i64,
        doctor_id: i64,
    ) -> Self {
        Self {
            id: 0,
            date,
            description,
            price,
            patient_id,
            category_id,
            doctor_id,
            paid: false,
            created_at: None,
        }
    }

    pub fn is_past(&self) -> bool {
        self.date < Local::now().naive_local()
    }

    pub fn is_upcoming(&self) -> bool {
        self.date > Local::now().naive_local()
    }
}

/// Consultation joined with the display fields of its related rows,
/// for list screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationDetail {
    pub consultation: Consultation,
    pub patient_name: String,
    pub patient_phone: String,
    pub category_designation: String,
    pub doctor_login: String,
}
