use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::errors::BookingError;

use super::reservation::ReservationDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayStatus {
    #[serde(rename = "Activo", alias = "Active")]
    Active,
    #[serde(rename = "Inactivo", alias = "Inactive")]
    Inactive,
    #[serde(rename = "Lleno", alias = "Full")]
    Full,
    #[serde(rename = "Finalizado", alias = "Finished")]
    Finished,
}

impl DayStatus {
    pub const ALL: [DayStatus; 4] = [
        DayStatus::Active,
        DayStatus::Inactive,
        DayStatus::Full,
        DayStatus::Finished,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DayStatus::Active => "Activo",
            DayStatus::Inactive => "Inactivo",
            DayStatus::Full => "Lleno",
            DayStatus::Finished => "Finalizado",
        }
    }
}

impl FromStr for DayStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Activo" | "Active" => Ok(DayStatus::Active),
            "Inactivo" | "Inactive" => Ok(DayStatus::Inactive),
            "Lleno" | "Full" => Ok(DayStatus::Full),
            "Finalizado" | "Finished" => Ok(DayStatus::Finished),
            other => {
                let allowed: Vec<&str> = DayStatus::ALL.iter().map(|s| s.label()).collect();
                Err(BookingError::InvalidRequest(format!(
                    "Invalid day status: {other}. Allowed statuses are {}",
                    allowed.join(", ")
                )))
            }
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A calendar day opened by staff for interview bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDay {
    pub id: Uuid,
    pub date: NaiveDate,
    pub total_slots: i32,
    pub remaining_slots: i32,
    pub status: DayStatus,
}

impl InterviewDay {
    /// Status and capacity allow one more booking.
    ///
    /// `Full` is advisory; capacity is what actually gates a booking.
    pub fn is_bookable(&self) -> bool {
        self.status == DayStatus::Active && self.remaining_slots > 0
    }

    /// Shown to applicants browsing availability on `today`.
    pub fn is_available_on(&self, today: NaiveDate) -> bool {
        self.date >= today && self.is_bookable()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterviewDay {
    pub date: NaiveDate,
    pub total_slots: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDayRequest {
    #[serde(alias = "fecha")]
    pub date: Option<NaiveDate>,
    #[serde(alias = "cupos_totales")]
    pub total_slots: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDayStatusRequest {
    #[serde(alias = "estado")]
    pub status: Option<String>,
}

/// Staff view of a day with every reservation booked on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetails {
    #[serde(flatten)]
    pub day: InterviewDay,
    pub reservations: Vec<ReservationDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDayResponse {
    pub id: Uuid,
    pub released_reservations: usize,
}
