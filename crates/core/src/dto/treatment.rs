use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{Treatment, TreatmentStatus};
use crate::time::utc_format;
use crate::validation::{end_not_before_start, optional_text, range_i32, require_text};
use crate::{RecordsError, RecordsResult};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreatmentRequest {
    pub medication_name: String,
    pub dosage: String,
    #[serde(default)]
    pub frequency: Option<String>,
    /// Defaults to "ORAL".
    #[serde(default)]
    pub route_of_administration: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_days: Option<i32>,
    /// ACTIVE, COMPLETED, DISCONTINUED or PAUSED; defaults to ACTIVE.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub indication: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub prescriber_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateTreatmentRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("medicationName", &self.medication_name, 2, 200)?;
        require_text("dosage", &self.dosage, 1, 100)?;
        optional_text("frequency", self.frequency.as_deref(), 100)?;
        optional_text("routeOfAdministration", self.route_of_administration.as_deref(), 50)?;
        end_not_before_start("endDate", self.start_date, self.end_date)?;
        range_i32("durationDays", self.duration_days, 1, 3650)?;
        optional_text("indication", self.indication.as_deref(), 500)?;
        optional_text("sideEffects", self.side_effects.as_deref(), 500)?;
        optional_text("prescriberName", self.prescriber_name.as_deref(), 200)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        Ok(())
    }

    pub fn status(&self) -> RecordsResult<TreatmentStatus> {
        parse_status(self.status.as_deref()).map(|s| s.unwrap_or(TreatmentStatus::Active))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTreatmentRequest {
    #[serde(default)]
    pub medication_name: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub route_of_administration: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_days: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub indication: Option<String>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub prescriber_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateTreatmentRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        if let Some(name) = &self.medication_name {
            require_text("medicationName", name, 2, 200)?;
        }
        if let Some(dosage) = &self.dosage {
            require_text("dosage", dosage, 1, 100)?;
        }
        optional_text("frequency", self.frequency.as_deref(), 100)?;
        optional_text("routeOfAdministration", self.route_of_administration.as_deref(), 50)?;
        range_i32("durationDays", self.duration_days, 1, 3650)?;
        optional_text("indication", self.indication.as_deref(), 500)?;
        optional_text("sideEffects", self.side_effects.as_deref(), 500)?;
        optional_text("prescriberName", self.prescriber_name.as_deref(), 200)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        Ok(())
    }

    pub fn status(&self) -> RecordsResult<Option<TreatmentStatus>> {
        parse_status(self.status.as_deref())
    }
}

fn parse_status(raw: Option<&str>) -> RecordsResult<Option<TreatmentStatus>> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|message| RecordsError::validation("status", message)),
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    pub route_of_administration: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub duration_days: Option<i32>,
    pub status: TreatmentStatus,
    pub indication: Option<String>,
    pub side_effects: Option<String>,
    pub prescriber_name: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl From<Treatment> for TreatmentResponse {
    fn from(treatment: Treatment) -> Self {
        Self {
            id: treatment.id,
            patient_id: treatment.patient_id,
            medication_name: treatment.medication_name,
            dosage: treatment.dosage,
            frequency: treatment.frequency,
            route_of_administration: treatment.route_of_administration,
            start_date: treatment.start_date,
            end_date: treatment.end_date,
            duration_days: treatment.duration_days,
            status: treatment.status,
            indication: treatment.indication,
            side_effects: treatment.side_effects,
            prescriber_name: treatment.prescriber_name,
            notes: treatment.notes,
            created_at: treatment.created_at,
            updated_at: treatment.updated_at,
            created_by: treatment.created_by,
            updated_by: treatment.updated_by,
        }
    }
}
