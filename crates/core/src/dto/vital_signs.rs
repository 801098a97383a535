use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::VitalSigns;
use crate::time::{utc_format, utc_format_opt};
use crate::validation::{optional_text, positive_f64, range_f64, range_i32};
use crate::RecordsResult;

/// BMI is not part of the request shape; it is derived from weight and
/// height on the server.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVitalSignsRequest {
    #[serde(with = "utc_format")]
    pub measurement_date: DateTime<Utc>,
    #[serde(default)]
    pub systolic_bp: Option<i32>,
    #[serde(default)]
    pub diastolic_bp: Option<i32>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub respiratory_rate: Option<i32>,
    #[serde(default)]
    pub oxygen_saturation: Option<i32>,
    #[serde(default)]
    pub blood_glucose: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateVitalSignsRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        validate_measurements(
            self.systolic_bp,
            self.diastolic_bp,
            self.heart_rate,
            self.temperature,
            self.weight,
            self.height,
            self.respiratory_rate,
            self.oxygen_saturation,
            self.blood_glucose,
            self.notes.as_deref(),
        )
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVitalSignsRequest {
    #[serde(default, with = "utc_format_opt")]
    pub measurement_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub systolic_bp: Option<i32>,
    #[serde(default)]
    pub diastolic_bp: Option<i32>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub respiratory_rate: Option<i32>,
    #[serde(default)]
    pub oxygen_saturation: Option<i32>,
    #[serde(default)]
    pub blood_glucose: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateVitalSignsRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        validate_measurements(
            self.systolic_bp,
            self.diastolic_bp,
            self.heart_rate,
            self.temperature,
            self.weight,
            self.height,
            self.respiratory_rate,
            self.oxygen_saturation,
            self.blood_glucose,
            self.notes.as_deref(),
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn validate_measurements(
    systolic_bp: Option<i32>,
    diastolic_bp: Option<i32>,
    heart_rate: Option<i32>,
    temperature: Option<f64>,
    weight: Option<f64>,
    height: Option<f64>,
    respiratory_rate: Option<i32>,
    oxygen_saturation: Option<i32>,
    blood_glucose: Option<f64>,
    notes: Option<&str>,
) -> RecordsResult<()> {
    range_i32("systolicBp", systolic_bp, 50, 250)?;
    range_i32("diastolicBp", diastolic_bp, 30, 150)?;
    range_i32("heartRate", heart_rate, 30, 250)?;
    range_f64("temperature", temperature, 30.0, 45.0)?;
    positive_f64("weight", weight)?;
    positive_f64("height", height)?;
    range_i32("respiratoryRate", respiratory_rate, 5, 60)?;
    range_i32("oxygenSaturation", oxygen_saturation, 50, 100)?;
    positive_f64("bloodGlucose", blood_glucose)?;
    optional_text("notes", notes, 1000)?;
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignsResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(with = "utc_format")]
    pub measurement_date: DateTime<Utc>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub blood_glucose: Option<f64>,
    pub notes: Option<String>,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl From<VitalSigns> for VitalSignsResponse {
    fn from(vitals: VitalSigns) -> Self {
        Self {
            id: vitals.id,
            patient_id: vitals.patient_id,
            measurement_date: vitals.measurement_date,
            systolic_bp: vitals.systolic_bp,
            diastolic_bp: vitals.diastolic_bp,
            heart_rate: vitals.heart_rate,
            temperature: vitals.temperature,
            weight: vitals.weight,
            height: vitals.height,
            bmi: vitals.bmi,
            respiratory_rate: vitals.respiratory_rate,
            oxygen_saturation: vitals.oxygen_saturation,
            blood_glucose: vitals.blood_glucose,
            notes: vitals.notes,
            created_at: vitals.created_at,
            updated_at: vitals.updated_at,
            created_by: vitals.created_by,
            updated_by: vitals.updated_by,
        }
    }
}
