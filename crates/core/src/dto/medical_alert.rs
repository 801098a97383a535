use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{AlertSeverity, AlertStatus, MedicalAlert};
use crate::time::{utc_format, utc_format_opt};
use crate::validation::{optional_text, require_text};
use crate::{RecordsError, RecordsResult};

/// Alerts are created active; resolution and dismissal go through the
/// dedicated state-machine endpoints, never through an update body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalAlertRequest {
    /// e.g. CRITICAL_VALUE, DRUG_INTERACTION, FOLLOW_UP_DUE.
    pub alert_type: String,
    /// LOW, MEDIUM, HIGH or CRITICAL.
    #[serde(default)]
    pub severity_level: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_action: Option<String>,
}

impl CreateMedicalAlertRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("alertType", &self.alert_type, 1, 100)?;
        optional_text("description", self.description.as_deref(), 1000)?;
        optional_text("requiredAction", self.required_action.as_deref(), 500)?;
        Ok(())
    }

    pub fn severity(&self) -> RecordsResult<Option<AlertSeverity>> {
        match &self.severity_level {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|message| RecordsError::validation("severityLevel", message)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalAlertResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub alert_type: String,
    pub severity_level: Option<AlertSeverity>,
    pub description: Option<String>,
    pub required_action: Option<String>,
    pub status: AlertStatus,
    #[serde(with = "utc_format_opt")]
    pub resolution_date: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub created_by: Uuid,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
}

impl From<MedicalAlert> for MedicalAlertResponse {
    fn from(alert: MedicalAlert) -> Self {
        Self {
            id: alert.id,
            patient_id: alert.patient_id,
            alert_type: alert.alert_type,
            severity_level: alert.severity_level,
            description: alert.description,
            required_action: alert.required_action,
            status: alert.status,
            resolution_date: alert.resolution_date,
            resolved_by: alert.resolved_by,
            created_by: alert.created_by,
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        }
    }
}
