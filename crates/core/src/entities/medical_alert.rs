//! Medical alerts and their state machine.
//!
//! `active -> resolved` sets the resolution timestamp and resolver;
//! `active -> dismissed` sets the resolver only. Terminal states never
//! return to active.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::text_enum;
use crate::{RecordsError, RecordsResult};

text_enum! {
    AlertStatus {
        Active => "active",
        Resolved => "resolved",
        Dismissed => "dismissed",
    }
}

text_enum! {
    AlertSeverity {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MedicalAlert {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub alert_type: String,
    pub severity_level: Option<AlertSeverity>,
    pub description: Option<String>,
    pub required_action: Option<String>,
    pub status: AlertStatus,
    pub resolution_date: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalAlert {
    /// Transition `active -> resolved`. Conflict when not active.
    pub fn resolve(&mut self, resolved_by: Uuid, now: DateTime<Utc>) -> RecordsResult<()> {
        if self.status != AlertStatus::Active {
            return Err(RecordsError::conflict(format!(
                "alert is {} and cannot be resolved",
                self.status
            )));
        }
        self.status = AlertStatus::Resolved;
        self.resolution_date = Some(now);
        self.resolved_by = Some(resolved_by);
        self.updated_at = now;
        Ok(())
    }

    /// Transition `active -> dismissed`. Does not set a resolution
    /// timestamp. Conflict when not active.
    pub fn dismiss(&mut self, dismissed_by: Uuid, now: DateTime<Utc>) -> RecordsResult<()> {
        if self.status != AlertStatus::Active {
            return Err(RecordsError::conflict(format!(
                "alert is {} and cannot be dismissed",
                self.status
            )));
        }
        self.status = AlertStatus::Dismissed;
        self.resolved_by = Some(dismissed_by);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> MedicalAlert {
        MedicalAlert {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            alert_type: "CRITICAL_VALUE".into(),
            severity_level: Some(AlertSeverity::High),
            description: None,
            required_action: None,
            status: AlertStatus::Active,
            resolution_date: None,
            resolved_by: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resolve_sets_resolution_date_and_resolver() {
        let mut alert = alert();
        let resolver = Uuid::new_v4();
        alert.resolve(resolver, Utc::now()).unwrap();
        assert_eq!(alert.status, AlertStatus::Resolved);
        assert!(alert.resolution_date.is_some());
        assert_eq!(alert.resolved_by, Some(resolver));
    }

    #[test]
    fn dismiss_leaves_resolution_date_empty() {
        let mut alert = alert();
        let resolver = Uuid::new_v4();
        alert.dismiss(resolver, Utc::now()).unwrap();
        assert_eq!(alert.status, AlertStatus::Dismissed);
        assert!(alert.resolution_date.is_none());
        assert_eq!(alert.resolved_by, Some(resolver));
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        let mut alert = alert();
        alert.resolve(Uuid::new_v4(), Utc::now()).unwrap();
        assert!(matches!(
            alert.resolve(Uuid::new_v4(), Utc::now()),
            Err(RecordsError::Conflict(_))
        ));
        assert!(matches!(
            alert.dismiss(Uuid::new_v4(), Utc::now()),
            Err(RecordsError::Conflict(_))
        ));
    }
}
