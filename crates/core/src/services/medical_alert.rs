//! Medical alert service: creation, projections and the state machine.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::{CreateMedicalAlertRequest, MedicalAlertResponse};
use crate::entities::{AlertStatus, MedicalAlert};
use crate::repositories::{MedicalAlertRepository, PatientRepository};
use crate::{RecordsError, RecordsResult};

#[derive(Clone)]
pub struct MedicalAlertService {
    alerts: Arc<dyn MedicalAlertRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl MedicalAlertService {
    pub fn new(
        alerts: Arc<dyn MedicalAlertRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self { alerts, patients }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        caller: Uuid,
        request: CreateMedicalAlertRequest,
    ) -> RecordsResult<MedicalAlertResponse> {
        request.validate()?;
        let severity = request.severity()?;
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        let now = Utc::now();

        let alert = MedicalAlert {
            id: Uuid::new_v4(),
            patient_id,
            alert_type: request.alert_type.trim().to_string(),
            severity_level: severity,
            description: request.description,
            required_action: request.required_action,
            status: AlertStatus::Active,
            resolution_date: None,
            resolved_by: None,
            created_by: caller,
            created_at: now,
            updated_at: now,
        };

        let alert = self.alerts.insert(alert).await?;
        tracing::info!(alert_id = %alert.id, %patient_id, "medical alert raised");
        Ok(alert.into())
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<MedicalAlertResponse> {
        self.alerts
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("medical alert"))
    }

    /// `active -> resolved`; conflict when the alert is already terminal.
    pub async fn resolve(&self, id: Uuid, caller: Uuid) -> RecordsResult<MedicalAlertResponse> {
        let alert = self
            .alerts
            .mark_resolved(id, caller, Utc::now())
            .await?
            .ok_or(RecordsError::NotFound("medical alert"))?;
        tracing::info!(alert_id = %id, resolved_by = %caller, "medical alert resolved");
        Ok(alert.into())
    }

    /// `active -> dismissed`; no resolution timestamp is recorded.
    pub async fn dismiss(&self, id: Uuid, caller: Uuid) -> RecordsResult<MedicalAlertResponse> {
        let alert = self
            .alerts
            .mark_dismissed(id, caller, Utc::now())
            .await?
            .ok_or(RecordsError::NotFound("medical alert"))?;
        tracing::info!(alert_id = %id, dismissed_by = %caller, "medical alert dismissed");
        Ok(alert.into())
    }

    pub async fn list_by_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<MedicalAlertResponse>> {
        let rows = self.alerts.list_by_patient(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<Vec<MedicalAlertResponse>> {
        let rows = self.alerts.list_by_status(patient_id, status).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_severity(
        &self,
        patient_id: Uuid,
        severity: crate::entities::AlertSeverity,
    ) -> RecordsResult<Vec<MedicalAlertResponse>> {
        let rows = self.alerts.list_by_severity(patient_id, severity).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count_active(&self, patient_id: Uuid) -> RecordsResult<i64> {
        self.alerts
            .count_by_status(patient_id, AlertStatus::Active)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.alerts.delete(id).await? {
            return Err(RecordsError::NotFound("medical alert"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (MedicalAlertService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = MedicalAlertService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request() -> CreateMedicalAlertRequest {
        CreateMedicalAlertRequest {
            alert_type: "CRITICAL_VALUE".into(),
            severity_level: Some("HIGH".into()),
            description: Some("Potassium 6.8 mmol/L".into()),
            required_action: None,
        }
    }

    #[tokio::test]
    async fn created_alerts_start_active() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();
        assert_eq!(created.status, AlertStatus::Active);
        assert_eq!(service.count_active(patient_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn resolve_records_resolver_and_timestamp() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();

        let resolver = Uuid::new_v4();
        let resolved = service.resolve(created.id, resolver).await.unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert_eq!(resolved.resolved_by, Some(resolver));
        assert!(resolved.resolution_date.is_some());
        assert_eq!(service.count_active(patient_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_transition_conflicts() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();

        service.dismiss(created.id, Uuid::new_v4()).await.unwrap();
        assert!(matches!(
            service.resolve(created.id, Uuid::new_v4()).await,
            Err(RecordsError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn unknown_alert_is_not_found() {
        let (service, _) = setup();
        assert!(matches!(
            service.resolve(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(RecordsError::NotFound("medical alert"))
        ));
    }
}
