use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::dto::{CreateTreatmentRequest, TreatmentResponse, UpdateTreatmentRequest};
use crate::entities::Treatment;
use crate::repositories::{PatientRepository, TreatmentRepository};
use crate::validation::end_not_before_start;
use crate::{RecordsError, RecordsResult};

const DEFAULT_ROUTE: &str = "ORAL";

#[derive(Clone)]
pub struct TreatmentService {
    treatments: Arc<dyn TreatmentRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl TreatmentService {
    pub fn new(
        treatments: Arc<dyn TreatmentRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self {
            treatments,
            patients,
        }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        caller: Uuid,
        request: CreateTreatmentRequest,
    ) -> RecordsResult<TreatmentResponse> {
        request.validate()?;
        let status = request.status()?;
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        let now = Utc::now();

        let treatment = Treatment {
            id: Uuid::new_v4(),
            patient_id,
            medication_name: request.medication_name.trim().to_string(),
            dosage: request.dosage.trim().to_string(),
            frequency: request.frequency,
            route_of_administration: request
                .route_of_administration
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROUTE.to_string()),
            start_date: request.start_date,
            end_date: request.end_date,
            duration_days: request.duration_days,
            status,
            indication: request.indication,
            side_effects: request.side_effects,
            prescriber_name: request.prescriber_name,
            notes: request.notes,
            created_at: now,
            updated_at: now,
            created_by: caller,
            updated_by: None,
        };

        let treatment = self.treatments.insert(treatment).await?;
        tracing::info!(treatment_id = %treatment.id, %patient_id, "treatment created");
        Ok(treatment.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: Uuid,
        request: UpdateTreatmentRequest,
    ) -> RecordsResult<TreatmentResponse> {
        request.validate()?;
        let status = request.status()?;
        let mut treatment = self
            .treatments
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("treatment"))?;

        if let Some(medication_name) = request.medication_name {
            treatment.medication_name = medication_name.trim().to_string();
        }
        if let Some(dosage) = request.dosage {
            treatment.dosage = dosage.trim().to_string();
        }
        if request.frequency.is_some() {
            treatment.frequency = request.frequency;
        }
        if let Some(route) = request.route_of_administration {
            treatment.route_of_administration = route;
        }
        if let Some(start_date) = request.start_date {
            treatment.start_date = start_date;
        }
        if request.end_date.is_some() {
            treatment.end_date = request.end_date;
        }
        // The window is re-checked against the merged dates.
        end_not_before_start("endDate", treatment.start_date, treatment.end_date)?;
        if request.duration_days.is_some() {
            treatment.duration_days = request.duration_days;
        }
        if let Some(status) = status {
            treatment.status = status;
        }
        if request.indication.is_some() {
            treatment.indication = request.indication;
        }
        if request.side_effects.is_some() {
            treatment.side_effects = request.side_effects;
        }
        if request.prescriber_name.is_some() {
            treatment.prescriber_name = request.prescriber_name;
        }
        if request.notes.is_some() {
            treatment.notes = request.notes;
        }
        treatment.updated_at = Utc::now();
        treatment.updated_by = Some(caller);

        self.treatments.update(treatment).await.map(Into::into)
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<TreatmentResponse> {
        self.treatments
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("treatment"))
    }

    pub async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<TreatmentResponse>> {
        let rows = self.treatments.list_by_patient(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_active(&self, patient_id: Uuid) -> RecordsResult<Vec<TreatmentResponse>> {
        let rows = self.treatments.list_active(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<TreatmentResponse>> {
        let rows = self
            .treatments
            .list_by_date_range(patient_id, start, end)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.treatments.delete(id).await? {
            return Err(RecordsError::NotFound("treatment"));
        }
        Ok(())
    }

    pub async fn count(&self, patient_id: Uuid) -> RecordsResult<i64> {
        self.treatments.count_by_patient(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TreatmentStatus;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (TreatmentService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = TreatmentService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request() -> CreateTreatmentRequest {
        CreateTreatmentRequest {
            medication_name: "Amoxicillin".into(),
            dosage: "500mg".into(),
            frequency: Some("3x/day".into()),
            route_of_administration: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            end_date: None,
            duration_days: Some(7),
            status: None,
            indication: None,
            side_effects: None,
            prescriber_name: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn route_defaults_to_oral_and_status_to_active() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();
        assert_eq!(created.route_of_administration, "ORAL");
        assert_eq!(created.status, TreatmentStatus::Active);
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let mut req = request();
        req.end_date = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert!(matches!(
            service.create(patient_id, Uuid::new_v4(), req).await,
            Err(RecordsError::Validation { field: "endDate", .. })
        ));
    }

    #[tokio::test]
    async fn update_recheck_covers_merged_dates() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();

        // Moving only the end date before the stored start must fail.
        let req = UpdateTreatmentRequest {
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(service.update(created.id, Uuid::new_v4(), req).await.is_err());
    }

    #[tokio::test]
    async fn active_projection_filters_status() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let caller = Uuid::new_v4();
        let kept = service.create(patient_id, caller, request()).await.unwrap();
        let stopped = service.create(patient_id, caller, request()).await.unwrap();
        service
            .update(
                stopped.id,
                caller,
                UpdateTreatmentRequest {
                    status: Some("DISCONTINUED".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let active = service.list_active(patient_id).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
    }
}
