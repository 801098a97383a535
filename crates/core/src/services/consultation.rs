use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::{ConsultationResponse, CreateConsultationRequest, UpdateConsultationRequest};
use crate::entities::{Consultation, ConsultationStatus};
use crate::repositories::{ConsultationRepository, PatientRepository};
use crate::{RecordsError, RecordsResult};

#[derive(Clone)]
pub struct ConsultationService {
    consultations: Arc<dyn ConsultationRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl ConsultationService {
    pub fn new(
        consultations: Arc<dyn ConsultationRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self {
            consultations,
            patients,
        }
    }

    async fn require_patient(&self, patient_id: Uuid) -> RecordsResult<()> {
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        Ok(())
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        caller: Uuid,
        request: CreateConsultationRequest,
    ) -> RecordsResult<ConsultationResponse> {
        request.validate()?;
        let status = request.status()?;
        self.require_patient(patient_id).await?;
        let now = Utc::now();

        let consultation = Consultation {
            id: Uuid::new_v4(),
            patient_id,
            consultation_date: request.consultation_date,
            reason_for_visit: request.reason_for_visit.trim().to_string(),
            symptoms: request.symptoms,
            physical_examination: request.physical_examination,
            diagnosis: request.diagnosis,
            treatment: request.treatment,
            prescriptions: request.prescriptions,
            notes: request.notes,
            vital_signs: request.vital_signs,
            follow_up_instructions: request.follow_up_instructions,
            next_appointment: request.next_appointment,
            status,
            created_at: now,
            updated_at: now,
            created_by: caller,
            updated_by: None,
        };

        let consultation = self.consultations.insert(consultation).await?;
        tracing::info!(consultation_id = %consultation.id, %patient_id, "consultation created");
        Ok(consultation.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: Uuid,
        request: UpdateConsultationRequest,
    ) -> RecordsResult<ConsultationResponse> {
        request.validate()?;
        let status = request.status()?;
        let mut consultation = self
            .consultations
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("consultation"))?;

        if let Some(consultation_date) = request.consultation_date {
            consultation.consultation_date = consultation_date;
        }
        if let Some(reason) = request.reason_for_visit {
            consultation.reason_for_visit = reason.trim().to_string();
        }
        if request.symptoms.is_some() {
            consultation.symptoms = request.symptoms;
        }
        if request.physical_examination.is_some() {
            consultation.physical_examination = request.physical_examination;
        }
        if request.diagnosis.is_some() {
            consultation.diagnosis = request.diagnosis;
        }
        if request.treatment.is_some() {
            consultation.treatment = request.treatment;
        }
        if request.prescriptions.is_some() {
            consultation.prescriptions = request.prescriptions;
        }
        if request.notes.is_some() {
            consultation.notes = request.notes;
        }
        if request.vital_signs.is_some() {
            consultation.vital_signs = request.vital_signs;
        }
        if request.follow_up_instructions.is_some() {
            consultation.follow_up_instructions = request.follow_up_instructions;
        }
        if request.next_appointment.is_some() {
            consultation.next_appointment = request.next_appointment;
        }
        if let Some(status) = status {
            consultation.status = status;
        }
        consultation.updated_at = Utc::now();
        consultation.updated_by = Some(caller);

        self.consultations.update(consultation).await.map(Into::into)
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<ConsultationResponse> {
        self.consultations
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("consultation"))
    }

    pub async fn list_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConsultationStatus>,
    ) -> RecordsResult<Vec<ConsultationResponse>> {
        let rows = match status {
            Some(status) => {
                self.consultations
                    .list_by_patient_and_status(patient_id, status)
                    .await?
            }
            None => self.consultations.list_by_patient(patient_id).await?,
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn latest(&self, patient_id: Uuid) -> RecordsResult<ConsultationResponse> {
        self.consultations
            .latest_for_patient(patient_id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("consultation"))
    }

    pub async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<ConsultationResponse>> {
        let rows = self
            .consultations
            .list_by_date_range(patient_id, start, end)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.consultations.delete(id).await? {
            return Err(RecordsError::NotFound("consultation"));
        }
        Ok(())
    }

    pub async fn count(&self, patient_id: Uuid) -> RecordsResult<i64> {
        self.consultations.count_by_patient(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (ConsultationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = ConsultationService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request(reason: &str) -> CreateConsultationRequest {
        CreateConsultationRequest {
            consultation_date: Utc::now(),
            reason_for_visit: reason.into(),
            symptoms: None,
            physical_examination: None,
            diagnosis: None,
            treatment: None,
            prescriptions: None,
            notes: None,
            vital_signs: None,
            follow_up_instructions: None,
            next_appointment: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_requires_an_existing_patient() {
        let (service, _) = setup();
        assert!(matches!(
            service
                .create(Uuid::new_v4(), Uuid::new_v4(), request("Annual check-up"))
                .await,
            Err(RecordsError::NotFound("patient"))
        ));
    }

    #[tokio::test]
    async fn status_defaults_to_completed() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request("Annual check-up"))
            .await
            .unwrap();
        assert_eq!(created.status, ConsultationStatus::Completed);
    }

    #[tokio::test]
    async fn bad_status_string_is_a_validation_error() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let mut req = request("Annual check-up");
        req.status = Some("DONE".into());
        assert!(matches!(
            service.create(patient_id, Uuid::new_v4(), req).await,
            Err(RecordsError::Validation { field: "status", .. })
        ));
    }

    #[tokio::test]
    async fn latest_reports_not_found_on_empty_history() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        assert!(matches!(
            service.latest(patient_id).await,
            Err(RecordsError::NotFound("consultation"))
        ));
    }
}
