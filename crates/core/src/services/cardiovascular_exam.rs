use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::{
    CardiovascularExamResponse, CreateCardiovascularExamRequest, UpdateCardiovascularExamRequest,
};
use crate::entities::CardiovascularExam;
use crate::repositories::{CardiovascularExamRepository, PatientRepository};
use crate::{RecordsError, RecordsResult};

const DEFAULT_STATUS: &str = "COMPLETED";

#[derive(Clone)]
pub struct CardiovascularExamService {
    exams: Arc<dyn CardiovascularExamRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl CardiovascularExamService {
    pub fn new(
        exams: Arc<dyn CardiovascularExamRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self { exams, patients }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        caller: Uuid,
        request: CreateCardiovascularExamRequest,
    ) -> RecordsResult<CardiovascularExamResponse> {
        request.validate()?;
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        let now = Utc::now();

        let exam = CardiovascularExam {
            id: Uuid::new_v4(),
            patient_id,
            exam_type: request.exam_type.trim().to_string(),
            exam_date: request.exam_date,
            results: request.results.trim().to_string(),
            interpretation: request.interpretation,
            measured_values: request.measured_values,
            abnormalities: request.abnormalities,
            pdf_file: request.pdf_file,
            notes: request.notes,
            status: request
                .status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            created_at: now,
            updated_at: now,
            created_by: caller,
            updated_by: None,
        };

        let exam = self.exams.insert(exam).await?;
        tracing::info!(exam_id = %exam.id, %patient_id, "cardiovascular exam created");
        Ok(exam.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: Uuid,
        request: UpdateCardiovascularExamRequest,
    ) -> RecordsResult<CardiovascularExamResponse> {
        request.validate()?;
        let mut exam = self
            .exams
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("cardiovascular exam"))?;

        if let Some(exam_type) = request.exam_type {
            exam.exam_type = exam_type.trim().to_string();
        }
        if let Some(exam_date) = request.exam_date {
            exam.exam_date = exam_date;
        }
        if let Some(results) = request.results {
            exam.results = results.trim().to_string();
        }
        if request.interpretation.is_some() {
            exam.interpretation = request.interpretation;
        }
        if request.measured_values.is_some() {
            exam.measured_values = request.measured_values;
        }
        if request.abnormalities.is_some() {
            exam.abnormalities = request.abnormalities;
        }
        if request.pdf_file.is_some() {
            exam.pdf_file = request.pdf_file;
        }
        if request.notes.is_some() {
            exam.notes = request.notes;
        }
        if let Some(status) = request.status {
            exam.status = status;
        }
        exam.updated_at = Utc::now();
        exam.updated_by = Some(caller);

        self.exams.update(exam).await.map(Into::into)
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<CardiovascularExamResponse> {
        self.exams
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("cardiovascular exam"))
    }

    pub async fn list_by_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<CardiovascularExamResponse>> {
        let rows = self.exams.list_by_patient(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_type(
        &self,
        patient_id: Uuid,
        exam_type: &str,
    ) -> RecordsResult<Vec<CardiovascularExamResponse>> {
        let rows = self.exams.list_by_type(patient_id, exam_type).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Newest-first rows whose abnormalities text is non-empty.
    pub async fn list_with_abnormalities(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<CardiovascularExamResponse>> {
        let rows = self.exams.list_with_abnormalities(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn latest(&self, patient_id: Uuid) -> RecordsResult<CardiovascularExamResponse> {
        self.exams
            .latest_for_patient(patient_id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("cardiovascular exam"))
    }

    pub async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<CardiovascularExamResponse>> {
        let rows = self.exams.list_by_date_range(patient_id, start, end).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.exams.delete(id).await? {
            return Err(RecordsError::NotFound("cardiovascular exam"));
        }
        Ok(())
    }

    pub async fn count(&self, patient_id: Uuid) -> RecordsResult<i64> {
        self.exams.count_by_patient(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (CardiovascularExamService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = CardiovascularExamService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request(exam_type: &str) -> CreateCardiovascularExamRequest {
        CreateCardiovascularExamRequest {
            exam_type: exam_type.into(),
            exam_date: Utc::now(),
            results: "Sinus rhythm, no ST changes".into(),
            interpretation: None,
            measured_values: None,
            abnormalities: None,
            pdf_file: None,
            notes: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn status_defaults_to_completed() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request("ECG"))
            .await
            .unwrap();
        assert_eq!(created.status, "COMPLETED");
    }

    #[tokio::test]
    async fn type_filter_is_case_insensitive() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let caller = Uuid::new_v4();
        service.create(patient_id, caller, request("ECG")).await.unwrap();
        service
            .create(patient_id, caller, request("ECHOCARDIOGRAPHY"))
            .await
            .unwrap();

        let ecgs = service.list_by_type(patient_id, "ecg").await.unwrap();
        assert_eq!(ecgs.len(), 1);
        assert_eq!(ecgs[0].exam_type, "ECG");
    }

    #[tokio::test]
    async fn short_results_are_rejected() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let mut req = request("ECG");
        req.results = "ok".into();
        assert!(matches!(
            service.create(patient_id, Uuid::new_v4(), req).await,
            Err(RecordsError::Validation { field: "results", .. })
        ));
    }
}
