use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::dto::{
    CreateMedicalAnalysisRequest, MedicalAnalysisResponse, UpdateMedicalAnalysisRequest,
};
use crate::entities::MedicalAnalysis;
use crate::repositories::{MedicalAnalysisRepository, PatientRepository};
use crate::{RecordsError, RecordsResult};

const DEFAULT_STATUS: &str = "PENDING";

#[derive(Clone)]
pub struct MedicalAnalysisService {
    analyses: Arc<dyn MedicalAnalysisRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl MedicalAnalysisService {
    pub fn new(
        analyses: Arc<dyn MedicalAnalysisRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self { analyses, patients }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        caller: Uuid,
        request: CreateMedicalAnalysisRequest,
    ) -> RecordsResult<MedicalAnalysisResponse> {
        request.validate()?;
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        let now = Utc::now();

        let analysis = MedicalAnalysis {
            id: Uuid::new_v4(),
            patient_id,
            analysis_type: request.analysis_type.trim().to_uppercase(),
            analysis_date: request.analysis_date,
            file_name: request.file_name,
            ocr_text: request.ocr_text,
            results: request.results,
            interpretation: request.interpretation,
            alerts_and_anomalies: request.alerts_and_anomalies,
            recommendations: request.recommendations,
            performed_by: request.performed_by,
            interpreted_by: request.interpreted_by,
            status: request
                .status
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            notes: request.notes,
            created_at: now,
            updated_at: now,
            created_by: caller,
            updated_by: None,
        };

        let analysis = self.analyses.insert(analysis).await?;
        tracing::info!(analysis_id = %analysis.id, %patient_id, "medical analysis created");
        Ok(analysis.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: Uuid,
        request: UpdateMedicalAnalysisRequest,
    ) -> RecordsResult<MedicalAnalysisResponse> {
        request.validate()?;
        let mut analysis = self
            .analyses
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("medical analysis"))?;

        if let Some(analysis_type) = request.analysis_type {
            analysis.analysis_type = analysis_type.trim().to_uppercase();
        }
        if let Some(analysis_date) = request.analysis_date {
            analysis.analysis_date = analysis_date;
        }
        if request.file_name.is_some() {
            analysis.file_name = request.file_name;
        }
        if request.ocr_text.is_some() {
            analysis.ocr_text = request.ocr_text;
        }
        if request.results.is_some() {
            analysis.results = request.results;
        }
        if request.interpretation.is_some() {
            analysis.interpretation = request.interpretation;
        }
        if request.alerts_and_anomalies.is_some() {
            analysis.alerts_and_anomalies = request.alerts_and_anomalies;
        }
        if request.recommendations.is_some() {
            analysis.recommendations = request.recommendations;
        }
        if request.performed_by.is_some() {
            analysis.performed_by = request.performed_by;
        }
        if request.interpreted_by.is_some() {
            analysis.interpreted_by = request.interpreted_by;
        }
        if let Some(status) = request.status {
            analysis.status = status.trim().to_uppercase();
        }
        if request.notes.is_some() {
            analysis.notes = request.notes;
        }
        analysis.updated_at = Utc::now();
        analysis.updated_by = Some(caller);

        self.analyses.update(analysis).await.map(Into::into)
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<MedicalAnalysisResponse> {
        self.analyses
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("medical analysis"))
    }

    pub async fn list_by_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<MedicalAnalysisResponse>> {
        let rows = self.analyses.list_by_patient(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Newest-first rows whose alerts/anomalies text is non-empty.
    pub async fn list_with_alerts(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<MedicalAnalysisResponse>> {
        let rows = self.analyses.list_with_alerts(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<MedicalAnalysisResponse>> {
        let rows = self
            .analyses
            .list_by_date_range(patient_id, start, end)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.analyses.delete(id).await? {
            return Err(RecordsError::NotFound("medical analysis"));
        }
        Ok(())
    }

    pub async fn count(&self, patient_id: Uuid) -> RecordsResult<i64> {
        self.analyses.count_by_patient(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (MedicalAnalysisService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = MedicalAnalysisService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request() -> CreateMedicalAnalysisRequest {
        CreateMedicalAnalysisRequest {
            analysis_type: "blood_test".into(),
            analysis_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            file_name: None,
            ocr_text: None,
            results: None,
            interpretation: None,
            alerts_and_anomalies: None,
            recommendations: None,
            performed_by: None,
            interpreted_by: None,
            status: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn type_and_status_are_uppercased() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();
        assert_eq!(created.analysis_type, "BLOOD_TEST");
        assert_eq!(created.status, "PENDING");

        let updated = service
            .update(
                created.id,
                Uuid::new_v4(),
                UpdateMedicalAnalysisRequest {
                    status: Some("completed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "COMPLETED");
    }

    #[tokio::test]
    async fn alerts_projection_skips_blank_text() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let caller = Uuid::new_v4();

        service.create(patient_id, caller, request()).await.unwrap();
        let mut flagged = request();
        flagged.alerts_and_anomalies = Some("elevated troponin".into());
        let flagged = service.create(patient_id, caller, flagged).await.unwrap();
        let mut blank = request();
        blank.alerts_and_anomalies = Some("   ".into());
        service.create(patient_id, caller, blank).await.unwrap();

        let with_alerts = service.list_with_alerts(patient_id).await.unwrap();
        assert_eq!(with_alerts.len(), 1);
        assert_eq!(with_alerts[0].id, flagged.id);
    }
}
