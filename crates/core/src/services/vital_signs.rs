use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::{CreateVitalSignsRequest, UpdateVitalSignsRequest, VitalSignsResponse};
use crate::entities::VitalSigns;
use crate::repositories::{PatientRepository, VitalSignsRepository};
use crate::{RecordsError, RecordsResult};

#[derive(Clone)]
pub struct VitalSignsService {
    vital_signs: Arc<dyn VitalSignsRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl VitalSignsService {
    pub fn new(
        vital_signs: Arc<dyn VitalSignsRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self {
            vital_signs,
            patients,
        }
    }

    pub async fn create(
        &self,
        patient_id: Uuid,
        caller: Uuid,
        request: CreateVitalSignsRequest,
    ) -> RecordsResult<VitalSignsResponse> {
        request.validate()?;
        if !self.patients.exists(patient_id).await? {
            return Err(RecordsError::NotFound("patient"));
        }
        let now = Utc::now();

        let mut vitals = VitalSigns {
            id: Uuid::new_v4(),
            patient_id,
            measurement_date: request.measurement_date,
            systolic_bp: request.systolic_bp,
            diastolic_bp: request.diastolic_bp,
            heart_rate: request.heart_rate,
            temperature: request.temperature,
            weight: request.weight,
            height: request.height,
            bmi: None,
            respiratory_rate: request.respiratory_rate,
            oxygen_saturation: request.oxygen_saturation,
            blood_glucose: request.blood_glucose,
            notes: request.notes,
            created_at: now,
            updated_at: now,
            created_by: caller,
            updated_by: None,
        };
        vitals.recompute_bmi();

        let vitals = self.vital_signs.insert(vitals).await?;
        tracing::info!(vital_signs_id = %vitals.id, %patient_id, "vital signs recorded");
        Ok(vitals.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        caller: Uuid,
        request: UpdateVitalSignsRequest,
    ) -> RecordsResult<VitalSignsResponse> {
        request.validate()?;
        let mut vitals = self
            .vital_signs
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("vital signs"))?;

        if let Some(measurement_date) = request.measurement_date {
            vitals.measurement_date = measurement_date;
        }
        if request.systolic_bp.is_some() {
            vitals.systolic_bp = request.systolic_bp;
        }
        if request.diastolic_bp.is_some() {
            vitals.diastolic_bp = request.diastolic_bp;
        }
        if request.heart_rate.is_some() {
            vitals.heart_rate = request.heart_rate;
        }
        if request.temperature.is_some() {
            vitals.temperature = request.temperature;
        }
        if request.weight.is_some() {
            vitals.weight = request.weight;
        }
        if request.height.is_some() {
            vitals.height = request.height;
        }
        if request.respiratory_rate.is_some() {
            vitals.respiratory_rate = request.respiratory_rate;
        }
        if request.oxygen_saturation.is_some() {
            vitals.oxygen_saturation = request.oxygen_saturation;
        }
        if request.blood_glucose.is_some() {
            vitals.blood_glucose = request.blood_glucose;
        }
        if request.notes.is_some() {
            vitals.notes = request.notes;
        }
        vitals.recompute_bmi();
        vitals.updated_at = Utc::now();
        vitals.updated_by = Some(caller);

        self.vital_signs.update(vitals).await.map(Into::into)
    }

    pub async fn get(&self, id: Uuid) -> RecordsResult<VitalSignsResponse> {
        self.vital_signs
            .find(id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("vital signs"))
    }

    pub async fn list_by_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<VitalSignsResponse>> {
        let rows = self.vital_signs.list_by_patient(patient_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn latest(&self, patient_id: Uuid) -> RecordsResult<VitalSignsResponse> {
        self.vital_signs
            .latest_for_patient(patient_id)
            .await?
            .map(Into::into)
            .ok_or(RecordsError::NotFound("vital signs"))
    }

    pub async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<VitalSignsResponse>> {
        let rows = self
            .vital_signs
            .list_by_date_range(patient_id, start, end)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete(&self, id: Uuid) -> RecordsResult<()> {
        if !self.vital_signs.delete(id).await? {
            return Err(RecordsError::NotFound("vital signs"));
        }
        Ok(())
    }

    pub async fn count(&self, patient_id: Uuid) -> RecordsResult<i64> {
        self.vital_signs.count_by_patient(patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;
    use crate::services::test_support::seed_patient;

    fn setup() -> (VitalSignsService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = VitalSignsService::new(store.clone(), store.clone());
        (service, store)
    }

    fn request() -> CreateVitalSignsRequest {
        CreateVitalSignsRequest {
            measurement_date: Utc::now(),
            systolic_bp: Some(120),
            diastolic_bp: Some(80),
            heart_rate: Some(70),
            temperature: Some(36.8),
            weight: Some(70.0),
            height: Some(175.0),
            respiratory_rate: None,
            oxygen_saturation: Some(98),
            blood_glucose: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn bmi_is_derived_on_create() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let created = service
            .create(patient_id, Uuid::new_v4(), request())
            .await
            .unwrap();
        assert_eq!(created.bmi, Some(22.86));
    }

    #[tokio::test]
    async fn bmi_recomputed_on_weight_update() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let caller = Uuid::new_v4();
        let created = service.create(patient_id, caller, request()).await.unwrap();

        let updated = service
            .update(
                created.id,
                caller,
                UpdateVitalSignsRequest {
                    weight: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bmi, Some(26.12));
    }

    #[tokio::test]
    async fn out_of_range_systolic_is_rejected() {
        let (service, store) = setup();
        let patient_id = seed_patient(&store).await;
        let mut req = request();
        req.systolic_bp = Some(300);
        assert!(matches!(
            service.create(patient_id, Uuid::new_v4(), req).await,
            Err(RecordsError::Validation { field: "systolicBp", .. })
        ));
    }
}
