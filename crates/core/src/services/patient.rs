//! Patient service: the only place ownership is enforced.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::{CreatePatientRequest, PatientResponse, UpdatePatientRequest};
use crate::entities::Patient;
use crate::repositories::PatientRepository;
use crate::validation::normalize_email;
use crate::{RecordsError, RecordsResult};

#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientRepository>) -> Self {
        Self { patients }
    }

    /// Loads the patient and verifies the caller created it.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is unknown, `Forbidden` when the caller is not
    /// the creator.
    async fn owned(&self, caller: Uuid, id: Uuid) -> RecordsResult<Patient> {
        let patient = self
            .patients
            .find(id)
            .await?
            .ok_or(RecordsError::NotFound("patient"))?;
        if patient.created_by != caller {
            return Err(RecordsError::Forbidden);
        }
        Ok(patient)
    }

    pub async fn create(
        &self,
        caller: Uuid,
        request: CreatePatientRequest,
    ) -> RecordsResult<PatientResponse> {
        request.validate()?;
        let gender = request.gender()?;
        let email = normalize_email("email", request.email)?;
        let now = Utc::now();

        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            date_of_birth: request.date_of_birth,
            gender,
            phone: request.phone,
            email,
            address: request.address,
            city: request.city,
            postal_code: request.postal_code,
            country: request.country,
            blood_group: request.blood_group,
            family_history: request.family_history,
            allergies: request.allergies,
            chronic_diseases: request.chronic_diseases,
            main_pathologies: request.main_pathologies,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_phone: request.emergency_contact_phone,
            attending_physician: request.attending_physician,
            notes: request.notes,
            active: true,
            created_at: now,
            updated_at: now,
            created_by: caller,
            updated_by: None,
        };

        let patient = self.patients.insert(patient).await?;
        tracing::info!(patient_id = %patient.id, created_by = %caller, "patient created");
        Ok(patient.into())
    }

    pub async fn get(&self, caller: Uuid, id: Uuid) -> RecordsResult<PatientResponse> {
        self.owned(caller, id).await.map(Into::into)
    }

    pub async fn list(
        &self,
        caller: Uuid,
        active_only: bool,
    ) -> RecordsResult<Vec<PatientResponse>> {
        let patients = self.patients.list_by_creator(caller, active_only).await?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    pub async fn search(&self, caller: Uuid, query: &str) -> RecordsResult<Vec<PatientResponse>> {
        let patients = self.patients.search(caller, query).await?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    /// Partial update; only non-null request fields are applied.
    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        request: UpdatePatientRequest,
    ) -> RecordsResult<PatientResponse> {
        request.validate()?;
        let gender = request.gender()?;
        let mut patient = self.owned(caller, id).await?;

        if let Some(first_name) = request.first_name {
            patient.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = request.last_name {
            patient.last_name = last_name.trim().to_string();
        }
        if let Some(date_of_birth) = request.date_of_birth {
            patient.date_of_birth = date_of_birth;
        }
        if let Some(gender) = gender {
            patient.gender = gender;
        }
        if let Some(email) = normalize_email("email", request.email)? {
            patient.email = Some(email);
        }
        if request.phone.is_some() {
            patient.phone = request.phone;
        }
        if request.address.is_some() {
            patient.address = request.address;
        }
        if request.city.is_some() {
            patient.city = request.city;
        }
        if request.postal_code.is_some() {
            patient.postal_code = request.postal_code;
        }
        if request.country.is_some() {
            patient.country = request.country;
        }
        if request.blood_group.is_some() {
            patient.blood_group = request.blood_group;
        }
        if request.family_history.is_some() {
            patient.family_history = request.family_history;
        }
        if request.allergies.is_some() {
            patient.allergies = request.allergies;
        }
        if request.chronic_diseases.is_some() {
            patient.chronic_diseases = request.chronic_diseases;
        }
        if request.main_pathologies.is_some() {
            patient.main_pathologies = request.main_pathologies;
        }
        if request.emergency_contact_name.is_some() {
            patient.emergency_contact_name = request.emergency_contact_name;
        }
        if request.emergency_contact_phone.is_some() {
            patient.emergency_contact_phone = request.emergency_contact_phone;
        }
        if request.attending_physician.is_some() {
            patient.attending_physician = request.attending_physician;
        }
        if request.notes.is_some() {
            patient.notes = request.notes;
        }
        if let Some(active) = request.active {
            patient.active = active;
        }
        patient.updated_at = Utc::now();
        patient.updated_by = Some(caller);

        self.patients.update(patient).await.map(Into::into)
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> RecordsResult<()> {
        self.owned(caller, id).await?;
        self.patients.delete(id).await?;
        tracing::info!(patient_id = %id, deleted_by = %caller, "patient deleted");
        Ok(())
    }

    /// Sets active=false; the record and its children are preserved.
    pub async fn deactivate(&self, caller: Uuid, id: Uuid) -> RecordsResult<PatientResponse> {
        let mut patient = self.owned(caller, id).await?;
        patient.active = false;
        patient.updated_at = Utc::now();
        patient.updated_by = Some(caller);
        self.patients.update(patient).await.map(Into::into)
    }

    pub async fn count_active(&self, caller: Uuid) -> RecordsResult<i64> {
        self.patients.count_active(caller).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn service() -> PatientService {
        PatientService::new(Arc::new(MemoryStore::new()))
    }

    fn create_request() -> CreatePatientRequest {
        CreatePatientRequest {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 8, 22).unwrap(),
            gender: "FEMALE".into(),
            phone: None,
            email: Some("  Jane.Smith@Example.COM ".into()),
            address: None,
            city: None,
            postal_code: None,
            country: None,
            blood_group: None,
            family_history: None,
            allergies: None,
            chronic_diseases: None,
            main_pathologies: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            attending_physician: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_normalizes_email_and_sets_creator() {
        let service = service();
        let caller = Uuid::new_v4();
        let created = service.create(caller, create_request()).await.unwrap();
        assert_eq!(created.email.as_deref(), Some("jane.smith@example.com"));
        assert_eq!(created.created_by, caller);
        assert!(created.active);
        assert_eq!(created.status, "active");
    }

    #[tokio::test]
    async fn foreign_caller_is_forbidden() {
        let service = service();
        let owner = Uuid::new_v4();
        let created = service.create(owner, create_request()).await.unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            service.get(stranger, created.id).await,
            Err(RecordsError::Forbidden)
        ));
        assert!(matches!(
            service.delete(stranger, created.id).await,
            Err(RecordsError::Forbidden)
        ));
        // Unchanged for the owner.
        assert!(service.get(owner, created.id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_gender_is_a_validation_error() {
        let service = service();
        let mut request = create_request();
        request.gender = "UNKNOWN".into();
        assert!(matches!(
            service.create(Uuid::new_v4(), request).await,
            Err(RecordsError::Validation { field: "gender", .. })
        ));
    }

    #[tokio::test]
    async fn deactivate_flips_the_flag_only() {
        let service = service();
        let caller = Uuid::new_v4();
        let created = service.create(caller, create_request()).await.unwrap();
        let updated = service.deactivate(caller, created.id).await.unwrap();
        assert!(!updated.active);
        assert_eq!(updated.status, "inactive");
        assert_eq!(service.count_active(caller).await.unwrap(), 0);
        assert!(service.get(caller, created.id).await.is_ok());
    }

    #[tokio::test]
    async fn partial_update_ignores_absent_fields() {
        let service = service();
        let caller = Uuid::new_v4();
        let created = service.create(caller, create_request()).await.unwrap();

        let request = UpdatePatientRequest {
            city: Some("Lyon".into()),
            ..Default::default()
        };
        let updated = service.update(caller, created.id, request).await.unwrap();
        assert_eq!(updated.city.as_deref(), Some("Lyon"));
        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.email.as_deref(), Some("jane.smith@example.com"));
        assert_eq!(updated.updated_by, Some(caller));
    }
}
