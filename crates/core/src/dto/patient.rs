use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{Gender, Patient};
use crate::time::utc_format;
use crate::validation::{optional_text, past_date, phone, require_text};
use crate::{RecordsError, RecordsResult};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    /// One of MALE, FEMALE, OTHER.
    pub gender: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub family_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub chronic_diseases: Option<String>,
    #[serde(default)]
    pub main_pathologies: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub attending_physician: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        require_text("firstName", &self.first_name, 2, 50)?;
        require_text("lastName", &self.last_name, 2, 50)?;
        past_date("dateOfBirth", self.date_of_birth)?;
        phone("phone", self.phone.as_deref())?;
        phone("emergencyContactPhone", self.emergency_contact_phone.as_deref())?;
        optional_text("address", self.address.as_deref(), 200)?;
        optional_text("city", self.city.as_deref(), 50)?;
        optional_text("postalCode", self.postal_code.as_deref(), 20)?;
        optional_text("country", self.country.as_deref(), 50)?;
        optional_text("bloodGroup", self.blood_group.as_deref(), 20)?;
        optional_text("familyHistory", self.family_history.as_deref(), 500)?;
        optional_text("allergies", self.allergies.as_deref(), 500)?;
        optional_text("chronicDiseases", self.chronic_diseases.as_deref(), 500)?;
        optional_text("mainPathologies", self.main_pathologies.as_deref(), 1000)?;
        optional_text("emergencyContactName", self.emergency_contact_name.as_deref(), 200)?;
        optional_text("attendingPhysician", self.attending_physician.as_deref(), 200)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        Ok(())
    }

    pub fn gender(&self) -> RecordsResult<Gender> {
        self.gender
            .parse()
            .map_err(|message| RecordsError::validation("gender", message))
    }
}

/// Partial update: absent and null fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub family_history: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub chronic_diseases: Option<String>,
    #[serde(default)]
    pub main_pathologies: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
    #[serde(default)]
    pub attending_physician: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdatePatientRequest {
    pub fn validate(&self) -> RecordsResult<()> {
        if let Some(first_name) = &self.first_name {
            require_text("firstName", first_name, 2, 50)?;
        }
        if let Some(last_name) = &self.last_name {
            require_text("lastName", last_name, 2, 50)?;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            past_date("dateOfBirth", date_of_birth)?;
        }
        phone("phone", self.phone.as_deref())?;
        phone("emergencyContactPhone", self.emergency_contact_phone.as_deref())?;
        optional_text("address", self.address.as_deref(), 200)?;
        optional_text("city", self.city.as_deref(), 50)?;
        optional_text("postalCode", self.postal_code.as_deref(), 20)?;
        optional_text("country", self.country.as_deref(), 50)?;
        optional_text("bloodGroup", self.blood_group.as_deref(), 20)?;
        optional_text("familyHistory", self.family_history.as_deref(), 500)?;
        optional_text("allergies", self.allergies.as_deref(), 500)?;
        optional_text("chronicDiseases", self.chronic_diseases.as_deref(), 500)?;
        optional_text("mainPathologies", self.main_pathologies.as_deref(), 1000)?;
        optional_text("emergencyContactName", self.emergency_contact_name.as_deref(), 200)?;
        optional_text("attendingPhysician", self.attending_physician.as_deref(), 200)?;
        optional_text("notes", self.notes.as_deref(), 1000)?;
        Ok(())
    }

    pub fn gender(&self) -> RecordsResult<Option<Gender>> {
        match &self.gender {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|message| RecordsError::validation("gender", message)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub blood_group: Option<String>,
    pub family_history: Option<String>,
    pub allergies: Option<String>,
    pub chronic_diseases: Option<String>,
    pub main_pathologies: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub attending_physician: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    /// "active" or "inactive"; derived from the active flag.
    pub status: String,
    #[serde(with = "utc_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "utc_format")]
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        let status = patient.status().to_string();
        Self {
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            city: patient.city,
            postal_code: patient.postal_code,
            country: patient.country,
            blood_group: patient.blood_group,
            family_history: patient.family_history,
            allergies: patient.allergies,
            chronic_diseases: patient.chronic_diseases,
            main_pathologies: patient.main_pathologies,
            emergency_contact_name: patient.emergency_contact_name,
            emergency_contact_phone: patient.emergency_contact_phone,
            attending_physician: patient.attending_physician,
            notes: patient.notes,
            active: patient.active,
            status,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
            created_by: patient.created_by,
            updated_by: patient.updated_by,
        }
    }
}
