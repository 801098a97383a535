//! Shared fixtures for the service test modules.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::{Gender, Patient};
use crate::repositories::{MemoryStore, PatientRepository};

/// Inserts a minimal active patient owned by a fresh user and returns its id.
pub(crate) async fn seed_patient(store: &Arc<MemoryStore>) -> Uuid {
    seed_patient_for(store, Uuid::new_v4()).await
}

pub(crate) async fn seed_patient_for(store: &Arc<MemoryStore>, created_by: Uuid) -> Uuid {
    let now = Utc::now();
    let patient = Patient {
        id: Uuid::new_v4(),
        first_name: "Jane".into(),
        last_name: "Smith".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 8, 22).unwrap(),
        gender: Gender::Female,
        phone: None,
        email: None,
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
        active: true,
        created_at: now,
        updated_at: now,
        created_by,
        updated_by: None,
    };
    PatientRepository::insert(store.as_ref(), patient)
        .await
        .unwrap()
        .id
}
