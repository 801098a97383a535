//! Patient aggregate root: demographics plus medical background fields.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::text_enum;

text_enum! {
    Gender {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
    }
}

/// Patient demographics and background. Owned by exactly one creating user;
/// every modification re-checks `created_by` against the caller.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Patient {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl Patient {
    /// The textual status parallel to the `active` flag. The flag is
    /// authoritative; this is derived for the transport shape.
    pub fn status(&self) -> &'static str {
        if self.active {
            "active"
        } else {
            "inactive"
        }
    }
}
