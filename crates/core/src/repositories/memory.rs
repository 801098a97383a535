//! In-memory store.
//!
//! Backs the dev profile when no `DATABASE_URL` is configured, and the
//! service test suites. Implements every repository contract over plain
//! maps; mutations take the write lock so the same serialization guarantees
//! hold as under the row-locked Postgres paths.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::entities::{
    AlertSeverity, AlertStatus, CardiovascularExam, ChatConversation, Consultation,
    ConsultationStatus, ConversationStatus, MedicalAlert, MedicalAnalysis, MedicalHistory,
    MessageRole, Patient, Treatment, VitalSigns,
};
use crate::{RecordsError, RecordsResult};

use super::{
    CardiovascularExamRepository, ChatConversationRepository, ConsultationRepository,
    MedicalAlertRepository, MedicalAnalysisRepository, MedicalHistoryRepository,
    PatientRepository, TreatmentRepository, VitalSignsRepository,
};

#[derive(Default)]
pub struct MemoryStore {
    patients: RwLock<HashMap<Uuid, Patient>>,
    consultations: RwLock<HashMap<Uuid, Consultation>>,
    treatments: RwLock<HashMap<Uuid, Treatment>>,
    vital_signs: RwLock<HashMap<Uuid, VitalSigns>>,
    analyses: RwLock<HashMap<Uuid, MedicalAnalysis>>,
    cardio_exams: RwLock<HashMap<Uuid, CardiovascularExam>>,
    alerts: RwLock<HashMap<Uuid, MedicalAlert>>,
    conversations: RwLock<HashMap<Uuid, ChatConversation>>,
    histories: RwLock<HashMap<Uuid, MedicalHistory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, ties broken by identifier ascending.
fn sort_desc<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> (K, Uuid)) {
    rows.sort_by(|a, b| {
        let (ka, ia) = key(a);
        let (kb, ib) = key(b);
        kb.cmp(&ka).then(ia.cmp(&ib))
    });
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[async_trait]
impl PatientRepository for MemoryStore {
    async fn insert(&self, patient: Patient) -> RecordsResult<Patient> {
        let mut patients = self.patients.write().unwrap();
        if let Some(email) = &patient.email {
            if patients.values().any(|p| p.email.as_deref() == Some(email)) {
                return Err(RecordsError::conflict(format!(
                    "a patient with email '{email}' already exists"
                )));
            }
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<Patient>> {
        Ok(self.patients.read().unwrap().get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.patients.read().unwrap().contains_key(&id))
    }

    async fn update(&self, patient: Patient) -> RecordsResult<Patient> {
        let mut patients = self.patients.write().unwrap();
        if let Some(email) = &patient.email {
            let taken = patients
                .values()
                .any(|p| p.id != patient.id && p.email.as_deref() == Some(email));
            if taken {
                return Err(RecordsError::conflict(format!(
                    "a patient with email '{email}' already exists"
                )));
            }
        }
        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let existed = self.patients.write().unwrap().remove(&id).is_some();
        if existed {
            self.consultations.write().unwrap().retain(|_, c| c.patient_id != id);
            self.treatments.write().unwrap().retain(|_, t| t.patient_id != id);
            self.vital_signs.write().unwrap().retain(|_, v| v.patient_id != id);
            self.analyses.write().unwrap().retain(|_, a| a.patient_id != id);
            self.cardio_exams.write().unwrap().retain(|_, e| e.patient_id != id);
            self.alerts.write().unwrap().retain(|_, a| a.patient_id != id);
            self.conversations.write().unwrap().retain(|_, c| c.patient_id != id);
            self.histories.write().unwrap().retain(|_, h| h.patient_id != id);
        }
        Ok(existed)
    }

    async fn list_by_creator(
        &self,
        created_by: Uuid,
        active_only: bool,
    ) -> RecordsResult<Vec<Patient>> {
        let mut rows: Vec<Patient> = self
            .patients
            .read()
            .unwrap()
            .values()
            .filter(|p| p.created_by == created_by && (!active_only || p.active))
            .cloned()
            .collect();
        sort_desc(&mut rows, |p| (p.created_at, p.id));
        Ok(rows)
    }

    async fn search(&self, created_by: Uuid, query: &str) -> RecordsResult<Vec<Patient>> {
        let needle = query.to_lowercase();
        let mut rows: Vec<Patient> = self
            .patients
            .read()
            .unwrap()
            .values()
            .filter(|p| p.created_by == created_by)
            .filter(|p| {
                p.first_name.to_lowercase().contains(&needle)
                    || p.last_name.to_lowercase().contains(&needle)
                    || p.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        sort_desc(&mut rows, |p| (p.created_at, p.id));
        Ok(rows)
    }

    async fn count_active(&self, created_by: Uuid) -> RecordsResult<i64> {
        Ok(self
            .patients
            .read()
            .unwrap()
            .values()
            .filter(|p| p.created_by == created_by && p.active)
            .count() as i64)
    }
}

#[async_trait]
impl ConsultationRepository for MemoryStore {
    async fn insert(&self, consultation: Consultation) -> RecordsResult<Consultation> {
        self.consultations
            .write()
            .unwrap()
            .insert(consultation.id, consultation.clone());
        Ok(consultation)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<Consultation>> {
        Ok(self.consultations.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, consultation: Consultation) -> RecordsResult<Consultation> {
        self.consultations
            .write()
            .unwrap()
            .insert(consultation.id, consultation.clone());
        Ok(consultation)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.consultations.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<Consultation>> {
        let mut rows: Vec<Consultation> = self
            .consultations
            .read()
            .unwrap()
            .values()
            .filter(|c| c.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |c| (c.consultation_date, c.id));
        Ok(rows)
    }

    async fn list_by_patient_and_status(
        &self,
        patient_id: Uuid,
        status: ConsultationStatus,
    ) -> RecordsResult<Vec<Consultation>> {
        let mut rows = ConsultationRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|c| c.status == status);
        Ok(rows)
    }

    async fn latest_for_patient(&self, patient_id: Uuid) -> RecordsResult<Option<Consultation>> {
        Ok(ConsultationRepository::list_by_patient(self, patient_id)
            .await?
            .into_iter()
            .next())
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<Consultation>> {
        let mut rows = ConsultationRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|c| c.consultation_date >= start && c.consultation_date <= end);
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        Ok(self
            .consultations
            .read()
            .unwrap()
            .values()
            .filter(|c| c.patient_id == patient_id)
            .count() as i64)
    }
}

#[async_trait]
impl TreatmentRepository for MemoryStore {
    async fn insert(&self, treatment: Treatment) -> RecordsResult<Treatment> {
        self.treatments
            .write()
            .unwrap()
            .insert(treatment.id, treatment.clone());
        Ok(treatment)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<Treatment>> {
        Ok(self.treatments.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, treatment: Treatment) -> RecordsResult<Treatment> {
        self.treatments
            .write()
            .unwrap()
            .insert(treatment.id, treatment.clone());
        Ok(treatment)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.treatments.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<Treatment>> {
        let mut rows: Vec<Treatment> = self
            .treatments
            .read()
            .unwrap()
            .values()
            .filter(|t| t.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |t| (t.start_date, t.id));
        Ok(rows)
    }

    async fn list_active(&self, patient_id: Uuid) -> RecordsResult<Vec<Treatment>> {
        let mut rows = TreatmentRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|t| t.status == crate::entities::TreatmentStatus::Active);
        Ok(rows)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<Treatment>> {
        let mut rows = TreatmentRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|t| t.start_date >= start && t.start_date <= end);
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        Ok(self
            .treatments
            .read()
            .unwrap()
            .values()
            .filter(|t| t.patient_id == patient_id)
            .count() as i64)
    }
}

#[async_trait]
impl VitalSignsRepository for MemoryStore {
    async fn insert(&self, vitals: VitalSigns) -> RecordsResult<VitalSigns> {
        self.vital_signs
            .write()
            .unwrap()
            .insert(vitals.id, vitals.clone());
        Ok(vitals)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<VitalSigns>> {
        Ok(self.vital_signs.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, vitals: VitalSigns) -> RecordsResult<VitalSigns> {
        self.vital_signs
            .write()
            .unwrap()
            .insert(vitals.id, vitals.clone());
        Ok(vitals)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.vital_signs.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<VitalSigns>> {
        let mut rows: Vec<VitalSigns> = self
            .vital_signs
            .read()
            .unwrap()
            .values()
            .filter(|v| v.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |v| (v.measurement_date, v.id));
        Ok(rows)
    }

    async fn latest_for_patient(&self, patient_id: Uuid) -> RecordsResult<Option<VitalSigns>> {
        Ok(VitalSignsRepository::list_by_patient(self, patient_id)
            .await?
            .into_iter()
            .next())
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<VitalSigns>> {
        let mut rows = VitalSignsRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|v| v.measurement_date >= start && v.measurement_date <= end);
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        Ok(self
            .vital_signs
            .read()
            .unwrap()
            .values()
            .filter(|v| v.patient_id == patient_id)
            .count() as i64)
    }
}

#[async_trait]
impl MedicalAnalysisRepository for MemoryStore {
    async fn insert(&self, analysis: MedicalAnalysis) -> RecordsResult<MedicalAnalysis> {
        self.analyses
            .write()
            .unwrap()
            .insert(analysis.id, analysis.clone());
        Ok(analysis)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalAnalysis>> {
        Ok(self.analyses.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, analysis: MedicalAnalysis) -> RecordsResult<MedicalAnalysis> {
        self.analyses
            .write()
            .unwrap()
            .insert(analysis.id, analysis.clone());
        Ok(analysis)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.analyses.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAnalysis>> {
        let mut rows: Vec<MedicalAnalysis> = self
            .analyses
            .read()
            .unwrap()
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |a| (a.analysis_date, a.id));
        Ok(rows)
    }

    async fn list_with_alerts(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAnalysis>> {
        let mut rows = MedicalAnalysisRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|a| has_text(&a.alerts_and_anomalies));
        Ok(rows)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<MedicalAnalysis>> {
        let mut rows = MedicalAnalysisRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|a| a.analysis_date >= start && a.analysis_date <= end);
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        Ok(self
            .analyses
            .read()
            .unwrap()
            .values()
            .filter(|a| a.patient_id == patient_id)
            .count() as i64)
    }
}

#[async_trait]
impl CardiovascularExamRepository for MemoryStore {
    async fn insert(&self, exam: CardiovascularExam) -> RecordsResult<CardiovascularExam> {
        self.cardio_exams
            .write()
            .unwrap()
            .insert(exam.id, exam.clone());
        Ok(exam)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<CardiovascularExam>> {
        Ok(self.cardio_exams.read().unwrap().get(&id).cloned())
    }

    async fn update(&self, exam: CardiovascularExam) -> RecordsResult<CardiovascularExam> {
        self.cardio_exams
            .write()
            .unwrap()
            .insert(exam.id, exam.clone());
        Ok(exam)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.cardio_exams.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<CardiovascularExam>> {
        let mut rows: Vec<CardiovascularExam> = self
            .cardio_exams
            .read()
            .unwrap()
            .values()
            .filter(|e| e.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |e| (e.exam_date, e.id));
        Ok(rows)
    }

    async fn list_by_type(
        &self,
        patient_id: Uuid,
        exam_type: &str,
    ) -> RecordsResult<Vec<CardiovascularExam>> {
        let mut rows = CardiovascularExamRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|e| e.exam_type.eq_ignore_ascii_case(exam_type));
        Ok(rows)
    }

    async fn list_with_abnormalities(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<CardiovascularExam>> {
        let mut rows = CardiovascularExamRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|e| has_text(&e.abnormalities));
        Ok(rows)
    }

    async fn latest_for_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Option<CardiovascularExam>> {
        Ok(CardiovascularExamRepository::list_by_patient(self, patient_id)
            .await?
            .into_iter()
            .next())
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<CardiovascularExam>> {
        let mut rows = CardiovascularExamRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|e| e.exam_date >= start && e.exam_date <= end);
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        Ok(self
            .cardio_exams
            .read()
            .unwrap()
            .values()
            .filter(|e| e.patient_id == patient_id)
            .count() as i64)
    }
}

#[async_trait]
impl MedicalAlertRepository for MemoryStore {
    async fn insert(&self, alert: MedicalAlert) -> RecordsResult<MedicalAlert> {
        self.alerts.write().unwrap().insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalAlert>> {
        Ok(self.alerts.read().unwrap().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.alerts.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAlert>> {
        let mut rows: Vec<MedicalAlert> = self
            .alerts
            .read()
            .unwrap()
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |a| (a.created_at, a.id));
        Ok(rows)
    }

    async fn list_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<Vec<MedicalAlert>> {
        let mut rows = MedicalAlertRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|a| a.status == status);
        Ok(rows)
    }

    async fn list_by_severity(
        &self,
        patient_id: Uuid,
        severity: AlertSeverity,
    ) -> RecordsResult<Vec<MedicalAlert>> {
        let mut rows = MedicalAlertRepository::list_by_patient(self, patient_id).await?;
        rows.retain(|a| a.severity_level == Some(severity));
        Ok(rows)
    }

    async fn count_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<i64> {
        Ok(self
            .alerts
            .read()
            .unwrap()
            .values()
            .filter(|a| a.patient_id == patient_id && a.status == status)
            .count() as i64)
    }

    async fn mark_resolved(
        &self,
        id: Uuid,
        resolved_by: Uuid,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<MedicalAlert>> {
        let mut alerts = self.alerts.write().unwrap();
        let Some(alert) = alerts.get_mut(&id) else {
            return Ok(None);
        };
        alert.resolve(resolved_by, now)?;
        Ok(Some(alert.clone()))
    }

    async fn mark_dismissed(
        &self,
        id: Uuid,
        dismissed_by: Uuid,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<MedicalAlert>> {
        let mut alerts = self.alerts.write().unwrap();
        let Some(alert) = alerts.get_mut(&id) else {
            return Ok(None);
        };
        alert.dismiss(dismissed_by, now)?;
        Ok(Some(alert.clone()))
    }
}

#[async_trait]
impl ChatConversationRepository for MemoryStore {
    async fn insert(&self, conversation: ChatConversation) -> RecordsResult<ChatConversation> {
        let mut conversations = self.conversations.write().unwrap();
        if conversations
            .values()
            .any(|c| c.session_id == conversation.session_id)
        {
            return Err(RecordsError::conflict(format!(
                "a conversation with session '{}' already exists",
                conversation.session_id
            )));
        }
        conversations.insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<ChatConversation>> {
        Ok(self.conversations.read().unwrap().get(&id).cloned())
    }

    async fn find_by_session(&self, session_id: &str) -> RecordsResult<Option<ChatConversation>> {
        Ok(self
            .conversations
            .read()
            .unwrap()
            .values()
            .find(|c| c.session_id == session_id)
            .cloned())
    }

    async fn session_exists(&self, session_id: &str) -> RecordsResult<bool> {
        Ok(self
            .conversations
            .read()
            .unwrap()
            .values()
            .any(|c| c.session_id == session_id))
    }

    async fn update(&self, conversation: ChatConversation) -> RecordsResult<ChatConversation> {
        self.conversations
            .write()
            .unwrap()
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn append_message(
        &self,
        id: Uuid,
        role: MessageRole,
        content: &str,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<ChatConversation>> {
        // Write lock held for the whole read-modify-write.
        let mut conversations = self.conversations.write().unwrap();
        let Some(conversation) = conversations.get_mut(&id) else {
            return Ok(None);
        };
        conversation.apply_message(role, content, now)?;
        Ok(Some(conversation.clone()))
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        Ok(self.conversations.write().unwrap().remove(&id).is_some())
    }

    async fn list_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<Vec<ChatConversation>> {
        let mut rows: Vec<ChatConversation> = self
            .conversations
            .read()
            .unwrap()
            .values()
            .filter(|c| c.patient_id == patient_id)
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        sort_desc(&mut rows, |c| (c.last_message_at, c.id));
        Ok(rows)
    }

    async fn count_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<i64> {
        Ok(self
            .conversations
            .read()
            .unwrap()
            .values()
            .filter(|c| c.patient_id == patient_id)
            .filter(|c| status.map_or(true, |s| c.status == s))
            .count() as i64)
    }
}

#[async_trait]
impl MedicalHistoryRepository for MemoryStore {
    async fn insert(&self, history: MedicalHistory) -> RecordsResult<MedicalHistory> {
        self.histories
            .write()
            .unwrap()
            .insert(history.id, history.clone());
        Ok(history)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalHistory>> {
        Ok(self.histories.read().unwrap().get(&id).cloned())
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalHistory>> {
        let mut rows: Vec<MedicalHistory> = self
            .histories
            .read()
            .unwrap()
            .values()
            .filter(|h| h.patient_id == patient_id)
            .cloned()
            .collect();
        sort_desc(&mut rows, |h| (h.diagnosis_date, h.id));
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        Ok(self
            .histories
            .read()
            .unwrap()
            .values()
            .filter(|h| h.patient_id == patient_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Gender, HistorySeverity, TreatmentStatus};
    use chrono::Datelike;

    fn patient(created_by: Uuid) -> Patient {
        let now = Utc::now();
        Patient {
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
        }
    }

    fn treatment(patient_id: Uuid, start: NaiveDate) -> Treatment {
        let now = Utc::now();
        Treatment {
            id: Uuid::new_v4(),
            patient_id,
            medication_name: "Paracetamol".into(),
            dosage: "500mg".into(),
            frequency: None,
            route_of_administration: "ORAL".into(),
            start_date: start,
            end_date: None,
            duration_days: None,
            status: TreatmentStatus::Active,
            indication: None,
            side_effects: None,
            prescriber_name: None,
            notes: None,
            created_at: now,
            updated_at: now,
            created_by: patient_id,
            updated_by: None,
        }
    }

    fn history(patient_id: Uuid) -> MedicalHistory {
        let now = Utc::now();
        MedicalHistory {
            id: Uuid::new_v4(),
            patient_id,
            diagnosis_date: NaiveDate::from_ymd_opt(2019, 5, 1).unwrap(),
            diagnosis: "Asthma".into(),
            symptoms: None,
            treatment: None,
            medications: None,
            notes: None,
            severity: Some(HistorySeverity::Mild),
            resolved: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn patient_delete_cascades_to_children() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let p = PatientRepository::insert(&store, patient(user)).await.unwrap();

        TreatmentRepository::insert(
            &store,
            treatment(p.id, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        )
        .await
        .unwrap();
        MedicalHistoryRepository::insert(&store, history(p.id))
            .await
            .unwrap();

        assert!(PatientRepository::delete(&store, p.id).await.unwrap());
        assert_eq!(
            TreatmentRepository::count_by_patient(&store, p.id)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            MedicalHistoryRepository::count_by_patient(&store, p.id)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let mut a = patient(user);
        a.email = Some("jane@example.com".into());
        PatientRepository::insert(&store, a).await.unwrap();

        let mut b = patient(user);
        b.email = Some("jane@example.com".into());
        assert!(matches!(
            PatientRepository::insert(&store, b).await,
            Err(RecordsError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn date_range_keeps_boundary_rows() {
        let store = MemoryStore::new();
        let pid = Uuid::new_v4();
        // One row before the window, one inside, one on each boundary.
        for day in [1, 10, 15, 20] {
            TreatmentRepository::insert(
                &store,
                treatment(pid, NaiveDate::from_ymd_opt(2024, 3, day).unwrap()),
            )
            .await
            .unwrap();
        }

        let rows = TreatmentRepository::list_by_date_range(
            &store,
            pid,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        )
        .await
        .unwrap();
        let days: Vec<u32> = rows.iter().map(|t| t.start_date.day0() + 1).collect();
        assert_eq!(days, vec![20, 15, 10]);
    }

    #[tokio::test]
    async fn treatment_ordering_is_start_date_descending() {
        let store = MemoryStore::new();
        let pid = Uuid::new_v4();
        for day in [5, 20, 10] {
            TreatmentRepository::insert(
                &store,
                treatment(pid, NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
            )
            .await
            .unwrap();
        }
        let rows = TreatmentRepository::list_by_patient(&store, pid)
            .await
            .unwrap();
        let days: Vec<u32> = rows.iter().map(|t| t.start_date.day0() + 1).collect();
        assert_eq!(days, vec![20, 10, 5]);
    }
}
