//! Postgres-backed store.
//!
//! Runtime-checked sqlx queries over a shared [`PgPool`]. Conditional
//! transitions (alert resolution, chat append) run inside a transaction with
//! `SELECT ... FOR UPDATE` so concurrent writers to the same row serialize.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
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

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Unique-constraint violations surface as conflicts; everything else stays
/// a database error.
fn db_err(err: sqlx::Error) -> RecordsError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return RecordsError::conflict(db.message().to_string());
        }
    }
    RecordsError::Database(err)
}

#[async_trait]
impl PatientRepository for PgStore {
    async fn insert(&self, patient: Patient) -> RecordsResult<Patient> {
        sqlx::query(
            "INSERT INTO patients (
                id, first_name, last_name, date_of_birth, gender, phone, email,
                address, city, postal_code, country, blood_group, family_history,
                allergies, chronic_diseases, main_pathologies,
                emergency_contact_name, emergency_contact_phone,
                attending_physician, notes, active, created_at, updated_at,
                created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)",
        )
        .bind(patient.id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(patient.gender)
        .bind(&patient.phone)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(&patient.city)
        .bind(&patient.postal_code)
        .bind(&patient.country)
        .bind(&patient.blood_group)
        .bind(&patient.family_history)
        .bind(&patient.allergies)
        .bind(&patient.chronic_diseases)
        .bind(&patient.main_pathologies)
        .bind(&patient.emergency_contact_name)
        .bind(&patient.emergency_contact_phone)
        .bind(&patient.attending_physician)
        .bind(&patient.notes)
        .bind(patient.active)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .bind(patient.created_by)
        .bind(patient.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(patient)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<Patient>> {
        let row = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists(&self, id: Uuid) -> RecordsResult<bool> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM patients WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn update(&self, patient: Patient) -> RecordsResult<Patient> {
        sqlx::query(
            "UPDATE patients SET
                first_name = $2, last_name = $3, date_of_birth = $4, gender = $5,
                phone = $6, email = $7, address = $8, city = $9, postal_code = $10,
                country = $11, blood_group = $12, family_history = $13,
                allergies = $14, chronic_diseases = $15, main_pathologies = $16,
                emergency_contact_name = $17, emergency_contact_phone = $18,
                attending_physician = $19, notes = $20, active = $21,
                updated_at = $22, updated_by = $23
            WHERE id = $1",
        )
        .bind(patient.id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(patient.gender)
        .bind(&patient.phone)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(&patient.city)
        .bind(&patient.postal_code)
        .bind(&patient.country)
        .bind(&patient.blood_group)
        .bind(&patient.family_history)
        .bind(&patient.allergies)
        .bind(&patient.chronic_diseases)
        .bind(&patient.main_pathologies)
        .bind(&patient.emergency_contact_name)
        .bind(&patient.emergency_contact_phone)
        .bind(&patient.attending_physician)
        .bind(&patient.notes)
        .bind(patient.active)
        .bind(patient.updated_at)
        .bind(patient.updated_by)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(patient)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        // Child rows go with the patient via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_creator(
        &self,
        created_by: Uuid,
        active_only: bool,
    ) -> RecordsResult<Vec<Patient>> {
        let rows = sqlx::query_as::<_, Patient>(
            "SELECT * FROM patients
             WHERE created_by = $1 AND ($2 = FALSE OR active = TRUE)
             ORDER BY created_at DESC, id ASC",
        )
        .bind(created_by)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn search(&self, created_by: Uuid, query: &str) -> RecordsResult<Vec<Patient>> {
        let pattern = format!(
            "%{}%",
            query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );
        let rows = sqlx::query_as::<_, Patient>(
            "SELECT * FROM patients
             WHERE created_by = $1
               AND (first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2)
             ORDER BY created_at DESC, id ASC",
        )
        .bind(created_by)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_active(&self, created_by: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM patients WHERE created_by = $1 AND active = TRUE",
        )
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl ConsultationRepository for PgStore {
    async fn insert(&self, consultation: Consultation) -> RecordsResult<Consultation> {
        sqlx::query(
            "INSERT INTO consultations (
                id, patient_id, consultation_date, reason_for_visit, symptoms,
                physical_examination, diagnosis, treatment, prescriptions, notes,
                vital_signs, follow_up_instructions, next_appointment, status,
                created_at, updated_at, created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18)",
        )
        .bind(consultation.id)
        .bind(consultation.patient_id)
        .bind(consultation.consultation_date)
        .bind(&consultation.reason_for_visit)
        .bind(&consultation.symptoms)
        .bind(&consultation.physical_examination)
        .bind(&consultation.diagnosis)
        .bind(&consultation.treatment)
        .bind(&consultation.prescriptions)
        .bind(&consultation.notes)
        .bind(&consultation.vital_signs)
        .bind(&consultation.follow_up_instructions)
        .bind(consultation.next_appointment)
        .bind(consultation.status)
        .bind(consultation.created_at)
        .bind(consultation.updated_at)
        .bind(consultation.created_by)
        .bind(consultation.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(consultation)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<Consultation>> {
        let row = sqlx::query_as::<_, Consultation>(
            "SELECT * FROM consultations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, consultation: Consultation) -> RecordsResult<Consultation> {
        sqlx::query(
            "UPDATE consultations SET
                consultation_date = $2, reason_for_visit = $3, symptoms = $4,
                physical_examination = $5, diagnosis = $6, treatment = $7,
                prescriptions = $8, notes = $9, vital_signs = $10,
                follow_up_instructions = $11, next_appointment = $12, status = $13,
                updated_at = $14, updated_by = $15
            WHERE id = $1",
        )
        .bind(consultation.id)
        .bind(consultation.consultation_date)
        .bind(&consultation.reason_for_visit)
        .bind(&consultation.symptoms)
        .bind(&consultation.physical_examination)
        .bind(&consultation.diagnosis)
        .bind(&consultation.treatment)
        .bind(&consultation.prescriptions)
        .bind(&consultation.notes)
        .bind(&consultation.vital_signs)
        .bind(&consultation.follow_up_instructions)
        .bind(consultation.next_appointment)
        .bind(consultation.status)
        .bind(consultation.updated_at)
        .bind(consultation.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(consultation)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM consultations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<Consultation>> {
        let rows = sqlx::query_as::<_, Consultation>(
            "SELECT * FROM consultations WHERE patient_id = $1
             ORDER BY consultation_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_patient_and_status(
        &self,
        patient_id: Uuid,
        status: ConsultationStatus,
    ) -> RecordsResult<Vec<Consultation>> {
        let rows = sqlx::query_as::<_, Consultation>(
            "SELECT * FROM consultations WHERE patient_id = $1 AND status = $2
             ORDER BY consultation_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn latest_for_patient(&self, patient_id: Uuid) -> RecordsResult<Option<Consultation>> {
        let row = sqlx::query_as::<_, Consultation>(
            "SELECT * FROM consultations WHERE patient_id = $1
             ORDER BY consultation_date DESC, id ASC LIMIT 1",
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<Consultation>> {
        let rows = sqlx::query_as::<_, Consultation>(
            "SELECT * FROM consultations
             WHERE patient_id = $1 AND consultation_date BETWEEN $2 AND $3
             ORDER BY consultation_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM consultations WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl TreatmentRepository for PgStore {
    async fn insert(&self, treatment: Treatment) -> RecordsResult<Treatment> {
        sqlx::query(
            "INSERT INTO treatments (
                id, patient_id, medication_name, dosage, frequency,
                route_of_administration, start_date, end_date, duration_days,
                status, indication, side_effects, prescriber_name, notes,
                created_at, updated_at, created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18)",
        )
        .bind(treatment.id)
        .bind(treatment.patient_id)
        .bind(&treatment.medication_name)
        .bind(&treatment.dosage)
        .bind(&treatment.frequency)
        .bind(&treatment.route_of_administration)
        .bind(treatment.start_date)
        .bind(treatment.end_date)
        .bind(treatment.duration_days)
        .bind(treatment.status)
        .bind(&treatment.indication)
        .bind(&treatment.side_effects)
        .bind(&treatment.prescriber_name)
        .bind(&treatment.notes)
        .bind(treatment.created_at)
        .bind(treatment.updated_at)
        .bind(treatment.created_by)
        .bind(treatment.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(treatment)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<Treatment>> {
        let row = sqlx::query_as::<_, Treatment>("SELECT * FROM treatments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, treatment: Treatment) -> RecordsResult<Treatment> {
        sqlx::query(
            "UPDATE treatments SET
                medication_name = $2, dosage = $3, frequency = $4,
                route_of_administration = $5, start_date = $6, end_date = $7,
                duration_days = $8, status = $9, indication = $10,
                side_effects = $11, prescriber_name = $12, notes = $13,
                updated_at = $14, updated_by = $15
            WHERE id = $1",
        )
        .bind(treatment.id)
        .bind(&treatment.medication_name)
        .bind(&treatment.dosage)
        .bind(&treatment.frequency)
        .bind(&treatment.route_of_administration)
        .bind(treatment.start_date)
        .bind(treatment.end_date)
        .bind(treatment.duration_days)
        .bind(treatment.status)
        .bind(&treatment.indication)
        .bind(&treatment.side_effects)
        .bind(&treatment.prescriber_name)
        .bind(&treatment.notes)
        .bind(treatment.updated_at)
        .bind(treatment.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(treatment)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM treatments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<Treatment>> {
        let rows = sqlx::query_as::<_, Treatment>(
            "SELECT * FROM treatments WHERE patient_id = $1
             ORDER BY start_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_active(&self, patient_id: Uuid) -> RecordsResult<Vec<Treatment>> {
        let rows = sqlx::query_as::<_, Treatment>(
            "SELECT * FROM treatments WHERE patient_id = $1 AND status = $2
             ORDER BY start_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(crate::entities::TreatmentStatus::Active)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<Treatment>> {
        let rows = sqlx::query_as::<_, Treatment>(
            "SELECT * FROM treatments
             WHERE patient_id = $1 AND start_date BETWEEN $2 AND $3
             ORDER BY start_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM treatments WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl VitalSignsRepository for PgStore {
    async fn insert(&self, vitals: VitalSigns) -> RecordsResult<VitalSigns> {
        sqlx::query(
            "INSERT INTO vital_signs (
                id, patient_id, measurement_date, systolic_bp, diastolic_bp,
                heart_rate, temperature, weight, height, bmi, respiratory_rate,
                oxygen_saturation, blood_glucose, notes, created_at, updated_at,
                created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18)",
        )
        .bind(vitals.id)
        .bind(vitals.patient_id)
        .bind(vitals.measurement_date)
        .bind(vitals.systolic_bp)
        .bind(vitals.diastolic_bp)
        .bind(vitals.heart_rate)
        .bind(vitals.temperature)
        .bind(vitals.weight)
        .bind(vitals.height)
        .bind(vitals.bmi)
        .bind(vitals.respiratory_rate)
        .bind(vitals.oxygen_saturation)
        .bind(vitals.blood_glucose)
        .bind(&vitals.notes)
        .bind(vitals.created_at)
        .bind(vitals.updated_at)
        .bind(vitals.created_by)
        .bind(vitals.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(vitals)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<VitalSigns>> {
        let row = sqlx::query_as::<_, VitalSigns>("SELECT * FROM vital_signs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, vitals: VitalSigns) -> RecordsResult<VitalSigns> {
        sqlx::query(
            "UPDATE vital_signs SET
                measurement_date = $2, systolic_bp = $3, diastolic_bp = $4,
                heart_rate = $5, temperature = $6, weight = $7, height = $8,
                bmi = $9, respiratory_rate = $10, oxygen_saturation = $11,
                blood_glucose = $12, notes = $13, updated_at = $14, updated_by = $15
            WHERE id = $1",
        )
        .bind(vitals.id)
        .bind(vitals.measurement_date)
        .bind(vitals.systolic_bp)
        .bind(vitals.diastolic_bp)
        .bind(vitals.heart_rate)
        .bind(vitals.temperature)
        .bind(vitals.weight)
        .bind(vitals.height)
        .bind(vitals.bmi)
        .bind(vitals.respiratory_rate)
        .bind(vitals.oxygen_saturation)
        .bind(vitals.blood_glucose)
        .bind(&vitals.notes)
        .bind(vitals.updated_at)
        .bind(vitals.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(vitals)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM vital_signs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<VitalSigns>> {
        let rows = sqlx::query_as::<_, VitalSigns>(
            "SELECT * FROM vital_signs WHERE patient_id = $1
             ORDER BY measurement_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn latest_for_patient(&self, patient_id: Uuid) -> RecordsResult<Option<VitalSigns>> {
        let row = sqlx::query_as::<_, VitalSigns>(
            "SELECT * FROM vital_signs WHERE patient_id = $1
             ORDER BY measurement_date DESC, id ASC LIMIT 1",
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<VitalSigns>> {
        let rows = sqlx::query_as::<_, VitalSigns>(
            "SELECT * FROM vital_signs
             WHERE patient_id = $1 AND measurement_date BETWEEN $2 AND $3
             ORDER BY measurement_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vital_signs WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl MedicalAnalysisRepository for PgStore {
    async fn insert(&self, analysis: MedicalAnalysis) -> RecordsResult<MedicalAnalysis> {
        sqlx::query(
            "INSERT INTO medical_analyses (
                id, patient_id, analysis_type, analysis_date, file_name, ocr_text,
                results, interpretation, alerts_and_anomalies, recommendations,
                performed_by, interpreted_by, status, notes, created_at,
                updated_at, created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18)",
        )
        .bind(analysis.id)
        .bind(analysis.patient_id)
        .bind(&analysis.analysis_type)
        .bind(analysis.analysis_date)
        .bind(&analysis.file_name)
        .bind(&analysis.ocr_text)
        .bind(&analysis.results)
        .bind(&analysis.interpretation)
        .bind(&analysis.alerts_and_anomalies)
        .bind(&analysis.recommendations)
        .bind(&analysis.performed_by)
        .bind(&analysis.interpreted_by)
        .bind(&analysis.status)
        .bind(&analysis.notes)
        .bind(analysis.created_at)
        .bind(analysis.updated_at)
        .bind(analysis.created_by)
        .bind(analysis.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(analysis)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalAnalysis>> {
        let row = sqlx::query_as::<_, MedicalAnalysis>(
            "SELECT * FROM medical_analyses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, analysis: MedicalAnalysis) -> RecordsResult<MedicalAnalysis> {
        sqlx::query(
            "UPDATE medical_analyses SET
                analysis_type = $2, analysis_date = $3, file_name = $4,
                ocr_text = $5, results = $6, interpretation = $7,
                alerts_and_anomalies = $8, recommendations = $9, performed_by = $10,
                interpreted_by = $11, status = $12, notes = $13, updated_at = $14,
                updated_by = $15
            WHERE id = $1",
        )
        .bind(analysis.id)
        .bind(&analysis.analysis_type)
        .bind(analysis.analysis_date)
        .bind(&analysis.file_name)
        .bind(&analysis.ocr_text)
        .bind(&analysis.results)
        .bind(&analysis.interpretation)
        .bind(&analysis.alerts_and_anomalies)
        .bind(&analysis.recommendations)
        .bind(&analysis.performed_by)
        .bind(&analysis.interpreted_by)
        .bind(&analysis.status)
        .bind(&analysis.notes)
        .bind(analysis.updated_at)
        .bind(analysis.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(analysis)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM medical_analyses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAnalysis>> {
        let rows = sqlx::query_as::<_, MedicalAnalysis>(
            "SELECT * FROM medical_analyses WHERE patient_id = $1
             ORDER BY analysis_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_with_alerts(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAnalysis>> {
        let rows = sqlx::query_as::<_, MedicalAnalysis>(
            "SELECT * FROM medical_analyses
             WHERE patient_id = $1
               AND alerts_and_anomalies IS NOT NULL
               AND TRIM(alerts_and_anomalies) <> ''
             ORDER BY analysis_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RecordsResult<Vec<MedicalAnalysis>> {
        let rows = sqlx::query_as::<_, MedicalAnalysis>(
            "SELECT * FROM medical_analyses
             WHERE patient_id = $1 AND analysis_date BETWEEN $2 AND $3
             ORDER BY analysis_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM medical_analyses WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl CardiovascularExamRepository for PgStore {
    async fn insert(&self, exam: CardiovascularExam) -> RecordsResult<CardiovascularExam> {
        sqlx::query(
            "INSERT INTO cardiovascular_exams (
                id, patient_id, exam_type, exam_date, results, interpretation,
                measured_values, abnormalities, pdf_file, notes, status,
                created_at, updated_at, created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15)",
        )
        .bind(exam.id)
        .bind(exam.patient_id)
        .bind(&exam.exam_type)
        .bind(exam.exam_date)
        .bind(&exam.results)
        .bind(&exam.interpretation)
        .bind(&exam.measured_values)
        .bind(&exam.abnormalities)
        .bind(&exam.pdf_file)
        .bind(&exam.notes)
        .bind(&exam.status)
        .bind(exam.created_at)
        .bind(exam.updated_at)
        .bind(exam.created_by)
        .bind(exam.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(exam)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<CardiovascularExam>> {
        let row = sqlx::query_as::<_, CardiovascularExam>(
            "SELECT * FROM cardiovascular_exams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, exam: CardiovascularExam) -> RecordsResult<CardiovascularExam> {
        sqlx::query(
            "UPDATE cardiovascular_exams SET
                exam_type = $2, exam_date = $3, results = $4, interpretation = $5,
                measured_values = $6, abnormalities = $7, pdf_file = $8,
                notes = $9, status = $10, updated_at = $11, updated_by = $12
            WHERE id = $1",
        )
        .bind(exam.id)
        .bind(&exam.exam_type)
        .bind(exam.exam_date)
        .bind(&exam.results)
        .bind(&exam.interpretation)
        .bind(&exam.measured_values)
        .bind(&exam.abnormalities)
        .bind(&exam.pdf_file)
        .bind(&exam.notes)
        .bind(&exam.status)
        .bind(exam.updated_at)
        .bind(exam.updated_by)
        .execute(&self.pool)
        .await?;
        Ok(exam)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM cardiovascular_exams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<CardiovascularExam>> {
        let rows = sqlx::query_as::<_, CardiovascularExam>(
            "SELECT * FROM cardiovascular_exams WHERE patient_id = $1
             ORDER BY exam_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_type(
        &self,
        patient_id: Uuid,
        exam_type: &str,
    ) -> RecordsResult<Vec<CardiovascularExam>> {
        let rows = sqlx::query_as::<_, CardiovascularExam>(
            "SELECT * FROM cardiovascular_exams
             WHERE patient_id = $1 AND UPPER(exam_type) = UPPER($2)
             ORDER BY exam_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(exam_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_with_abnormalities(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Vec<CardiovascularExam>> {
        let rows = sqlx::query_as::<_, CardiovascularExam>(
            "SELECT * FROM cardiovascular_exams
             WHERE patient_id = $1
               AND abnormalities IS NOT NULL
               AND TRIM(abnormalities) <> ''
             ORDER BY exam_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn latest_for_patient(
        &self,
        patient_id: Uuid,
    ) -> RecordsResult<Option<CardiovascularExam>> {
        let row = sqlx::query_as::<_, CardiovascularExam>(
            "SELECT * FROM cardiovascular_exams WHERE patient_id = $1
             ORDER BY exam_date DESC, id ASC LIMIT 1",
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_date_range(
        &self,
        patient_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RecordsResult<Vec<CardiovascularExam>> {
        let rows = sqlx::query_as::<_, CardiovascularExam>(
            "SELECT * FROM cardiovascular_exams
             WHERE patient_id = $1 AND exam_date BETWEEN $2 AND $3
             ORDER BY exam_date DESC, id ASC",
        )
        .bind(patient_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM cardiovascular_exams WHERE patient_id = $1",
        )
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl MedicalAlertRepository for PgStore {
    async fn insert(&self, alert: MedicalAlert) -> RecordsResult<MedicalAlert> {
        sqlx::query(
            "INSERT INTO medical_alerts (
                id, patient_id, alert_type, severity_level, description,
                required_action, status, resolution_date, resolved_by,
                created_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(alert.id)
        .bind(alert.patient_id)
        .bind(&alert.alert_type)
        .bind(alert.severity_level)
        .bind(&alert.description)
        .bind(&alert.required_action)
        .bind(alert.status)
        .bind(alert.resolution_date)
        .bind(alert.resolved_by)
        .bind(alert.created_by)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(alert)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalAlert>> {
        let row = sqlx::query_as::<_, MedicalAlert>(
            "SELECT * FROM medical_alerts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM medical_alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalAlert>> {
        let rows = sqlx::query_as::<_, MedicalAlert>(
            "SELECT * FROM medical_alerts WHERE patient_id = $1
             ORDER BY created_at DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<Vec<MedicalAlert>> {
        let rows = sqlx::query_as::<_, MedicalAlert>(
            "SELECT * FROM medical_alerts WHERE patient_id = $1 AND status = $2
             ORDER BY created_at DESC, id ASC",
        )
        .bind(patient_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_severity(
        &self,
        patient_id: Uuid,
        severity: AlertSeverity,
    ) -> RecordsResult<Vec<MedicalAlert>> {
        let rows = sqlx::query_as::<_, MedicalAlert>(
            "SELECT * FROM medical_alerts
             WHERE patient_id = $1 AND severity_level = $2
             ORDER BY created_at DESC, id ASC",
        )
        .bind(patient_id)
        .bind(severity)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_status(
        &self,
        patient_id: Uuid,
        status: AlertStatus,
    ) -> RecordsResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM medical_alerts WHERE patient_id = $1 AND status = $2",
        )
        .bind(patient_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn mark_resolved(
        &self,
        id: Uuid,
        resolved_by: Uuid,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<MedicalAlert>> {
        let mut tx = self.pool.begin().await?;
        let alert = sqlx::query_as::<_, MedicalAlert>(
            "SELECT * FROM medical_alerts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(mut alert) = alert else {
            return Ok(None);
        };
        alert.resolve(resolved_by, now)?;
        sqlx::query(
            "UPDATE medical_alerts SET status = $2, resolution_date = $3,
                resolved_by = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(alert.id)
        .bind(alert.status)
        .bind(alert.resolution_date)
        .bind(alert.resolved_by)
        .bind(alert.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(alert))
    }

    async fn mark_dismissed(
        &self,
        id: Uuid,
        dismissed_by: Uuid,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<MedicalAlert>> {
        let mut tx = self.pool.begin().await?;
        let alert = sqlx::query_as::<_, MedicalAlert>(
            "SELECT * FROM medical_alerts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(mut alert) = alert else {
            return Ok(None);
        };
        alert.dismiss(dismissed_by, now)?;
        sqlx::query(
            "UPDATE medical_alerts SET status = $2, resolved_by = $3, updated_at = $4
             WHERE id = $1",
        )
        .bind(alert.id)
        .bind(alert.status)
        .bind(alert.resolved_by)
        .bind(alert.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(alert))
    }
}

#[async_trait]
impl ChatConversationRepository for PgStore {
    async fn insert(&self, conversation: ChatConversation) -> RecordsResult<ChatConversation> {
        sqlx::query(
            "INSERT INTO chat_conversations (
                id, patient_id, session_id, title, messages, message_count,
                started_at, last_message_at, status, tags, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(conversation.id)
        .bind(conversation.patient_id)
        .bind(&conversation.session_id)
        .bind(&conversation.title)
        .bind(&conversation.messages)
        .bind(conversation.message_count)
        .bind(conversation.started_at)
        .bind(conversation.last_message_at)
        .bind(conversation.status)
        .bind(&conversation.tags)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(conversation)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<ChatConversation>> {
        let row = sqlx::query_as::<_, ChatConversation>(
            "SELECT * FROM chat_conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_session(&self, session_id: &str) -> RecordsResult<Option<ChatConversation>> {
        let row = sqlx::query_as::<_, ChatConversation>(
            "SELECT * FROM chat_conversations WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn session_exists(&self, session_id: &str) -> RecordsResult<bool> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM chat_conversations WHERE session_id = $1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    async fn update(&self, conversation: ChatConversation) -> RecordsResult<ChatConversation> {
        sqlx::query(
            "UPDATE chat_conversations SET
                title = $2, messages = $3, message_count = $4, started_at = $5,
                last_message_at = $6, status = $7, tags = $8, updated_at = $9
            WHERE id = $1",
        )
        .bind(conversation.id)
        .bind(&conversation.title)
        .bind(&conversation.messages)
        .bind(conversation.message_count)
        .bind(conversation.started_at)
        .bind(conversation.last_message_at)
        .bind(conversation.status)
        .bind(&conversation.tags)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn append_message(
        &self,
        id: Uuid,
        role: MessageRole,
        content: &str,
        now: DateTime<Utc>,
    ) -> RecordsResult<Option<ChatConversation>> {
        let mut tx = self.pool.begin().await?;
        let conversation = sqlx::query_as::<_, ChatConversation>(
            "SELECT * FROM chat_conversations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(mut conversation) = conversation else {
            return Ok(None);
        };
        conversation.apply_message(role, content, now)?;
        sqlx::query(
            "UPDATE chat_conversations SET
                title = $2, messages = $3, message_count = $4,
                last_message_at = $5, updated_at = $6
             WHERE id = $1",
        )
        .bind(conversation.id)
        .bind(&conversation.title)
        .bind(&conversation.messages)
        .bind(conversation.message_count)
        .bind(conversation.last_message_at)
        .bind(conversation.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(conversation))
    }

    async fn delete(&self, id: Uuid) -> RecordsResult<bool> {
        let result = sqlx::query("DELETE FROM chat_conversations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<Vec<ChatConversation>> {
        let rows = sqlx::query_as::<_, ChatConversation>(
            "SELECT * FROM chat_conversations
             WHERE patient_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY last_message_at DESC, id ASC",
        )
        .bind(patient_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(
        &self,
        patient_id: Uuid,
        status: Option<ConversationStatus>,
    ) -> RecordsResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM chat_conversations
             WHERE patient_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
        )
        .bind(patient_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl MedicalHistoryRepository for PgStore {
    async fn insert(&self, history: MedicalHistory) -> RecordsResult<MedicalHistory> {
        sqlx::query(
            "INSERT INTO medical_histories (
                id, patient_id, diagnosis_date, diagnosis, symptoms, treatment,
                medications, notes, severity, resolved, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(history.id)
        .bind(history.patient_id)
        .bind(history.diagnosis_date)
        .bind(&history.diagnosis)
        .bind(&history.symptoms)
        .bind(&history.treatment)
        .bind(&history.medications)
        .bind(&history.notes)
        .bind(history.severity)
        .bind(history.resolved)
        .bind(history.created_at)
        .bind(history.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(history)
    }

    async fn find(&self, id: Uuid) -> RecordsResult<Option<MedicalHistory>> {
        let row = sqlx::query_as::<_, MedicalHistory>(
            "SELECT * FROM medical_histories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> RecordsResult<Vec<MedicalHistory>> {
        let rows = sqlx::query_as::<_, MedicalHistory>(
            "SELECT * FROM medical_histories WHERE patient_id = $1
             ORDER BY diagnosis_date DESC, id ASC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_patient(&self, patient_id: Uuid) -> RecordsResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM medical_histories WHERE patient_id = $1")
                .bind(patient_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
