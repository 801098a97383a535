use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A timestamped set of vital-sign measurements.
///
/// `bmi` is derived, never client-supplied: it is recomputed on every insert
/// and update for which both weight and height are present.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct VitalSigns {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub measurement_date: DateTime<Utc>,
    pub systolic_bp: Option<i32>,
    pub diastolic_bp: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub blood_glucose: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
}

impl VitalSigns {
    /// Recompute `bmi = weight / (height/100)^2`, rounded to two decimals.
    /// Leaves any previously derived value in place when either measurement
    /// is missing.
    pub fn recompute_bmi(&mut self) {
        if let (Some(weight), Some(height)) = (self.weight, self.height) {
            if height > 0.0 {
                let metres = height / 100.0;
                self.bmi = Some((weight / (metres * metres) * 100.0).round() / 100.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> VitalSigns {
        VitalSigns {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            measurement_date: Utc::now(),
            systolic_bp: None,
            diastolic_bp: None,
            heart_rate: None,
            temperature: None,
            weight: None,
            height: None,
            bmi: None,
            respiratory_rate: None,
            oxygen_saturation: None,
            blood_glucose: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: Uuid::new_v4(),
            updated_by: None,
        }
    }

    #[test]
    fn bmi_rounds_to_two_decimals() {
        let mut vitals = sample();
        vitals.weight = Some(70.0);
        vitals.height = Some(175.0);
        vitals.recompute_bmi();
        assert_eq!(vitals.bmi, Some(22.86));
    }

    #[test]
    fn bmi_untouched_without_both_measurements() {
        let mut vitals = sample();
        vitals.weight = Some(70.0);
        vitals.recompute_bmi();
        assert_eq!(vitals.bmi, None);
    }
}
