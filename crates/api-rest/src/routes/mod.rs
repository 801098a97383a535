//! Route modules, one per entity family plus the health probe.

use chrono::{DateTime, NaiveDate, Utc};
use medrec_core::time::{parse_date, parse_datetime};
use serde::Deserialize;

use crate::error::{bad_param, ApiError};

pub mod alerts;
pub mod cardiovascular_exams;
pub mod consultations;
pub mod conversations;
pub mod health;
pub mod medical_analyses;
pub mod patients;
pub mod treatments;
pub mod vital_signs;

/// Shared `startDate`/`endDate` query pair. Accepts ISO-local, the fixed
/// `yyyy-MM-dd HH:mm:ss` form, or a bare date.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DateRangeQuery {
    start_date: String,
    end_date: String,
}

impl DateRangeQuery {
    pub(crate) fn instants(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
        let start = parse_datetime(&self.start_date)
            .ok_or_else(|| bad_param("startDate", "invalid timestamp"))?;
        let end = parse_datetime(&self.end_date)
            .ok_or_else(|| bad_param("endDate", "invalid timestamp"))?;
        Ok((start, end))
    }

    pub(crate) fn dates(&self) -> Result<(NaiveDate, NaiveDate), ApiError> {
        let start =
            parse_date(&self.start_date).ok_or_else(|| bad_param("startDate", "invalid date"))?;
        let end = parse_date(&self.end_date).ok_or_else(|| bad_param("endDate", "invalid date"))?;
        Ok((start, end))
    }
}

#[derive(Deserialize)]
pub(crate) struct StatusQuery {
    #[serde(default)]
    status: Option<String>,
}

impl StatusQuery {
    pub(crate) fn parse<T: std::str::FromStr<Err = String>>(
        &self,
    ) -> Result<Option<T>, ApiError> {
        match self.status.as_deref() {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|e: String| bad_param("status", e)),
        }
    }
}
