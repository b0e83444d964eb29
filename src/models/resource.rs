use chrono::NaiveDate;
use rocket::FromForm;
use schemars::JsonSchema;
use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};
use validator::Validate;

use crate::utils::error::{AppError, AppResult};

/// Collections proxied to the persistence API without extra shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Resource {
    Aircrafts,
    Simulators,
    MaintenanceLogs,
    Incidents,
    Snags,
    Students,
    Teachers,
    Payments,
}

impl Resource {
    pub fn collection_path(self) -> String {
        format!("/{}", self)
    }

    // Singular noun used in fallback error messages
    pub fn noun(self) -> &'static str {
        match self {
            Resource::Aircrafts => "aircraft",
            Resource::Simulators => "simulator",
            Resource::MaintenanceLogs => "maintenance log",
            Resource::Incidents => "incident",
            Resource::Snags => "snag",
            Resource::Students => "student",
            Resource::Teachers => "teacher",
            Resource::Payments => "payment",
        }
    }

    /// Writes to these collections are reserved for staff.
    pub fn is_administrative(self) -> bool {
        match self {
            Resource::Aircrafts
            | Resource::Simulators
            | Resource::Students
            | Resource::Teachers
            | Resource::Payments => true,
            Resource::MaintenanceLogs | Resource::Incidents | Resource::Snags => false,
        }
    }
}

// Query-string filters accepted by every list endpoint
#[derive(Debug, Clone, Default, FromForm, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    #[field(name = "startDate")]
    pub start_date: Option<String>,
    #[field(name = "endDate")]
    pub end_date: Option<String>,
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    /// Applied locally to the fetched rows, never forwarded.
    pub search: Option<String>,
}

impl ListQuery {
    /// Query pairs for the backend, always scoped to the caller's school.
    pub fn to_backend_query(&self, school_id: &str) -> AppResult<Vec<(String, String)>> {
        self.validate()?;

        let mut pairs = vec![("schoolId".to_string(), school_id.to_string())];

        if let Some(status) = non_blank(&self.status) {
            pairs.push(("status".to_string(), status.to_string()));
        }

        let start = parse_date(&self.start_date, "Invalid start date format")?;
        let end = parse_date(&self.end_date, "Invalid end date format")?;
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                return Err(AppError::BadRequest("endDate must not be before startDate".into()));
            }
        }
        if let Some(start) = start {
            pairs.push(("startDate".to_string(), start.to_string()));
        }
        if let Some(end) = end {
            pairs.push(("endDate".to_string(), end.to_string()));
        }

        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        Ok(pairs)
    }

    pub fn search_term(&self) -> Option<&str> {
        non_blank(&self.search)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &Option<String>, message: &str) -> AppResult<Option<NaiveDate>> {
    match non_blank(value) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(message.into())),
        None => Ok(None),
    }
}
