use chrono::{DateTime, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("group_ids must contain at least one group")]
    NoTargetGroups,
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),
    #[error("Invalid publication status: {0}")]
    InvalidStatus(String),
    #[error("Invalid datetime for {field}: {value}")]
    InvalidDateTime { field: &'static str, value: String },
    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: u32 },
}

/// Kind of content a publication or tracking link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Job,
    News,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Job => "job",
            ContentKind::News => "news",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job" => Ok(ContentKind::Job),
            "news" => Ok(ContentKind::News),
            other => Err(ValidationError::InvalidContentType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationStatus {
    Pending,
    Sent,
    Failed,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Pending => "pending",
            PublicationStatus::Sent => "sent",
            PublicationStatus::Failed => "failed",
        }
    }
}

impl FromStr for PublicationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PublicationStatus::Pending),
            "sent" => Ok(PublicationStatus::Sent),
            "failed" => Ok(PublicationStatus::Failed),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// Offset pagination as requested by the client, already bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

pub fn validate_page(
    page: Option<u32>,
    per_page: Option<u32>,
) -> Result<PageRequest, ValidationError> {
    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(ValidationError::NotPositive("page"));
    }

    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
    if per_page == 0 {
        return Err(ValidationError::NotPositive("per_page"));
    }

    Ok(PageRequest {
        page,
        per_page: per_page.min(MAX_PER_PAGE),
    })
}

/// Presence check for a required text field. Empty strings count as missing.
pub fn require_text(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Accepts RFC 3339 timestamps as well as naive ISO 8601 date-times.
pub fn parse_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, ValidationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ValidationError::InvalidDateTime {
            field,
            value: value.to_string(),
        })
}

/// Tracking tokens are UUIDs; anything else cannot exist in storage.
pub fn is_valid_tracking_id(token: &str) -> bool {
    Uuid::parse_str(token).is_ok()
}
