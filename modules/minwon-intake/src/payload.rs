//! Intake payload types.
//!
//! The upstream clients send heterogeneous scalars (numbers arrive as JSON
//! numbers or as strings depending on which client produced them), so the
//! coordinate and agency-code fields coerce explicitly instead of trusting
//! the wire type.

use minwon_common::IntakeError;
use serde::{Deserialize, Serialize};

/// A value that may arrive as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// Coerce to a finite coordinate value.
    pub fn to_coordinate(&self) -> Result<f64, IntakeError> {
        let parsed = match self {
            ScalarValue::Number(n) => Some(*n),
            ScalarValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        parsed
            .filter(|v| v.is_finite())
            .ok_or_else(|| IntakeError::InvalidCoordinate {
                value: self.to_string(),
            })
    }

    /// Coerce to an integer agency id.
    pub fn to_agency_code(&self) -> Result<i64, IntakeError> {
        let parsed = match self {
            ScalarValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            ScalarValue::Number(_) => None,
            ScalarValue::Text(s) => s.trim().parse::<i64>().ok(),
        };
        parsed.ok_or_else(|| IntakeError::InvalidAgencyCode {
            value: self.to_string(),
        })
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Number(n) => write!(f, "{n}"),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<f64> for ScalarValue {
    fn from(n: f64) -> Self {
        ScalarValue::Number(n)
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Number(n as f64)
    }
}

/// Reported location. Coordinates are optional and only meaningful as a
/// pair; a lone latitude or longitude is ignored downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<ScalarValue>,
    #[serde(default)]
    pub lng: Option<ScalarValue>,
}

impl LocationPayload {
    /// Both coordinates, when both were supplied.
    pub fn coordinate_pair(&self) -> Option<(&ScalarValue, &ScalarValue)> {
        Some((self.lat.as_ref()?, self.lng.as_ref()?))
    }
}

/// One citizen complaint as submitted.
///
/// Field aliases cover the key spellings of the different clients
/// (`agencyCode` from the image flow, `agency_code` from the text flow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintPayload {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_public", alias = "isPublic")]
    pub is_public: bool,
    #[serde(default)]
    pub location: Option<LocationPayload>,
    /// Classifier-asserted agency id, as a number or numeric string.
    #[serde(default, alias = "agencyCode")]
    pub agency_code: Option<ScalarValue>,
    /// Classifier-asserted agency display name.
    #[serde(default, alias = "agencyName", alias = "agency")]
    pub agency_name: Option<String>,
    #[serde(default, alias = "imagePath")]
    pub image_path: Option<String>,
    /// Honored only by the seeding utilities; intake ignores it.
    #[serde(default)]
    pub status: Option<String>,
}

fn default_public() -> bool {
    true
}

impl Default for ComplaintPayload {
    fn default() -> Self {
        Self {
            category: None,
            title: String::new(),
            content: String::new(),
            is_public: true,
            location: None,
            agency_code: None,
            agency_name: None,
            image_path: None,
            status: None,
        }
    }
}

impl ComplaintPayload {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_location(mut self, location: LocationPayload) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_agency_code(mut self, code: impl Into<ScalarValue>) -> Self {
        self.agency_code = Some(code.into());
        self
    }

    pub fn with_agency_name(mut self, name: impl Into<String>) -> Self {
        self.agency_name = Some(name.into());
        self
    }

    /// Structural validation. Missing optionals are fine; an empty title
    /// or body is not.
    pub fn validate(&self) -> Result<(), IntakeError> {
        if self.title.trim().is_empty() {
            return Err(IntakeError::MissingField { field: "title" });
        }
        if self.content.trim().is_empty() {
            return Err(IntakeError::MissingField { field: "content" });
        }
        Ok(())
    }
}
