use serde::{Deserialize, Serialize};

// --- Complaint lifecycle ---

/// Lifecycle status of a complaint. Intake always writes `Unprocessed`;
/// later transitions belong to the complaint-management side of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Unprocessed,
    InProgress,
    Answered,
    Completed,
}

impl ComplaintStatus {
    /// The string stored in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Unprocessed => "UNPROCESSED",
            ComplaintStatus::InProgress => "IN_PROGRESS",
            ComplaintStatus::Answered => "ANSWERED",
            ComplaintStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Agencies ---

/// Whether an agency is scoped to one administrative region or nationwide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyType {
    Regional,
    National,
}

impl AgencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyType::Regional => "REGIONAL",
            AgencyType::National => "NATIONAL",
        }
    }
}

impl std::fmt::Display for AgencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AgencyType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGIONAL" => Ok(AgencyType::Regional),
            "NATIONAL" => Ok(AgencyType::National),
            other => Err(anyhow::anyhow!("unknown agency type: {other}")),
        }
    }
}

/// A government agency as the directory hands it out. Read-only from the
/// intake side; lifecycle management lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub agency_no: i64,
    pub agency_name: String,
    /// None for nationally-scoped agencies.
    pub region_code: Option<String>,
    pub agency_type: AgencyType,
}

// --- Geometry ---

/// A point geometry with an explicit spatial reference id.
/// Ordinate order is (longitude, latitude): x before y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub srid: i32,
}

impl Point {
    pub fn new(x: f64, y: f64, srid: i32) -> Self {
        Self { x, y, srid }
    }

    /// EWKT literal, the form the storage layer persists.
    pub fn ewkt(&self) -> String {
        format!("SRID={};POINT({} {})", self.srid, self.x, self.y)
    }
}

/// A point feature derived from a complaint's reported location, not yet
/// tied to a complaint row (the id only exists after the complaint insert).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialFeature {
    pub feature_type: String,
    /// The literal address text that produced the geometry.
    pub addr_text: Option<String>,
    pub geom: Point,
}
