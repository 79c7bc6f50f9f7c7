//! Core data models for fields, drones, missions and plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A planar point, used once coordinates are projected into a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for Point {
    /// Longitude runs along x, latitude along y.
    fn from(coordinate: Coordinate) -> Self {
        Self {
            x: coordinate.longitude,
            y: coordinate.latitude,
        }
    }
}

// ========== FIELDS ==========

/// A farmed field and its boundary polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    pub culture: String,
    /// Boundary vertices, implicitly closed (last connects to first)
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
    pub created_by: String,
}

/// Request to create a new field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldRequest {
    pub name: String,
    pub culture: String,
    pub created_by: String,
    pub coordinates: Vec<Coordinate>,
}

/// Request to update an existing field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldRequest {
    pub name: String,
    pub culture: String,
    pub coordinates: Vec<Coordinate>,
}

// ========== DRONES ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    pub id: String,
    pub name: String,
    pub status: DroneStatus,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneStatus {
    /// Ready to be assigned
    #[default]
    #[serde(rename = "DRONE_STATUS_AVAILABLE")]
    Available,
    /// Flying a mission
    #[serde(rename = "DRONE_STATUS_IN_MISSION")]
    InMission,
    #[serde(rename = "DRONE_STATUS_CHARGING")]
    Charging,
    #[serde(rename = "DRONE_STATUS_MAINTENANCE")]
    Maintenance,
    /// Not reachable
    #[serde(rename = "DRONE_STATUS_OFFLINE")]
    Offline,
}

impl DroneStatus {
    pub const ALL: [DroneStatus; 5] = [
        DroneStatus::Available,
        DroneStatus::InMission,
        DroneStatus::Charging,
        DroneStatus::Maintenance,
        DroneStatus::Offline,
    ];

    /// Short display code, e.g. `AVAILABLE`.
    pub fn code(self) -> &'static str {
        match self {
            DroneStatus::Available => "AVAILABLE",
            DroneStatus::InMission => "IN_MISSION",
            DroneStatus::Charging => "CHARGING",
            DroneStatus::Maintenance => "MAINTENANCE",
            DroneStatus::Offline => "OFFLINE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DroneStatus::Available => "Available",
            DroneStatus::InMission => "In mission",
            DroneStatus::Charging => "Charging",
            DroneStatus::Maintenance => "Under maintenance",
            DroneStatus::Offline => "Offline",
        }
    }

    /// Parse a display code or full wire tag, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_uppercase();
        let code = value.strip_prefix("DRONE_STATUS_").unwrap_or(&value);
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDroneRequest {
    pub name: String,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDroneRequest {
    pub name: String,
    pub status: DroneStatus,
}

// ========== MISSIONS ==========

/// Lifecycle tag of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    #[serde(rename = "MISSION_STATUS_CREATED")]
    Created,
    #[serde(rename = "MISSION_STATUS_SCHEDULED")]
    Scheduled,
    #[serde(rename = "MISSION_STATUS_PENDING")]
    Pending,
    #[serde(rename = "MISSION_STATUS_RUNNING")]
    Running,
    #[serde(rename = "MISSION_STATUS_ANALYSE")]
    Analyse,
    #[serde(rename = "MISSION_STATUS_CANCELED")]
    Canceled,
    #[serde(rename = "MISSION_STATUS_WARNING")]
    Warning,
    #[serde(rename = "MISSION_STATUS_FAILED")]
    Failed,
    #[serde(rename = "MISSION_STATUS_SUCCESS")]
    Success,
}

impl MissionStatus {
    pub const ALL: [MissionStatus; 9] = [
        MissionStatus::Created,
        MissionStatus::Scheduled,
        MissionStatus::Pending,
        MissionStatus::Running,
        MissionStatus::Analyse,
        MissionStatus::Canceled,
        MissionStatus::Warning,
        MissionStatus::Failed,
        MissionStatus::Success,
    ];

    /// Statuses during which the route may still be edited.
    pub fn is_pre_execution(self) -> bool {
        matches!(self, MissionStatus::Created | MissionStatus::Scheduled)
    }

    /// Status assigned to a freshly created mission.
    pub fn initial(started_at: Option<DateTime<Utc>>) -> Self {
        if started_at.is_some() {
            MissionStatus::Scheduled
        } else {
            MissionStatus::Created
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            MissionStatus::Created => "CREATED",
            MissionStatus::Scheduled => "SCHEDULED",
            MissionStatus::Pending => "PENDING",
            MissionStatus::Running => "RUNNING",
            MissionStatus::Analyse => "ANALYSE",
            MissionStatus::Canceled => "CANCELED",
            MissionStatus::Warning => "WARNING",
            MissionStatus::Failed => "FAILED",
            MissionStatus::Success => "SUCCESS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MissionStatus::Created => "Created",
            MissionStatus::Scheduled => "Scheduled",
            MissionStatus::Pending => "Pending",
            MissionStatus::Running => "Running",
            MissionStatus::Analyse => "Analysis",
            MissionStatus::Canceled => "Canceled",
            MissionStatus::Warning => "Warning",
            MissionStatus::Failed => "Failed",
            MissionStatus::Success => "Completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_uppercase();
        let code = value.strip_prefix("MISSION_STATUS_").unwrap_or(&value);
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionType {
    /// Fly the field perimeter
    #[serde(rename = "MISSION_TYPE_PATROL")]
    Patrol,
    /// Sweep the field surface
    #[serde(rename = "MISSION_TYPE_RESEARCH")]
    Research,
}

impl MissionType {
    pub fn code(self) -> &'static str {
        match self {
            MissionType::Patrol => "PATROL",
            MissionType::Research => "RESEARCH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_uppercase();
        match value.strip_prefix("MISSION_TYPE_").unwrap_or(&value) {
            "PATROL" => Some(MissionType::Patrol),
            "RESEARCH" => Some(MissionType::Research),
            _ => None,
        }
    }
}

/// A drone mission over a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    pub status: MissionStatus,
    /// Weak reference to the surveyed field
    pub field_id: String,
    #[serde(default)]
    pub drone_id: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl Mission {
    pub fn is_route_editable(&self) -> bool {
        self.status.is_pre_execution()
    }
}

/// Route body embedded in mission create/update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPayload {
    #[serde(default)]
    pub coordinates: Vec<Coordinate>,
}

impl PlanPayload {
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self { coordinates }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMissionRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub field_id: String,
    #[serde(default)]
    pub drone_id: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub plan: PlanPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMissionRequest {
    pub name: String,
    pub status: MissionStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<String>,
    pub plan: PlanPayload,
}

/// Request body for the planner's route computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRouteRequest {
    pub mission_borders: Vec<Coordinate>,
    #[serde(rename = "type")]
    pub mission_type: MissionType,
}

// ========== WIRE ENVELOPES ==========
// Every service wraps its payload in a single-key object.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEnvelope {
    pub field: Field,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldList {
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneEnvelope {
    pub drone: Drone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneList {
    #[serde(default)]
    pub drones: Vec<Drone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionEnvelope {
    pub mission: Mission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionList {
    #[serde(default)]
    pub missions: Vec<Mission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEnvelope {
    pub plan: PlanPayload,
}
