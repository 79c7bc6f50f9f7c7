pub mod draft;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod models;
pub mod planner;
pub mod scene;
pub mod stores;
pub mod transform;
pub mod vertex;

pub use draft::{CommitTarget, EditPhase, GeometryDraftController, PendingCommit};
pub use error::{EditError, StoreError};
pub use geometry::{haversine_distance, Bounds, GeometryError, GeometryKind};
pub use memory::InMemoryBackend;
pub use models::{
    ComputeRouteRequest, Coordinate, CreateDroneRequest, CreateFieldRequest,
    CreateMissionRequest, Drone, DroneEnvelope, DroneList, DroneStatus, Field, FieldEnvelope,
    FieldList, Mission, MissionEnvelope, MissionList, MissionStatus, MissionType,
    PlanEnvelope, PlanPayload, Point, UpdateDroneRequest, UpdateFieldRequest,
    UpdateMissionRequest,
};
pub use scene::{
    FieldDraft, FitRequest, Frame, Layer, Loaded, MissionDraft, MissionPatch, Scene,
    FIT_PADDING_PX, MISSION_STARTED_STATUS,
};
pub use stores::{DroneStore, FieldStore, MissionStore, MissionUpdate, NewMission, PlannerService};
pub use transform::{fit_coordinates, fit_to_viewport, thumbnail_svg, Viewport};
pub use vertex::{Vertex, VertexMove};
