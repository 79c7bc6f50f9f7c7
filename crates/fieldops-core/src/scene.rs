//! Composition of a field boundary, a mission route and their vertex handles
//! into one renderable scene.
//!
//! The scene owns one [`GeometryDraftController`] per geometry and wires each
//! to the collaborator that persists it. It also enforces the mission
//! editability gate: a route is only writable while its mission has not
//! started executing.

use chrono::{DateTime, Utc};

use crate::draft::{CommitTarget, EditPhase, GeometryDraftController};
use crate::error::{EditError, StoreError};
use crate::geometry::{Bounds, GeometryKind};
use crate::models::{Coordinate, Field, Mission, MissionStatus, MissionType};
use crate::stores::{FieldStore, MissionStore, MissionUpdate, NewMission, PlannerService};
use crate::vertex::Vertex;

/// Margin kept around the boundary when the map is refitted.
pub const FIT_PADDING_PX: u32 = 30;

/// Status code reported when a route is saved against a mission that already started.
pub const MISSION_STARTED_STATUS: u16 = 409;

const MISSION_VIEW_BOUNDARY: &str = "field boundaries are edited from the field view";

/// Outcome of loading a scene.
#[derive(Debug)]
pub enum Loaded<T> {
    Ready(T),
    /// Something the view depends on could not be loaded
    NotAvailable { reason: String },
}

impl<T> Loaded<T> {
    fn unavailable(what: &str, err: StoreError) -> Self {
        tracing::warn!(error = %err, "{} not available", what);
        Loaded::NotAvailable {
            reason: format!("{what} not available: {err}"),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Loaded::Ready(value) => Some(value),
            Loaded::NotAvailable { .. } => None,
        }
    }
}

/// Presentation directive: fit the map to `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRequest {
    pub bounds: Bounds,
    pub padding_px: u32,
}

/// One drawable geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub kind: GeometryKind,
    pub points: Vec<Coordinate>,
    pub interactive: bool,
}

/// Snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub boundary: Option<Layer>,
    pub route: Option<Layer>,
    pub boundary_vertices: Vec<Vertex>,
    pub route_vertices: Vec<Vertex>,
    pub fit: Option<FitRequest>,
}

/// Form values of a field that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDraft {
    pub name: String,
    pub culture: String,
}

/// Form values of a mission that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionDraft {
    pub name: String,
    pub mission_type: MissionType,
    pub field_id: String,
    pub drone_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Changes to a mission's non-geometry attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionPatch {
    pub name: Option<String>,
    pub status: Option<MissionStatus>,
    pub started_at: Option<DateTime<Utc>>,
}

pub struct Scene {
    field: Option<Field>,
    field_draft: Option<FieldDraft>,
    boundary: GeometryDraftController,
    mission: Option<Mission>,
    mission_draft: Option<MissionDraft>,
    route: Option<GeometryDraftController>,
    /// Boundary points the map was last fitted to
    fitted: Option<Vec<Coordinate>>,
}

impl Scene {
    fn base(field: Option<Field>, boundary: GeometryDraftController) -> Self {
        Self {
            field,
            field_draft: None,
            boundary,
            mission: None,
            mission_draft: None,
            route: None,
            fitted: None,
        }
    }

    /// Field view with an editable boundary.
    pub async fn open_field<S: FieldStore>(store: &S, field_id: &str) -> Loaded<Scene> {
        match store.get_field(field_id).await {
            Ok(field) => {
                let boundary =
                    GeometryDraftController::new(GeometryKind::Boundary, field.coordinates.clone());
                Loaded::Ready(Self::base(Some(field), boundary))
            }
            Err(err) => Loaded::unavailable("field", err),
        }
    }

    /// Empty boundary, already editing, for drawing a new field.
    pub fn new_field(draft: FieldDraft) -> Scene {
        let mut scene = Self::base(None, GeometryDraftController::drawing(GeometryKind::Boundary));
        scene.field_draft = Some(draft);
        scene
    }

    /// Mission view: read-only boundary plus the mission route, gated by status.
    pub async fn open_mission<S>(stores: &S, mission_id: &str) -> Loaded<Scene>
    where
        S: FieldStore + MissionStore + PlannerService,
    {
        let mission = match stores.get_mission(mission_id).await {
            Ok(mission) => mission,
            Err(err) => return Loaded::unavailable("mission", err),
        };
        let field = match stores.get_field(&mission.field_id).await {
            Ok(field) => field,
            Err(err) => return Loaded::unavailable("field", err),
        };
        let route = match stores.route_for_mission(&mission.id).await {
            Ok(route) => route,
            Err(err) => return Loaded::unavailable("plan", err),
        };

        let mut scene = Self::mission_base(field);
        scene.route = Some(GeometryDraftController::new(GeometryKind::Route, route));
        scene.mission = Some(mission);
        scene.apply_gate();
        Loaded::Ready(scene)
    }

    /// Planning view for a new mission: the planner's route, open for edits.
    pub async fn plan_mission<S>(stores: &S, draft: MissionDraft) -> Loaded<Scene>
    where
        S: FieldStore + PlannerService,
    {
        let field = match stores.get_field(&draft.field_id).await {
            Ok(field) => field,
            Err(err) => return Loaded::unavailable("field", err),
        };
        let route = match stores.compute_route(&field.coordinates, draft.mission_type).await {
            Ok(route) => route,
            Err(err) => return Loaded::unavailable("route plan", err),
        };

        let mut scene = Self::mission_base(field);
        let mut controller = GeometryDraftController::new(GeometryKind::Route, route);
        if let Err(err) = controller.begin_edit() {
            return Loaded::NotAvailable {
                reason: err.to_string(),
            };
        }
        scene.route = Some(controller);
        scene.mission_draft = Some(draft);
        Loaded::Ready(scene)
    }

    fn mission_base(field: Field) -> Self {
        let mut boundary =
            GeometryDraftController::new(GeometryKind::Boundary, field.coordinates.clone());
        boundary.lock(MISSION_VIEW_BOUNDARY);
        Self::base(Some(field), boundary)
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    pub fn mission(&self) -> Option<&Mission> {
        self.mission.as_ref()
    }

    pub fn boundary(&self) -> &GeometryDraftController {
        &self.boundary
    }

    pub fn boundary_mut(&mut self) -> &mut GeometryDraftController {
        &mut self.boundary
    }

    pub fn route(&self) -> Option<&GeometryDraftController> {
        self.route.as_ref()
    }

    pub fn route_mut(&mut self) -> Option<&mut GeometryDraftController> {
        self.route.as_mut()
    }

    fn route_or_err(&mut self, operation: &'static str) -> Result<&mut GeometryDraftController, EditError> {
        self.route.as_mut().ok_or(EditError::InvalidTransition {
            operation,
            phase: EditPhase::Viewing,
        })
    }

    pub fn begin_boundary_edit(&mut self) -> Result<&[Coordinate], EditError> {
        self.boundary.begin_edit()
    }

    pub fn move_boundary_vertex(
        &mut self,
        index: usize,
        position: Coordinate,
    ) -> Result<&[Coordinate], EditError> {
        self.boundary.move_vertex(index, position)
    }

    pub fn cancel_boundary(&mut self) -> Result<&[Coordinate], EditError> {
        self.boundary.cancel()
    }

    pub fn begin_route_edit(&mut self) -> Result<&[Coordinate], EditError> {
        self.route_or_err("edit route")?.begin_edit()
    }

    pub fn move_route_vertex(
        &mut self,
        index: usize,
        position: Coordinate,
    ) -> Result<&[Coordinate], EditError> {
        self.route_or_err("move route vertex")?.move_vertex(index, position)
    }

    pub fn cancel_route(&mut self) -> Result<&[Coordinate], EditError> {
        self.route_or_err("cancel route edit")?.cancel()
    }

    /// Persist the boundary draft: updates the field, or creates it when new.
    pub async fn commit_boundary<S: FieldStore>(&mut self, store: &S) -> Result<&Field, EditError> {
        let saved = match (&self.field, &self.field_draft) {
            (Some(field), _) => {
                let target = UpdateField {
                    store,
                    id: field.id.clone(),
                    name: field.name.clone(),
                    culture: field.culture.clone(),
                };
                self.boundary.commit(&target).await?
            }
            (None, Some(draft)) => {
                let target = CreateField {
                    store,
                    name: draft.name.clone(),
                    culture: draft.culture.clone(),
                };
                self.boundary.commit(&target).await?
            }
            (None, None) => return Err(self.boundary_missing()),
        };

        self.field_draft = None;
        Ok(&*self.field.insert(saved))
    }

    /// Persist the route draft: updates the mission plan, or creates the
    /// mission when planning a new one.
    pub async fn commit_route<S: MissionStore>(&mut self, store: &S) -> Result<&Mission, EditError> {
        let target = match (&self.mission, &self.mission_draft) {
            (Some(mission), _) => RouteTarget::Update {
                store,
                id: mission.id.clone(),
            },
            (None, Some(draft)) => RouteTarget::Create {
                store,
                mission: NewMission {
                    name: draft.name.clone(),
                    mission_type: draft.mission_type,
                    status: MissionStatus::initial(draft.started_at),
                    field_id: draft.field_id.clone(),
                    drone_id: draft.drone_id.clone(),
                    started_at: draft.started_at,
                    route: Vec::new(),
                },
            },
            (None, None) => return Err(self.boundary_missing()),
        };

        let result = self.route_or_err("commit route")?.commit(&target).await;
        let saved = match result {
            Ok(saved) => saved,
            Err(err) => return Err(self.refuse_if_started(store, err).await),
        };
        self.mission_draft = None;
        gate_route(self.route.as_mut(), &saved);
        Ok(&*self.mission.insert(saved))
    }

    /// Change name, status or start time; the committed route is sent along.
    pub async fn update_mission<S: MissionStore>(
        &mut self,
        store: &S,
        patch: MissionPatch,
    ) -> Result<&Mission, EditError> {
        let Some(id) = self.mission.as_ref().map(|m| m.id.clone()) else {
            return Err(EditError::InvalidTransition {
                operation: "update a mission that was never saved",
                phase: EditPhase::Viewing,
            });
        };
        // the cached copy may predate a status change made elsewhere
        let fresh = store.get_mission(&id).await?;
        if !fresh.is_route_editable() {
            let reason = started_reason(&fresh);
            gate_route(self.route.as_mut(), &fresh);
            self.mission = Some(fresh);
            return Err(EditError::ReadOnly { reason });
        }

        let route = self
            .route
            .as_ref()
            .map(|r| r.committed().to_vec())
            .unwrap_or_default();
        let mut update = MissionUpdate::from_mission(&fresh, route);
        if let Some(name) = patch.name {
            update.name = name;
        }
        if let Some(status) = patch.status {
            update.status = status;
        }
        if let Some(started_at) = patch.started_at {
            update.started_at = Some(started_at);
        }

        let saved = store.update_mission(&id, update).await?;
        tracing::info!(mission = %saved.id, status = ?saved.status, "mission updated");
        gate_route(self.route.as_mut(), &saved);
        Ok(&*self.mission.insert(saved))
    }

    /// A failed route commit against a mission that has since started locks
    /// the route and reports it read-only; other failures pass through.
    async fn refuse_if_started<S: MissionStore>(
        &mut self,
        store: &S,
        err: EditError,
    ) -> EditError {
        let Some(id) = self.mission.as_ref().map(|m| m.id.clone()) else {
            return err;
        };
        match store.get_mission(&id).await {
            Ok(fresh) if !fresh.is_route_editable() => {
                tracing::warn!(
                    mission = %id,
                    status = ?fresh.status,
                    "route commit refused, mission already started"
                );
                let reason = started_reason(&fresh);
                gate_route(self.route.as_mut(), &fresh);
                self.mission = Some(fresh);
                EditError::ReadOnly { reason }
            }
            _ => err,
        }
    }

    /// Re-fetch everything this scene shows and re-apply the editability gate.
    ///
    /// Open drafts survive unless the gate now locks their geometry. When a
    /// fetch fails every geometry is locked until a later reload succeeds.
    pub async fn reload<S>(&mut self, stores: &S) -> Result<(), StoreError>
    where
        S: FieldStore + MissionStore + PlannerService,
    {
        if let Err(err) = self.refetch(stores).await {
            tracing::warn!(error = %err, "reload failed, scene locked");
            let reason = format!("reload failed: {err}");
            if let Some(route) = self.route.as_mut() {
                route.lock(reason.clone());
            }
            self.boundary.lock(reason);
            return Err(err);
        }

        self.apply_gate();
        Ok(())
    }

    async fn refetch<S>(&mut self, stores: &S) -> Result<(), StoreError>
    where
        S: FieldStore + MissionStore + PlannerService,
    {
        if let Some(mission) = &self.mission {
            let mission = stores.get_mission(&mission.id).await?;
            let route = stores.route_for_mission(&mission.id).await?;
            if let Some(controller) = self.route.as_mut() {
                controller.refresh(route);
            }
            self.mission = Some(mission);
        }

        if let Some(field) = &self.field {
            let field = stores.get_field(&field.id).await?;
            self.boundary.refresh(field.coordinates.clone());
            self.field = Some(field);
        }
        Ok(())
    }

    fn apply_gate(&mut self) {
        if self.mission.is_none() && self.mission_draft.is_none() {
            self.boundary.unlock();
        } else {
            self.boundary.lock(MISSION_VIEW_BOUNDARY);
        }
        match &self.mission {
            Some(mission) => gate_route(self.route.as_mut(), mission),
            None => {
                if let Some(route) = self.route.as_mut() {
                    route.unlock();
                }
            }
        }
    }

    /// Build the renderable snapshot. Emits a fit request whenever the
    /// boundary points differ from the ones last fitted.
    pub fn frame(&mut self) -> Frame {
        let boundary_points = self.boundary.current().to_vec();
        let fit = if self.fitted.as_deref() != Some(boundary_points.as_slice()) {
            let request = Bounds::from_coordinates(&boundary_points).map(|bounds| FitRequest {
                bounds,
                padding_px: FIT_PADDING_PX,
            });
            self.fitted = Some(boundary_points.clone());
            request
        } else {
            None
        };

        let boundary = GeometryKind::Boundary
            .is_renderable(boundary_points.len())
            .then(|| Layer {
                kind: GeometryKind::Boundary,
                points: boundary_points,
                interactive: self.boundary.is_editing(),
            });

        let route = self.route.as_ref().and_then(|controller| {
            let points = controller.current();
            GeometryKind::Route.is_renderable(points.len()).then(|| Layer {
                kind: GeometryKind::Route,
                points: points.to_vec(),
                interactive: controller.is_editing(),
            })
        });

        Frame {
            boundary,
            route,
            boundary_vertices: self.boundary.vertices(),
            route_vertices: self.route.as_ref().map(|r| r.vertices()).unwrap_or_default(),
            fit,
        }
    }

    fn boundary_missing(&self) -> EditError {
        EditError::InvalidTransition {
            operation: "commit without a field or mission",
            phase: self.boundary.phase(),
        }
    }
}

/// Routes are writable only before the mission starts executing.
fn gate_route(route: Option<&mut GeometryDraftController>, mission: &Mission) {
    let Some(route) = route else {
        return;
    };
    if mission.is_route_editable() {
        route.unlock();
        return;
    }
    if !route.is_read_only() {
        tracing::info!(mission = %mission.id, status = ?mission.status, "route locked");
    }
    route.lock(started_reason(mission));
}

fn started_reason(mission: &Mission) -> String {
    format!("mission is {}", mission.status.label())
}

struct UpdateField<'a, S> {
    store: &'a S,
    id: String,
    name: String,
    culture: String,
}

impl<S: FieldStore> CommitTarget for UpdateField<'_, S> {
    type Output = Field;

    async fn persist(&self, coordinates: &[Coordinate]) -> Result<Field, StoreError> {
        self.store
            .update_field(&self.id, &self.name, &self.culture, coordinates)
            .await
    }
}

struct CreateField<'a, S> {
    store: &'a S,
    name: String,
    culture: String,
}

impl<S: FieldStore> CommitTarget for CreateField<'_, S> {
    type Output = Field;

    async fn persist(&self, coordinates: &[Coordinate]) -> Result<Field, StoreError> {
        self.store
            .create_field(&self.name, &self.culture, coordinates)
            .await
    }
}

enum RouteTarget<'a, S> {
    Update {
        store: &'a S,
        id: String,
    },
    Create {
        store: &'a S,
        mission: NewMission,
    },
}

impl<S: MissionStore> CommitTarget for RouteTarget<'_, S> {
    type Output = Mission;

    async fn persist(&self, coordinates: &[Coordinate]) -> Result<Mission, StoreError> {
        match self {
            RouteTarget::Update { store, id } => {
                // attributes come from the stored mission, never from the scene's copy
                let fresh = store.get_mission(id).await?;
                if !fresh.is_route_editable() {
                    return Err(StoreError::Rejected {
                        status: MISSION_STARTED_STATUS,
                        message: started_reason(&fresh),
                    });
                }
                let update = MissionUpdate::from_mission(&fresh, coordinates.to_vec());
                store.update_mission(id, update).await
            }
            RouteTarget::Create { store, mission } => {
                let mission = NewMission {
                    route: coordinates.to_vec(),
                    ..mission.clone()
                };
                store.create_mission(mission).await
            }
        }
    }
}
