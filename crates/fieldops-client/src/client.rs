//! reqwest-backed collaborators speaking the services' JSON contract.

use fieldops_core::models::{
    ComputeRouteRequest, Coordinate, CreateDroneRequest, CreateFieldRequest, Drone,
    DroneEnvelope, DroneList, DroneStatus, Field, FieldEnvelope, FieldList, Mission,
    MissionEnvelope, MissionList, MissionType, PlanEnvelope, UpdateDroneRequest,
    UpdateFieldRequest,
};
use fieldops_core::stores::{
    DroneStore, FieldStore, MissionStore, MissionUpdate, NewMission, PlannerService,
};
use fieldops_core::StoreError;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::Config;

/// Client for the field, drone, mission and planner services.
pub struct HttpBackend {
    config: Config,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: Config) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Login sent as `createdBy` / `updatedBy`.
    pub fn user(&self) -> &str {
        &self.config.user
    }

    /// Send `request`, mapping 404 to `NotFound { kind, id }` and any other
    /// non-success status to `Rejected`.
    async fn dispatch(
        &self,
        request: RequestBuilder,
        kind: &'static str,
        id: &str,
    ) -> Result<Response, StoreError> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(kind, id, error = %err, "request failed");
            StoreError::Transport(err.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(kind, id));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(kind, id, %status, "request rejected");
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        kind: &'static str,
        id: &str,
    ) -> Result<T, StoreError> {
        self.dispatch(request, kind, id)
            .await?
            .json::<T>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

/// Append path segments to a service base URL, percent-encoding each one.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base)
        .map_err(|err| StoreError::Transport(format!("invalid service url {base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Transport(format!("service url {base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl FieldStore for HttpBackend {
    async fn list_fields(&self, owner: &str) -> Result<Vec<Field>, StoreError> {
        let url = endpoint(&self.config.fields_url, &["authors", owner])?;
        let list: FieldList = self.fetch(self.client.get(url), "author", owner).await?;
        Ok(list.fields)
    }

    async fn get_field(&self, id: &str) -> Result<Field, StoreError> {
        let url = endpoint(&self.config.fields_url, &[id])?;
        let body: FieldEnvelope = self.fetch(self.client.get(url), "field", id).await?;
        Ok(body.field)
    }

    async fn create_field(
        &self,
        name: &str,
        culture: &str,
        coordinates: &[Coordinate],
    ) -> Result<Field, StoreError> {
        let request = CreateFieldRequest {
            name: name.to_string(),
            culture: culture.to_string(),
            created_by: self.config.user.clone(),
            coordinates: coordinates.to_vec(),
        };
        let builder = self.client.post(&self.config.fields_url).json(&request);
        let body: FieldEnvelope = self.fetch(builder, "field", name).await?;
        tracing::info!(field = %body.field.id, "field created");
        Ok(body.field)
    }

    async fn update_field(
        &self,
        id: &str,
        name: &str,
        culture: &str,
        coordinates: &[Coordinate],
    ) -> Result<Field, StoreError> {
        let request = UpdateFieldRequest {
            name: name.to_string(),
            culture: culture.to_string(),
            coordinates: coordinates.to_vec(),
        };
        let url = endpoint(&self.config.fields_url, &[id])?;
        let body: FieldEnvelope = self
            .fetch(self.client.put(url).json(&request), "field", id)
            .await?;
        tracing::info!(field = %id, points = coordinates.len(), "field updated");
        Ok(body.field)
    }

    async fn delete_field(&self, id: &str) -> Result<(), StoreError> {
        let url = endpoint(&self.config.fields_url, &[id])?;
        self.dispatch(self.client.delete(url), "field", id).await?;
        tracing::info!(field = %id, "field deleted");
        Ok(())
    }
}

impl DroneStore for HttpBackend {
    async fn list_drones(&self, owner: &str) -> Result<Vec<Drone>, StoreError> {
        let url = endpoint(&self.config.drones_url, &["authors", owner])?;
        let list: DroneList = self.fetch(self.client.get(url), "author", owner).await?;
        Ok(list.drones)
    }

    async fn get_drone(&self, id: &str) -> Result<Drone, StoreError> {
        let url = endpoint(&self.config.drones_url, &[id])?;
        let body: DroneEnvelope = self.fetch(self.client.get(url), "drone", id).await?;
        Ok(body.drone)
    }

    async fn create_drone(&self, name: &str) -> Result<Drone, StoreError> {
        let request = CreateDroneRequest {
            name: name.to_string(),
            created_by: self.config.user.clone(),
        };
        let builder = self.client.post(&self.config.drones_url).json(&request);
        let body: DroneEnvelope = self.fetch(builder, "drone", name).await?;
        tracing::info!(drone = %body.drone.id, "drone created");
        Ok(body.drone)
    }

    async fn update_drone(
        &self,
        id: &str,
        name: &str,
        status: DroneStatus,
    ) -> Result<Drone, StoreError> {
        let request = UpdateDroneRequest {
            name: name.to_string(),
            status,
        };
        let url = endpoint(&self.config.drones_url, &[id])?;
        let body: DroneEnvelope = self
            .fetch(self.client.put(url).json(&request), "drone", id)
            .await?;
        Ok(body.drone)
    }

    async fn delete_drone(&self, id: &str) -> Result<(), StoreError> {
        let url = endpoint(&self.config.drones_url, &[id])?;
        self.dispatch(self.client.delete(url), "drone", id).await?;
        Ok(())
    }
}

impl MissionStore for HttpBackend {
    async fn list_missions(&self, owner: &str) -> Result<Vec<Mission>, StoreError> {
        let url = endpoint(&self.config.missions_url, &["authors", owner])?;
        let list: MissionList = self.fetch(self.client.get(url), "author", owner).await?;
        Ok(list.missions)
    }

    async fn get_mission(&self, id: &str) -> Result<Mission, StoreError> {
        let url = endpoint(&self.config.missions_url, &[id])?;
        let body: MissionEnvelope = self.fetch(self.client.get(url), "mission", id).await?;
        Ok(body.mission)
    }

    async fn create_mission(&self, request: NewMission) -> Result<Mission, StoreError> {
        let field_id = request.field_id.clone();
        let request = request.into_request(self.config.user.clone());
        let builder = self.client.post(&self.config.missions_url).json(&request);
        // a 404 here means the referenced field is gone
        let body: MissionEnvelope = self.fetch(builder, "field", &field_id).await?;
        tracing::info!(mission = %body.mission.id, "mission created");
        Ok(body.mission)
    }

    async fn update_mission(
        &self,
        id: &str,
        update: MissionUpdate,
    ) -> Result<Mission, StoreError> {
        let points = update.route.len();
        let request = update.into_request(self.config.user.clone());
        let url = endpoint(&self.config.missions_url, &[id])?;
        let body: MissionEnvelope = self
            .fetch(self.client.put(url).json(&request), "mission", id)
            .await?;
        tracing::info!(mission = %id, points, "mission updated");
        Ok(body.mission)
    }

    async fn delete_mission(&self, id: &str) -> Result<(), StoreError> {
        let url = endpoint(&self.config.missions_url, &[id])?;
        self.dispatch(self.client.delete(url), "mission", id).await?;
        tracing::info!(mission = %id, "mission deleted");
        Ok(())
    }
}

impl PlannerService for HttpBackend {
    async fn compute_route(
        &self,
        boundary: &[Coordinate],
        mission_type: MissionType,
    ) -> Result<Vec<Coordinate>, StoreError> {
        let request = ComputeRouteRequest {
            mission_borders: boundary.to_vec(),
            mission_type,
        };
        let url = endpoint(&self.config.planner_url, &["mission"])?;
        let body: PlanEnvelope = self
            .fetch(self.client.post(url).json(&request), "planner", "mission")
            .await?;
        tracing::debug!(points = body.plan.coordinates.len(), "route computed");
        Ok(body.plan.coordinates)
    }

    async fn route_for_mission(&self, mission_id: &str) -> Result<Vec<Coordinate>, StoreError> {
        let url = endpoint(&self.config.planner_url, &["missions", mission_id])?;
        let body: PlanEnvelope = self.fetch(self.client.get(url), "plan", mission_id).await?;
        Ok(body.plan.coordinates)
    }
}
