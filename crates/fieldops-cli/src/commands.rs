//! Subcommand implementations. Each returns the text to print.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use fieldops_core::geometry::{route_length_m, Bounds};
use fieldops_core::models::{Drone, Field, Mission};
use fieldops_core::scene::{FieldDraft, Loaded, MissionDraft, MissionPatch, Scene};
use fieldops_core::stores::{DroneStore, FieldStore, MissionStore, PlannerService};
use fieldops_core::transform::{thumbnail_svg, Viewport};

use crate::args::{Command, DroneCommand, FieldCommand, MissionCommand};

/// Execute `command` on behalf of `user`.
pub async fn run<S>(command: Command, stores: &S, user: &str) -> Result<String>
where
    S: FieldStore + DroneStore + MissionStore + PlannerService,
{
    match command {
        Command::Fields(cmd) => fields(cmd, stores, user).await,
        Command::Missions(cmd) => missions(cmd, stores, user).await,
        Command::Drones(cmd) => drones(cmd, stores, user).await,
    }
}

fn ready<T>(loaded: Loaded<T>) -> Result<T> {
    match loaded {
        Loaded::Ready(value) => Ok(value),
        Loaded::NotAvailable { reason } => bail!(reason),
    }
}

// ========== FIELDS ==========

async fn fields<S: FieldStore>(cmd: FieldCommand, store: &S, user: &str) -> Result<String> {
    match cmd {
        FieldCommand::List => {
            let fields = store.list_fields(user).await.context("listing fields")?;
            let mut out = String::new();
            for field in &fields {
                writeln!(
                    out,
                    "{:<36}  {:<24}  {:<12}  {} pts",
                    field.id,
                    field.name,
                    field.culture,
                    field.coordinates.len()
                )?;
            }
            if fields.is_empty() {
                writeln!(out, "no fields for {user}")?;
            }
            Ok(out)
        }
        FieldCommand::Show { id } => {
            let field = store.get_field(&id).await.context("loading field")?;
            describe_field(&field)
        }
        FieldCommand::Thumbnail { id, width, height } => {
            let field = store.get_field(&id).await.context("loading field")?;
            Ok(thumbnail_svg(&field.coordinates, Viewport::new(width, height)))
        }
        FieldCommand::Create {
            name,
            culture,
            points,
        } => {
            let mut scene = Scene::new_field(FieldDraft { name, culture });
            for point in points {
                scene.boundary_mut().append_vertex(point)?;
            }
            let field = scene.commit_boundary(store).await?;
            Ok(format!("created field {}\n", field.id))
        }
        FieldCommand::MoveVertex {
            id,
            index,
            position,
        } => {
            let mut scene = ready(Scene::open_field(store, &id).await)?;
            scene.begin_boundary_edit()?;
            scene.move_boundary_vertex(index, position)?;
            let field = scene.commit_boundary(store).await?;
            Ok(format!(
                "moved vertex {index} of field {} to {:.6},{:.6}\n",
                field.id, position.latitude, position.longitude
            ))
        }
        FieldCommand::Delete { id } => {
            store.delete_field(&id).await.context("deleting field")?;
            Ok(format!("deleted field {id}\n"))
        }
    }
}

fn describe_field(field: &Field) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} ({})", field.name, field.id)?;
    writeln!(out, "culture:    {}", field.culture)?;
    writeln!(out, "created by: {}", field.created_by)?;
    if let Some(bounds) = Bounds::from_coordinates(&field.coordinates) {
        let center = bounds.center();
        writeln!(out, "center:     {:.6},{:.6}", center.latitude, center.longitude)?;
    }
    for (i, c) in field.coordinates.iter().enumerate() {
        writeln!(out, "  {i:>3}  {:.6},{:.6}", c.latitude, c.longitude)?;
    }
    Ok(out)
}

// ========== MISSIONS ==========

async fn missions<S>(cmd: MissionCommand, stores: &S, user: &str) -> Result<String>
where
    S: FieldStore + MissionStore + PlannerService,
{
    match cmd {
        MissionCommand::List => {
            let missions = stores.list_missions(user).await.context("listing missions")?;
            let mut out = String::new();
            for mission in &missions {
                writeln!(
                    out,
                    "{:<36}  {:<24}  {:<8}  {}",
                    mission.id,
                    mission.name,
                    mission.mission_type.code(),
                    mission.status.code()
                )?;
            }
            if missions.is_empty() {
                writeln!(out, "no missions for {user}")?;
            }
            Ok(out)
        }
        MissionCommand::Show { id } => {
            let scene = ready(Scene::open_mission(stores, &id).await)?;
            describe_mission(&scene)
        }
        MissionCommand::Plan {
            field,
            name,
            mission_type,
            drone,
            start,
        } => {
            let draft = MissionDraft {
                name,
                mission_type,
                field_id: field,
                drone_id: drone,
                started_at: start,
            };
            let mut scene = ready(Scene::plan_mission(stores, draft).await)?;
            let mission = scene.commit_route(stores).await?;
            Ok(format!(
                "created mission {} ({})\n",
                mission.id,
                mission.status.label()
            ))
        }
        MissionCommand::MoveWaypoint {
            id,
            index,
            position,
        } => {
            let mut scene = ready(Scene::open_mission(stores, &id).await)?;
            scene.begin_route_edit()?;
            scene.move_route_vertex(index, position)?;
            let mission = scene.commit_route(stores).await?;
            Ok(format!("moved waypoint {index} of mission {}\n", mission.id))
        }
        MissionCommand::SetStatus { id, status } => {
            let mut scene = ready(Scene::open_mission(stores, &id).await)?;
            let patch = MissionPatch {
                status: Some(status),
                ..MissionPatch::default()
            };
            let mission = scene.update_mission(stores, patch).await?;
            Ok(format!("mission {} is {}\n", mission.id, mission.status.label()))
        }
        MissionCommand::Delete { id } => {
            stores.delete_mission(&id).await.context("deleting mission")?;
            Ok(format!("deleted mission {id}\n"))
        }
    }
}

fn describe_mission(scene: &Scene) -> Result<String> {
    let (Some(mission), Some(route)) = (scene.mission(), scene.route()) else {
        bail!("mission not available");
    };
    let Mission {
        id,
        name,
        mission_type,
        status,
        field_id,
        drone_id,
        created_by,
        started_at,
        ..
    } = mission;

    let mut out = String::new();
    writeln!(out, "{name} ({id})")?;
    writeln!(out, "type:       {}", mission_type.code())?;
    writeln!(out, "status:     {}", status.label())?;
    writeln!(out, "field:      {field_id}")?;
    writeln!(out, "drone:      {}", drone_id.as_deref().unwrap_or("-"))?;
    writeln!(out, "created by: {created_by}")?;
    if let Some(started_at) = started_at {
        writeln!(out, "starts at:  {}", started_at.to_rfc3339())?;
    }
    let locked = route
        .read_only_reason()
        .map(|reason| format!(" (read-only: {reason})"))
        .unwrap_or_default();
    let route = route.committed();
    writeln!(
        out,
        "route:      {} waypoints, {:.0} m{locked}",
        route.len(),
        route_length_m(route),
    )?;
    Ok(out)
}

// ========== DRONES ==========

async fn drones<S: DroneStore>(cmd: DroneCommand, store: &S, user: &str) -> Result<String> {
    match cmd {
        DroneCommand::List => {
            let drones = store.list_drones(user).await.context("listing drones")?;
            let mut out = String::new();
            for drone in &drones {
                write_drone(&mut out, drone)?;
            }
            if drones.is_empty() {
                writeln!(out, "no drones for {user}")?;
            }
            Ok(out)
        }
        DroneCommand::Create { name } => {
            let drone = store.create_drone(&name).await.context("creating drone")?;
            Ok(format!("created drone {}\n", drone.id))
        }
        DroneCommand::Update { id, name, status } => {
            let current = store.get_drone(&id).await.context("loading drone")?;
            let drone = store
                .update_drone(
                    &id,
                    name.as_deref().unwrap_or(&current.name),
                    status.unwrap_or(current.status),
                )
                .await
                .context("updating drone")?;
            let mut out = String::new();
            write_drone(&mut out, &drone)?;
            Ok(out)
        }
        DroneCommand::Delete { id } => {
            store.delete_drone(&id).await.context("deleting drone")?;
            Ok(format!("deleted drone {id}\n"))
        }
    }
}

fn write_drone(out: &mut String, drone: &Drone) -> std::fmt::Result {
    writeln!(
        out,
        "{:<36}  {:<24}  {}",
        drone.id,
        drone.name,
        drone.status.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Cli;
    use clap::Parser;
    use fieldops_core::models::{Coordinate, MissionStatus};
    use fieldops_core::InMemoryBackend;

    async fn exec(backend: &InMemoryBackend, argv: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("fieldops").chain(argv.iter().copied()))?;
        run(cli.command, backend, backend.owner()).await
    }

    fn id_from(output: &str) -> String {
        output.split_whitespace().nth(2).unwrap_or_default().to_string()
    }

    const SQUARE: [&str; 8] = [
        "--point",
        "55.7500,37.6100",
        "--point",
        "55.7520,37.6100",
        "--point",
        "55.7520,37.6130",
        "--point",
        "55.7500,37.6130",
    ];

    async fn create_field(backend: &InMemoryBackend) -> String {
        let mut argv = vec!["fields", "create", "--name", "North", "--culture", "wheat"];
        argv.extend(SQUARE);
        id_from(&exec(backend, &argv).await.unwrap())
    }

    #[tokio::test]
    async fn field_lifecycle() {
        let backend = InMemoryBackend::new("tgromov");
        let id = create_field(&backend).await;

        let listed = exec(&backend, &["fields", "list"]).await.unwrap();
        assert!(listed.contains(&id));
        assert!(listed.contains("4 pts"));

        exec(&backend, &["fields", "move-vertex", &id, "1", "55.7525,37.6095"])
            .await
            .unwrap();
        let field = backend.get_field(&id).await.unwrap();
        assert_eq!(field.coordinates[1], Coordinate::new(55.7525, 37.6095));

        let svg = exec(&backend, &["fields", "thumbnail", &id]).await.unwrap();
        assert!(svg.starts_with("<svg"));

        let err = exec(&backend, &["fields", "move-vertex", &id, "9", "55.0,37.0"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[tokio::test]
    async fn two_point_field_is_refused_locally() {
        let backend = InMemoryBackend::new("tgromov");
        let err = exec(
            &backend,
            &[
                "fields", "create", "--name", "Line", "--culture", "wheat", "--point",
                "55.75,37.61", "--point", "55.76,37.61",
            ],
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid geometry"));
        assert!(backend.list_fields("tgromov").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn running_mission_refuses_waypoint_moves() {
        let backend = InMemoryBackend::new("tgromov");
        let field = create_field(&backend).await;

        let out = exec(
            &backend,
            &["missions", "plan", "--field", &field, "--name", "Sweep", "--type", "research"],
        )
        .await
        .unwrap();
        let mission = id_from(&out);
        assert_eq!(
            backend.get_mission(&mission).await.unwrap().status,
            MissionStatus::Created
        );

        exec(&backend, &["missions", "move-waypoint", &mission, "0", "55.7501,37.6101"])
            .await
            .unwrap();
        exec(&backend, &["missions", "set-status", &mission, "running"])
            .await
            .unwrap();

        let err = exec(&backend, &["missions", "move-waypoint", &mission, "0", "55.7502,37.6102"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("read-only"));
        let route = backend.route_for_mission(&mission).await.unwrap();
        assert_eq!(route[0], Coordinate::new(55.7501, 37.6101));

        let shown = exec(&backend, &["missions", "show", &mission]).await.unwrap();
        assert!(shown.contains("(read-only: mission is Running)"));
    }

    #[tokio::test]
    async fn drone_update_keeps_unspecified_fields() {
        let backend = InMemoryBackend::new("tgromov");
        let id = id_from(&exec(&backend, &["drones", "create", "Quad"]).await.unwrap());

        exec(&backend, &["drones", "update", &id, "--status", "charging"])
            .await
            .unwrap();
        let drone = backend.get_drone(&id).await.unwrap();
        assert_eq!(drone.name, "Quad");
        assert_eq!(drone.status, fieldops_core::DroneStatus::Charging);
    }

    #[tokio::test]
    async fn missing_mission_is_reported() {
        let backend = InMemoryBackend::new("tgromov");
        let err = exec(&backend, &["missions", "show", "nope"]).await.unwrap_err();
        assert!(err.to_string().contains("not available"));
    }
}
