//! Command line definition.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use fieldops_core::models::{Coordinate, DroneStatus, MissionStatus, MissionType};

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit field boundaries and mission routes")]
pub struct Cli {
    #[command(flatten)]
    pub endpoints: Endpoints,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the `FIELDOPS_*` environment.
#[derive(Args, Debug, Default)]
pub struct Endpoints {
    #[arg(long, global = true)]
    pub fields_url: Option<String>,
    #[arg(long, global = true)]
    pub drones_url: Option<String>,
    #[arg(long, global = true)]
    pub missions_url: Option<String>,
    #[arg(long, global = true)]
    pub planner_url: Option<String>,
    /// Login used for listing and authoring records
    #[arg(long, global = true)]
    pub user: Option<String>,
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Field boundaries
    #[command(subcommand)]
    Fields(FieldCommand),
    /// Missions and their routes
    #[command(subcommand)]
    Missions(MissionCommand),
    #[command(subcommand)]
    Drones(DroneCommand),
}

#[derive(Subcommand, Debug)]
pub enum FieldCommand {
    List,
    Show {
        id: String,
    },
    /// Render the boundary as an SVG thumbnail
    Thumbnail {
        id: String,
        #[arg(long, default_value_t = 200.0)]
        width: f64,
        #[arg(long, default_value_t = 150.0)]
        height: f64,
    },
    /// Draw a new field, one `--point lat,lon` per vertex
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        culture: String,
        #[arg(long = "point", required = true, allow_hyphen_values = true, value_parser = parse_coordinate)]
        points: Vec<Coordinate>,
    },
    /// Drag one boundary vertex and save
    MoveVertex {
        id: String,
        index: usize,
        #[arg(allow_hyphen_values = true, value_parser = parse_coordinate)]
        position: Coordinate,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MissionCommand {
    List,
    Show {
        id: String,
    },
    /// Plan a route over a field and save it as a new mission
    Plan {
        #[arg(long)]
        field: String,
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_parser = parse_mission_type)]
        mission_type: MissionType,
        #[arg(long)]
        drone: Option<String>,
        /// Start time (RFC 3339); schedules the mission
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
    /// Drag one route waypoint and save; refused once the mission started
    MoveWaypoint {
        id: String,
        index: usize,
        #[arg(allow_hyphen_values = true, value_parser = parse_coordinate)]
        position: Coordinate,
    },
    SetStatus {
        id: String,
        #[arg(value_parser = parse_mission_status)]
        status: MissionStatus,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DroneCommand {
    List,
    Create {
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_drone_status)]
        status: Option<DroneStatus>,
    },
    Delete {
        id: String,
    },
}

/// `lat,lon`
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got `{value}`"))?;
    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("latitude `{lat}`: {e}"))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("longitude `{lon}`: {e}"))?;
    Ok(Coordinate::new(latitude, longitude))
}

fn parse_mission_type(value: &str) -> Result<MissionType, String> {
    MissionType::parse(value).ok_or_else(|| format!("unknown mission type `{value}`"))
}

fn parse_mission_status(value: &str) -> Result<MissionStatus, String> {
    MissionStatus::parse(value).ok_or_else(|| format!("unknown mission status `{value}`"))
}

fn parse_drone_status(value: &str) -> Result<DroneStatus, String> {
    DroneStatus::parse(value).ok_or_else(|| format!("unknown drone status `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_accept_negative_values() {
        assert_eq!(
            parse_coordinate("-33.68, -117.82").unwrap(),
            Coordinate::new(-33.68, -117.82)
        );
        assert!(parse_coordinate("55.75").is_err());
        assert!(parse_coordinate("north,37.6").is_err());
    }

    #[test]
    fn parses_nested_subcommands() {
        let cli = Cli::try_parse_from([
            "fieldops",
            "--user",
            "alice",
            "missions",
            "move-waypoint",
            "m1",
            "2",
            "-33.1,151.2",
        ])
        .unwrap();
        assert_eq!(cli.endpoints.user.as_deref(), Some("alice"));
        match cli.command {
            Command::Missions(MissionCommand::MoveWaypoint { id, index, position }) => {
                assert_eq!(id, "m1");
                assert_eq!(index, 2);
                assert_eq!(position, Coordinate::new(-33.1, 151.2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn field_create_collects_points() {
        let cli = Cli::try_parse_from([
            "fieldops", "fields", "create", "--name", "North", "--culture", "wheat", "--point",
            "55.75,37.61", "--point", "55.76,37.61", "--point", "55.76,37.62",
        ])
        .unwrap();
        let Command::Fields(FieldCommand::Create { points, .. }) = cli.command else {
            panic!("expected fields create");
        };
        assert_eq!(points.len(), 3);
    }
}
