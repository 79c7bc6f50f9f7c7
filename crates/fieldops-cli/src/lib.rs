//! FieldOps CLI - command line front end for the editing core.
//!
//! Every subcommand runs against any implementation of the store traits;
//! the `fieldops` binary wires them to the HTTP services.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};
pub use commands::run;
