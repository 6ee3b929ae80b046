//! Shared clap argument groups for the annotation tools.

pub mod common;

pub use common::{GeometryArg, RunArgs, SelectionArgs, StoreArgs};
