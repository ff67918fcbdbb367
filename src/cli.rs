// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::AppConfig;
use crate::mesh::ArrowMeshParameters;
use crate::scene::marker::{DEFAULT_MARKER_COUNT, DEFAULT_SCATTER_RADIUS};

#[derive(Parser, Debug, Clone)]
#[command(name = "arrow-markers")]
#[command(about = "Procedural arrow meshes and pickable orientation markers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build one arrow mesh and print its statistics or geometry
    Arrow(ArrowArgs),
    /// Scatter markers and drive selection through scripted input frames
    Markers(MarkersArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ArrowArgs {
    #[arg(long, default_value_t = 20)]
    pub slices: u32,

    /// Fraction of the length taken by the shaft
    #[arg(long = "point-height", default_value_t = 0.85)]
    pub point_height: f32,

    /// Shaft radius as a fraction of the tip radius
    #[arg(long = "point-radius", default_value_t = 0.4)]
    pub point_radius: f32,

    /// Reject out-of-range parameters instead of building a possibly degenerate mesh
    #[arg(long, default_value = "false")]
    pub strict: bool,

    /// Print vertices, faces and normals as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl ArrowArgs {
    pub fn params(&self) -> ArrowMeshParameters {
        ArrowMeshParameters::new(self.slices, self.point_height, self.point_radius)
    }
}

#[derive(Args, Debug, Clone)]
pub struct MarkersArgs {
    #[arg(long, default_value_t = DEFAULT_MARKER_COUNT)]
    pub count: usize,

    /// Edge length of the cube markers are scattered in
    #[arg(long, default_value_t = DEFAULT_SCATTER_RADIUS)]
    pub radius: f32,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// JSON file holding a list of frames, each a list of input events
    #[arg(long)]
    pub script: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

impl MarkersArgs {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            marker_count: self.count,
            scatter_radius: self.radius,
            seed: self.seed,
            viewport: (self.width, self.height),
            ..AppConfig::default()
        }
    }
}
