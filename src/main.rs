use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;

use arrow_markers::cli::{ArrowArgs, Cli, Command, MarkersArgs};
use arrow_markers::core::gizmo::{Gizmo, HeadlessGizmo, TransformMode};
use arrow_markers::core::input::{parse_script, InputEvent, InputScript};
use arrow_markers::mesh::arrow;
use arrow_markers::MarkerApp;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Arrow(args) => run_arrow(&args),
        Command::Markers(args) => run_markers(&args),
    }
}

fn run_arrow(args: &ArrowArgs) -> Result<()> {
    let params = args.params();
    let mesh = if args.strict {
        arrow::try_build(&params).context("invalid arrow parameters")?
    } else {
        arrow::build(&params)
    };

    if args.json {
        let json = serde_json::to_string_pretty(&mesh.export()).context("serializing mesh")?;
        println!("{json}");
        return Ok(());
    }

    let bounds = mesh.bounds();
    println!("slices:        {}", params.slices);
    println!("vertices:      {}", mesh.vertex_count());
    println!("faces:         {}", mesh.face_count());
    println!("bounds:        {:?} .. {:?}", bounds.min, bounds.max);
    println!("signed volume: {:.5}", mesh.signed_volume());
    Ok(())
}

fn run_markers(args: &MarkersArgs) -> Result<()> {
    let config = args.app_config();
    let mut app = MarkerApp::new(&config, HeadlessGizmo::new());

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => demo_script(&app),
    };
    log::info!("running {} scripted frames", script.len());

    for frame in script {
        app.queue_mut().extend(frame);
        let report = app.tick();
        println!("{}", serde_json::to_string(&report).context("serializing frame report")?);
    }
    Ok(())
}

fn load_script(path: &Path) -> Result<InputScript> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading input script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("parsing input script {}", path.display()))
}

/// Click the first markers in turn, nudge the last one in both gizmo
/// modes, then leave select mode
fn demo_script<G: Gizmo>(app: &MarkerApp<G>) -> InputScript {
    let mut script = Vec::new();

    for &group in app.markers().iter().take(3) {
        let Some(center) = app.scene().group_transform(group).map(|t| t.translation) else {
            continue;
        };
        if let Some(px) = app.world_to_pixel(center) {
            script.push(vec![InputEvent::Click { x: px.x, y: px.y }]);
        }
    }

    script.push(vec![InputEvent::DragSelected {
        delta: (Vec3::X * 0.5).to_array(),
    }]);
    script.push(vec![
        InputEvent::SetTransformMode {
            mode: TransformMode::Rotate,
        },
        InputEvent::DragSelected {
            delta: [0.0, 0.3, 0.0],
        },
    ]);
    script.push(vec![InputEvent::ToggleSelectMode]);
    script
}
