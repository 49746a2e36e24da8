#![deny(unsafe_code)]
//! CLI binary for the luminar particle advection system.
//!
//! Subcommands:
//! - `render`: load up to two fields, run N frames, write a PNG snapshot
//! - `inspect <path>`: ingest a field and print its bounds and transform
//! - `list`: print palettes and the parameter schema
//!
//! Logging goes through `env_logger`; set `RUST_LOG=info` to see field loads.

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use luminar_core::ingest::{self, ParsedField};
use luminar_core::palette::catalog;
use luminar_core::{FlowParams, PaletteKey, VectorField};
use luminar_scene::{FieldSide, Scene};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "luminar", about = "2D vector field particle advection")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Advect particles through up to two fields and write a PNG snapshot.
    Render {
        /// Field A (left). CSV-like text, or JSON when the extension is `.json`.
        #[arg(long)]
        field_a: Option<PathBuf>,

        /// Field B (right).
        #[arg(long)]
        field_b: Option<PathBuf>,

        /// Image width in pixels.
        #[arg(short = 'W', long, default_value_t = 1280)]
        width: usize,

        /// Image height in pixels.
        #[arg(short = 'H', long, default_value_t = 720)]
        height: usize,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 240)]
        frames: usize,

        /// Simulated frame rate. Steps longer than 33 ms are clamped.
        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Palette for Field A, overriding `--params`.
        #[arg(long)]
        palette_a: Option<String>,

        /// Palette for Field B, overriding `--params`.
        #[arg(long)]
        palette_b: Option<String>,

        /// Output file path.
        #[arg(short, long, default_value = "luminar.png")]
        output: PathBuf,

        /// Flow parameters as a camelCase JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Ingest a field file and print its bounds, transform, and index stats.
    Inspect {
        /// Field file (CSV-like text, or `.json`).
        path: PathBuf,
    },
    /// List palettes and the parameter schema.
    List,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_field(path: &Path) -> Result<ParsedField, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    if is_json(path) {
        let rows = ingest::parse_json(&text)?;
        Ok(ParsedField {
            rows,
            ..ParsedField::default()
        })
    } else {
        Ok(ingest::parse_text(&text))
    }
}

fn load_into(scene: &mut Scene, side: FieldSide, path: &Path) -> Result<(), CliError> {
    let parsed = read_field(path)?;
    let status = scene.load_field(side, parsed.rows, &display_name(path));
    if !status.loaded {
        return Err(CliError::Input(format!("{}: {}", path.display(), status.label)));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let schema = FlowParams::schema();
            if cli.json {
                let palettes: Vec<_> = catalog()
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "key": p.key,
                            "label": p.label,
                            "rgb": p.rgb,
                            "hex": p.rgb.to_hex(),
                        })
                    })
                    .collect();
                let info = serde_json::json!({
                    "palettes": palettes,
                    "params": schema,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Palettes:");
                for p in catalog() {
                    println!("  {:<16} {:<16} {}", p.key.name(), p.label, p.rgb.to_hex());
                }
                println!("Parameters:");
                if let Some(options) = schema.as_object() {
                    for (key, spec) in options {
                        println!("  {key:<20} default {}", spec["default"]);
                    }
                }
            }
        }
        Command::Inspect { path } => {
            let parsed = read_field(&path)?;
            if parsed.is_empty() {
                return Err(CliError::Input(format!(
                    "{}: no usable rows",
                    path.display()
                )));
            }
            let skipped = parsed.skipped;
            let header = parsed.header;
            let field = VectorField::new(parsed.rows)?;
            let b = field.bounds();
            let t = field.transform();
            let index = field.index();

            if cli.json {
                let info = serde_json::json!({
                    "path": path.display().to_string(),
                    "vectors": field.len(),
                    "skipped": skipped,
                    "header": header,
                    "bounds": {
                        "minX": b.min_x,
                        "maxX": b.max_x,
                        "minY": b.min_y,
                        "maxY": b.max_y,
                        "width": b.width(),
                        "height": b.height(),
                    },
                    "transform": {
                        "scale": t.scale,
                        "offsetX": t.offset_x,
                        "offsetY": t.offset_y,
                    },
                    "index": {
                        "cellSize": index.cell_size(),
                        "occupiedCells": index.occupied_cells(),
                    },
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}: {} vectors", display_name(&path), field.len());
                if let Some(h) = header {
                    println!("  header:    {h}");
                }
                if skipped > 0 {
                    println!("  skipped:   {skipped} rows");
                }
                println!(
                    "  bounds:    x {:.3}..{:.3}, y {:.3}..{:.3} ({:.1}x{:.1})",
                    b.min_x,
                    b.max_x,
                    b.min_y,
                    b.max_y,
                    b.width(),
                    b.height()
                );
                println!(
                    "  transform: scale {:.6}, offset ({:.4}, {:.4})",
                    t.scale, t.offset_x, t.offset_y
                );
                println!(
                    "  index:     cell {:.4}, {} occupied cells",
                    index.cell_size(),
                    index.occupied_cells()
                );
            }
        }
        Command::Render {
            field_a,
            field_b,
            width,
            height,
            frames,
            fps,
            seed,
            palette_a,
            palette_b,
            output,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            if !(fps.is_finite() && fps > 0.0) {
                return Err(CliError::Input(format!("--fps must be positive, got {fps}")));
            }

            let mut flow = FlowParams::from_json(&params);
            if let Some(name) = &palette_a {
                flow.color_preset_a = PaletteKey::from_name(name)?;
            }
            if let Some(name) = &palette_b {
                flow.color_preset_b = PaletteKey::from_name(name)?;
            }

            let mut scene = Scene::new(seed, flow);
            scene.set_viewport(width as f32, height as f32);
            if let Some(path) = &field_a {
                load_into(&mut scene, FieldSide::Left, path)?;
            }
            if let Some(path) = &field_b {
                load_into(&mut scene, FieldSide::Right, path)?;
            }

            let dt = fps.recip();
            for _ in 0..frames {
                scene.advance(dt);
            }

            luminar_scene::snapshot::write_png(&scene, width, height, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "fieldA": scene.status(FieldSide::Left),
                    "fieldB": scene.status(FieldSide::Right),
                    "width": width,
                    "height": height,
                    "frames": frames,
                    "seconds": scene.time(),
                    "seed": seed,
                    "params": scene.params(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {frames} frames ({width}x{height}, seed {seed}) -> {}",
                    output.display()
                );
                eprintln!(
                    "  Field A: {} · Field B: {}",
                    scene.status(FieldSide::Left).label,
                    scene.status(FieldSide::Right).label
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
