use std::path::{Path, PathBuf};

use catalog::{JsonFilePinStore, PinStore, export_snapshot, import_snapshot, parse_import};
use clap::{Parser, Subcommand};
use engine::{ContainerSize, EngineConfig, GestureState, MapEngine};
use formats::world_geometry::DEFAULT_WORLD_GEOJSON_URL;
use foundation::math::{GeoPoint, Projection, ScreenPoint};
use foundation::pin::{Pin, PinId};
use foundation::time::Time;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod geometry;

#[derive(Parser, Debug)]
#[command(author, version, about = "World pin map: projection, scene and pin store tools")]
struct Args {
    /// JSON pin store used by import, export, render and focus
    #[arg(long, global = true, default_value = "pins.json", env = "PINMAP_STORE")]
    store: PathBuf,

    /// Container width in pixels
    #[arg(long, global = true, default_value_t = 800.0)]
    width: f64,

    /// Container height in pixels
    #[arg(long, global = true, default_value_t = 600.0)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a lon/lat to drawing coordinates
    #[command(allow_negative_numbers = true)]
    Project { lon: f64, lat: f64 },

    /// Invert drawing coordinates to lon/lat
    #[command(allow_negative_numbers = true)]
    Invert { x: f64, y: f64 },

    /// Lay out the basemap and pins and print a scene summary as JSON
    Render {
        /// GeoJSON file path or http(s) URL
        #[arg(long, default_value = DEFAULT_WORLD_GEOJSON_URL)]
        geometry: String,

        /// Read pins from an export document instead of the store
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Run the focus animation for a pin and print one transform per frame
    Focus {
        pin_id: String,

        /// Read pins from an export document instead of the store
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Frames per second to sample the animation at
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },

    /// Merge an export document (or legacy pin array) into the store
    Import { file: PathBuf },

    /// Write the store as an export document
    Export {
        /// Output file; stdout if omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let size = ContainerSize::new(args.width, args.height);
    if !size.is_renderable() {
        return Err(format!("invalid container size {}x{}", args.width, args.height));
    }

    match args.command {
        Command::Project { lon, lat } => cmd_project(size, lon, lat),
        Command::Invert { x, y } => cmd_invert(size, x, y),
        Command::Render { geometry, snapshot } => {
            let pins = load_pins(&args.store, snapshot.as_deref())?;
            cmd_render(size, &geometry, &pins).await
        }
        Command::Focus {
            pin_id,
            snapshot,
            fps,
        } => {
            let pins = load_pins(&args.store, snapshot.as_deref())?;
            cmd_focus(size, &pins, &PinId::new(pin_id), fps)
        }
        Command::Import { file } => cmd_import(&args.store, &file),
        Command::Export { out } => cmd_export(&args.store, out.as_deref()),
    }
}

fn engine_config() -> Result<EngineConfig, String> {
    EngineConfig::from_env().map_err(|e| e.to_string())
}

fn projection(size: ContainerSize) -> Result<Projection, String> {
    let config = engine_config()?;
    Ok(Projection::with_divisor(
        size.width,
        size.height,
        config.projection_divisor,
    ))
}

fn print_json(value: &impl serde::Serialize) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{out}");
    Ok(())
}

fn cmd_project(size: ContainerSize, lon: f64, lat: f64) -> Result<(), String> {
    let p = projection(size)?
        .forward(GeoPoint::new(lon, lat))
        .ok_or_else(|| format!("({lon}, {lat}) cannot be projected"))?;
    print_json(&json!({ "x": p.x, "y": p.y }))
}

fn cmd_invert(size: ContainerSize, x: f64, y: f64) -> Result<(), String> {
    let g = projection(size)?
        .inverse(ScreenPoint::new(x, y))
        .ok_or_else(|| format!("({x}, {y}) is outside the world outline"))?;
    print_json(&json!({ "lon": g.lon, "lat": g.lat }))
}

fn load_pins(store: &Path, snapshot: Option<&Path>) -> Result<Vec<Pin>, String> {
    match snapshot {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("read {}: {e}", path.display()))?;
            let (snapshot, _) = parse_import(&raw).map_err(|e| e.to_string())?;
            Ok(snapshot.pins.iter().map(|r| r.pin()).collect())
        }
        None => {
            let store = JsonFilePinStore::open(store).map_err(|e| e.to_string())?;
            store.pins().map_err(|e| e.to_string())
        }
    }
}

async fn cmd_render(size: ContainerSize, source: &str, pins: &[Pin]) -> Result<(), String> {
    let mut map = MapEngine::new(engine_config()?).map_err(|e| e.to_string())?;
    if map.mount(size) {
        // A failed load leaves the basemap empty; pins still render.
        map.finish_geometry_load(geometry::load(source).await);
    }
    let diff = map.render(pins);
    info!(
        created = diff.created,
        dropped = diff.dropped,
        "scene rendered"
    );
    let summary = map.summary();
    map.unmount();
    print_json(&summary)
}

fn cmd_focus(size: ContainerSize, pins: &[Pin], id: &PinId, fps: f64) -> Result<(), String> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("invalid --fps {fps}"));
    }
    let pin = pins
        .iter()
        .find(|p| &p.id == id)
        .ok_or_else(|| format!("pin not found: {id}"))?;

    let mut map = MapEngine::new(engine_config()?).map_err(|e| e.to_string())?;
    map.resize(size);
    map.render(pins);

    let start = Time(0.0);
    if !map.focus_on_pin(pin, start) {
        return Err(format!("pin {id} cannot be projected"));
    }
    let step = 1.0 / fps;
    let mut frame = 0u32;
    loop {
        let now = start.add_seconds(f64::from(frame) * step);
        map.tick(now);
        let t = map.transform();
        println!(
            "{}",
            json!({ "t": now.0, "translate_x": t.translate_x, "translate_y": t.translate_y, "scale": t.scale })
        );
        if map.gesture_state() == GestureState::Idle {
            break;
        }
        frame += 1;
    }
    Ok(())
}

fn cmd_import(store_path: &Path, file: &Path) -> Result<(), String> {
    let raw =
        std::fs::read_to_string(file).map_err(|e| format!("read {}: {e}", file.display()))?;
    let mut store = JsonFilePinStore::open(store_path).map_err(|e| e.to_string())?;
    let report = import_snapshot(&mut store, &raw).map_err(|e| e.to_string())?;
    info!(
        pins = report.pins,
        migrated_images = report.migrated_images,
        config_saved = report.config_saved,
        store = %store_path.display(),
        "import complete"
    );
    println!("imported {} pins", report.pins);
    Ok(())
}

fn cmd_export(store_path: &Path, out: Option<&Path>) -> Result<(), String> {
    let store = JsonFilePinStore::open(store_path).map_err(|e| e.to_string())?;
    let raw = export_snapshot(&store)
        .and_then(|s| s.to_json_pretty())
        .map_err(|e| e.to_string())?;
    match out {
        Some(path) => {
            std::fs::write(path, raw).map_err(|e| format!("write {}: {e}", path.display()))?
        }
        None => println!("{raw}"),
    }
    Ok(())
}
