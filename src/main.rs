//! Wanderland headless walker
//!
//! Walks a player across the procedural world, streaming chunks around it
//! with a null render surface and logging streaming stats.

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use glam::Vec3;

use wanderland::utils::settings::DEFAULT_SETTINGS_FILE;
use wanderland::{
    NullSurface, Result, StalePolicy, WorldManager, WorldSettings, load_settings, save_settings,
};

const FIXED_DT: f32 = 1.0 / 60.0;
const EYE_HEIGHT: f32 = 1.7;
const STATS_INTERVAL: u32 = 120;

/// Stream a procedural world around a walking player
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed (overrides the settings file)
    #[arg(long)]
    seed: Option<f64>,

    /// Render distance in chunks (overrides the settings file)
    #[arg(long)]
    render_distance: Option<u32>,

    /// Number of fixed simulation steps to run
    #[arg(long, default_value_t = 1200)]
    ticks: u32,

    /// Walking speed in world units per second
    #[arg(long, default_value_t = 24.0)]
    speed: f32,

    /// Settings file (default: the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long, default_value_t = false)]
    save_settings: bool,

    /// Drop queued loads that fall out of range (true) or let them finish (false)
    #[arg(long)]
    cancel_stale: Option<bool>,
}

fn settings_path(args: &Args) -> Option<PathBuf> {
    args.settings.clone().or_else(|| {
        ProjectDirs::from("", "", "wanderland").map(|dirs| dirs.config_dir().join(DEFAULT_SETTINGS_FILE))
    })
}

fn resolve_settings(args: &Args, path: Option<&PathBuf>) -> WorldSettings {
    let mut settings = match path {
        Some(path) if path.exists() => match load_settings(path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable settings");
                WorldSettings::default()
            }
        },
        _ => WorldSettings::default(),
    };

    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(render_distance) = args.render_distance {
        settings.render_distance = render_distance;
    }
    if let Some(cancel) = args.cancel_stale {
        settings.stale_policy = if cancel {
            StalePolicy::Cancel
        } else {
            StalePolicy::Complete
        };
    }
    settings
}

fn run(args: Args) -> Result<()> {
    let path = settings_path(&args);
    let settings = resolve_settings(&args, path.as_ref());
    settings.validate()?;

    if args.save_settings {
        if let Some(path) = &path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            save_settings(path, &settings)?;
            tracing::info!(path = %path.display(), "saved settings");
        }
    }

    let mut world = WorldManager::new(&settings)?;
    let mut scene = NullSurface::new();
    let mut colliders = NullSurface::new();

    let heading = Vec3::new(1.0, 0.0, 0.35).normalize();
    let mut player = Vec3::new(0.0, 0.0, 0.0);

    for tick in 0..args.ticks {
        player += heading * args.speed * FIXED_DT;
        player.y = world.height_at(player.x as f64, player.z as f64) as f32 + EYE_HEIGHT;

        world.update(player, &mut scene, &mut colliders)?;
        world.update_lods(player);
        world.tick_animals(FIXED_DT, player, &mut colliders);

        if tick % STATS_INTERVAL == 0 {
            let stats = world.stats();
            tracing::info!(
                tick,
                x = player.x,
                z = player.z,
                active = stats.active,
                queued_loads = stats.queued_loads,
                queued_unloads = stats.queued_unloads,
                colliders = colliders.colliders,
                "streaming"
            );
        }
    }

    let stats = world.stats();
    let geometry = world.geometry();
    tracing::info!(
        loads_total = stats.loads_total,
        unloads_total = stats.unloads_total,
        live_tiers = geometry.live_tiers(),
        settled = world.is_settled(),
        "walk finished"
    );

    world.unload_all(&mut scene, &mut colliders);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting wanderland...");
    if let Err(err) = run(Args::parse()) {
        tracing::error!(%err, "wanderland failed");
        std::process::exit(1);
    }
}
