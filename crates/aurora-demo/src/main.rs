//! Headless day/night run: builds a scene with a lighting rig, attaches the
//! sky and steps it through simulated frames, logging what it sees.

mod config_watch;
mod frame_loop;

use std::path::PathBuf;

use aurora_config::{CliArgs, Config, default_config_dir};
use aurora_scene::{
    AMBIENT_LIGHT_NAME, AmbientLight, Camera, Fog, Node, NodeKind, Scene, ThreadedTextureLoader,
};
use aurora_sky::AdvancedSky;
use clap::Parser;
use glam::Vec3;
use tracing::{error, info, warn};

use crate::config_watch::ConfigWatcher;
use crate::frame_loop::FrameLoop;

#[derive(Parser, Debug)]
#[command(name = "aurora-demo", about = "Headless day/night cycle run")]
struct DemoArgs {
    #[command(flatten)]
    config: CliArgs,

    /// Number of frames to simulate (three default-length days at 30 fps).
    #[arg(long, default_value_t = 108_000)]
    frames: u32,

    /// Simulated frame time in seconds.
    #[arg(long, default_value_t = 1.0 / 30.0)]
    frame_time: f32,

    /// Log a sky summary every N frames.
    #[arg(long, default_value_t = 3_000)]
    report_every: u32,

    /// Asset root the texture loader resolves URLs against.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

fn main() {
    let args = DemoArgs::parse();

    let config_dir = args.config.config.clone().unwrap_or_else(default_config_dir);
    let (on_disk, config_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let mut config = on_disk.clone();
    config.apply_cli_overrides(&args.config);
    let mut watcher = ConfigWatcher::new(config_dir.clone(), on_disk);

    let log_dir = config_dir.join("logs");
    aurora_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    if let Some(e) = config_error {
        warn!("using default config, {} unreadable: {e}", config_dir.display());
    }

    let mut scene = Scene::new();
    let ambient = scene.add(
        Node::new(NodeKind::AmbientLight(AmbientLight::default())).with_name(AMBIENT_LIGHT_NAME),
    );
    let extent = config.world.view_extent();
    scene.set_fog(Some(Fog::new(Vec3::splat(0.7), extent * 0.5, extent)));

    let mut loader = ThreadedTextureLoader::new(args.assets.clone(), 2);
    let mut sky = match AdvancedSky::new(&mut scene, &loader, &config.sky, &config.world, Some(ambient)) {
        Ok(sky) => sky,
        Err(e) => {
            error!("failed to build sky: {e}");
            std::process::exit(1);
        }
    };

    let mut camera = Camera::at(Vec3::new(0.0, 72.0, 0.0));
    let mut frames = FrameLoop::new();
    let report_every = args.report_every.max(1);

    for frame in 0..args.frames {
        frames.tick(args.frame_time, |dt| {
            // Slow walk so the sky has to follow the viewpoint.
            camera.position += Vec3::new(dt * 4.0, 0.0, dt * 1.5);
            sky.update(&mut scene, dt, &camera);
        });

        if frame % report_every == 0 {
            // Only the clock speed applies live; the rest needs a restart.
            if let Some(reloaded) = watcher.poll(&args.config) {
                sky.set_time_scale(reloaded.sky.time_scale);
            }

            let sky_color = sky.sky_color();
            let visible: Vec<&str> = sky.bodies().renderable_bodies().map(|b| b.id()).collect();
            info!(
                frame,
                t = sky.time_normalized(),
                phase = ?sky.time_provider().phase(),
                day = sky.time_provider().day_count(),
                stars = sky.star_intensity(),
                sun_light = sky.sun_light().map_or(0.0, |l| l.intensity),
                "sky rgb({:.2}, {:.2}, {:.2}) bodies {:?}",
                sky_color.x,
                sky_color.y,
                sky_color.z,
                visible
            );
        }
    }

    info!(
        frames = frames.frame_count(),
        steps = frames.update_count(),
        sim_seconds = frames.total_sim_time(),
        nodes = scene.len(),
        "run finished"
    );

    sky.dispose(&mut scene);
    loader.shutdown();
    info!(remaining_nodes = scene.len(), "sky disposed");
}
