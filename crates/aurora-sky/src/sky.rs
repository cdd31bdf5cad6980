//! The per-frame entry point tying clock, palette, bodies and renderer
//! together.

use aurora_config::{BodyConfig, SkyConfig, WorldConfig};
use aurora_scene::{DirectionalLight, NodeId, Scene, TextureLoader, Viewpoint};
use glam::Vec3;

use crate::celestial::{IntensityEnvelope, Moon, SUN_ID, Sun};
use crate::color::ColorProvider;
use crate::controller::CelestialBodyController;
use crate::error::SkyError;
use crate::renderer::{SkyRenderer, SkyRendererConfig};
use crate::time::{DayPhase, TimeProvider};

/// Day/night sky attached to a shared [`Scene`].
///
/// The scene is borrowed per call; the sky only touches nodes it created,
/// the scene fog, and the ambient light handed to [`AdvancedSky::new`].
/// It never creates the ambient light itself.
pub struct AdvancedSky {
    time: TimeProvider,
    colors: ColorProvider,
    bodies: CelestialBodyController,
    renderer: SkyRenderer,
    ambient_light: Option<NodeId>,
    phase: DayPhase,
    disposed: bool,
}

impl AdvancedSky {
    /// Build the sky, sizing every radius from `world` so the sky always
    /// encloses the playable volume. `ambient_light` is the lighting rig's
    /// ambient node, synced every frame if it is still in the scene.
    pub fn new(
        scene: &mut Scene,
        loader: &dyn TextureLoader,
        sky: &SkyConfig,
        world: &WorldConfig,
        ambient_light: Option<NodeId>,
    ) -> Result<Self, SkyError> {
        let extent = world.view_extent();
        if world.render_distance == 0 || !extent.is_finite() || extent <= 0.0 {
            return Err(SkyError::InvalidWorldScale {
                render_distance: world.render_distance,
                chunk_size: world.chunk_size,
            });
        }

        let mut time = TimeProvider::new(sky.cycle_minutes, sky.start_time)?;
        time.set_time_scale(sky.time_scale);

        let sun_radius = extent * sky.sun.radius_factor;
        let moon_radius = extent * sky.moon.radius_factor;
        let renderer_config = SkyRendererConfig {
            shell_radius: extent * sky.shell_radius_factor,
            star_radius: extent * sky.stars.radius_factor,
            star_seed: sky.stars.seed,
            star_count: sky.stars.count,
        };
        log::info!(
            "sky: {:.1} min cycle, shell r={:.1}, sun r={sun_radius:.1}, moon r={moon_radius:.1}, {} stars",
            sky.cycle_minutes,
            renderer_config.shell_radius,
            sky.stars.count
        );
        if ambient_light.is_none() {
            log::debug!("sky: no ambient light provided, ambient sync disabled");
        }

        let mut bodies = CelestialBodyController::new();
        bodies.add(Box::new(Sun::new(
            sun_radius,
            sun_radius * sky.sun.size_factor,
            &sky.sun.texture,
            loader,
        )
        .with_envelope(envelope(&sky.sun))));
        bodies.add(Box::new(Moon::new(
            moon_radius,
            moon_radius * sky.moon.size_factor,
            &sky.moon.texture,
            loader,
        )
        .with_envelope(envelope(&sky.moon))));

        let phase = time.phase();
        Ok(Self {
            time,
            colors: ColorProvider::default(),
            bodies,
            renderer: SkyRenderer::new(scene, &renderer_config),
            ambient_light,
            phase,
            disposed: false,
        })
    }

    /// Replace the default palette.
    pub fn with_palette(mut self, colors: ColorProvider) -> Self {
        self.colors = colors;
        self
    }

    /// Advance by `delta_seconds` and sync the scene for `viewpoint`.
    ///
    /// Stages run in a fixed order (clock, palette, bodies, renderer), each
    /// reading what the previous one produced this frame. Fog color and the
    /// ambient light follow. A no-op once disposed.
    pub fn update(&mut self, scene: &mut Scene, delta_seconds: f32, viewpoint: &impl Viewpoint) {
        if self.disposed {
            log::trace!("sky: update after dispose ignored");
            return;
        }
        let viewpoint = viewpoint.position();

        self.time.update(delta_seconds);
        self.colors.update_colors(&self.time);
        self.bodies.update(&self.time, viewpoint);
        self.renderer
            .update(scene, viewpoint, &self.colors, &self.bodies);

        if let Some(fog) = scene.fog_mut() {
            fog.color = self.colors.fog_color();
        }
        self.sync_ambient(scene);

        let phase = self.time.phase();
        if phase != self.phase {
            log::debug!(
                "sky: {:?} -> {:?} at t={:.3} (day {})",
                self.phase,
                phase,
                self.time.time_normalized(),
                self.time.day_count()
            );
            self.phase = phase;
        }
    }

    fn sync_ambient(&self, scene: &mut Scene) {
        let Some(id) = self.ambient_light else {
            return;
        };
        match scene.get_mut(id).and_then(|node| node.ambient_light_mut()) {
            Some(ambient) => {
                ambient.color = self.colors.ambient_color();
                ambient.intensity = self.colors.ambient_intensity();
            }
            None => log::trace!("sky: ambient light {id:?} missing, skipped"),
        }
    }

    /// Change the clock speed, e.g. after a config reload. Negative values
    /// pause the clock.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time.set_time_scale(scale);
    }

    /// Jump the clock. Takes effect on the next [`update`](Self::update).
    pub fn set_time_normalized(&mut self, t: f32) {
        self.time.set_time_normalized(t);
    }

    pub fn time_provider(&self) -> &TimeProvider {
        &self.time
    }

    pub fn color_provider(&self) -> &ColorProvider {
        &self.colors
    }

    pub fn time_normalized(&self) -> f32 {
        self.time.time_normalized()
    }

    pub fn sky_color(&self) -> Vec3 {
        self.colors.sky_color()
    }

    pub fn fog_color(&self) -> Vec3 {
        self.colors.fog_color()
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.colors.ambient_color()
    }

    pub fn ambient_intensity(&self) -> f32 {
        self.colors.ambient_intensity()
    }

    pub fn star_intensity(&self) -> f32 {
        self.colors.star_intensity()
    }

    /// The sun's light, for external shadow and lighting wiring. `None`
    /// once disposed.
    pub fn sun_light(&self) -> Option<&DirectionalLight> {
        self.bodies.get(SUN_ID).and_then(|sun| sun.light())
    }

    /// Scene node carrying the sun's light, created on the first update.
    pub fn sun_light_node(&self) -> Option<NodeId> {
        self.renderer.light_node(SUN_ID)
    }

    pub fn bodies(&self) -> &CelestialBodyController {
        &self.bodies
    }

    pub fn renderer(&self) -> &SkyRenderer {
        &self.renderer
    }

    /// Remove every owned node from `scene` and release the bodies. Pending
    /// texture loads are dropped. Safe to call more than once.
    pub fn dispose(&mut self, scene: &mut Scene) {
        if self.disposed {
            return;
        }
        self.renderer.dispose(scene);
        self.bodies.dispose();
        self.disposed = true;
        log::info!("sky: disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

fn envelope(body: &BodyConfig) -> IntensityEnvelope {
    IntensityEnvelope {
        floor: body.intensity_floor,
        peak: body.intensity_peak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_scene::{AMBIENT_LIGHT_NAME, AmbientLight, Fog, Node, NodeKind, QueuedTextureLoader};

    fn scene_with_rig() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let ambient = scene.add(
            Node::new(NodeKind::AmbientLight(AmbientLight::default())).with_name(AMBIENT_LIGHT_NAME),
        );
        scene.set_fog(Some(Fog::new(Vec3::ONE, 20.0, 110.0)));
        (scene, ambient)
    }

    fn sky_at(scene: &mut Scene, ambient: Option<NodeId>, start: f32) -> AdvancedSky {
        let config = SkyConfig {
            start_time: start,
            ..SkyConfig::default()
        };
        AdvancedSky::new(
            scene,
            &QueuedTextureLoader::new(),
            &config,
            &WorldConfig::default(),
            ambient,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_zero_world_scale() {
        let mut scene = Scene::new();
        let world = WorldConfig {
            render_distance: 0,
            chunk_size: 16.0,
        };
        let result = AdvancedSky::new(
            &mut scene,
            &QueuedTextureLoader::new(),
            &SkyConfig::default(),
            &world,
            None,
        );
        assert!(matches!(result, Err(SkyError::InvalidWorldScale { .. })));
        assert!(scene.is_empty(), "failed construction must not leave nodes");
    }

    #[test]
    fn test_rejects_bad_cycle() {
        let mut scene = Scene::new();
        let config = SkyConfig {
            cycle_minutes: -1.0,
            ..SkyConfig::default()
        };
        let result = AdvancedSky::new(
            &mut scene,
            &QueuedTextureLoader::new(),
            &config,
            &WorldConfig::default(),
            None,
        );
        assert_eq!(result.err(), Some(SkyError::InvalidCycleDuration(-1.0)));
    }

    #[test]
    fn test_fog_color_synced_distances_kept() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.5);
        sky.update(&mut scene, 0.0, &Vec3::ZERO);

        let fog = scene.fog().unwrap();
        assert_eq!(fog.color, sky.fog_color());
        assert_eq!((fog.near, fog.far), (20.0, 110.0));
    }

    #[test]
    fn test_ambient_light_synced() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.0);
        sky.update(&mut scene, 0.0, &Vec3::ZERO);

        let light = scene.get(ambient).unwrap().ambient_light().unwrap();
        assert_eq!(light.color, sky.ambient_color());
        assert_eq!(light.intensity, sky.ambient_intensity());
    }

    #[test]
    fn test_missing_ambient_light_tolerated() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.3);
        scene.remove(ambient);
        sky.update(&mut scene, 1.0, &Vec3::ZERO);
        assert!(sky.sun_light().is_some());
    }

    #[test]
    fn test_sun_light_exposed() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.5);
        assert!(sky.sun_light_node().is_none(), "light node is created lazily");
        sky.update(&mut scene, 0.0, &Vec3::ZERO);

        let node = sky.sun_light_node().unwrap();
        assert_eq!(
            scene.get(node).unwrap().directional_light(),
            sky.sun_light()
        );
        assert!(sky.sun_light().unwrap().intensity > 0.0);
    }

    #[test]
    fn test_colors_follow_time() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.0);
        sky.update(&mut scene, 0.0, &Vec3::ZERO);
        let night_stars = sky.star_intensity();

        sky.set_time_normalized(0.5);
        sky.update(&mut scene, 0.0, &Vec3::ZERO);
        assert!(night_stars > sky.star_intensity());
        assert_eq!(sky.sky_color(), sky.color_provider().sample(0.5).sky);
    }

    #[test]
    fn test_zero_floor_hides_sun_at_sunrise() {
        let (mut scene, ambient) = scene_with_rig();
        let mut config = SkyConfig {
            start_time: 0.25,
            ..SkyConfig::default()
        };
        config.sun.intensity_floor = 0.0;
        let mut sky = AdvancedSky::new(
            &mut scene,
            &QueuedTextureLoader::new(),
            &config,
            &WorldConfig::default(),
            Some(ambient),
        )
        .unwrap();

        sky.update(&mut scene, 0.0, &Vec3::ZERO);
        assert!(!sky.bodies().renderable_bodies().any(|b| b.id() == SUN_ID));
        assert_eq!(sky.sun_light().unwrap().intensity, 0.0);
        let light = scene.get(sky.sun_light_node().unwrap()).unwrap();
        assert!(!light.visible, "sun light node must be off while the sun is hidden");
    }

    #[test]
    fn test_time_scale_can_change_at_runtime() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.5);
        sky.set_time_scale(0.0);
        sky.update(&mut scene, 120.0, &Vec3::ZERO);
        assert!((sky.time_normalized() - 0.5).abs() < 1e-6, "paused clock moved");

        sky.set_time_scale(2.0);
        sky.update(&mut scene, 60.0, &Vec3::ZERO);
        let expected = 0.5 + 120.0 / sky.time_provider().cycle_seconds() as f32;
        assert!((sky.time_normalized() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_dispose_twice_and_update_after() {
        let (mut scene, ambient) = scene_with_rig();
        let mut sky = sky_at(&mut scene, Some(ambient), 0.5);
        sky.update(&mut scene, 0.0, &Vec3::ZERO);

        sky.dispose(&mut scene);
        sky.dispose(&mut scene);
        assert!(sky.is_disposed());
        assert_eq!(scene.len(), 1, "only the rig's ambient light remains");
        assert!(sky.sun_light().is_none());

        let before = sky.time_normalized();
        sky.update(&mut scene, 30.0, &Vec3::ZERO);
        assert_eq!(sky.time_normalized(), before);
        assert_eq!(scene.len(), 1);
    }
}
