//! Mirrors sky simulation state into scene nodes.
//!
//! Owns the background shell, the star layer, one billboard per celestial
//! body and one directional light node per light-casting body. Billboards
//! and light nodes are created the first time they are needed and then
//! reused; bodies that go out of view have their billboard hidden rather
//! than removed.

use aurora_scene::{Geometry, Material, Node, NodeId, NodeKind, Scene, Side};
use glam::{Mat3, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::celestial::CelestialBody;
use crate::color::ColorProvider;
use crate::controller::CelestialBodyController;
use crate::starfield::Starfield;

/// The shell draws before everything else.
pub const SHELL_RENDER_ORDER: i32 = -10;
/// Body billboards draw after the stars.
pub const BILLBOARD_RENDER_ORDER: i32 = -8;

const SHELL_SEGMENTS: u32 = 32;

/// Radii and star settings for a [`SkyRenderer`].
#[derive(Clone, Debug)]
pub struct SkyRendererConfig {
    /// Background sphere radius.
    pub shell_radius: f32,
    /// Star sphere radius.
    pub star_radius: f32,
    pub star_seed: u64,
    pub star_count: u32,
}

/// Orientation facing a quad at `position` toward `viewpoint`, keeping it
/// upright. Falls back to world X as the right axis when looking straight up
/// or down.
pub fn billboard_rotation(position: Vec3, viewpoint: Vec3) -> Quat {
    let Some(normal) = (viewpoint - position).try_normalize() else {
        return Quat::IDENTITY;
    };
    let right = Vec3::Y.cross(normal).try_normalize().unwrap_or(Vec3::X);
    let up = normal.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, normal))
}

pub struct SkyRenderer {
    shell: Option<NodeId>,
    starfield: Starfield,
    drawables: FxHashMap<String, NodeId>,
    lights: FxHashMap<String, NodeId>,
}

impl SkyRenderer {
    /// Attach the shell and star layer to `scene`.
    pub fn new(scene: &mut Scene, config: &SkyRendererConfig) -> Self {
        let mut material = Material::new(Vec3::ZERO);
        material.side = Side::Back;
        material.fog = false;
        material.depth_write = false;
        let shell = Node::mesh(
            Geometry::Sphere {
                radius: config.shell_radius,
                segments: SHELL_SEGMENTS,
            },
            material,
        )
        .with_name("sky-shell")
        .with_render_order(SHELL_RENDER_ORDER);

        Self {
            shell: Some(scene.add(shell)),
            starfield: Starfield::new(
                scene,
                config.star_radius,
                config.star_seed,
                config.star_count,
            ),
            drawables: FxHashMap::default(),
            lights: FxHashMap::default(),
        }
    }

    /// Sync every owned node with this frame's colors and bodies.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        viewpoint: Vec3,
        colors: &ColorProvider,
        bodies: &CelestialBodyController,
    ) {
        let Some(shell_id) = self.shell else {
            return;
        };

        if let Some(shell) = scene.get_mut(shell_id) {
            shell.position = viewpoint;
            if let Some(material) = shell.material_mut() {
                material.color = colors.sky_color();
            }
        }

        self.starfield.update(scene, colors.star_intensity(), viewpoint);

        let mut seen: Vec<&str> = Vec::new();
        for body in bodies.renderable_bodies() {
            self.sync_billboard(scene, body, viewpoint);
            seen.push(body.id());
        }
        for (id, &node) in &self.drawables {
            if !seen.contains(&id.as_str())
                && let Some(node) = scene.get_mut(node)
            {
                node.visible = false;
            }
        }

        for body in bodies.bodies() {
            self.sync_light(scene, body);
        }
    }

    fn sync_billboard(&mut self, scene: &mut Scene, body: &dyn CelestialBody, viewpoint: Vec3) {
        let id = *self
            .drawables
            .entry(body.id().to_string())
            .or_insert_with(|| {
                let mut material = Material::new(Vec3::ONE);
                material.transparent = true;
                material.fog = false;
                material.depth_write = false;
                let node = Node::mesh(
                    Geometry::Quad {
                        width: 1.0,
                        height: 1.0,
                    },
                    material,
                )
                .with_name(format!("sky-body-{}", body.id()))
                .with_render_order(BILLBOARD_RENDER_ORDER);
                log::debug!("created billboard for {}", body.id());
                scene.add(node)
            });

        let Some(node) = scene.get_mut(id) else {
            return;
        };
        let state = body.render_state();
        node.visible = true;
        node.position = state.position;
        node.scale = Vec3::new(state.size, state.size, 1.0);
        node.rotation = billboard_rotation(state.position, viewpoint);
        if let Some(material) = node.material_mut() {
            material.color = state.color;
            material.opacity = state.intensity.clamp(0.0, 1.0);
            if material.set_texture(state.texture.clone()) {
                log::trace!("{} billboard texture rebound", body.id());
            }
        }
    }

    fn sync_light(&mut self, scene: &mut Scene, body: &dyn CelestialBody) {
        let Some(light) = body.light() else {
            return;
        };
        let id = *self.lights.entry(body.id().to_string()).or_insert_with(|| {
            log::debug!("created directional light for {}", body.id());
            scene.add(
                Node::new(NodeKind::DirectionalLight(light.clone()))
                    .with_name(format!("sky-light-{}", body.id())),
            )
        });
        if let Some(node) = scene.get_mut(id) {
            node.position = body.render_state().position;
            node.visible = light.intensity > 0.0;
            if let Some(target) = node.directional_light_mut() {
                *target = light.clone();
            }
        }
    }

    /// Background shell node, `None` once disposed.
    pub fn shell(&self) -> Option<NodeId> {
        self.shell
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// Billboard node of body `id`, if one has been created.
    pub fn drawable(&self, id: &str) -> Option<NodeId> {
        self.drawables.get(id).copied()
    }

    /// Light node of body `id`, if one has been created.
    pub fn light_node(&self, id: &str) -> Option<NodeId> {
        self.lights.get(id).copied()
    }

    /// Number of nodes this renderer currently has in the scene.
    pub fn owned_node_count(&self) -> usize {
        usize::from(self.shell.is_some())
            + usize::from(self.starfield.node().is_some())
            + self.drawables.len()
            + self.lights.len()
    }

    /// Remove every owned node from `scene`. Safe to call more than once.
    pub fn dispose(&mut self, scene: &mut Scene) {
        for (_, id) in self.drawables.drain().chain(self.lights.drain()) {
            scene.remove(id);
        }
        if let Some(id) = self.shell.take() {
            scene.remove(id);
        }
        self.starfield.dispose(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celestial::{MOON_ID, Moon, SUN_ID, Sun};
    use crate::time::TimeProvider;
    use aurora_scene::{QueuedTextureLoader, Texture};
    use std::sync::Arc;

    fn config() -> SkyRendererConfig {
        SkyRendererConfig {
            shell_radius: 120.0,
            star_radius: 115.0,
            star_seed: 9,
            star_count: 20,
        }
    }

    struct Rig {
        scene: Scene,
        loader: QueuedTextureLoader,
        time: TimeProvider,
        colors: ColorProvider,
        bodies: CelestialBodyController,
        renderer: SkyRenderer,
    }

    impl Rig {
        fn new(t: f32) -> Self {
            let mut scene = Scene::new();
            let loader = QueuedTextureLoader::new();
            let mut bodies = CelestialBodyController::new();
            bodies.add(Box::new(Sun::new(100.0, 12.0, "sun.png", &loader)));
            bodies.add(Box::new(Moon::new(95.0, 8.0, "moon.png", &loader)));
            let renderer = SkyRenderer::new(&mut scene, &config());
            Self {
                scene,
                loader,
                time: TimeProvider::new(1.0, t).unwrap(),
                colors: ColorProvider::default(),
                bodies,
                renderer,
            }
        }

        fn step(&mut self, t: f32, viewpoint: Vec3) {
            self.time.set_time_normalized(t);
            self.colors.update_colors(&self.time);
            self.bodies.update(&self.time, viewpoint);
            self.renderer
                .update(&mut self.scene, viewpoint, &self.colors, &self.bodies);
        }
    }

    #[test]
    fn test_billboard_faces_viewpoint() {
        let position = Vec3::new(30.0, 80.0, -20.0);
        let rotation = billboard_rotation(position, Vec3::ZERO);
        let normal = rotation * Vec3::Z;
        let expected = (Vec3::ZERO - position).normalize();
        assert!(normal.abs_diff_eq(expected, 1e-5), "normal {normal}, expected {expected}");
        let up = rotation * Vec3::Y;
        assert!(up.y > 0.0, "billboard must stay upright, up = {up}");
    }

    #[test]
    fn test_billboard_overhead_is_finite() {
        let rotation = billboard_rotation(Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO);
        assert!(rotation.is_finite());
        assert!((rotation * Vec3::Z).abs_diff_eq(Vec3::NEG_Y, 1e-5));
        assert_eq!(billboard_rotation(Vec3::ONE, Vec3::ONE), Quat::IDENTITY);
    }

    #[test]
    fn test_shell_follows_viewpoint_with_sky_color() {
        let mut rig = Rig::new(0.5);
        let viewpoint = Vec3::new(12.0, 70.0, 5.0);
        rig.step(0.5, viewpoint);
        let shell = rig.scene.get(rig.renderer.shell().unwrap()).unwrap();
        assert_eq!(shell.position, viewpoint);
        let material = shell.material().unwrap();
        assert_eq!(material.color, rig.colors.sky_color());
        assert_eq!(material.side, Side::Back);
        assert!(!material.fog);
    }

    #[test]
    fn test_billboards_created_lazily_and_reused() {
        let mut rig = Rig::new(0.5);
        assert!(rig.renderer.drawable(SUN_ID).is_none());

        rig.step(0.5, Vec3::ZERO);
        let sun = rig.renderer.drawable(SUN_ID).expect("sun billboard");
        assert!(rig.renderer.drawable(MOON_ID).is_none(), "moon never seen yet");

        rig.step(0.55, Vec3::ZERO);
        assert_eq!(rig.renderer.drawable(SUN_ID), Some(sun));
    }

    #[test]
    fn test_unseen_body_is_hidden_not_removed() {
        let mut rig = Rig::new(0.5);
        rig.step(0.5, Vec3::ZERO);
        let sun = rig.renderer.drawable(SUN_ID).unwrap();
        assert!(rig.scene.get(sun).unwrap().visible);

        rig.step(0.0, Vec3::ZERO);
        let node = rig.scene.get(sun).expect("billboard kept across the night");
        assert!(!node.visible);
        assert!(rig.scene.get(rig.renderer.drawable(MOON_ID).unwrap()).unwrap().visible);
    }

    #[test]
    fn test_node_count_stable_over_days() {
        let mut rig = Rig::new(0.0);
        rig.step(0.0, Vec3::ZERO);
        rig.step(0.5, Vec3::ZERO);
        let settled = rig.scene.len();
        for step in 0..200 {
            rig.step(step as f32 / 100.0 % 1.0, Vec3::ZERO);
        }
        assert_eq!(rig.scene.len(), settled);
        assert_eq!(rig.renderer.owned_node_count(), settled);
    }

    #[test]
    fn test_light_node_tracks_sun() {
        let mut rig = Rig::new(0.5);
        rig.step(0.5, Vec3::new(0.0, 64.0, 0.0));
        let id = rig.renderer.light_node(SUN_ID).expect("sun light");
        assert!(rig.renderer.light_node(MOON_ID).is_none());

        let node = rig.scene.get(id).unwrap();
        let sun = rig.bodies.get(SUN_ID).unwrap();
        assert_eq!(node.position, sun.render_state().position);
        assert_eq!(node.directional_light(), sun.light());
        assert!(node.visible);

        rig.step(0.0, Vec3::ZERO);
        let node = rig.scene.get(id).unwrap();
        assert_eq!(node.directional_light().unwrap().intensity, 0.0);
        assert!(!node.visible);
    }

    #[test]
    fn test_texture_bound_once_when_it_arrives() {
        let mut rig = Rig::new(0.5);
        rig.step(0.5, Vec3::ZERO);
        let id = rig.renderer.drawable(SUN_ID).unwrap();
        assert!(rig.scene.get(id).unwrap().material().unwrap().texture().is_none());

        rig.loader
            .complete_all(|url| Ok(Arc::new(Texture::solid(url, [255, 240, 200, 255]))));
        rig.step(0.5, Vec3::ZERO);
        let material = rig.scene.get(id).unwrap().material().unwrap();
        assert!(material.texture().is_some());
        let version = material.version();

        rig.step(0.6, Vec3::ZERO);
        let material = rig.scene.get(id).unwrap().material().unwrap();
        assert_eq!(material.version(), version, "same texture must not be rebound");
    }

    #[test]
    fn test_dispose_removes_everything_owned() {
        let mut rig = Rig::new(0.0);
        rig.step(0.0, Vec3::ZERO);
        rig.step(0.5, Vec3::ZERO);
        assert!(rig.renderer.owned_node_count() >= 4);

        rig.renderer.dispose(&mut rig.scene);
        assert!(rig.scene.is_empty());
        assert_eq!(rig.renderer.owned_node_count(), 0);
        rig.renderer.dispose(&mut rig.scene);

        rig.step(0.5, Vec3::ZERO);
        assert!(rig.scene.is_empty(), "update after dispose must not recreate nodes");
    }
}
