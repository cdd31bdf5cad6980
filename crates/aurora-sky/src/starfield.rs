//! Star layer: a seeded point cloud on a sphere around the viewpoint whose
//! opacity follows the palette's star intensity.

use aurora_scene::{Geometry, Material, Node, NodeId, Scene};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Draws after the shell, before everything else.
pub const STARFIELD_RENDER_ORDER: i32 = -9;

/// Base point size in pixels.
const STAR_SIZE: f32 = 1.5;

/// A single star in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct StarPoint {
    /// Unit direction from the viewpoint.
    pub direction: Vec3,
    /// Brightness in `[0, 1]`, heavily skewed toward dim.
    pub brightness: f32,
    /// Linear RGB, already scaled by brightness.
    pub color: [f32; 3],
}

/// Deterministic catalog of `count` stars for `seed`.
pub fn generate_stars(seed: u64, count: u32) -> Vec<StarPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let cos_phi = 1.0 - 2.0 * rng.random::<f32>();
            let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
            let direction = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());

            // Many dim stars, few bright ones.
            let brightness = rng.random::<f32>().powi(3);
            let warmth = rng.random::<f32>();
            let tint = Vec3::new(0.75, 0.82, 1.0).lerp(Vec3::new(1.0, 0.85, 0.7), warmth);
            let lit = tint * (0.35 + 0.65 * brightness);

            StarPoint {
                direction,
                brightness,
                color: lit.to_array(),
            }
        })
        .collect()
}

/// The star mesh and its current opacity.
#[derive(Debug)]
pub struct Starfield {
    node: Option<NodeId>,
    opacity: f32,
}

impl Starfield {
    /// Generate the catalog and attach it to `scene` as a hidden point cloud
    /// of radius `radius`.
    pub fn new(scene: &mut Scene, radius: f32, seed: u64, count: u32) -> Self {
        let stars = generate_stars(seed, count);
        let geometry = Geometry::Points {
            positions: stars.iter().map(|s| s.direction * radius).collect(),
            colors: stars.iter().map(|s| s.color).collect(),
            size: STAR_SIZE,
        };

        let mut material = Material::new(Vec3::ONE);
        material.transparent = true;
        material.opacity = 0.0;
        material.fog = false;
        material.depth_write = false;

        let mut node = Node::mesh(geometry, material)
            .with_name("sky-stars")
            .with_render_order(STARFIELD_RENDER_ORDER);
        node.visible = false;

        log::debug!("starfield: {count} stars at radius {radius:.1} (seed {seed:#x})");
        Self {
            node: Some(scene.add(node)),
            opacity: 0.0,
        }
    }

    /// Set opacity from `star_intensity`, clamped to `[0, 1]`, and recenter
    /// on `viewpoint`. The node is hidden while fully transparent.
    pub fn update(&mut self, scene: &mut Scene, star_intensity: f32, viewpoint: Vec3) {
        let Some(node) = self.node.and_then(|id| scene.get_mut(id)) else {
            return;
        };
        self.opacity = if star_intensity.is_nan() {
            0.0
        } else {
            star_intensity.clamp(0.0, 1.0)
        };
        node.position = viewpoint;
        node.visible = self.opacity > 0.0;
        if let Some(material) = node.material_mut() {
            material.opacity = self.opacity;
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Scene node, `None` once disposed.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Detach from `scene`. Safe to call more than once.
    pub fn dispose(&mut self, scene: &mut Scene) {
        if let Some(id) = self.node.take() {
            scene.remove(id);
        }
        self.opacity = 0.0;
    }
}
