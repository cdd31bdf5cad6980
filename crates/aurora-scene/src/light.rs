//! Scene lights: one ambient term and any number of directional lights.
//!
//! [`DirectionalLight`] and [`AmbientLight`] are the CPU-side descriptions;
//! their `*Uniform` counterparts are what a renderer writes to GPU buffers.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Orthographic shadow volume of a directional light.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowFrustum {
    /// Half width/height of the orthographic box around the target.
    pub half_extent: f32,
    /// Near plane distance from the light.
    pub near: f32,
    /// Far plane distance from the light.
    pub far: f32,
    /// Shadow map resolution (width = height).
    pub map_size: u32,
}

impl ShadowFrustum {
    /// Frustum sized to cover an orbit of `radius` around the viewpoint.
    pub fn for_orbit(radius: f32) -> Self {
        Self {
            half_extent: radius * 0.5,
            near: 0.5,
            far: radius * 2.5,
            map_size: 2048,
        }
    }

    /// Orthographic projection for this frustum.
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_extent,
            self.half_extent,
            -self.half_extent,
            self.half_extent,
            self.near,
            self.far,
        )
    }
}

impl Default for ShadowFrustum {
    fn default() -> Self {
        Self::for_orbit(256.0)
    }
}

/// A directional (sun-like) light. The node position is the light origin;
/// light travels from there toward `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Linear RGB color of the light (not premultiplied by intensity).
    pub color: Vec3,
    /// Scalar intensity multiplier, `0.0` when the light is off.
    pub intensity: f32,
    /// World-space point the light aims at.
    pub target: Vec3,
    /// Whether the light renders into a shadow map.
    pub cast_shadow: bool,
    /// Shadow projection volume.
    pub shadow: ShadowFrustum,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            // Warm white, approximating D65 daylight.
            color: Vec3::new(1.0, 0.96, 0.90),
            intensity: 1.0,
            target: Vec3::ZERO,
            cast_shadow: false,
            shadow: ShadowFrustum::default(),
        }
    }
}

impl DirectionalLight {
    /// Unit direction the light travels in when placed at `position`.
    ///
    /// Falls back to straight down when position and target coincide.
    pub fn direction_from(&self, position: Vec3) -> Vec3 {
        let dir = (self.target - position).normalize_or_zero();
        if dir == Vec3::ZERO { Vec3::NEG_Y } else { dir }
    }

    /// Light-space view-projection for shadow rendering from `position`.
    pub fn shadow_view_projection(&self, position: Vec3) -> Mat4 {
        let dir = self.direction_from(position);
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        self.shadow.projection() * Mat4::look_at_rh(position, self.target, up)
    }

    /// Build the GPU-side uniform for a light placed at `position`.
    pub fn to_uniform(&self, position: Vec3) -> DirectionalLightUniform {
        let dir = self.direction_from(position);
        DirectionalLightUniform {
            direction_intensity: [dir.x, dir.y, dir.z, self.intensity],
            color_padding: [self.color.x, self.color.y, self.color.z, 0.0],
        }
    }
}

/// GPU-side directional light, 32 bytes, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction (normalized), w = intensity.
    pub direction_intensity: [f32; 4],
    /// xyz = color (linear RGB), w = padding.
    pub color_padding: [f32; 4],
}

/// Uniform ambient term.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB color.
    pub color: Vec3,
    /// Scalar intensity.
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.5,
        }
    }
}

impl AmbientLight {
    /// Build the GPU-side uniform.
    pub fn to_uniform(&self) -> AmbientLightUniform {
        AmbientLightUniform {
            color_intensity: [self.color.x, self.color.y, self.color.z, self.intensity],
        }
    }
}

/// GPU-side ambient light: xyz = color, w = intensity.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AmbientLightUniform {
    pub color_intensity: [f32; 4],
}

static_assertions::assert_eq_size!(DirectionalLightUniform, [u8; 32]);
static_assertions::assert_eq_size!(AmbientLightUniform, [u8; 16]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_points_at_target() {
        let light = DirectionalLight {
            target: Vec3::new(0.0, 0.0, 0.0),
            ..DirectionalLight::default()
        };
        let dir = light.direction_from(Vec3::new(0.0, 100.0, 0.0));
        assert!((dir - Vec3::NEG_Y).length() < 1e-6, "got {dir}");
        assert!((dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_position_falls_back_to_down() {
        let light = DirectionalLight::default();
        assert_eq!(light.direction_from(light.target), Vec3::NEG_Y);
    }

    #[test]
    fn test_uniform_buffer_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 32);
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, direction_intensity),
            0
        );
        assert_eq!(
            std::mem::offset_of!(DirectionalLightUniform, color_padding),
            16
        );
    }

    #[test]
    fn test_to_uniform_packs_correctly() {
        let light = DirectionalLight {
            color: Vec3::new(1.0, 0.5, 0.25),
            intensity: 2.0,
            target: Vec3::ZERO,
            ..DirectionalLight::default()
        };
        let u = light.to_uniform(Vec3::new(0.0, 10.0, 0.0));
        assert!((u.direction_intensity[1] + 1.0).abs() < 1e-6);
        assert!((u.direction_intensity[3] - 2.0).abs() < 1e-6);
        assert_eq!(u.color_padding, [1.0, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_shadow_frustum_scales_with_orbit() {
        let small = ShadowFrustum::for_orbit(100.0);
        let large = ShadowFrustum::for_orbit(400.0);
        assert!((large.half_extent / small.half_extent - 4.0).abs() < 1e-6);
        assert!(large.far > 400.0, "far plane must reach past the orbit");
    }

    #[test]
    fn test_shadow_matrix_maps_target_inside_clip_volume() {
        let light = DirectionalLight {
            target: Vec3::new(5.0, 0.0, 5.0),
            ..DirectionalLight::default()
        };
        let clip = light
            .shadow_view_projection(Vec3::new(5.0, 100.0, 5.0))
            .project_point3(light.target);
        assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4, "got {clip}");
        assert!((0.0..=1.0).contains(&clip.z), "depth {} out of range", clip.z);
    }

    #[test]
    fn test_ambient_uniform() {
        let ambient = AmbientLight {
            color: Vec3::new(0.2, 0.3, 0.4),
            intensity: 0.6,
        };
        assert_eq!(ambient.to_uniform().color_intensity, [0.2, 0.3, 0.4, 0.6]);
    }
}
