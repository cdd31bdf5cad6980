//! Linear distance fog attached to the scene root.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Linear fog. The sky owns the color; near/far belong to whichever system
/// tracks camera submersion.
#[derive(Debug, Clone, PartialEq)]
pub struct Fog {
    /// Linear RGB fog color.
    pub color: Vec3,
    /// Distance at which fog starts.
    pub near: f32,
    /// Distance at which fog is fully opaque.
    pub far: f32,
}

impl Fog {
    /// Create a fog with the given color and range.
    pub fn new(color: Vec3, near: f32, far: f32) -> Self {
        Self { color, near, far }
    }

    /// Fog blend factor in `[0, 1]` at `distance` from the eye.
    pub fn factor(&self, distance: f32) -> f32 {
        let span = self.far - self.near;
        if span <= f32::EPSILON {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / span).clamp(0.0, 1.0)
    }

    /// Build the GPU-side uniform.
    pub fn to_uniform(&self) -> FogUniform {
        FogUniform {
            color_near: [self.color.x, self.color.y, self.color.z, self.near],
            far_padding: [self.far, 0.0, 0.0, 0.0],
        }
    }
}

/// GPU-side fog, 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FogUniform {
    /// xyz = color, w = near.
    pub color_near: [f32; 4],
    /// x = far, yzw = padding.
    pub far_padding: [f32; 4],
}

static_assertions::assert_eq_size!(FogUniform, [u8; 32]);
