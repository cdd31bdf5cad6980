//! Geometry and material descriptions for mesh nodes.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::texture::TextureHandle;

/// Shape of a mesh node, in node-local units.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// UV sphere centred on the node origin.
    Sphere { radius: f32, segments: u32 },
    /// Unit-facing quad in the local XY plane, normal +Z.
    Quad { width: f32, height: f32 },
    /// Point cloud, one sprite per position.
    Points {
        positions: Vec<Vec3>,
        colors: Vec<[f32; 3]>,
        size: f32,
    },
}

/// Which faces a material renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Surface description of a mesh node.
///
/// The texture is private so rebinding always goes through
/// [`set_texture`](Self::set_texture), which bumps [`version`](Self::version)
/// only when the bound texture actually changes.
#[derive(Clone, Debug)]
pub struct Material {
    /// Linear RGB tint.
    pub color: Vec3,
    /// Alpha in `[0, 1]`.
    pub opacity: f32,
    /// Rendered in the blended pass.
    pub transparent: bool,
    /// Face culling mode.
    pub side: Side,
    /// Writes to the depth buffer.
    pub depth_write: bool,
    /// Affected by scene fog.
    pub fog: bool,
    texture: Option<TextureHandle>,
    version: u32,
}

impl Material {
    /// Opaque, untextured, fogged material with the given tint.
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            depth_write: true,
            fog: true,
            texture: None,
            version: 0,
        }
    }

    /// Currently bound texture, if any.
    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    /// Bind `texture`. Returns `false` (and leaves the version untouched)
    /// when the same texture, or lack of one, is already bound.
    pub fn set_texture(&mut self, texture: Option<TextureHandle>) -> bool {
        let unchanged = match (&self.texture, &texture) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }
        self.texture = texture;
        self.version = self.version.wrapping_add(1);
        true
    }

    /// Incremented on every texture rebind.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Build the GPU-side uniform.
    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            color_opacity: [self.color.x, self.color.y, self.color.z, self.opacity],
            flags: [
                u32::from(self.texture.is_some()),
                u32::from(self.transparent),
                u32::from(self.fog),
                0,
            ],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec3::ONE)
    }
}

/// GPU-side material, 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    /// xyz = tint, w = opacity.
    pub color_opacity: [f32; 4],
    /// x = has texture, y = transparent, z = fogged, w = padding.
    pub flags: [u32; 4],
}

static_assertions::assert_eq_size!(MaterialUniform, [u8; 32]);
