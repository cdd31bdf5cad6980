//! Scene nodes and their handles.

use glam::{Mat4, Quat, Vec3};

use crate::light::{AmbientLight, DirectionalLight};
use crate::material::{Geometry, Material};

/// Stable handle to a node in a [`Scene`](crate::Scene). Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// What a node draws or emits.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Mesh {
        geometry: Geometry,
        material: Material,
    },
    AmbientLight(AmbientLight),
    DirectionalLight(DirectionalLight),
}

/// A transformable scene object.
#[derive(Clone, Debug)]
pub struct Node {
    /// Optional lookup name.
    pub name: Option<String>,
    /// Payload.
    pub kind: NodeKind,
    /// World-space translation.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Hidden nodes stay in the scene but are skipped when drawing.
    pub visible: bool,
    /// Lower values draw first within a pass.
    pub render_order: i32,
}

impl Node {
    /// Visible node at the origin with identity transform.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            render_order: 0,
        }
    }

    /// Mesh node.
    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self::new(NodeKind::Mesh { geometry, material })
    }

    /// Set the lookup name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the draw order.
    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }

    /// Local-to-world transform.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    pub fn directional_light(&self) -> Option<&DirectionalLight> {
        match &self.kind {
            NodeKind::DirectionalLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn directional_light_mut(&mut self) -> Option<&mut DirectionalLight> {
        match &mut self.kind {
            NodeKind::DirectionalLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn ambient_light(&self) -> Option<&AmbientLight> {
        match &self.kind {
            NodeKind::AmbientLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn ambient_light_mut(&mut self) -> Option<&mut AmbientLight> {
        match &mut self.kind {
            NodeKind::AmbientLight(light) => Some(light),
            _ => None,
        }
    }

    /// True for either light kind.
    pub fn is_light(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::AmbientLight(_) | NodeKind::DirectionalLight(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_matrix_applies_scale_then_translation() {
        let mut node = Node::mesh(
            Geometry::Quad {
                width: 1.0,
                height: 1.0,
            },
            Material::default(),
        );
        node.position = Vec3::new(10.0, 0.0, 0.0);
        node.scale = Vec3::splat(4.0);
        let corner = node.world_matrix().transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert!((corner - Vec3::new(12.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_kind_accessors() {
        let mut light = Node::new(NodeKind::AmbientLight(AmbientLight::default()));
        assert!(light.is_light());
        assert!(light.material().is_none());
        light.ambient_light_mut().unwrap().intensity = 0.1;
        assert_eq!(light.ambient_light().unwrap().intensity, 0.1);
        assert!(light.directional_light().is_none());
    }
}
