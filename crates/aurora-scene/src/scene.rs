//! The scene root: an insertion-ordered node store plus global fog.

use rustc_hash::FxHashMap;

use crate::fog::Fog;
use crate::node::{Node, NodeId};

/// Scene graph root shared by every subsystem that draws.
///
/// Systems own the nodes they add and must remove them on teardown; nodes
/// added by someone else are only touched through handles they hand out.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: FxHashMap<NodeId, Node>,
    order: Vec<NodeId>,
    next_id: u64,
    fog: Option<Fog>,
}

impl Scene {
    /// Empty scene without fog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node and return its handle.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        self.order.push(id);
        id
    }

    /// Detach a node, returning it. `None` if it was already removed.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// First node, in insertion order, carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.nodes[id].name.as_deref() == Some(name))
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.order.iter().map(|id| (*id, &self.nodes[id]))
    }

    pub fn fog(&self) -> Option<&Fog> {
        self.fog.as_ref()
    }

    pub fn fog_mut(&mut self) -> Option<&mut Fog> {
        self.fog.as_mut()
    }

    /// Replace (or clear) the scene fog.
    pub fn set_fog(&mut self, fog: Option<Fog>) {
        self.fog = fog;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::AmbientLight;
    use crate::material::{Geometry, Material};
    use crate::node::NodeKind;
    use glam::Vec3;

    fn quad() -> Node {
        Node::mesh(
            Geometry::Quad {
                width: 1.0,
                height: 1.0,
            },
            Material::default(),
        )
    }

    #[test]
    fn test_add_remove_roundtrip() {
        let mut scene = Scene::new();
        let a = scene.add(quad());
        let b = scene.add(quad());
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a).is_some());
        assert!(scene.remove(a).is_none(), "second removal must be a no-op");
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.add(quad());
        scene.remove(a);
        let b = scene.add(quad());
        assert_ne!(a, b);
    }

    #[test]
    fn test_find_by_name() {
        let mut scene = Scene::new();
        scene.add(quad().with_name("shell"));
        let light = scene.add(
            Node::new(NodeKind::AmbientLight(AmbientLight::default())).with_name("ambient-light"),
        );
        assert_eq!(scene.find_by_name("ambient-light"), Some(light));
        assert_eq!(scene.find_by_name("missing"), None);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..5).map(|_| scene.add(quad())).collect();
        scene.remove(ids[2]);
        let seen: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(seen, vec![ids[0], ids[1], ids[3], ids[4]]);
    }

    #[test]
    fn test_fog_is_optional() {
        let mut scene = Scene::new();
        assert!(scene.fog().is_none());
        scene.set_fog(Some(Fog::new(Vec3::ONE, 8.0, 64.0)));
        scene.fog_mut().unwrap().color = Vec3::ZERO;
        assert_eq!(scene.fog().unwrap().color, Vec3::ZERO);
        assert_eq!(scene.fog().unwrap().far, 64.0);
    }
}
