//! Retained-mode scene graph shared between the sky and the rest of the game.
//!
//! The sky only ever touches the nodes it creates itself, plus the fog and an
//! ambient light handed to it by the lighting rig. Textures arrive through an
//! asynchronous [`TextureLoader`] and are polled once per frame.

mod camera;
mod fog;
mod light;
pub mod loader;
mod material;
mod node;
mod scene;
mod texture;

pub use camera::{Camera, Viewpoint};
pub use fog::{Fog, FogUniform};
pub use light::{
    AmbientLight, AmbientLightUniform, DirectionalLight, DirectionalLightUniform, ShadowFrustum,
};
pub use loader::{
    QueuedTextureLoader, RequestStatus, TextureCompleter, TextureLoader, TextureRequest,
    ThreadedTextureLoader,
};
pub use material::{Geometry, Material, MaterialUniform, Side};
pub use node::{Node, NodeId, NodeKind};
pub use scene::Scene;
pub use texture::{Texture, TextureError, TextureHandle};

/// Name under which the lighting rig registers its ambient light.
pub const AMBIENT_LIGHT_NAME: &str = "ambient-light";
