pub mod animate;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
pub mod overlay;
pub mod picking;
pub mod registry;
pub mod reveal;
pub mod scene;
pub mod session;
pub mod tap;
pub mod tween;

pub use animate::*;
pub use camera::*;
pub use config::*;
pub use error::*;
pub use gate::*;
pub use overlay::*;
pub use picking::*;
pub use registry::*;
pub use reveal::*;
pub use scene::*;
pub use session::*;
pub use tap::*;
pub use tween::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static SPRITE_WGSL: &str = include_str!("../shaders/sprite.wgsl");
