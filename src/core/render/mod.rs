pub mod animation;
pub mod node;
pub mod scene;
pub mod pass;

pub use animation::{Animation, AnimationCompleted, AnimationKind, AnimationOptions, AnimationSettings, FinishAction};
pub use node::{NodeKind, SceneNode};
pub use scene::{FlattenedBuffer, Scene, SceneLayer};
pub use pass::{BorderStyle, Color, CompositingPass, Frame, RenderElement};
