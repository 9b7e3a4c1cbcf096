mod discovery;
mod error;
mod loader;
mod types;

pub use discovery::{resolve_audio_file, ResourcePaths};
pub use error::ContentError;
pub use loader::{load_game_config, load_rendering_config, LoadedScene, SceneLoader};
pub use types::{ActorProps, GameConfig, RenderingConfig, SceneFile};
