use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod content;
mod resource_names;

pub use app::{
    boxes_overlap, compare_render_order, open_audio, rotating_sfx_channel, run_app, Actor,
    ActorDesc, ActorHandle, ActorId, ActorIdAllocator, ActorViews, AppError, AudioCommand,
    AudioSink, BoxSize, Camera2D, Canvas, Collider, ColliderKind, DialogueEvent, Direction, Game,
    GameContext, GameError, InputAction, InputSnapshot, KiraAudio, LoopCommand, LoopConfig,
    LoopMetricsSnapshot, Playback, RecordingAudio, RenderSettings, SceneWorld, SilentAudio,
    TickContext, TickEvents, Vec2, Viewport, FIRST_SFX_CHANNEL, MUSIC_CHANNEL, PLAYER_NAME,
    SCENE_UNIT_PX, STINGER_CHANNEL,
};
pub use content::{
    load_game_config, load_rendering_config, ContentError, GameConfig, LoadedScene,
    RenderingConfig, ResourcePaths, SceneLoader,
};

pub const ROOT_ENV_VAR: &str = "STAGE_ROOT";

const RESOURCES_DIR_NAME: &str = "resources";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("failed to resolve current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "STAGE_ROOT is set but does not point to a valid game root: {path}\n\
A valid root must contain a resources/ directory."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not find a resources/ directory in the working directory or above the executable: {start_dir}\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/game\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Locates the game root and derives every resource directory from it.
///
/// Resolution order: `STAGE_ROOT`, then the working directory, then the
/// ancestors of the executable.
pub fn resolve_resource_paths() -> Result<ResourcePaths, StartupError> {
    let root = resolve_root()?;
    Ok(ResourcePaths::new(root.join(RESOURCES_DIR_NAME)))
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let normalized = normalize_path(&PathBuf::from(value));
            if is_root_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let cwd = env::current_dir().map_err(StartupError::CurrentDir)?;
            if is_root_marker(&cwd) {
                return Ok(normalize_path(&cwd));
            }

            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;
            find_root_above(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|candidate| is_root_marker(candidate))
        .map(normalize_path)
}

fn is_root_marker(path: &Path) -> bool {
    path.join(RESOURCES_DIR_NAME).is_dir()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
