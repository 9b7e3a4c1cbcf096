use std::path::PathBuf;

use stage_engine::{
    load_game_config, load_rendering_config, open_audio, resolve_resource_paths, AudioSink,
    ContentError, Game, LoopConfig, RenderSettings, StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::stage::StageGame;

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Content(#[from] ContentError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) render_settings: RenderSettings,
    pub(crate) images_dir: PathBuf,
    pub(crate) audio: Box<dyn AudioSink>,
    pub(crate) game: Box<dyn Game>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    info!("=== Stage Startup ===");

    let paths = resolve_resource_paths()?;
    info!(resources = %paths.resources_dir.display(), "resources_resolved");
    let game_config = load_game_config(&paths)?;
    let rendering = load_rendering_config(&paths)?;
    let render_settings = RenderSettings::from_config(&rendering);

    let defaults = LoopConfig::default();
    let config = LoopConfig {
        window_title: if game_config.game_title.is_empty() {
            defaults.window_title.clone()
        } else {
            game_config.game_title.clone()
        },
        window_width: render_settings.viewport.width,
        window_height: render_settings.viewport.height,
        ..defaults
    };

    let images_dir = paths.images_dir.clone();
    let audio = open_audio(paths.audio_dir.clone());
    let game = StageGame::new(paths, game_config, &rendering)?;

    Ok(AppWiring {
        config,
        render_settings,
        images_dir,
        audio,
        game: Box::new(game),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
