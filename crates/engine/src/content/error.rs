use std::path::PathBuf;

use thiserror::Error;

use crate::resource_names::ResourceNameError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("resources directory not found at {path}")]
    MissingResourcesDir { path: PathBuf },
    #[error("required file is missing: {path}")]
    MissingFile { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} at `{field}`: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid resource name {name:?}: {source}")]
    InvalidResourceName {
        name: String,
        #[source]
        source: ResourceNameError,
    },
    #[error("{path} does not name an initial_scene")]
    MissingInitialScene { path: PathBuf },
    #[error("scene {scene:?} not found at {path}")]
    MissingScene { scene: String, path: PathBuf },
    #[error("template {template:?} not found at {path}")]
    MissingTemplate { template: String, path: PathBuf },
    #[error("image {name:?} not found at {path}")]
    MissingImage { name: String, path: PathBuf },
    #[error("failed to read image header of {path}: {source}")]
    ImageHeader {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("audio {name:?} not found as .wav or .ogg in {dir}")]
    MissingAudio { name: String, dir: PathBuf },
    #[error("intro_text is set but no font is configured")]
    MissingFont,
    #[error("scene {scene:?} has a player but game.config has no hp_image")]
    MissingHpImage { scene: String },
}
