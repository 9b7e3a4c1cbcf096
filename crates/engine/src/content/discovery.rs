use std::path::{Path, PathBuf};

use crate::resource_names::validate_resource_name;

use super::ContentError;

const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "ogg"];

/// Where every kind of game resource lives, derived from one `resources/` dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub resources_dir: PathBuf,
    pub scenes_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub images_dir: PathBuf,
    pub audio_dir: PathBuf,
}

impl ResourcePaths {
    pub fn new(resources_dir: PathBuf) -> Self {
        Self {
            scenes_dir: resources_dir.join("scenes"),
            templates_dir: resources_dir.join("actor_templates"),
            images_dir: resources_dir.join("images"),
            audio_dir: resources_dir.join("audio"),
            resources_dir,
        }
    }

    pub fn game_config_path(&self) -> PathBuf {
        self.resources_dir.join("game.config")
    }

    pub fn rendering_config_path(&self) -> PathBuf {
        self.resources_dir.join("rendering.config")
    }

    pub fn scene_path(&self, scene: &str) -> Result<PathBuf, ContentError> {
        checked_name(scene)?;
        Ok(self.scenes_dir.join(format!("{scene}.scene")))
    }

    pub fn template_path(&self, template: &str) -> Result<PathBuf, ContentError> {
        checked_name(template)?;
        Ok(self.templates_dir.join(format!("{template}.template")))
    }

    pub fn image_path(&self, image: &str) -> Result<PathBuf, ContentError> {
        checked_name(image)?;
        Ok(self.images_dir.join(format!("{image}.png")))
    }

    pub fn ensure_resources_dir(&self) -> Result<(), ContentError> {
        if self.resources_dir.is_dir() {
            Ok(())
        } else {
            Err(ContentError::MissingResourcesDir {
                path: self.resources_dir.clone(),
            })
        }
    }

    /// Errors unless `<images>/<image>.png` exists.
    pub fn require_image(&self, image: &str) -> Result<PathBuf, ContentError> {
        let path = self.image_path(image)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(ContentError::MissingImage {
                name: image.to_string(),
                path,
            })
        }
    }

    /// Errors unless `<audio>/<sound>.wav` or `.ogg` exists.
    pub fn require_audio(&self, sound: &str) -> Result<PathBuf, ContentError> {
        checked_name(sound)?;
        resolve_audio_file(&self.audio_dir, sound).ok_or_else(|| ContentError::MissingAudio {
            name: sound.to_string(),
            dir: self.audio_dir.clone(),
        })
    }
}

/// First existing audio file for `sound`, trying `.wav` before `.ogg`.
pub fn resolve_audio_file(audio_dir: &Path, sound: &str) -> Option<PathBuf> {
    validate_resource_name(sound).ok()?;
    AUDIO_EXTENSIONS
        .iter()
        .map(|extension| audio_dir.join(format!("{sound}.{extension}")))
        .find(|candidate| candidate.is_file())
}

fn checked_name(name: &str) -> Result<(), ContentError> {
    validate_resource_name(name).map_err(|source| ContentError::InvalidResourceName {
        name: name.to_string(),
        source,
    })
}
