use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::app::{ActorDesc, ActorIdAllocator, ActorViews, BoxSize, SceneWorld, Vec2};

use super::{ActorProps, ContentError, GameConfig, RenderingConfig, ResourcePaths, SceneFile};

/// A freshly built scene plus the engine-wide sounds its actors declared.
#[derive(Debug)]
pub struct LoadedScene {
    pub world: SceneWorld,
    pub step_sfx: Option<String>,
    pub damage_sfx: Option<String>,
}

/// Loads and validates `game.config`. Every image and sound it names must
/// exist on disk.
pub fn load_game_config(paths: &ResourcePaths) -> Result<GameConfig, ContentError> {
    paths.ensure_resources_dir()?;
    let path = paths.game_config_path();
    if !path.is_file() {
        return Err(ContentError::MissingFile { path });
    }
    let config: GameConfig = read_json(&path)?;

    let initial_scene = config
        .initial_scene
        .as_deref()
        .ok_or_else(|| ContentError::MissingInitialScene { path: path.clone() })?;
    let scene_path = paths.scene_path(initial_scene)?;
    if !scene_path.is_file() {
        return Err(ContentError::MissingScene {
            scene: initial_scene.to_string(),
            path: scene_path,
        });
    }
    if !config.intro_text.is_empty() && config.font.is_none() {
        return Err(ContentError::MissingFont);
    }

    let images = config
        .intro_image
        .iter()
        .chain(config.hp_image.iter())
        .chain(config.game_over_good_image.iter())
        .chain(config.game_over_bad_image.iter());
    for image in images {
        paths.require_image(image)?;
    }
    let sounds = [
        &config.intro_bgm,
        &config.gameplay_audio,
        &config.game_over_good_audio,
        &config.game_over_bad_audio,
        &config.score_sfx,
    ];
    for sound in sounds.into_iter().flatten() {
        paths.require_audio(sound)?;
    }

    info!(
        title = config.game_title.as_str(),
        initial_scene,
        intro_images = config.intro_image.len(),
        "game_config_loaded"
    );
    Ok(config)
}

/// Loads `rendering.config`, or the defaults when the file is absent.
pub fn load_rendering_config(paths: &ResourcePaths) -> Result<RenderingConfig, ContentError> {
    let path = paths.rendering_config_path();
    if !path.is_file() {
        debug!(path = %path.display(), "rendering_config_absent_using_defaults");
        return Ok(RenderingConfig::default());
    }
    read_json(&path)
}

/// Builds scenes from disk. Templates are parsed once and reused by every
/// later scene.
#[derive(Debug)]
pub struct SceneLoader {
    paths: ResourcePaths,
    templates: HashMap<String, ActorProps>,
}

impl SceneLoader {
    pub fn new(paths: ResourcePaths) -> Self {
        Self {
            paths,
            templates: HashMap::new(),
        }
    }

    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    pub fn load_scene(
        &mut self,
        scene: &str,
        allocator: &mut ActorIdAllocator,
    ) -> Result<LoadedScene, ContentError> {
        let path = self.paths.scene_path(scene)?;
        if !path.is_file() {
            return Err(ContentError::MissingScene {
                scene: scene.to_string(),
                path,
            });
        }
        let file: SceneFile = read_json(&path)?;

        let mut loaded = LoadedScene {
            world: SceneWorld::new(scene),
            step_sfx: None,
            damage_sfx: None,
        };
        for entry in file.actors {
            let props = self.apply_template(entry)?;
            if let Some(sound) = &props.step_sfx {
                self.paths.require_audio(sound)?;
                loaded.step_sfx = Some(sound.clone());
            }
            if let Some(sound) = &props.damage_sfx {
                self.paths.require_audio(sound)?;
                loaded.damage_sfx = Some(sound.clone());
            }
            let desc = self.resolve_actor(props)?;
            loaded.world.spawn(allocator, desc);
        }
        loaded.world.refresh_render_order();

        info!(
            scene,
            entity_count = loaded.world.actor_count(),
            moving = loaded.world.moving_actors().len(),
            has_player = loaded.world.player().is_some(),
            "scene_loaded"
        );
        Ok(loaded)
    }

    fn apply_template(&mut self, entry: ActorProps) -> Result<ActorProps, ContentError> {
        let Some(template) = entry.template.clone() else {
            return Ok(entry);
        };
        if !self.templates.contains_key(&template) {
            let path = self.paths.template_path(&template)?;
            if !path.is_file() {
                return Err(ContentError::MissingTemplate { template, path });
            }
            let props: ActorProps = read_json(&path)?;
            debug!(template = template.as_str(), "template_loaded");
            self.templates.insert(template.clone(), props);
        }
        let base = self.templates.get(&template).cloned().unwrap_or_default();
        Ok(base.overridden_by(entry))
    }

    fn resolve_actor(&self, props: ActorProps) -> Result<ActorDesc, ContentError> {
        let views = ActorViews {
            front: self.checked_image(props.view_image)?,
            back: self.checked_image(props.view_image_back)?,
            damage: self.checked_image(props.view_image_damage)?,
            attack: self.checked_image(props.view_image_attack)?,
        };
        if let Some(sound) = &props.nearby_dialogue_sfx {
            self.paths.require_audio(sound)?;
        }

        let (pivot_x, pivot_y) = match (props.view_pivot_offset_x, props.view_pivot_offset_y) {
            (Some(x), Some(y)) => (x, y),
            (x, y) => {
                let (width, height) = match &views.front {
                    Some(front) => self.image_size(front)?,
                    None => (0, 0),
                };
                (
                    x.unwrap_or(width as f32 * 0.5),
                    y.unwrap_or(height as f32 * 0.5),
                )
            }
        };

        Ok(ActorDesc {
            name: props.name.unwrap_or_default(),
            position: Vec2::new(
                props.transform_position_x.unwrap_or(0.0),
                props.transform_position_y.unwrap_or(0.0),
            ),
            velocity: Vec2::new(props.vel_x.unwrap_or(0.0), props.vel_y.unwrap_or(0.0)),
            nearby_dialogue: props.nearby_dialogue.unwrap_or_default(),
            contact_dialogue: props.contact_dialogue.unwrap_or_default(),
            nearby_dialogue_sfx: props.nearby_dialogue_sfx,
            views,
            scale: Vec2::new(
                props.transform_scale_x.unwrap_or(1.0),
                props.transform_scale_y.unwrap_or(1.0),
            ),
            rotation_degrees: props.transform_rotation_degrees.unwrap_or(0.0),
            pivot: Vec2::new(pivot_x, pivot_y),
            render_order: props.render_order,
            bounce: props.movement_bounce_enabled.unwrap_or(false),
            collision_box: box_size(props.box_collider_width, props.box_collider_height),
            trigger_box: box_size(props.box_trigger_width, props.box_trigger_height),
        })
    }

    fn checked_image(&self, image: Option<String>) -> Result<Option<String>, ContentError> {
        if let Some(name) = &image {
            self.paths.require_image(name)?;
        }
        Ok(image)
    }

    fn image_size(&self, image: &str) -> Result<(u32, u32), ContentError> {
        let path = self.paths.image_path(image)?;
        image::image_dimensions(&path).map_err(|source| ContentError::ImageHeader { path, source })
    }
}

fn box_size(width: Option<f32>, height: Option<f32>) -> Option<BoxSize> {
    match (width, height) {
        (Some(width), Some(height)) => Some(BoxSize { width, height }),
        _ => None,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ContentError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}
