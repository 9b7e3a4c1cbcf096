use stage_engine::{
    rotating_sfx_channel, ActorIdAllocator, Camera2D, Canvas, ContentError, GameConfig,
    GameContext, Playback, RenderingConfig, ResourcePaths, SceneLoader, SceneWorld, TickContext,
    Vec2,
};
use tracing::info;

use super::dialogue::{DialogueOutcome, DialogueProcessor, Ending};
use super::intro::{TEXT_BOTTOM_OFFSET, TEXT_MARGIN_X};

const DIALOGUE_LINE_SPACING: i32 = 50;
const HUD_MARGIN: i32 = 5;
const HUD_ICON_TOP: i32 = 25;

/// The playable part of the game: the current scene, the camera following
/// the player, and the health and score the dialogue drives.
#[derive(Debug)]
pub(crate) struct GameplaySession {
    loader: SceneLoader,
    ids: ActorIdAllocator,
    world: SceneWorld,
    camera: Camera2D,
    dialogue: DialogueProcessor,
    player_speed: f32,
    step_sfx: Option<String>,
    hp_image: Option<String>,
    nearby_lines: Vec<String>,
}

impl GameplaySession {
    /// Loads `initial_scene` and points the camera straight at its player.
    pub(crate) fn new(
        paths: ResourcePaths,
        game: &GameConfig,
        rendering: &RenderingConfig,
        initial_scene: &str,
    ) -> Result<Self, ContentError> {
        let mut session = Self {
            loader: SceneLoader::new(paths),
            ids: ActorIdAllocator::default(),
            world: SceneWorld::new(initial_scene),
            camera: Camera2D::new(
                Vec2::new(rendering.cam_offset_x, rendering.cam_offset_y),
                rendering.zoom_factor,
                rendering.cam_ease_factor,
            ),
            dialogue: DialogueProcessor::new(game.score_sfx.clone()),
            player_speed: game.player_speed(),
            step_sfx: None,
            hp_image: game.hp_image.clone(),
            nearby_lines: Vec::new(),
        };
        session.load_scene(initial_scene)?;
        if let Some(player) = session.world.player_actor() {
            session.camera.snap_to(player.position());
        }
        Ok(session)
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub(crate) fn health(&self) -> i32 {
        self.dialogue.health()
    }

    pub(crate) fn score(&self) -> u32 {
        self.dialogue.score()
    }

    #[cfg(test)]
    pub(crate) fn nearby_lines(&self) -> &[String] {
        &self.nearby_lines
    }

    /// Replaces the current scene. Step and damage sounds carry over unless
    /// the new scene declares its own.
    fn load_scene(&mut self, scene: &str) -> Result<(), ContentError> {
        let loaded = self.loader.load_scene(scene, &mut self.ids)?;
        if loaded.world.player().is_some() && self.hp_image.is_none() {
            return Err(ContentError::MissingHpImage {
                scene: scene.to_string(),
            });
        }
        if let Some(sound) = loaded.step_sfx {
            self.step_sfx = Some(sound);
        }
        if let Some(sound) = loaded.damage_sfx {
            self.dialogue.set_damage_sfx(sound);
        }
        self.world = loaded.world;
        self.nearby_lines.clear();
        Ok(())
    }

    /// Runs one tick of the scene and applies whatever its dialogue asked
    /// for. A requested scene is loaded before returning; it first updates
    /// on the following tick.
    pub(crate) fn update(
        &mut self,
        ctx: &mut GameContext<'_>,
    ) -> Result<Option<Ending>, ContentError> {
        let events = self.world.update(&mut TickContext {
            input: ctx.input,
            frame: ctx.frame,
            player_speed: self.player_speed,
            step_sound: self.step_sfx.as_deref(),
            audio: &mut *ctx.audio,
        });

        self.nearby_lines.clear();
        let Some(player_position) = self.world.player_actor().map(|player| player.position())
        else {
            return Ok(None);
        };
        self.camera.follow(player_position);

        let mut ending = None;
        let mut next_scene = None;
        let mut apply = |outcome: DialogueOutcome| match outcome {
            DialogueOutcome::Continue => {}
            DialogueOutcome::Ending(Ending::Bad) => ending = Some(Ending::Bad),
            DialogueOutcome::Ending(Ending::Good) => {
                ending.get_or_insert(Ending::Good);
            }
            DialogueOutcome::ProceedTo(scene) => next_scene = Some(scene),
        };

        for event in &events.contact {
            apply(
                self.dialogue
                    .process(event, &mut self.world, ctx.frame, &mut *ctx.audio),
            );
        }
        for event in &events.nearby {
            apply(
                self.dialogue
                    .process(event, &mut self.world, ctx.frame, &mut *ctx.audio),
            );
            if let Some(actor) = self.world.actor_mut(event.speaker) {
                if let Some(sound) = actor.claim_nearby_dialogue_sfx() {
                    ctx.audio
                        .play(sound, rotating_sfx_channel(ctx.frame), Playback::Once);
                }
            }
            self.nearby_lines.push(event.text.clone());
        }

        if ending.is_some() {
            return Ok(ending);
        }
        if let Some(scene) = next_scene {
            info!(
                from = self.world.name(),
                to = scene.as_str(),
                frame = ctx.frame,
                "scene_transition"
            );
            self.load_scene(&scene)?;
        }
        Ok(None)
    }

    pub(crate) fn render(&self, canvas: &mut Canvas<'_>, frame: u64) {
        canvas.draw_scene(&self.world, &self.camera, frame);
        if self.world.player().is_none() {
            return;
        }

        let height = canvas.viewport().height as i32;
        let count = self.nearby_lines.len() as i32;
        for (i, line) in self.nearby_lines.iter().enumerate() {
            let y = height - TEXT_BOTTOM_OFFSET - (count - 1 - i as i32) * DIALOGUE_LINE_SPACING;
            canvas.draw_text(line, TEXT_MARGIN_X, y);
        }
        self.render_hud(canvas);
    }

    fn render_hud(&self, canvas: &mut Canvas<'_>) {
        if let Some(hp_image) = &self.hp_image {
            if let Some((icon_width, _)) = canvas.image_size(hp_image) {
                for i in 0..self.health().max(0) {
                    let x = HUD_MARGIN + i * (icon_width as i32 + HUD_MARGIN);
                    canvas.draw_image(hp_image, x, HUD_ICON_TOP);
                }
            }
        }
        canvas.draw_text(&format!("score : {}", self.score()), HUD_MARGIN, HUD_MARGIN);
    }
}
