use stage_engine::{
    AudioSink, Canvas, ContentError, Game, GameConfig, GameContext, GameError, LoopCommand,
    Playback, RenderingConfig, ResourcePaths, MUSIC_CHANNEL,
};
use tracing::info;

use super::dialogue::Ending;
use super::intro::IntroSequence;
use super::session::GameplaySession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameState {
    Intro,
    MainGame,
    Ending,
    Exiting,
}

/// Top-level game: intro slides, then gameplay, then an ending screen.
#[derive(Debug)]
pub(crate) struct StageGame {
    config: GameConfig,
    state: GameState,
    intro: IntroSequence,
    session: GameplaySession,
    ending_image: Option<String>,
}

impl StageGame {
    pub(crate) fn new(
        paths: ResourcePaths,
        config: GameConfig,
        rendering: &RenderingConfig,
    ) -> Result<Self, ContentError> {
        let initial_scene = config
            .initial_scene
            .clone()
            .ok_or_else(|| ContentError::MissingInitialScene {
                path: paths.game_config_path(),
            })?;
        let session = GameplaySession::new(paths, &config, rendering, &initial_scene)?;
        Ok(Self {
            intro: IntroSequence::new(config.intro_image.clone(), config.intro_text.clone()),
            config,
            state: GameState::Intro,
            session,
            ending_image: None,
        })
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    fn change_state(&mut self, next: GameState) {
        info!(from = ?self.state, to = ?next, "game_state_changed");
        self.state = next;
    }

    fn start_main_game(&mut self, audio: &mut dyn AudioSink) {
        if self.config.intro_bgm.is_some() {
            audio.halt(MUSIC_CHANNEL);
        }
        if let Some(music) = &self.config.gameplay_audio {
            audio.play(music, MUSIC_CHANNEL, Playback::Looping);
        }
        self.change_state(GameState::MainGame);
    }

    fn start_ending(&mut self, ending: Ending, audio: &mut dyn AudioSink) -> LoopCommand {
        let (image, sound) = match ending {
            Ending::Good => (
                &self.config.game_over_good_image,
                &self.config.game_over_good_audio,
            ),
            Ending::Bad => (
                &self.config.game_over_bad_image,
                &self.config.game_over_bad_audio,
            ),
        };
        if let Some(sound) = sound {
            audio.halt(MUSIC_CHANNEL);
            audio.play(sound, MUSIC_CHANNEL, Playback::Once);
        }
        info!(?ending, score = self.session.score(), "game_over");
        match image.clone() {
            Some(image) => {
                self.ending_image = Some(image);
                self.change_state(GameState::Ending);
                LoopCommand::Continue
            }
            None => {
                self.change_state(GameState::Exiting);
                LoopCommand::Exit
            }
        }
    }
}

impl Game for StageGame {
    fn load(&mut self, audio: &mut dyn AudioSink) {
        if let Some(music) = &self.config.intro_bgm {
            audio.play(music, MUSIC_CHANNEL, Playback::Looping);
        }
    }

    fn update(&mut self, ctx: &mut GameContext<'_>) -> Result<LoopCommand, GameError> {
        if ctx.input.quit_requested() {
            self.change_state(GameState::Exiting);
        }

        if self.state == GameState::Intro {
            self.intro.handle_input(ctx.input);
            if self.intro.is_done() {
                self.start_main_game(&mut *ctx.audio);
            }
        }

        match self.state {
            GameState::Intro | GameState::Ending => Ok(LoopCommand::Continue),
            GameState::MainGame => match self.session.update(ctx)? {
                Some(ending) => Ok(self.start_ending(ending, &mut *ctx.audio)),
                None => Ok(LoopCommand::Continue),
            },
            GameState::Exiting => Ok(LoopCommand::Exit),
        }
    }

    fn render(&mut self, canvas: &mut Canvas<'_>, frame: u64) {
        match self.state {
            GameState::Intro => self.intro.render(canvas),
            GameState::MainGame => self.session.render(canvas, frame),
            GameState::Ending | GameState::Exiting => {
                if let Some(image) = &self.ending_image {
                    canvas.draw_fullscreen_image(image);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use stage_engine::{AudioCommand, InputAction, InputSnapshot, RecordingAudio};
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        _temp: TempDir,
        paths: ResourcePaths,
    }

    fn fixture(scene_json: &str) -> Fixture {
        let temp = TempDir::new().expect("tempdir");
        let paths = ResourcePaths::new(temp.path().join("resources"));
        fs::create_dir_all(&paths.scenes_dir).expect("mkdir");
        fs::write(paths.scenes_dir.join("start.scene"), scene_json).expect("write scene");
        Fixture { _temp: temp, paths }
    }

    const WIN_ON_SIGHT: &str = r#"{ "actors": [
        { "name": "player", "box_trigger_width": 1.0, "box_trigger_height": 1.0 },
        { "name": "oracle", "nearby_dialogue": "you win",
          "box_trigger_width": 1.0, "box_trigger_height": 1.0 }
    ] }"#;

    fn config() -> GameConfig {
        GameConfig {
            initial_scene: Some("start".to_string()),
            intro_image: vec!["title".to_string()],
            intro_bgm: Some("theme".to_string()),
            gameplay_audio: Some("level".to_string()),
            hp_image: Some("heart".to_string()),
            game_over_good_image: Some("victory".to_string()),
            game_over_good_audio: Some("fanfare".to_string()),
            ..GameConfig::default()
        }
    }

    fn step(
        game: &mut StageGame,
        input: InputSnapshot,
        frame: u64,
        audio: &mut RecordingAudio,
    ) -> LoopCommand {
        game.update(&mut GameContext {
            input: &input,
            frame,
            audio,
        })
        .expect("update")
    }

    #[test]
    fn intro_waits_for_advance_then_swaps_music() {
        let fx = fixture(r#"{ "actors": [] }"#);
        let mut game =
            StageGame::new(fx.paths.clone(), config(), &RenderingConfig::default()).expect("game");
        let mut audio = RecordingAudio::default();
        game.load(&mut audio);

        step(&mut game, InputSnapshot::empty(), 0, &mut audio);
        assert_eq!(game.state(), GameState::Intro);

        step(
            &mut game,
            InputSnapshot::empty().with_action_pressed(InputAction::Advance),
            1,
            &mut audio,
        );
        assert_eq!(game.state(), GameState::MainGame);
        assert_eq!(
            audio.commands(),
            [
                AudioCommand::Play {
                    sound: "theme".to_string(),
                    channel: MUSIC_CHANNEL,
                    playback: Playback::Looping,
                },
                AudioCommand::Halt {
                    channel: MUSIC_CHANNEL
                },
                AudioCommand::Play {
                    sound: "level".to_string(),
                    channel: MUSIC_CHANNEL,
                    playback: Playback::Looping,
                },
            ]
        );
    }

    #[test]
    fn no_intro_images_starts_gameplay_on_first_tick() {
        let fx = fixture(r#"{ "actors": [] }"#);
        let config = GameConfig {
            intro_image: Vec::new(),
            ..config()
        };
        let mut game =
            StageGame::new(fx.paths.clone(), config, &RenderingConfig::default()).expect("game");
        let mut audio = RecordingAudio::default();

        step(&mut game, InputSnapshot::empty(), 0, &mut audio);
        assert_eq!(game.state(), GameState::MainGame);
    }

    #[test]
    fn winning_shows_good_ending_and_plays_its_audio_once() {
        let fx = fixture(WIN_ON_SIGHT);
        let config = GameConfig {
            intro_image: Vec::new(),
            ..config()
        };
        let mut game =
            StageGame::new(fx.paths.clone(), config, &RenderingConfig::default()).expect("game");
        let mut audio = RecordingAudio::default();

        let command = step(&mut game, InputSnapshot::empty(), 0, &mut audio);
        assert_eq!(command, LoopCommand::Continue);
        assert_eq!(game.state(), GameState::Ending);
        assert_eq!(
            audio.commands().last(),
            Some(&AudioCommand::Play {
                sound: "fanfare".to_string(),
                channel: MUSIC_CHANNEL,
                playback: Playback::Once,
            })
        );

        let command = step(&mut game, InputSnapshot::empty(), 1, &mut audio);
        assert_eq!(command, LoopCommand::Continue);
        assert_eq!(game.state(), GameState::Ending);
    }

    #[test]
    fn ending_without_image_exits() {
        let fx = fixture(WIN_ON_SIGHT);
        let config = GameConfig {
            intro_image: Vec::new(),
            game_over_good_image: None,
            ..config()
        };
        let mut game =
            StageGame::new(fx.paths.clone(), config, &RenderingConfig::default()).expect("game");
        let mut audio = RecordingAudio::default();

        let command = step(&mut game, InputSnapshot::empty(), 0, &mut audio);
        assert_eq!(command, LoopCommand::Exit);
        assert_eq!(game.state(), GameState::Exiting);
    }

    #[test]
    fn quit_request_exits_from_any_state() {
        let fx = fixture(r#"{ "actors": [] }"#);
        let mut game =
            StageGame::new(fx.paths.clone(), config(), &RenderingConfig::default()).expect("game");
        let mut audio = RecordingAudio::default();

        let command = step(
            &mut game,
            InputSnapshot::empty().with_quit_requested(),
            0,
            &mut audio,
        );
        assert_eq!(command, LoopCommand::Exit);
        assert_eq!(game.state(), GameState::Exiting);
    }

    #[test]
    fn missing_initial_scene_is_rejected() {
        let fx = fixture(r#"{ "actors": [] }"#);
        let config = GameConfig {
            initial_scene: None,
            ..config()
        };
        let err = StageGame::new(fx.paths.clone(), config, &RenderingConfig::default())
            .expect_err("initial scene required");
        assert!(matches!(err, ContentError::MissingInitialScene { .. }));
    }
}
