use stage_engine::{
    rotating_sfx_channel, AudioSink, DialogueEvent, Playback, SceneWorld, STINGER_CHANNEL,
};
use tracing::{debug, info, warn};

pub(crate) const STARTING_HEALTH: i32 = 3;
/// Frames that must pass after losing health before it can be lost again.
pub(crate) const DAMAGE_COOLDOWN_FRAMES: u64 = 180;

const HEALTH_DOWN: &str = "health down";
const GAME_OVER: &str = "game over";
const SCORE_UP: &str = "score up";
const YOU_WIN: &str = "you win";
const PROCEED_TO: &str = "proceed to";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ending {
    Good,
    Bad,
}

/// What a single dialogue line asked the game to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DialogueOutcome {
    Continue,
    Ending(Ending),
    ProceedTo(String),
}

/// Applies dialogue commands to the player's health and score.
///
/// Commands are matched as substrings, so `"ouch, health down"` both damages
/// the player and shows up as text when spoken nearby.
#[derive(Debug)]
pub(crate) struct DialogueProcessor {
    health: i32,
    score: u32,
    last_damage_frame: Option<u64>,
    damage_sfx: Option<String>,
    score_sfx: Option<String>,
}

impl DialogueProcessor {
    pub(crate) fn new(score_sfx: Option<String>) -> Self {
        Self {
            health: STARTING_HEALTH,
            score: 0,
            last_damage_frame: None,
            damage_sfx: None,
            score_sfx,
        }
    }

    pub(crate) fn health(&self) -> i32 {
        self.health
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn set_damage_sfx(&mut self, sound: String) {
        self.damage_sfx = Some(sound);
    }

    fn damage_allowed(&self, frame: u64) -> bool {
        self.last_damage_frame
            .map_or(true, |last| frame >= last.saturating_add(DAMAGE_COOLDOWN_FRAMES))
    }

    pub(crate) fn process(
        &mut self,
        event: &DialogueEvent,
        world: &mut SceneWorld,
        frame: u64,
        audio: &mut dyn AudioSink,
    ) -> DialogueOutcome {
        let text = event.text.as_str();

        if text.contains(HEALTH_DOWN) && self.damage_allowed(frame) {
            if let Some(player) = world.player_actor_mut() {
                player.mark_damaged(frame);
            }
            if let Some(speaker) = world.actor_mut(event.speaker) {
                speaker.mark_attacked(frame);
            }
            self.health -= 1;
            self.last_damage_frame = Some(frame);
            if let Some(sound) = &self.damage_sfx {
                audio.play(sound, rotating_sfx_channel(frame), Playback::Once);
            }
            info!(health = self.health, frame, "player_damaged");
        }

        if (text.contains(GAME_OVER) && self.damage_allowed(frame)) || self.health <= 0 {
            return DialogueOutcome::Ending(Ending::Bad);
        }

        if text.contains(SCORE_UP) {
            if let Some(speaker) = world.actor_mut(event.speaker) {
                if !speaker.score_increased() {
                    speaker.mark_score_increased();
                    self.score += 1;
                    if let Some(sound) = &self.score_sfx {
                        audio.play(sound, STINGER_CHANNEL, Playback::Once);
                    }
                    info!(score = self.score, speaker = speaker.name(), "score_increased");
                    return DialogueOutcome::Continue;
                }
            }
        }

        if text.contains(YOU_WIN) {
            return DialogueOutcome::Ending(Ending::Good);
        }

        if text.contains(PROCEED_TO) {
            match scene_after_proceed(text) {
                Some(scene) => return DialogueOutcome::ProceedTo(scene.to_string()),
                None => warn!(dialogue = text, "proceed_without_scene_name"),
            }
        }

        debug!(dialogue = text, "dialogue_no_command");
        DialogueOutcome::Continue
    }
}

/// The first word after `proceed to`, if there is one.
pub(crate) fn scene_after_proceed(text: &str) -> Option<&str> {
    let start = text.find(PROCEED_TO)? + PROCEED_TO.len();
    text[start..].split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use stage_engine::{
        ActorDesc, ActorHandle, ActorIdAllocator, ActorViews, RecordingAudio, PLAYER_NAME,
    };

    use super::*;

    struct Setup {
        world: SceneWorld,
        speaker: ActorHandle,
        audio: RecordingAudio,
        processor: DialogueProcessor,
    }

    fn setup() -> Setup {
        let mut ids = ActorIdAllocator::default();
        let mut world = SceneWorld::new("dialogue");
        world.spawn(
            &mut ids,
            ActorDesc {
                name: PLAYER_NAME.to_string(),
                views: ActorViews {
                    front: Some("hero".to_string()),
                    damage: Some("hero_hurt".to_string()),
                    ..ActorViews::default()
                },
                ..ActorDesc::default()
            },
        );
        let speaker = world.spawn(
            &mut ids,
            ActorDesc {
                name: "bat".to_string(),
                views: ActorViews {
                    front: Some("bat".to_string()),
                    attack: Some("bat_bite".to_string()),
                    ..ActorViews::default()
                },
                ..ActorDesc::default()
            },
        );
        let mut processor = DialogueProcessor::new(Some("coin".to_string()));
        processor.set_damage_sfx("hurt".to_string());
        Setup {
            world,
            speaker,
            audio: RecordingAudio::default(),
            processor,
        }
    }

    fn say(s: &mut Setup, text: &str, frame: u64) -> DialogueOutcome {
        let event = DialogueEvent {
            text: text.to_string(),
            speaker: s.speaker,
        };
        s.processor.process(&event, &mut s.world, frame, &mut s.audio)
    }

    #[test]
    fn health_down_damages_player_and_flashes_both_actors() {
        let mut s = setup();
        assert_eq!(say(&mut s, "health down", 10), DialogueOutcome::Continue);

        assert_eq!(s.processor.health(), STARTING_HEALTH - 1);
        let player = s.world.player_actor().expect("player");
        assert_eq!(player.view_image(10), Some("hero_hurt"));
        let speaker = s.world.actor(s.speaker).expect("speaker");
        assert_eq!(speaker.view_image(10), Some("bat_bite"));
        assert_eq!(s.audio.played_sounds(), vec![("hurt", rotating_sfx_channel(10))]);
    }

    #[test]
    fn health_down_respects_cooldown() {
        let mut s = setup();
        say(&mut s, "health down", 0);
        say(&mut s, "health down", DAMAGE_COOLDOWN_FRAMES - 1);
        assert_eq!(s.processor.health(), STARTING_HEALTH - 1);

        say(&mut s, "health down", DAMAGE_COOLDOWN_FRAMES);
        assert_eq!(s.processor.health(), STARTING_HEALTH - 2);
    }

    #[test]
    fn losing_last_health_ends_badly() {
        let mut s = setup();
        say(&mut s, "health down", 0);
        say(&mut s, "health down", 200);
        let outcome = say(&mut s, "health down", 400);
        assert_eq!(s.processor.health(), 0);
        assert_eq!(outcome, DialogueOutcome::Ending(Ending::Bad));
    }

    #[test]
    fn game_over_waits_for_damage_cooldown() {
        let mut s = setup();
        assert_eq!(
            say(&mut s, "game over", 0),
            DialogueOutcome::Ending(Ending::Bad)
        );

        let mut s = setup();
        say(&mut s, "health down", 50);
        assert_eq!(say(&mut s, "game over", 100), DialogueOutcome::Continue);
        assert_eq!(
            say(&mut s, "game over", 230),
            DialogueOutcome::Ending(Ending::Bad)
        );
    }

    #[test]
    fn score_up_counts_once_per_speaker() {
        let mut s = setup();
        say(&mut s, "score up", 1);
        say(&mut s, "score up", 2);
        assert_eq!(s.processor.score(), 1);
        assert!(s.world.actor(s.speaker).expect("speaker").score_increased());
        assert_eq!(s.audio.played_sounds(), vec![("coin", STINGER_CHANNEL)]);
    }

    #[test]
    fn spent_score_line_can_still_win() {
        let mut s = setup();
        say(&mut s, "score up, you win", 1);
        assert_eq!(s.processor.score(), 1);
        assert_eq!(
            say(&mut s, "score up, you win", 2),
            DialogueOutcome::Ending(Ending::Good)
        );
    }

    #[test]
    fn proceed_to_names_the_next_scene() {
        let mut s = setup();
        assert_eq!(
            say(&mut s, "the door creaks. proceed to   cellar now", 0),
            DialogueOutcome::ProceedTo("cellar".to_string())
        );
        assert_eq!(say(&mut s, "proceed to", 0), DialogueOutcome::Continue);
    }

    #[test]
    fn scene_name_is_first_word_after_phrase() {
        assert_eq!(scene_after_proceed("proceed to basement"), Some("basement"));
        assert_eq!(scene_after_proceed("proceed to\tlevel_2 quickly"), Some("level_2"));
        assert_eq!(scene_after_proceed("proceed to "), None);
        assert_eq!(scene_after_proceed("go away"), None);
    }

    #[test]
    fn plain_text_changes_nothing() {
        let mut s = setup();
        assert_eq!(say(&mut s, "hello there", 0), DialogueOutcome::Continue);
        assert_eq!(s.processor.health(), STARTING_HEALTH);
        assert_eq!(s.processor.score(), 0);
        assert!(s.audio.commands().is_empty());
    }
}
