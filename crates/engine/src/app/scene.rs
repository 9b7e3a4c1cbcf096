use std::mem;

use tracing::debug;

use super::collision::{clear_contacts, probe_collisions};
use super::render_order::sort_render_list;
use super::{
    rotating_sfx_channel, Actor, ActorDesc, ActorHandle, ActorIdAllocator, AudioSink,
    ColliderKind, DialogueEvent, Direction, InputAction, InputSnapshot, Playback, TickEvents,
    Vec2,
};

/// The player only plays its step sound on every Nth frame while moving.
const STEP_SOUND_INTERVAL_FRAMES: u64 = 20;

/// Per-tick collaborators of the simulation.
pub struct TickContext<'a> {
    pub input: &'a InputSnapshot,
    pub frame: u64,
    pub player_speed: f32,
    pub step_sound: Option<&'a str>,
    pub audio: &'a mut dyn AudioSink,
}

/// All actors of one loaded scene. Actors are only added while the scene is
/// being built, so handles stay valid for the life of the world.
#[derive(Debug, Default)]
pub struct SceneWorld {
    name: String,
    actors: Vec<Actor>,
    player: Option<ActorHandle>,
    moving: Vec<ActorHandle>,
    collision: Vec<ActorHandle>,
    trigger: Vec<ActorHandle>,
    render_list: Vec<ActorHandle>,
    contact_dialogues: Vec<DialogueEvent>,
}

impl SceneWorld {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an actor and files it into the moving, collision and trigger
    /// lists. Actors named `player` always move; the last one spawned is the
    /// scene's player.
    pub fn spawn(&mut self, allocator: &mut ActorIdAllocator, desc: ActorDesc) -> ActorHandle {
        let handle = ActorHandle(self.actors.len());
        let actor = Actor::new(allocator.allocate(), desc);

        if actor.is_player() {
            self.player = Some(handle);
        }
        if actor.is_player() || !actor.velocity().is_zero() {
            self.moving.push(handle);
        }
        if actor.collider(ColliderKind::Collision).is_some() {
            self.collision.push(handle);
        }
        if actor.collider(ColliderKind::Trigger).is_some() {
            self.trigger.push(handle);
        }

        self.actors.push(actor);
        self.render_list.push(handle);
        handle
    }

    pub fn actor(&self, handle: ActorHandle) -> Option<&Actor> {
        self.actors.get(handle.index())
    }

    pub fn actor_mut(&mut self, handle: ActorHandle) -> Option<&mut Actor> {
        self.actors.get_mut(handle.index())
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn player(&self) -> Option<ActorHandle> {
        self.player
    }

    pub fn player_actor(&self) -> Option<&Actor> {
        self.player.and_then(|handle| self.actor(handle))
    }

    pub fn player_actor_mut(&mut self) -> Option<&mut Actor> {
        self.player.and_then(|handle| self.actors.get_mut(handle.index()))
    }

    pub fn moving_actors(&self) -> &[ActorHandle] {
        &self.moving
    }

    pub fn collision_actors(&self) -> &[ActorHandle] {
        &self.collision
    }

    pub fn trigger_actors(&self) -> &[ActorHandle] {
        &self.trigger
    }

    /// Handles in draw order as of the last sort.
    pub fn render_list(&self) -> &[ActorHandle] {
        &self.render_list
    }

    /// Contact dialogues queued since the start of the current tick.
    pub fn pending_contact_dialogues(&self) -> &[DialogueEvent] {
        &self.contact_dialogues
    }

    pub fn refresh_render_order(&mut self) {
        sort_render_list(&self.actors, &mut self.render_list);
    }

    /// Runs one simulation tick and hands back the dialogue it produced.
    ///
    /// Moving actors are processed in list order against the positions other
    /// actors hold at that moment, so an earlier mover is already at its new
    /// spot when a later one probes it.
    pub fn update(&mut self, ctx: &mut TickContext<'_>) -> TickEvents {
        self.contact_dialogues.clear();

        for index in 0..self.moving.len() {
            let handle = self.moving[index];
            if self.actors[handle.index()].is_player() {
                self.update_player(handle, ctx);
            } else {
                let velocity = self.actors[handle.index()].velocity();
                self.move_actor(handle, velocity, ctx.frame);
            }
        }

        clear_contacts(&mut self.actors, &self.collision);
        let nearby = self.collect_nearby_dialogues();
        self.refresh_render_order();

        TickEvents {
            contact: mem::take(&mut self.contact_dialogues),
            nearby,
        }
    }

    fn update_player(&mut self, handle: ActorHandle, ctx: &mut TickContext<'_>) {
        let player = &mut self.actors[handle.index()];
        let mut intent = Vec2::ZERO;
        if ctx.input.is_down(InputAction::MoveUp) {
            intent.y -= 1.0;
            player.set_direction(Direction::North);
        }
        if ctx.input.is_down(InputAction::MoveDown) {
            intent.y += 1.0;
            player.set_direction(Direction::South);
        }
        if ctx.input.is_down(InputAction::MoveLeft) {
            intent.x -= 1.0;
            player.set_direction(Direction::West);
        }
        if ctx.input.is_down(InputAction::MoveRight) {
            intent.x += 1.0;
            player.set_direction(Direction::East);
        }

        if !intent.is_zero() {
            intent = intent.normalize_or_zero();
            if let Some(step_sound) = ctx.step_sound {
                if ctx.frame % STEP_SOUND_INTERVAL_FRAMES == 0 {
                    ctx.audio
                        .play(step_sound, rotating_sfx_channel(ctx.frame), Playback::Once);
                }
            }
        }

        self.move_actor(handle, intent * ctx.player_speed, ctx.frame);
    }

    /// Applies `delta` to an actor. A blocked NPC turns around and keeps
    /// facing its velocity from then on; a blocked player just stays put.
    pub fn move_actor(&mut self, handle: ActorHandle, delta: Vec2, frame: u64) -> bool {
        let Some(actor) = self.actors.get_mut(handle.index()) else {
            return false;
        };
        if actor.reversed_direction() {
            actor.face_velocity();
        }
        actor.update_bounce(delta, frame);

        let candidate = actor.position() + delta;
        let moved = self.attempt_move(handle, candidate);
        if !moved {
            let actor = &mut self.actors[handle.index()];
            if !actor.is_player() {
                actor.reverse_velocity();
                debug!(actor = actor.name(), id = actor.id().0, "actor_reversed");
            }
        }
        moved
    }

    /// Tries to put an actor at `candidate`. Every overlap found on the way
    /// is recorded on both actors and queues a contact dialogue even when the
    /// move ends up rejected.
    pub fn attempt_move(&mut self, handle: ActorHandle, candidate: Vec2) -> bool {
        let Some(actor) = self.actors.get_mut(handle.index()) else {
            return false;
        };
        let previous_center = actor
            .collider(ColliderKind::Collision)
            .map(|collider| collider.center());
        actor.move_collider(ColliderKind::Collision, candidate);

        probe_collisions(
            &mut self.actors,
            &self.collision,
            handle,
            &mut self.contact_dialogues,
        );

        let actor = &mut self.actors[handle.index()];
        if !actor.colliding_this_frame().is_empty() {
            if let Some(center) = previous_center {
                actor.move_collider(ColliderKind::Collision, center);
            }
            return false;
        }

        actor.set_position(candidate);
        true
    }

    /// Moves the player's trigger box onto the player and reports every other
    /// trigger actor with something to say whose box overlaps it. Other
    /// actors' trigger boxes stay where they were built.
    fn collect_nearby_dialogues(&mut self) -> Vec<DialogueEvent> {
        let Some(player_handle) = self.player else {
            return Vec::new();
        };
        let player_position = self.actors[player_handle.index()].position();
        self.actors[player_handle.index()].move_collider(ColliderKind::Trigger, player_position);

        let player = &self.actors[player_handle.index()];
        self.trigger
            .iter()
            .copied()
            .filter(|&handle| {
                let other = &self.actors[handle.index()];
                other.id() != player.id()
                    && !other.nearby_dialogue().is_empty()
                    && player.is_colliding_with(other, ColliderKind::Trigger)
            })
            .map(|handle| DialogueEvent {
                text: self.actors[handle.index()].nearby_dialogue().to_string(),
                speaker: handle,
            })
            .collect()
    }
}
