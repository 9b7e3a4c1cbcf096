use std::collections::BTreeSet;

use super::{Collider, Vec2};

/// Name reserved for the input-driven actor.
pub const PLAYER_NAME: &str = "player";

const FLASH_DURATION_FRAMES: u64 = 30;
const BOUNCE_FREQUENCY: f32 = 0.15;
const BOUNCE_HEIGHT_PX: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

/// Hands out actor ids in creation order. One allocator lives for the whole
/// game session so ids are never reused across scenes.
#[derive(Debug, Default)]
pub struct ActorIdAllocator {
    next: u64,
}

impl ActorIdAllocator {
    pub fn allocate(&mut self) -> ActorId {
        let id = ActorId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Index of an actor inside the `SceneWorld` that spawned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub(crate) usize);

impl ActorHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    Collision,
    Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorViews {
    pub front: Option<String>,
    pub back: Option<String>,
    pub damage: Option<String>,
    pub attack: Option<String>,
}

/// Fully resolved construction parameters for an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorDesc {
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub nearby_dialogue: String,
    pub contact_dialogue: String,
    pub nearby_dialogue_sfx: Option<String>,
    pub views: ActorViews,
    pub scale: Vec2,
    pub rotation_degrees: f32,
    /// Unscaled pivot in image pixels.
    pub pivot: Vec2,
    pub render_order: Option<i32>,
    pub bounce: bool,
    pub collision_box: Option<BoxSize>,
    pub trigger_box: Option<BoxSize>,
}

impl Default for ActorDesc {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            nearby_dialogue: String::new(),
            contact_dialogue: String::new(),
            nearby_dialogue_sfx: None,
            views: ActorViews::default(),
            scale: Vec2::ONE,
            rotation_degrees: 0.0,
            pivot: Vec2::ZERO,
            render_order: None,
            bounce: false,
            collision_box: None,
            trigger_box: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    id: ActorId,
    name: String,
    position: Vec2,
    velocity: Vec2,
    x_direction: Direction,
    y_direction: Direction,
    render_order: Option<i32>,
    collision_collider: Option<Collider>,
    trigger_collider: Option<Collider>,
    colliding_this_frame: BTreeSet<ActorHandle>,
    nearby_dialogue: String,
    contact_dialogue: String,
    nearby_dialogue_sfx: Option<String>,
    nearby_dialogue_sfx_played: bool,
    score_increased: bool,
    reversed_direction: bool,
    bounce: bool,
    visual_offset: Vec2,
    views: ActorViews,
    scale: Vec2,
    rotation_degrees: f32,
    pivot_px: (i32, i32),
    damaged_frame: Option<u64>,
    attacked_frame: Option<u64>,
}

impl Actor {
    pub fn new(id: ActorId, desc: ActorDesc) -> Self {
        let collider_for = |size: Option<BoxSize>| {
            size.map(|size| Collider::new(size.width, size.height, desc.position, desc.scale))
        };
        let collision_collider = collider_for(desc.collision_box);
        let trigger_collider = collider_for(desc.trigger_box);
        let abs_scale = desc.scale.abs();

        Self {
            id,
            x_direction: horizontal_facing(desc.velocity.x),
            y_direction: vertical_facing(desc.velocity.y),
            name: desc.name,
            position: desc.position,
            velocity: desc.velocity,
            render_order: desc.render_order,
            collision_collider,
            trigger_collider,
            colliding_this_frame: BTreeSet::new(),
            nearby_dialogue: desc.nearby_dialogue,
            contact_dialogue: desc.contact_dialogue,
            nearby_dialogue_sfx: desc.nearby_dialogue_sfx,
            nearby_dialogue_sfx_played: false,
            score_increased: false,
            reversed_direction: false,
            bounce: desc.bounce,
            visual_offset: Vec2::ZERO,
            views: desc.views,
            scale: desc.scale,
            rotation_degrees: desc.rotation_degrees,
            pivot_px: (
                (desc.pivot.x * abs_scale.x).round() as i32,
                (desc.pivot.y * abs_scale.y).round() as i32,
            ),
            damaged_frame: None,
            attacked_frame: None,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_player(&self) -> bool {
        self.name == PLAYER_NAME
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn x_direction(&self) -> Direction {
        self.x_direction
    }

    pub fn y_direction(&self) -> Direction {
        self.y_direction
    }

    /// Routes a facing to the axis it belongs to.
    pub fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::East | Direction::West => self.x_direction = direction,
            Direction::North | Direction::South => self.y_direction = direction,
        }
    }

    pub fn render_order(&self) -> Option<i32> {
        self.render_order
    }

    pub fn collider(&self, kind: ColliderKind) -> Option<&Collider> {
        match kind {
            ColliderKind::Collision => self.collision_collider.as_ref(),
            ColliderKind::Trigger => self.trigger_collider.as_ref(),
        }
    }

    /// False whenever either side lacks a collider of `kind`.
    pub fn is_colliding_with(&self, other: &Actor, kind: ColliderKind) -> bool {
        match (self.collider(kind), other.collider(kind)) {
            (Some(mine), Some(theirs)) => mine.overlaps(theirs),
            _ => false,
        }
    }

    pub fn colliding_this_frame(&self) -> &BTreeSet<ActorHandle> {
        &self.colliding_this_frame
    }

    pub fn nearby_dialogue(&self) -> &str {
        &self.nearby_dialogue
    }

    pub fn contact_dialogue(&self) -> &str {
        &self.contact_dialogue
    }

    pub fn score_increased(&self) -> bool {
        self.score_increased
    }

    pub fn mark_score_increased(&mut self) {
        self.score_increased = true;
    }

    pub fn reversed_direction(&self) -> bool {
        self.reversed_direction
    }

    /// Returns the nearby sound the first time it is asked for, then never again.
    pub fn claim_nearby_dialogue_sfx(&mut self) -> Option<&str> {
        if self.nearby_dialogue_sfx_played {
            return None;
        }
        let sfx = self.nearby_dialogue_sfx.as_deref()?;
        self.nearby_dialogue_sfx_played = true;
        Some(sfx)
    }

    pub fn mark_damaged(&mut self, frame: u64) {
        self.damaged_frame = Some(frame);
    }

    pub fn mark_attacked(&mut self, frame: u64) {
        self.attacked_frame = Some(frame);
    }

    pub fn views(&self) -> &ActorViews {
        &self.views
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    /// Pivot in screen pixels, already scaled by `|scale|` and rounded.
    pub fn pivot_px(&self) -> (i32, i32) {
        self.pivot_px
    }

    pub fn visual_offset(&self) -> Vec2 {
        self.visual_offset
    }

    /// Image to draw this frame. A flash only counts when its image exists.
    /// Damage wins over attack, both win over the back view, and the front
    /// view is the fallback.
    pub fn view_image(&self, frame: u64) -> Option<&str> {
        let flashing = |marked: Option<u64>| {
            marked.is_some_and(|at| frame < at.saturating_add(FLASH_DURATION_FRAMES))
        };
        let damage_image = self
            .views
            .damage
            .as_deref()
            .filter(|_| flashing(self.damaged_frame));
        let attack_image = self
            .views
            .attack
            .as_deref()
            .filter(|_| flashing(self.attacked_frame));
        let back_image = (self.y_direction == Direction::North)
            .then(|| self.views.back.as_deref())
            .flatten();
        damage_image
            .or(attack_image)
            .or(back_image)
            .or(self.views.front.as_deref())
    }

    pub(crate) fn face_velocity(&mut self) {
        self.x_direction = horizontal_facing(self.velocity.x);
        self.y_direction = vertical_facing(self.velocity.y);
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn move_collider(&mut self, kind: ColliderKind, center: Vec2) {
        let collider = match kind {
            ColliderKind::Collision => self.collision_collider.as_mut(),
            ColliderKind::Trigger => self.trigger_collider.as_mut(),
        };
        if let Some(collider) = collider {
            collider.set_center(center);
        }
    }

    pub(crate) fn record_contact(&mut self, other: ActorHandle) {
        self.colliding_this_frame.insert(other);
    }

    pub(crate) fn clear_contacts(&mut self) {
        self.colliding_this_frame.clear();
    }

    pub(crate) fn reverse_velocity(&mut self) {
        self.velocity = -self.velocity;
        self.reversed_direction = true;
    }

    pub(crate) fn update_bounce(&mut self, delta: Vec2, frame: u64) {
        self.visual_offset = if self.bounce && !delta.is_zero() {
            let phase = (frame as f32 * BOUNCE_FREQUENCY).sin().abs();
            Vec2::new(0.0, -phase * BOUNCE_HEIGHT_PX)
        } else {
            Vec2::ZERO
        };
    }
}

fn horizontal_facing(velocity_x: f32) -> Direction {
    if velocity_x < 0.0 {
        Direction::West
    } else {
        Direction::East
    }
}

fn vertical_facing(velocity_y: f32) -> Direction {
    if velocity_y < 0.0 {
        Direction::North
    } else {
        Direction::South
    }
}
