use super::{Actor, ActorHandle, ColliderKind, DialogueEvent, Vec2};

/// Axis-aligned box with cached edges. Edges are recomputed on every center
/// write, so they never go stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    center: Vec2,
    width: f32,
    height: f32,
    top: f32,
    bottom: f32,
    left: f32,
    right: f32,
}

impl Collider {
    /// Builds a box whose extent is `width`/`height` scaled by `|scale|`.
    pub fn new(width: f32, height: f32, center: Vec2, scale: Vec2) -> Self {
        let scale = scale.abs();
        let mut collider = Self {
            center,
            width: width * scale.x,
            height: height * scale.y,
            top: 0.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
        };
        collider.set_center(center);
        collider
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        self.left = center.x - half_w;
        self.right = center.x + half_w;
        self.top = center.y - half_h;
        self.bottom = center.y + half_h;
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn overlaps(&self, other: &Collider) -> bool {
        boxes_overlap(self, other)
    }
}

/// Strict overlap: boxes that only share an edge do not overlap.
pub fn boxes_overlap(a: &Collider, b: &Collider) -> bool {
    a.left < b.right && a.right > b.left && a.top < b.bottom && a.bottom > b.top
}

/// Probes `mover` against every other collision actor at their current
/// collider positions. Each overlap is recorded on both sides and the other
/// actor's contact dialogue is queued.
pub(crate) fn probe_collisions(
    actors: &mut [Actor],
    collision_actors: &[ActorHandle],
    mover: ActorHandle,
    contacts: &mut Vec<DialogueEvent>,
) {
    for &other in collision_actors {
        if other == mover {
            continue;
        }
        let (mover_actor, other_actor) = (&actors[mover.index()], &actors[other.index()]);
        if mover_actor.id() == other_actor.id()
            || !mover_actor.is_colliding_with(other_actor, ColliderKind::Collision)
        {
            continue;
        }

        actors[mover.index()].record_contact(other);
        actors[other.index()].record_contact(mover);

        let contact_dialogue = actors[other.index()].contact_dialogue();
        if !contact_dialogue.is_empty() {
            contacts.push(DialogueEvent {
                text: contact_dialogue.to_string(),
                speaker: other,
            });
        }
    }
}

pub(crate) fn clear_contacts(actors: &mut [Actor], collision_actors: &[ActorHandle]) {
    for handle in collision_actors {
        actors[handle.index()].clear_contacts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f32, y: f32) -> Collider {
        Collider::new(1.0, 1.0, Vec2::new(x, y), Vec2::ONE)
    }

    #[test]
    fn edges_follow_center() {
        let mut collider = Collider::new(2.0, 4.0, Vec2::ZERO, Vec2::ONE);
        collider.set_center(Vec2::new(10.0, 5.0));
        assert_eq!(collider.left(), 9.0);
        assert_eq!(collider.right(), 11.0);
        assert_eq!(collider.top(), 3.0);
        assert_eq!(collider.bottom(), 7.0);
    }

    #[test]
    fn negative_scale_uses_magnitude() {
        let collider = Collider::new(2.0, 3.0, Vec2::ZERO, Vec2::new(-2.0, 0.5));
        assert_eq!(collider.width(), 4.0);
        assert_eq!(collider.height(), 1.5);
    }

    #[test]
    fn overlapping_boxes_overlap_both_ways() {
        let a = unit_box_at(0.0, 0.0);
        let b = unit_box_at(0.5, 0.5);
        assert!(boxes_overlap(&a, &b));
        assert!(boxes_overlap(&b, &a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = unit_box_at(0.0, 0.0);
        let right = unit_box_at(1.0, 0.0);
        let below = unit_box_at(0.0, 1.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn separated_on_one_axis_does_not_overlap() {
        let a = unit_box_at(0.0, 0.0);
        let b = unit_box_at(0.25, 3.0);
        assert!(!boxes_overlap(&a, &b));
    }

    #[test]
    fn zero_sized_box_overlaps_only_strict_interiors() {
        let point = Collider::new(0.0, 0.0, Vec2::ZERO, Vec2::ONE);
        assert!(boxes_overlap(&point, &unit_box_at(0.0, 0.0)));
        assert!(!boxes_overlap(&point, &point));
    }
}
