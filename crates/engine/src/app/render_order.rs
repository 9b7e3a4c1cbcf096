use std::cmp::Ordering;

use super::{Actor, ActorHandle};

/// Draw order: explicit `render_order` (else `y` truncated toward zero),
/// then exact `y`, then id. Ids are unique, so the order is total.
pub fn compare_render_order(a: &Actor, b: &Actor) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| {
            a.position()
                .y
                .partial_cmp(&b.position().y)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.id().cmp(&b.id()))
}

pub(crate) fn sort_render_list(actors: &[Actor], render_list: &mut Vec<ActorHandle>) {
    render_list.clear();
    render_list.extend((0..actors.len()).map(ActorHandle));
    render_list.sort_by(|a, b| compare_render_order(&actors[a.index()], &actors[b.index()]));
}

fn primary_key(actor: &Actor) -> i32 {
    actor
        .render_order()
        .unwrap_or_else(|| actor.position().y as i32)
}
