use crate::app::{Camera2D, Vec2};

/// Screen pixels per scene unit at zoom 1.
pub const SCENE_UNIT_PX: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of an actor's sprite in unzoomed screen pixels. The
/// camera sits at the middle of the view; zooming scales everything about
/// the screen origin, so the centering term is divided by the zoom.
pub fn actor_screen_origin(
    position: Vec2,
    camera: &Camera2D,
    viewport: Viewport,
    pivot_px: (i32, i32),
    visual_offset: Vec2,
) -> (i32, i32) {
    let zoom = camera.zoom();
    let x = (position.x - camera.position.x) * SCENE_UNIT_PX - pivot_px.0 as f32
        + visual_offset.x
        + viewport.width as f32 * 0.5 / zoom;
    let y = (position.y - camera.position.y) * SCENE_UNIT_PX - pivot_px.1 as f32
        + visual_offset.y
        + viewport.height as f32 * 0.5 / zoom;
    (x.round() as i32, y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 640,
        height: 360,
    };

    #[test]
    fn actor_at_camera_lands_on_view_center_minus_pivot() {
        let camera = Camera2D::default();
        let origin = actor_screen_origin(Vec2::ZERO, &camera, VIEWPORT, (8, 8), Vec2::ZERO);
        assert_eq!(origin, (312, 172));
    }

    #[test]
    fn one_scene_unit_is_one_hundred_pixels() {
        let mut camera = Camera2D::default();
        camera.position = Vec2::new(1.0, 0.0);
        let origin = actor_screen_origin(
            Vec2::new(2.0, 1.0),
            &camera,
            VIEWPORT,
            (0, 0),
            Vec2::ZERO,
        );
        assert_eq!(origin, (420, 280));
    }

    #[test]
    fn zoom_shrinks_centering_term() {
        let camera = Camera2D::new(Vec2::ZERO, 2.0, 1.0);
        let origin = actor_screen_origin(Vec2::ZERO, &camera, VIEWPORT, (0, 0), Vec2::ZERO);
        assert_eq!(origin, (160, 90));
    }

    #[test]
    fn bounce_offset_shifts_sprite_up() {
        let camera = Camera2D::default();
        let origin = actor_screen_origin(
            Vec2::ZERO,
            &camera,
            VIEWPORT,
            (0, 0),
            Vec2::new(0.0, -7.4),
        );
        assert_eq!(origin, (320, 173));
    }
}
