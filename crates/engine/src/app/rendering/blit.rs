use super::sprites::LoadedSprite;
use super::Viewport;

/// Where and how a sprite lands on screen, in final (zoomed) pixels. The
/// pivot is relative to the rect's top-left and is the rotation center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub rotation_degrees: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Placement {
    pub(crate) fn stretched(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            pivot_x: width * 0.5,
            pivot_y: height * 0.5,
            rotation_degrees: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

pub(crate) fn fill(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

/// Nearest-neighbour blit with clockwise rotation about the pivot. Each
/// destination pixel center is mapped back into sprite space.
pub(crate) fn blit_sprite(
    frame: &mut [u8],
    viewport: Viewport,
    sprite: &LoadedSprite,
    placement: &Placement,
) {
    if sprite.width == 0 || sprite.height == 0 || placement.width <= 0.0 || placement.height <= 0.0
    {
        return;
    }

    let (sin, cos) = placement.rotation_degrees.to_radians().sin_cos();
    let origin_x = placement.x + placement.pivot_x;
    let origin_y = placement.y + placement.pivot_y;

    let corners = [
        (-placement.pivot_x, -placement.pivot_y),
        (placement.width - placement.pivot_x, -placement.pivot_y),
        (-placement.pivot_x, placement.height - placement.pivot_y),
        (
            placement.width - placement.pivot_x,
            placement.height - placement.pivot_y,
        ),
    ];
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for (cx, cy) in corners {
        let rx = cx * cos - cy * sin + origin_x;
        let ry = cx * sin + cy * cos + origin_y;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }

    let x0 = (min_x.floor() as i64).max(0);
    let y0 = (min_y.floor() as i64).max(0);
    let x1 = (max_x.ceil() as i64).min(viewport.width as i64);
    let y1 = (max_y.ceil() as i64).min(viewport.height as i64);

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - origin_x;
            let dy = py as f32 + 0.5 - origin_y;
            let local_x = dx * cos + dy * sin + placement.pivot_x;
            let local_y = -dx * sin + dy * cos + placement.pivot_y;
            if local_x < 0.0
                || local_y < 0.0
                || local_x >= placement.width
                || local_y >= placement.height
            {
                continue;
            }

            let mut u = ((local_x / placement.width) * sprite.width as f32) as u32;
            let mut v = ((local_y / placement.height) * sprite.height as f32) as u32;
            u = u.min(sprite.width - 1);
            v = v.min(sprite.height - 1);
            if placement.flip_x {
                u = sprite.width - 1 - u;
            }
            if placement.flip_y {
                v = sprite.height - 1 - v;
            }

            blend_pixel(
                frame,
                viewport.width as usize,
                px as i32,
                py as i32,
                sprite.pixel(u, v),
            );
        }
    }
}

/// Source-over blend of one pixel; anything outside the frame is dropped.
pub(crate) fn blend_pixel(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || width == 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width {
        return;
    }
    let idx = (y * width + x) * 4;
    let Some(dst) = frame.get_mut(idx..idx + 4) else {
        return;
    };

    match color[3] {
        0 => {}
        255 => dst.copy_from_slice(&color),
        alpha => {
            let a = alpha as u32;
            for channel in 0..3 {
                let blended = (color[channel] as u32 * a + dst[channel] as u32 * (255 - a)) / 255;
                dst[channel] = blended as u8;
            }
            dst[3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn viewport(size: u32) -> Viewport {
        Viewport {
            width: size,
            height: size,
        }
    }

    fn red_blue_sprite() -> LoadedSprite {
        LoadedSprite {
            width: 2,
            height: 1,
            rgba: [RED, BLUE].concat(),
        }
    }

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * width + x) * 4) as usize;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    #[test]
    fn unrotated_blit_copies_pixels() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let placement = Placement::stretched(1.0, 1.0, 2.0, 1.0);
        blit_sprite(&mut frame, viewport(4), &red_blue_sprite(), &placement);

        assert_eq!(pixel_at(&frame, 4, 1, 1), RED);
        assert_eq!(pixel_at(&frame, 4, 2, 1), BLUE);
        assert_eq!(pixel_at(&frame, 4, 0, 1), CLEAR);
        assert_eq!(pixel_at(&frame, 4, 1, 2), CLEAR);
    }

    #[test]
    fn scaled_blit_repeats_source_pixels() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let placement = Placement::stretched(0.0, 0.0, 4.0, 2.0);
        blit_sprite(&mut frame, viewport(4), &red_blue_sprite(), &placement);

        assert_eq!(pixel_at(&frame, 4, 0, 0), RED);
        assert_eq!(pixel_at(&frame, 4, 1, 1), RED);
        assert_eq!(pixel_at(&frame, 4, 2, 0), BLUE);
        assert_eq!(pixel_at(&frame, 4, 3, 1), BLUE);
    }

    #[test]
    fn horizontal_flip_mirrors_columns() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let placement = Placement {
            flip_x: true,
            ..Placement::stretched(0.0, 0.0, 2.0, 1.0)
        };
        blit_sprite(&mut frame, viewport(4), &red_blue_sprite(), &placement);

        assert_eq!(pixel_at(&frame, 4, 0, 0), BLUE);
        assert_eq!(pixel_at(&frame, 4, 1, 0), RED);
    }

    #[test]
    fn half_turn_matches_horizontal_flip_for_single_row() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let placement = Placement {
            rotation_degrees: 180.0,
            ..Placement::stretched(1.0, 1.0, 2.0, 1.0)
        };
        blit_sprite(&mut frame, viewport(4), &red_blue_sprite(), &placement);

        assert_eq!(pixel_at(&frame, 4, 1, 1), BLUE);
        assert_eq!(pixel_at(&frame, 4, 2, 1), RED);
    }

    #[test]
    fn quarter_turn_is_clockwise() {
        // Rotating the 2x1 strip a quarter turn clockwise about its left
        // pixel's center points the blue end downward.
        let mut frame = vec![0u8; 4 * 4 * 4];
        let placement = Placement {
            pivot_x: 0.5,
            pivot_y: 0.5,
            rotation_degrees: 90.0,
            ..Placement::stretched(1.0, 1.0, 2.0, 1.0)
        };
        blit_sprite(&mut frame, viewport(4), &red_blue_sprite(), &placement);

        assert_eq!(pixel_at(&frame, 4, 1, 1), RED);
        assert_eq!(pixel_at(&frame, 4, 1, 2), BLUE);
        assert_eq!(pixel_at(&frame, 4, 2, 1), CLEAR);
    }

    #[test]
    fn offscreen_parts_are_clipped() {
        let mut frame = vec![0u8; 2 * 2 * 4];
        let placement = Placement::stretched(-1.0, -1.0, 8.0, 8.0);
        blit_sprite(&mut frame, viewport(2), &red_blue_sprite(), &placement);
        assert_eq!(frame.len(), 16);
        assert_eq!(pixel_at(&frame, 2, 0, 0), RED);
    }

    #[test]
    fn translucent_pixels_blend() {
        let mut frame = vec![0u8; 4];
        blend_pixel(&mut frame, 1, 0, 0, [200, 100, 0, 0]);
        assert_eq!(frame, vec![0, 0, 0, 0]);

        blend_pixel(&mut frame, 1, 0, 0, [255, 255, 255, 255]);
        blend_pixel(&mut frame, 1, 0, 0, [0, 0, 0, 51]);
        assert_eq!(frame, vec![204, 204, 204, 255]);
    }
}
