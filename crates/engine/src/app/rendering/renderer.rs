use std::path::PathBuf;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use winit::window::Window;

use crate::app::{Actor, Camera2D, Direction, SceneWorld};
use crate::content::RenderingConfig;

use super::blit::{blit_sprite, fill, Placement};
use super::sprites::SpriteCache;
use super::text::{draw_text, text_width, TEXT_HEIGHT};
use super::transform::actor_screen_origin;
use super::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Logical framebuffer size; the window surface scales it to fit.
    pub viewport: Viewport,
    pub clear_color: [u8; 4],
    /// Mirror sprites of actors facing west.
    pub movement_flip: bool,
}

impl RenderSettings {
    pub fn from_config(config: &RenderingConfig) -> Self {
        Self {
            viewport: Viewport {
                width: config.x_resolution.max(1),
                height: config.y_resolution.max(1),
            },
            clear_color: [
                config.clear_color_r,
                config.clear_color_g,
                config.clear_color_b,
                255,
            ],
            movement_flip: config.x_scale_actor_flipping_on_movement,
        }
    }
}

pub struct Renderer {
    pixels: Pixels<'static>,
    settings: RenderSettings,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        settings: RenderSettings,
        images_dir: PathBuf,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(settings.viewport.width, settings.viewport.height, surface)?;
        Ok(Self {
            pixels,
            settings,
            sprites: SpriteCache::new(images_dir),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Clears the frame, lets `draw` paint it, then presents.
    pub fn render_frame<F>(&mut self, draw: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        let mut canvas = Canvas::new(self.pixels.frame_mut(), self.settings, &mut self.sprites);
        canvas.clear();
        draw(&mut canvas);
        self.pixels.render()
    }
}

/// Drawing surface for one frame. Coordinates are framebuffer pixels with
/// the origin at the top-left.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    settings: RenderSettings,
    sprites: &'a mut SpriteCache,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(
        frame: &'a mut [u8],
        settings: RenderSettings,
        sprites: &'a mut SpriteCache,
    ) -> Self {
        Self {
            frame,
            settings,
            sprites,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.settings.viewport
    }

    pub fn clear(&mut self) {
        fill(self.frame, self.settings.clear_color);
    }

    /// Pixel size of an image, if it can be loaded.
    pub fn image_size(&mut self, image: &str) -> Option<(u32, u32)> {
        self.sprites
            .get(image)
            .map(|sprite| (sprite.width, sprite.height))
    }

    pub fn draw_image(&mut self, image: &str, x: i32, y: i32) {
        let viewport = self.settings.viewport;
        if let Some(sprite) = self.sprites.get(image) {
            let placement = Placement::stretched(
                x as f32,
                y as f32,
                sprite.width as f32,
                sprite.height as f32,
            );
            blit_sprite(self.frame, viewport, sprite, &placement);
        }
    }

    /// Stretches an image over the whole frame.
    pub fn draw_fullscreen_image(&mut self, image: &str) {
        let viewport = self.settings.viewport;
        if let Some(sprite) = self.sprites.get(image) {
            let placement =
                Placement::stretched(0.0, 0.0, viewport.width as f32, viewport.height as f32);
            blit_sprite(self.frame, viewport, sprite, &placement);
        }
    }

    pub fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        draw_text(self.frame, self.settings.viewport, x, y, text);
    }

    pub fn text_width(&self, text: &str) -> i32 {
        text_width(text)
    }

    pub fn text_height(&self) -> i32 {
        TEXT_HEIGHT
    }

    /// Draws every actor of `world` in render-list order.
    pub fn draw_scene(&mut self, world: &SceneWorld, camera: &Camera2D, frame: u64) {
        for &handle in world.render_list() {
            if let Some(actor) = world.actor(handle) {
                self.draw_actor(actor, camera, frame);
            }
        }
    }

    fn draw_actor(&mut self, actor: &Actor, camera: &Camera2D, frame: u64) {
        let Some(image) = actor.view_image(frame) else {
            return;
        };
        let viewport = self.settings.viewport;
        let movement_flip = self.settings.movement_flip;
        let Some(sprite) = self.sprites.get(image) else {
            return;
        };

        let zoom = camera.zoom();
        let scale = actor.scale();
        let pivot = actor.pivot_px();
        let (x, y) = actor_screen_origin(
            actor.position(),
            camera,
            viewport,
            pivot,
            actor.visual_offset(),
        );
        let width = (sprite.width as f32 * scale.x.abs()) as i32;
        let height = (sprite.height as f32 * scale.y.abs()) as i32;

        let mut flip_x = scale.x < 0.0;
        if movement_flip && actor.x_direction() == Direction::West {
            flip_x = !flip_x;
        }
        let placement = Placement {
            x: x as f32 * zoom,
            y: y as f32 * zoom,
            width: width as f32 * zoom,
            height: height as f32 * zoom,
            pivot_x: pivot.0 as f32 * zoom,
            pivot_y: pivot.1 as f32 * zoom,
            rotation_degrees: actor.rotation_degrees(),
            flip_x,
            flip_y: scale.y < 0.0,
        };
        blit_sprite(self.frame, viewport, sprite, &placement);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::app::{ActorDesc, ActorIdAllocator, ActorViews, Vec2};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    struct Setup {
        _temp: TempDir,
        sprites: SpriteCache,
        frame: Vec<u8>,
        settings: RenderSettings,
    }

    fn setup(movement_flip: bool) -> Setup {
        let temp = TempDir::new().expect("tempdir");
        let mut image = image::RgbaImage::from_pixel(2, 2, image::Rgba(GREEN));
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.save(temp.path().join("block.png")).expect("save");
        let settings = RenderSettings {
            viewport: Viewport {
                width: 8,
                height: 8,
            },
            clear_color: WHITE,
            movement_flip,
        };
        Setup {
            sprites: SpriteCache::new(temp.path().to_path_buf()),
            _temp: temp,
            frame: vec![0; 8 * 8 * 4],
            settings,
        }
    }

    fn pixel(frame: &[u8], x: usize, y: usize) -> [u8; 4] {
        let idx = (y * 8 + x) * 4;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    fn block_world(velocity: Vec2) -> SceneWorld {
        let mut world = SceneWorld::new("render");
        world.spawn(
            &mut ActorIdAllocator::default(),
            ActorDesc {
                name: "block".to_string(),
                velocity,
                views: ActorViews {
                    front: Some("block".to_string()),
                    ..ActorViews::default()
                },
                pivot: Vec2::new(1.0, 1.0),
                ..ActorDesc::default()
            },
        );
        world
    }

    #[test]
    fn clear_fills_with_clear_color() {
        let mut s = setup(false);
        let mut canvas = Canvas::new(&mut s.frame, s.settings, &mut s.sprites);
        canvas.clear();
        assert_eq!(pixel(&s.frame, 7, 7), WHITE);
    }

    #[test]
    fn actor_at_camera_is_centered_on_pivot() {
        let mut s = setup(false);
        let world = block_world(Vec2::ZERO);
        let camera = Camera2D::default();
        let mut canvas = Canvas::new(&mut s.frame, s.settings, &mut s.sprites);
        canvas.clear();
        canvas.draw_scene(&world, &camera, 0);

        assert_eq!(pixel(&s.frame, 3, 3), [255, 0, 0, 255]);
        assert_eq!(pixel(&s.frame, 4, 4), GREEN);
        assert_eq!(pixel(&s.frame, 2, 2), WHITE);
    }

    #[test]
    fn westward_actor_is_mirrored_when_flipping_enabled() {
        let mut s = setup(true);
        let world = block_world(Vec2::new(-1.0, 0.0));
        let camera = Camera2D::default();
        let mut canvas = Canvas::new(&mut s.frame, s.settings, &mut s.sprites);
        canvas.draw_scene(&world, &camera, 0);

        assert_eq!(pixel(&s.frame, 3, 3), GREEN);
        assert_eq!(pixel(&s.frame, 4, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn missing_image_draws_nothing() {
        let mut s = setup(false);
        let mut canvas = Canvas::new(&mut s.frame, s.settings, &mut s.sprites);
        canvas.clear();
        canvas.draw_fullscreen_image("absent");
        assert!(canvas.image_size("absent").is_none());
        assert!(s.frame.chunks_exact(4).all(|p| p == WHITE));
    }

    #[test]
    fn fullscreen_image_covers_frame() {
        let mut s = setup(false);
        let mut canvas = Canvas::new(&mut s.frame, s.settings, &mut s.sprites);
        canvas.draw_fullscreen_image("block");
        assert_eq!(pixel(&s.frame, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel(&s.frame, 7, 7), GREEN);
    }

    #[test]
    fn settings_follow_rendering_config() {
        let config = RenderingConfig {
            x_resolution: 320,
            clear_color_g: 10,
            x_scale_actor_flipping_on_movement: true,
            ..RenderingConfig::default()
        };
        let settings = RenderSettings::from_config(&config);
        assert_eq!(settings.viewport.width, 320);
        assert_eq!(settings.viewport.height, 360);
        assert_eq!(settings.clear_color, [255, 10, 255, 255]);
        assert!(settings.movement_flip);
    }
}
