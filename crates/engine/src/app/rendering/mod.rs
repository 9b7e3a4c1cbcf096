mod blit;
mod renderer;
mod sprites;
mod text;
mod transform;

pub use renderer::{Canvas, RenderSettings, Renderer};
pub use transform::{actor_screen_origin, Viewport, SCENE_UNIT_PX};
