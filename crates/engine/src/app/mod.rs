mod actor;
mod audio;
mod camera;
mod collision;
mod events;
mod frame_clock;
mod geometry;
mod input;
mod loop_runner;
mod metrics;
mod render_order;
mod rendering;
mod scene;

pub use actor::{
    Actor, ActorDesc, ActorHandle, ActorId, ActorIdAllocator, ActorViews, BoxSize, ColliderKind,
    Direction, PLAYER_NAME,
};
pub use audio::{
    open_audio, rotating_sfx_channel, AudioCommand, AudioError, AudioSink, KiraAudio, Playback,
    RecordingAudio, SilentAudio, FIRST_SFX_CHANNEL, MUSIC_CHANNEL, STINGER_CHANNEL,
};
pub use camera::Camera2D;
pub use collision::{boxes_overlap, Collider};
pub use events::{DialogueEvent, TickEvents};
pub use geometry::Vec2;
pub use input::{InputAction, InputSnapshot};
pub use loop_runner::{run_app, AppError, Game, GameContext, GameError, LoopCommand, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use render_order::compare_render_order;
pub use rendering::{
    actor_screen_origin, Canvas, RenderSettings, Renderer, Viewport, SCENE_UNIT_PX,
};
pub use scene::{SceneWorld, TickContext};
