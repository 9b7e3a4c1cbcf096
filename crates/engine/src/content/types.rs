use serde::Deserialize;

/// `resources/game.config`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game_title: String,
    pub initial_scene: Option<String>,
    pub intro_image: Vec<String>,
    pub intro_text: Vec<String>,
    pub font: Option<String>,
    pub intro_bgm: Option<String>,
    pub gameplay_audio: Option<String>,
    pub hp_image: Option<String>,
    pub game_over_good_image: Option<String>,
    pub game_over_good_audio: Option<String>,
    pub game_over_bad_image: Option<String>,
    pub game_over_bad_audio: Option<String>,
    pub player_movement_speed: Option<f32>,
    pub score_sfx: Option<String>,
}

impl GameConfig {
    pub const DEFAULT_PLAYER_SPEED: f32 = 0.02;

    pub fn player_speed(&self) -> f32 {
        self.player_movement_speed
            .unwrap_or(Self::DEFAULT_PLAYER_SPEED)
    }
}

/// `resources/rendering.config`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    pub x_resolution: u32,
    pub y_resolution: u32,
    pub x_scale_actor_flipping_on_movement: bool,
    pub cam_offset_x: f32,
    pub cam_offset_y: f32,
    pub zoom_factor: f32,
    pub cam_ease_factor: f32,
    pub clear_color_r: u8,
    pub clear_color_g: u8,
    pub clear_color_b: u8,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            x_resolution: 640,
            y_resolution: 360,
            x_scale_actor_flipping_on_movement: false,
            cam_offset_x: 0.0,
            cam_offset_y: 0.0,
            zoom_factor: 1.0,
            cam_ease_factor: 1.0,
            clear_color_r: 255,
            clear_color_g: 255,
            clear_color_b: 255,
        }
    }
}

/// One actor entry as written in a scene or template file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorProps {
    pub template: Option<String>,
    pub name: Option<String>,
    pub transform_position_x: Option<f32>,
    pub transform_position_y: Option<f32>,
    pub vel_x: Option<f32>,
    pub vel_y: Option<f32>,
    pub nearby_dialogue: Option<String>,
    pub contact_dialogue: Option<String>,
    pub view_image: Option<String>,
    pub view_image_back: Option<String>,
    pub view_image_damage: Option<String>,
    pub view_image_attack: Option<String>,
    pub transform_scale_x: Option<f32>,
    pub transform_scale_y: Option<f32>,
    pub transform_rotation_degrees: Option<f32>,
    pub view_pivot_offset_x: Option<f32>,
    pub view_pivot_offset_y: Option<f32>,
    pub render_order: Option<i32>,
    pub movement_bounce_enabled: Option<bool>,
    pub box_collider_width: Option<f32>,
    pub box_collider_height: Option<f32>,
    pub box_trigger_width: Option<f32>,
    pub box_trigger_height: Option<f32>,
    pub damage_sfx: Option<String>,
    pub step_sfx: Option<String>,
    pub nearby_dialogue_sfx: Option<String>,
}

impl ActorProps {
    /// Layers `overrides` on top of `self`; any key set in `overrides` wins.
    pub fn overridden_by(self, overrides: ActorProps) -> ActorProps {
        ActorProps {
            template: overrides.template.or(self.template),
            name: overrides.name.or(self.name),
            transform_position_x: overrides.transform_position_x.or(self.transform_position_x),
            transform_position_y: overrides.transform_position_y.or(self.transform_position_y),
            vel_x: overrides.vel_x.or(self.vel_x),
            vel_y: overrides.vel_y.or(self.vel_y),
            nearby_dialogue: overrides.nearby_dialogue.or(self.nearby_dialogue),
            contact_dialogue: overrides.contact_dialogue.or(self.contact_dialogue),
            view_image: overrides.view_image.or(self.view_image),
            view_image_back: overrides.view_image_back.or(self.view_image_back),
            view_image_damage: overrides.view_image_damage.or(self.view_image_damage),
            view_image_attack: overrides.view_image_attack.or(self.view_image_attack),
            transform_scale_x: overrides.transform_scale_x.or(self.transform_scale_x),
            transform_scale_y: overrides.transform_scale_y.or(self.transform_scale_y),
            transform_rotation_degrees: overrides
                .transform_rotation_degrees
                .or(self.transform_rotation_degrees),
            view_pivot_offset_x: overrides.view_pivot_offset_x.or(self.view_pivot_offset_x),
            view_pivot_offset_y: overrides.view_pivot_offset_y.or(self.view_pivot_offset_y),
            render_order: overrides.render_order.or(self.render_order),
            movement_bounce_enabled: overrides
                .movement_bounce_enabled
                .or(self.movement_bounce_enabled),
            box_collider_width: overrides.box_collider_width.or(self.box_collider_width),
            box_collider_height: overrides.box_collider_height.or(self.box_collider_height),
            box_trigger_width: overrides.box_trigger_width.or(self.box_trigger_width),
            box_trigger_height: overrides.box_trigger_height.or(self.box_trigger_height),
            damage_sfx: overrides.damage_sfx.or(self.damage_sfx),
            step_sfx: overrides.step_sfx.or(self.step_sfx),
            nearby_dialogue_sfx: overrides.nearby_dialogue_sfx.or(self.nearby_dialogue_sfx),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub actors: Vec<ActorProps>,
}
