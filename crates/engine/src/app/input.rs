use std::collections::HashSet;

use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Advance,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Advance => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Input as seen by one simulation tick: held actions plus the edges that
/// happened since the previous tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    held: ActionStates,
    pressed: ActionStates,
    left_click_pressed: bool,
}

impl InputSnapshot {
    fn new(
        quit_requested: bool,
        held: ActionStates,
        pressed: ActionStates,
        left_click_pressed: bool,
    ) -> Self {
        Self {
            quit_requested,
            held,
            pressed,
            left_click_pressed,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    /// True only on the first tick after the action went down.
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.held.set(action, is_down);
        self
    }

    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.held.set(action, true);
        self.pressed.set(action, true);
        self
    }

    pub fn with_left_click_pressed(mut self) -> Self {
        self.left_click_pressed = true;
        self
    }

    pub fn with_quit_requested(mut self) -> Self {
        self.quit_requested = true;
        self
    }
}

/// Turns window events into per-tick snapshots. Edges survive until the
/// next tick consumes them.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    quit_requested: bool,
    held_keys: HashSet<KeyCode>,
    held: ActionStates,
    pressed: ActionStates,
    left_mouse_is_down: bool,
    left_click_pressed_edge: bool,
}

impl InputCollector {
    pub(crate) fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let Some(action) = action_for_code(code) else {
            return;
        };
        let is_pressed = state == ElementState::Pressed;
        if is_pressed {
            self.held_keys.insert(code);
        } else {
            self.held_keys.remove(&code);
        }

        // An action stays held while any of its keys is down.
        let now_down = self
            .held_keys
            .iter()
            .any(|held| action_for_code(*held) == Some(action));
        if now_down && !self.held.is_down(action) {
            self.pressed.set(action, true);
        }
        self.held.set(action, now_down);
        if action == InputAction::Quit && is_pressed {
            self.quit_requested = true;
        }
    }

    pub(crate) fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                if !self.left_mouse_is_down {
                    self.left_click_pressed_edge = true;
                }
                self.left_mouse_is_down = true;
            }
            ElementState::Released => self.left_mouse_is_down = false,
        }
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.quit_requested,
            self.held,
            self.pressed,
            self.left_click_pressed_edge,
        );
        self.pressed = ActionStates::default();
        self.left_click_pressed_edge = false;
        snapshot
    }
}

fn action_for_code(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::MoveUp),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::MoveDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => Some(InputAction::Advance),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}
