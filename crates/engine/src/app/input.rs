use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Toggle,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
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
            InputAction::Toggle => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Directions held during a tick. Opposing directions may both be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Per-tick input handed to the simulation.
///
/// Held state (directions) and edges (`toggle_pressed`) are kept apart: an
/// edge is true for exactly one tick per physical press.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    toggle_pressed: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, toggle_pressed: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            toggle_pressed,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn toggle_pressed(&self) -> bool {
        self.toggle_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn move_intent(&self) -> MoveIntent {
        MoveIntent {
            up: self.is_down(InputAction::MoveUp),
            down: self.is_down(InputAction::MoveDown),
            left: self.is_down(InputAction::MoveLeft),
            right: self.is_down(InputAction::MoveRight),
        }
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_toggle_pressed(mut self, toggle_pressed: bool) -> Self {
        self.toggle_pressed = toggle_pressed;
        self
    }
}

/// Folds window keyboard events into per-tick snapshots.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    quit_requested: bool,
    toggle_edge: bool,
    actions: ActionStates,
}

impl InputCollector {
    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub(crate) fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        let pressed = state == ElementState::Pressed;
        let was_down = self.actions.is_down(action);
        self.actions.set(action, pressed);

        match action {
            InputAction::Toggle if pressed && !was_down => self.toggle_edge = true,
            InputAction::Quit if pressed => self.request_quit(),
            _ => {}
        }
    }

    /// Snapshot for the next tick. The toggle edge is handed out once.
    pub(crate) fn take_snapshot(&mut self) -> InputSnapshot {
        let toggle_pressed = std::mem::take(&mut self.toggle_edge);
        InputSnapshot::new(self.quit_requested, toggle_pressed, self.actions)
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::MoveUp),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::MoveDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::KeyH => Some(InputAction::Toggle),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_is_idle() {
        let snapshot = InputSnapshot::empty();
        assert!(snapshot.move_intent().is_idle());
        assert!(!snapshot.toggle_pressed());
        assert!(!snapshot.quit_requested());
    }

    #[test]
    fn move_intent_reflects_held_directions() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveUp, true)
            .with_action_down(InputAction::MoveLeft, true);
        assert_eq!(
            snapshot.move_intent(),
            MoveIntent {
                up: true,
                down: false,
                left: true,
                right: false,
            }
        );
    }

    #[test]
    fn released_action_is_not_down() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveRight, false);
        assert!(!snapshot.is_down(InputAction::MoveRight));
    }

    fn press(collector: &mut InputCollector, code: KeyCode) {
        collector.handle_key(PhysicalKey::Code(code), ElementState::Pressed);
    }

    fn release(collector: &mut InputCollector, code: KeyCode) {
        collector.handle_key(PhysicalKey::Code(code), ElementState::Released);
    }

    #[test]
    fn toggle_edge_lasts_one_snapshot() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::KeyH);

        assert!(collector.take_snapshot().toggle_pressed());
        assert!(!collector.take_snapshot().toggle_pressed());
    }

    #[test]
    fn key_repeat_does_not_refire_toggle() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::KeyH);
        let first = collector.take_snapshot();
        press(&mut collector, KeyCode::KeyH);
        let repeat = collector.take_snapshot();
        release(&mut collector, KeyCode::KeyH);
        press(&mut collector, KeyCode::KeyH);
        let second_press = collector.take_snapshot();

        assert!(first.toggle_pressed());
        assert!(!repeat.toggle_pressed());
        assert!(second_press.toggle_pressed());
    }

    #[test]
    fn press_and_release_between_ticks_still_toggles() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::KeyH);
        release(&mut collector, KeyCode::KeyH);

        let snapshot = collector.take_snapshot();
        assert!(snapshot.toggle_pressed());
        assert!(!snapshot.is_down(InputAction::Toggle));
    }

    #[test]
    fn letters_and_arrows_share_directions() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::KeyW);
        press(&mut collector, KeyCode::ArrowRight);

        let intent = collector.take_snapshot().move_intent();
        assert!(intent.up && intent.right);
        assert!(!intent.down && !intent.left);

        release(&mut collector, KeyCode::KeyW);
        press(&mut collector, KeyCode::ArrowUp);
        assert!(collector.take_snapshot().move_intent().up);
    }

    #[test]
    fn held_direction_survives_snapshots() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::KeyS);

        assert!(collector.take_snapshot().is_down(InputAction::MoveDown));
        assert!(collector.take_snapshot().is_down(InputAction::MoveDown));
        release(&mut collector, KeyCode::KeyS);
        assert!(collector.take_snapshot().move_intent().is_idle());
    }

    #[test]
    fn escape_requests_quit() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::Escape);

        assert!(collector.quit_requested());
        assert!(collector.take_snapshot().quit_requested());
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut collector = InputCollector::default();
        press(&mut collector, KeyCode::KeyG);
        press(&mut collector, KeyCode::Space);

        let snapshot = collector.take_snapshot();
        assert!(snapshot.move_intent().is_idle());
        assert!(!snapshot.toggle_pressed());
        assert!(!collector.quit_requested());
    }
}
