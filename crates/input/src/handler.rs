//! DAS/ARR input handler for terminal environments.
//!
//! Tracks held movement keys and the held soft-drop key. Releasing the drop
//! key (or timing out, on terminals that never report releases) yields
//! [`GameAction::SoftDropRelease`] so the session can resume gravity.

use std::time::Instant;

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{GameAction, DEFAULT_ARR_MS, DEFAULT_DAS_MS, SOFT_DROP_REPEAT_MS};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

/// Actions produced by one [`InputHandler::update`] call
pub type ActionBatch = ArrayVec<GameAction, 32>;

/// Tracks input state for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    /// Last press of a direction key
    horizontal_key_time: Instant,
    /// Last press of the drop key
    down_key_time: Instant,
    horizontal_das_timer: u32,
    horizontal_arr_accumulator: u32,
    down_repeat_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

// Without key-release events a tap would otherwise stay "held" forever.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

fn is_left(code: KeyCode) -> bool {
    matches!(code, KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A'))
}

fn is_right(code: KeyCode) -> bool {
    matches!(code, KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D'))
}

fn is_down(code: KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S'))
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            horizontal_key_time: Instant::now(),
            down_key_time: Instant::now(),
            horizontal_das_timer: 0,
            horizontal_arr_accumulator: 0,
            down_repeat_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn soft_drop_held(&self) -> bool {
        self.down_held
    }

    /// Handle a movement or soft-drop key press. Other keys return `None`.
    ///
    /// A press of a key that is already held refreshes the release timeout
    /// without emitting anything; repeats come from [`InputHandler::update`].
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let (direction, action) = if is_left(code) {
            (HorizontalDirection::Left, GameAction::MoveLeft)
        } else if is_right(code) {
            (HorizontalDirection::Right, GameAction::MoveRight)
        } else if is_down(code) {
            self.down_key_time = Instant::now();
            if self.down_held {
                return None;
            }
            self.down_held = true;
            self.down_repeat_accumulator = 0;
            return Some(GameAction::SoftDrop);
        } else {
            return None;
        };

        self.horizontal_key_time = Instant::now();
        if self.horizontal == direction {
            return None;
        }
        self.horizontal = direction;
        self.horizontal_das_timer = 0;
        self.horizontal_arr_accumulator = 0;
        Some(action)
    }

    /// Handle a key release. Releasing the drop key yields `SoftDropRelease`.
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<GameAction> {
        if (is_left(code) && self.horizontal == HorizontalDirection::Left)
            || (is_right(code) && self.horizontal == HorizontalDirection::Right)
        {
            self.release_horizontal();
            return None;
        }
        if is_down(code) {
            return self.release_down();
        }
        None
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.horizontal_das_timer = 0;
        self.horizontal_arr_accumulator = 0;
    }

    fn release_down(&mut self) -> Option<GameAction> {
        if !self.down_held {
            return None;
        }
        self.down_held = false;
        self.down_repeat_accumulator = 0;
        Some(GameAction::SoftDropRelease)
    }

    pub fn update(&mut self, elapsed_ms: u32) -> ActionBatch {
        let mut actions = ActionBatch::new();

        if self.horizontal != HorizontalDirection::None
            && self.timed_out(self.horizontal_key_time)
        {
            self.release_horizontal();
        }
        if self.down_held && self.timed_out(self.down_key_time) {
            if let Some(action) = self.release_down() {
                let _ = actions.try_push(action);
            }
        }

        match self.horizontal {
            HorizontalDirection::Left | HorizontalDirection::Right => {
                let prev_das = self.horizontal_das_timer;
                self.horizontal_das_timer = self.horizontal_das_timer.saturating_add(elapsed_ms);

                if self.horizontal_das_timer >= self.das_delay {
                    let excess = if prev_das < self.das_delay {
                        self.horizontal_das_timer - self.das_delay
                    } else {
                        elapsed_ms
                    };
                    self.horizontal_arr_accumulator += excess;

                    let action = if self.horizontal == HorizontalDirection::Left {
                        GameAction::MoveLeft
                    } else {
                        GameAction::MoveRight
                    };
                    while self.horizontal_arr_accumulator >= self.arr_rate {
                        let _ = actions.try_push(action);
                        self.horizontal_arr_accumulator -= self.arr_rate;
                    }
                }
            }
            HorizontalDirection::None => {
                self.horizontal_das_timer = 0;
                self.horizontal_arr_accumulator = 0;
            }
        }

        if self.down_held {
            self.down_repeat_accumulator += elapsed_ms;
            while self.down_repeat_accumulator >= SOFT_DROP_REPEAT_MS {
                let _ = actions.try_push(GameAction::SoftDrop);
                self.down_repeat_accumulator -= SOFT_DROP_REPEAT_MS;
            }
        }

        actions
    }

    fn timed_out(&self, pressed_at: Instant) -> bool {
        pressed_at.elapsed().as_millis() > u128::from(self.key_release_timeout_ms)
    }

    /// Forget all held keys. Returns `SoftDropRelease` if the drop key was held.
    pub fn reset(&mut self) -> Option<GameAction> {
        self.release_horizontal();
        let now = Instant::now();
        self.horizontal_key_time = now;
        self.down_key_time = now;
        self.release_down()
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
