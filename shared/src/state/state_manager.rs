use std::{collections::VecDeque, fmt::Debug};

use log::warn;

use crate::StateError;

/// History length at which a warning is logged
pub const HISTORY_WARN_THRESHOLD: usize = 10;

/// Default bound on remembered states
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

type ChangeCallback<T> = Box<dyn FnMut(T, T) + Send>;

/// A current value plus a bounded history of previous values.
///
/// Once the history is full the oldest entry is dropped, so `go_back` can
/// reach at most `history_limit` states into the past.
pub struct StateManager<T: Copy + Eq + Debug> {
    current: T,
    default: T,
    history: VecDeque<T>,
    history_limit: usize,
    warned: bool,
    callbacks: Vec<ChangeCallback<T>>,
}

impl<T: Copy + Eq + Debug> StateManager<T> {
    pub fn new(default: T) -> Self {
        Self::with_history_limit(default, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(default: T, history_limit: usize) -> Self {
        Self {
            current: default,
            default,
            history: VecDeque::new(),
            history_limit: history_limit.max(1),
            warned: false,
            callbacks: Vec::new(),
        }
    }

    pub fn read(&self) -> T {
        self.current
    }

    pub fn previous(&self) -> Option<T> {
        self.history.back().copied()
    }

    pub fn is(&self, state: T) -> bool {
        self.current == state
    }

    pub fn is_not(&self, state: T) -> bool {
        self.current != state
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn default_state(&self) -> T {
        self.default
    }

    /// Registers `callback(new, old)`, run after every transition
    pub fn on_change<F: FnMut(T, T) + Send + 'static>(&mut self, callback: F) {
        self.callbacks.push(Box::new(callback));
    }

    /// No-op when `state` is already current
    pub fn set(&mut self, state: T) {
        if state == self.current {
            return;
        }
        if self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(self.current);

        if self.history.len() >= HISTORY_WARN_THRESHOLD {
            if !self.warned {
                warn!(
                    "State history holds {} entries (current {:?}). Something may be cycling between states",
                    self.history.len(),
                    state
                );
                self.warned = true;
            }
        } else {
            self.warned = false;
        }

        self.transition(state);
    }

    pub fn go_back(&mut self) -> Result<T, StateError> {
        let Some(previous) = self.history.pop_back() else {
            return Err(StateError::HistoryUnderflow {
                current: format!("{:?}", self.current),
            });
        };
        if self.history.len() < HISTORY_WARN_THRESHOLD {
            self.warned = false;
        }
        self.transition(previous);
        Ok(previous)
    }

    /// Clears history and returns to the default state
    pub fn reset(&mut self) {
        self.history.clear();
        self.warned = false;
        let default = self.default;
        self.transition(default);
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.warned = false;
    }

    /// True when the most recent transitions bounced A -> B -> A -> B
    pub fn oscillating(&self) -> bool {
        let len = self.history.len();
        if len < 3 {
            return false;
        }
        let a = self.history[len - 3];
        let b = self.history[len - 2];
        a != b && self.history[len - 1] == a && self.current == b
    }

    fn transition(&mut self, state: T) {
        let old = self.current;
        self.current = state;
        if old != state {
            for callback in self.callbacks.iter_mut() {
                callback(state, old);
            }
        }
    }
}
