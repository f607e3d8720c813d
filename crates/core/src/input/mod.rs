//! Keyboard handling that turns raw key events into the two signals the run
//! loop cares about: "terminate the application" and "leave the current
//! visualization".

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::window::HostWindow;

/// Keys the host distinguishes. Everything else collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Q,
    S,
    W,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
    /// Auto-repeat while a key is held.
    Repeat,
}

/// Modifier keys held when a key event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        shift: false,
        alt: false,
        super_key: false,
    };

    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        ..Modifiers::NONE
    };

    pub fn contains(self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Control => self.control,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Super => self.super_key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    Control,
    Shift,
    Alt,
    Super,
}

/// Which keys drive the run loop transitions.
///
/// `Other` stands for every unmapped key at once, so it cannot be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Held to leave the running visualization.
    #[serde(deserialize_with = "bindable_key")]
    pub back: Key,
    /// Pressed together with `terminate_modifier` to quit.
    #[serde(deserialize_with = "bindable_key")]
    pub terminate: Key,
    pub terminate_modifier: Modifier,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            back: Key::Escape,
            terminate: Key::S,
            terminate_modifier: Modifier::Control,
        }
    }
}

fn bindable_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Key, D::Error> {
    match Key::deserialize(deserializer)? {
        Key::Other => Err(D::Error::custom(
            "`Other` matches every unmapped key and cannot be bound",
        )),
        key => Ok(key),
    }
}

/// Key state queries, decoupled from any particular windowing library.
pub trait KeySource {
    /// Level-triggered: whether `key` is held right now.
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Edge-triggered: true once per physical press of the terminate
    /// combination, then cleared.
    fn take_terminate_request(&mut self) -> bool;
}

/// Tracks held keys and latches the terminate combination.
///
/// The bootstrap feeds every key event through [`InputGate::handle_key_event`].
/// Held keys are counted per press, so several physical keys mapped to
/// `Key::Other` stay held until the last of them is released.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    bindings: KeyBindings,
    held: HashMap<Key, u32>,
    terminate_pending: bool,
}

impl InputGate {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashMap::new(),
            terminate_pending: false,
        }
    }

    /// Records a key event. Returns `true` when the event is a fresh press of
    /// the terminate combination; auto-repeat never counts as a press.
    pub fn handle_key_event(&mut self, key: Key, action: KeyAction, modifiers: Modifiers) -> bool {
        match action {
            KeyAction::Press => {
                *self.held.entry(key).or_insert(0) += 1;
                if key == self.bindings.terminate
                    && modifiers.contains(self.bindings.terminate_modifier)
                {
                    self.terminate_pending = true;
                    return true;
                }
                false
            }
            KeyAction::Repeat => {
                // A repeat for a key we never saw pressed (focus regained
                // mid-hold) still marks it held.
                self.held.entry(key).or_insert(1);
                false
            }
            KeyAction::Release => {
                if let Some(count) = self.held.get_mut(&key) {
                    *count -= 1;
                    if *count == 0 {
                        self.held.remove(&key);
                    }
                }
                false
            }
        }
    }

    /// Forgets every held key, e.g. when the window loses focus and release
    /// events would never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl KeySource for InputGate {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.held.contains_key(&key)
    }

    fn take_terminate_request(&mut self) -> bool {
        std::mem::take(&mut self.terminate_pending)
    }
}

/// Signals sampled once per polling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSignals {
    pub should_terminate: bool,
    pub should_exit_visualization: bool,
}

impl InputSignals {
    pub fn sample<W: HostWindow + ?Sized>(window: &W, bindings: &KeyBindings) -> Self {
        Self {
            should_terminate: window.is_close_requested(),
            should_exit_visualization: window.is_key_pressed(bindings.back),
        }
    }
}
