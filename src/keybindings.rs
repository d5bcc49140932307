//! Remappable controls
//!
//! Keys map to logical `GameAction`s; the battle core only ever sees the
//! `BattleAction` each one translates to.

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

use crate::combat::BattleAction;

/// All possible actions that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    // Navigation
    Back,
    Confirm,

    // Battle
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    Fire,
    Jump,
}

impl GameAction {
    pub const ALL: [GameAction; 8] = [
        GameAction::Back,
        GameAction::Confirm,
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::MoveForward,
        GameAction::MoveBack,
        GameAction::Fire,
        GameAction::Jump,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            GameAction::Back => "Back / Leave battle",
            GameAction::Confirm => "Confirm / Select",
            GameAction::MoveLeft => "Move Left",
            GameAction::MoveRight => "Move Right",
            GameAction::MoveForward => "Move Forward",
            GameAction::MoveBack => "Move Back",
            GameAction::Fire => "Fire",
            GameAction::Jump => "Jump",
        }
    }

    /// The core intent this key drives, if any
    pub fn battle_action(self) -> Option<BattleAction> {
        match self {
            GameAction::MoveLeft => Some(BattleAction::MoveLeft),
            GameAction::MoveRight => Some(BattleAction::MoveRight),
            GameAction::MoveForward => Some(BattleAction::MoveForward),
            GameAction::MoveBack => Some(BattleAction::MoveBack),
            GameAction::Fire => Some(BattleAction::Fire),
            GameAction::Jump => Some(BattleAction::Jump),
            GameAction::Back | GameAction::Confirm => None,
        }
    }
}

/// Keys that can appear in a settings file, with their display names
const KEY_TABLE: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Escape, "Escape", "ESC"),
    (KeyCode::Enter, "Enter", "ENTER"),
    (KeyCode::Space, "Space", "SPACE"),
    (KeyCode::Tab, "Tab", "TAB"),
    (KeyCode::ShiftLeft, "ShiftLeft", "LSHIFT"),
    (KeyCode::ControlLeft, "ControlLeft", "LCTRL"),
    (KeyCode::KeyA, "KeyA", "A"),
    (KeyCode::KeyD, "KeyD", "D"),
    (KeyCode::KeyE, "KeyE", "E"),
    (KeyCode::KeyF, "KeyF", "F"),
    (KeyCode::KeyJ, "KeyJ", "J"),
    (KeyCode::KeyK, "KeyK", "K"),
    (KeyCode::KeyQ, "KeyQ", "Q"),
    (KeyCode::KeyS, "KeyS", "S"),
    (KeyCode::KeyW, "KeyW", "W"),
    (KeyCode::ArrowUp, "ArrowUp", "↑"),
    (KeyCode::ArrowDown, "ArrowDown", "↓"),
    (KeyCode::ArrowLeft, "ArrowLeft", "←"),
    (KeyCode::ArrowRight, "ArrowRight", "→"),
];

fn key_from_str(name: &str) -> Option<KeyCode> {
    KEY_TABLE
        .iter()
        .find(|(_, serialized, _)| *serialized == name)
        .map(|(key, _, _)| *key)
}

fn key_to_str(key: KeyCode) -> Option<&'static str> {
    KEY_TABLE
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, serialized, _)| *serialized)
}

mod keycode_serde {
    use super::*;

    pub fn serialize<S: Serializer>(key: &KeyCode, serializer: S) -> Result<S::Ok, S::Error> {
        match key_to_str(*key) {
            Some(name) => serializer.serialize_str(name),
            None => Err(serde::ser::Error::custom(format!("unsupported key {:?}", key))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(deserializer)?;
        key_from_str(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key '{}'", name)))
    }
}

mod option_keycode_serde {
    use super::*;

    pub fn serialize<S: Serializer>(
        key: &Option<KeyCode>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match key {
            Some(k) => match key_to_str(*k) {
                Some(name) => serializer.serialize_some(name),
                None => Err(serde::ser::Error::custom(format!("unsupported key {:?}", k))),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<KeyCode>, D::Error> {
        let name: Option<String> = Option::deserialize(deserializer)?;
        name.map(|n| {
            key_from_str(&n).ok_or_else(|| serde::de::Error::custom(format!("unknown key '{}'", n)))
        })
        .transpose()
    }
}

/// Key binding with primary and optional secondary key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyBinding {
    #[serde(with = "keycode_serde")]
    pub primary: KeyCode,
    #[serde(with = "option_keycode_serde", default)]
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    pub fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }

    fn keys(&self) -> impl Iterator<Item = KeyCode> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// Complete keybindings configuration
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Keybindings {
    bindings: HashMap<GameAction, KeyBinding>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::create_defaults()
    }
}

impl Keybindings {
    /// WASD or arrows to move, Space or F to fire, J to jump
    pub fn create_defaults() -> Self {
        let mut bindings = HashMap::new();

        bindings.insert(GameAction::Back, KeyBinding::new(KeyCode::Escape));
        bindings.insert(GameAction::Confirm, KeyBinding::new(KeyCode::Enter));

        bindings.insert(
            GameAction::MoveLeft,
            KeyBinding::with_secondary(KeyCode::KeyA, KeyCode::ArrowLeft),
        );
        bindings.insert(
            GameAction::MoveRight,
            KeyBinding::with_secondary(KeyCode::KeyD, KeyCode::ArrowRight),
        );
        bindings.insert(
            GameAction::MoveForward,
            KeyBinding::with_secondary(KeyCode::KeyW, KeyCode::ArrowUp),
        );
        bindings.insert(
            GameAction::MoveBack,
            KeyBinding::with_secondary(KeyCode::KeyS, KeyCode::ArrowDown),
        );
        bindings.insert(
            GameAction::Fire,
            KeyBinding::with_secondary(KeyCode::Space, KeyCode::KeyF),
        );
        bindings.insert(GameAction::Jump, KeyBinding::new(KeyCode::KeyJ));

        Self { bindings }
    }

    pub fn get(&self, action: GameAction) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn action_just_pressed(&self, action: GameAction, keyboard: &ButtonInput<KeyCode>) -> bool {
        self.get(action)
            .is_some_and(|binding| keyboard.get_just_pressed().any(|key| binding.matches(*key)))
    }

    /// Input edges for the battle core this frame: `(action, active)` for each
    /// bound key that went down or up
    pub fn battle_edges(&self, keyboard: &ButtonInput<KeyCode>) -> Vec<(BattleAction, bool)> {
        let mut edges = Vec::new();
        for action in GameAction::ALL {
            let (Some(battle_action), Some(binding)) = (action.battle_action(), self.get(action))
            else {
                continue;
            };
            if binding.keys().any(|key| keyboard.just_pressed(key)) {
                edges.push((battle_action, true));
            } else if binding.keys().any(|key| keyboard.just_released(key))
                && !binding.keys().any(|key| keyboard.pressed(key))
            {
                edges.push((battle_action, false));
            }
        }
        edges
    }

    /// Get a human-readable string for a key
    pub fn key_name(key: KeyCode) -> &'static str {
        KEY_TABLE
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, _, display)| *display)
            .unwrap_or("???")
    }

    /// Get display string for a binding
    pub fn binding_display(&self, action: GameAction) -> String {
        match self.get(action) {
            Some(KeyBinding {
                primary,
                secondary: Some(secondary),
            }) => format!("{} / {}", Self::key_name(*primary), Self::key_name(*secondary)),
            Some(binding) => Self::key_name(binding.primary).to_string(),
            None => "Unbound".to_string(),
        }
    }
}
