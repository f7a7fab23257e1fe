//! Typed game settings with explicit defaults and a partial-update merge.

use serde::{Deserialize, Serialize};

/// What happens to matched pairs on the board.
///
/// Stored and persisted but not branched on anywhere: the only behavior
/// today is `Stay`. Kept as an enum so a future "remove" option slots in
/// without a settings migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedPairBehavior {
    #[default]
    Stay,
}

/// All game settings. The persisted JSON uses camelCase keys; missing keys
/// deserialize to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub matched_pair_behavior: MatchedPairBehavior,
    /// Auto-start the round when the pre-game countdown runs out.
    pub auto_advance: bool,
    /// Pre-game countdown length in seconds.
    pub timer_duration: u32,
    pub openai_api_key: String,
    pub listen_speak_explanation: bool,
    pub listen_speak_example: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            matched_pair_behavior: MatchedPairBehavior::Stay,
            auto_advance: false,
            timer_duration: 60,
            openai_api_key: String::new(),
            listen_speak_explanation: true,
            listen_speak_example: true,
        }
    }
}

/// Partial settings override; `None` fields leave the current value alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pair_behavior: Option<MatchedPairBehavior>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_advance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_speak_explanation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_speak_example: Option<bool>,
}

impl GameSettings {
    /// Apply a partial update, overriding only the provided fields.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(behavior) = update.matched_pair_behavior {
            self.matched_pair_behavior = behavior;
        }
        if let Some(auto_advance) = update.auto_advance {
            self.auto_advance = auto_advance;
        }
        if let Some(timer_duration) = update.timer_duration {
            self.timer_duration = timer_duration;
        }
        if let Some(key) = update.openai_api_key {
            self.openai_api_key = key;
        }
        if let Some(speak) = update.listen_speak_explanation {
            self.listen_speak_explanation = speak;
        }
        if let Some(speak) = update.listen_speak_example {
            self.listen_speak_example = speak;
        }
    }
}
