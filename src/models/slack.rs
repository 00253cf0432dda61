use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use url::form_urlencoded;

/// A slash command invocation as posted by Slack (form encoded).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlashCommandEvent {
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
}

impl SlashCommandEvent {
    pub fn from_form(body: &[u8]) -> Self {
        let mut params: HashMap<String, String> = form_urlencoded
            ::parse(body)
            .into_owned()
            .collect();
        let mut take = |name: &str| params.remove(name).unwrap_or_default();

        Self {
            team_id: take("team_id"),
            channel_id: take("channel_id"),
            channel_name: take("channel_name"),
            user_id: take("user_id"),
            user_name: take("user_name"),
            command: take("command"),
            text: take("text"),
            response_url: take("response_url"),
            trigger_id: take("trigger_id"),
        }
    }
}

/// Interactive component callback (`block_actions`).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub container: ActionContainer,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub message: ActionMessage,
}

impl ActionEvent {
    /// Decodes the `payload` field of an interactive callback form body.
    pub fn from_form(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload = form_urlencoded
            ::parse(body)
            .find(|(key, _)| key == "payload")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();
        serde_json::from_str(&payload)
    }

    pub fn first_action(&self) -> Option<&Action> {
        self.actions.first()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionContainer {
    #[serde(default)]
    pub is_ephemeral: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub action_id: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionMessage {
    #[serde(default)]
    pub blocks: Vec<JsonValue>,
}

impl ActionMessage {
    /// Text of the block at `index`, if that block carries a text object.
    pub fn block_text(&self, index: usize) -> Option<&str> {
        self.blocks
            .get(index)
            .and_then(|b| b.get("text"))
            .and_then(|t| t.get("text"))
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
    }
}
