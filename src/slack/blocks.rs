use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible only to the user who invoked the command.
    Ephemeral,
    InChannel,
}

impl ResponseType {
    pub fn for_privacy(is_private: bool) -> Self {
        if is_private { ResponseType::Ephemeral } else { ResponseType::InChannel }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")] Plain {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    #[serde(rename = "mrkdwn")] Mrkdwn {
        text: String,
    },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into(), emoji: None }
    }

    pub fn emoji(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into(), emoji: Some(true) }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        action_id: String,
        text: TextObject,
        value: String,
        style: ButtonStyle,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Divider,
    Section {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
    Actions {
        elements: Vec<Element>,
    },
}

impl Block {
    pub fn header(title: impl Into<String>) -> Self {
        Block::Header { text: TextObject::plain(title) }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Block::Section { text: Some(TextObject::mrkdwn(text)), fields: Vec::new() }
    }

    pub fn markdown_fields(fields: Vec<String>) -> Self {
        Block::Section {
            text: None,
            fields: fields.into_iter().map(TextObject::mrkdwn).collect(),
        }
    }

    /// Text of a section or header block.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Header { text } | Block::Section { text: Some(text), .. } =>
                match text {
                    TextObject::Plain { text, .. } | TextObject::Mrkdwn { text } => Some(text),
                }
            _ => None,
        }
    }
}

/// Message body posted to a Slack `response_url` or returned inline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_original: Option<bool>,
    pub blocks: Vec<Block>,
}

impl SlackPayload {
    pub fn new(response_type: ResponseType, blocks: Vec<Block>) -> Self {
        Self { response_type: Some(response_type), replace_original: None, blocks }
    }

    pub fn replacing_original(mut self) -> Self {
        self.replace_original = Some(true);
        self
    }
}
