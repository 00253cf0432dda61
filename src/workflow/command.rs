use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlackCommand {
    Help,
    Ask,
    /// Ask with a reply only the requester can see.
    PrivateAsk,
}

impl fmt::Display for SlackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlackCommand::Help => "help",
            SlackCommand::Ask => "ask",
            SlackCommand::PrivateAsk => "pask",
        };
        f.write_str(name)
    }
}

impl FromStr for SlackCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(SlackCommand::Help),
            "ask" => Ok(SlackCommand::Ask),
            "pask" => Ok(SlackCommand::PrivateAsk),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

impl SlackCommand {
    /// Picks the command from the first word of the slash command text.
    /// Unknown keywords, and keywords with nothing after them, fall back to
    /// help.
    pub fn resolve(text: &str) -> Self {
        let mut words = text.split_whitespace();
        let Some(keyword) = words.next() else {
            return SlackCommand::Help;
        };
        match keyword.parse::<SlackCommand>() {
            Ok(SlackCommand::Help) | Err(_) => SlackCommand::Help,
            Ok(cmd) if words.next().is_some() => cmd,
            Ok(_) => SlackCommand::Help,
        }
    }

    pub fn is_private(self) -> bool {
        matches!(self, SlackCommand::PrivateAsk)
    }
}
