use super::blocks::{ Block, ButtonStyle, Element, ResponseType, SlackPayload, TextObject };
use crate::qa::{ QueryResponse, Rating };
use rand::seq::SliceRandom;

pub const ANSWER_TITLE: &str = "Docs Answer";

pub const ACTION_POSITIVE_FEEDBACK: &str = "ask_model_positive_feedback";
pub const ACTION_NEGATIVE_FEEDBACK: &str = "ask_model_negative_feedback";

pub const DEFAULT_USER_ERROR_MESSAGE: &str =
    ":warning: I'm sorry, I'm having technical issues. Notify the docs team @ #docs and please try again later.";

pub const NO_SOURCES_IDENTIFIED: &str = ":mag: Unable to identify a specific documentation URL.";

pub const POSITIVE_RATING_MESSAGE: &str = "Thank you for providing the :thumbsup: feedback!";
pub const NEGATIVE_RATING_MESSAGE: &str = "Thank you for providing the :thumbsdown: feedback!";

const HELP_TEXT: &str =
    "*Commands*\n\nThe following commands are available:\n\n\n- `help` - A summary of all available commands.\n\n- `ask` - Ask a docs related question. Example: `/docs ask how do I enable Prometheus?`\n\n- `pask` - Same as `ask` but with private replies.";

pub const WAIT_MESSAGES: &[&str] = &[
    ":hourglass_flowing_sand: Hang tight while I review the docs...",
    ":hourglass_flowing_sand: Just a moment while I explore the documentation rabbit hole...",
    ":hourglass_flowing_sand: Hold tight while I decode this technical jargon for you!",
    ":hourglass_flowing_sand: Please be patient as I consult the ancient scrolls of documentation...",
    ":hourglass_flowing_sand: Hold on tight, we're flipping through pages to bring you the answer!",
    ":hourglass_flowing_sand: Just a sec, we're diving deep into the ocean of documentation to find the hidden gems.",
    ":hourglass_flowing_sand: Please hold while we decipher the clues in the documentation mystery!",
    ":hourglass_flowing_sand: Just a few more seconds... we're almost done unraveling the mysteries of the documentation.",
];

pub fn random_wait_message() -> &'static str {
    WAIT_MESSAGES.choose(&mut rand::thread_rng()).copied().unwrap_or(WAIT_MESSAGES[0])
}

/// Source list shown under an answer.
pub fn links_builder(links: &[String]) -> String {
    if links.is_empty() {
        return NO_SOURCES_IDENTIFIED.to_string();
    }
    let mut out = String::from("*Sources*:\n");
    for link in links {
        out.push_str("- ");
        out.push_str(link);
        out.push('\n');
    }
    out
}

/// Placeholder returned inline while the answer is computed. Always ephemeral.
pub fn wait_payload() -> SlackPayload {
    SlackPayload::new(ResponseType::Ephemeral, vec![Block::markdown(random_wait_message())])
}

pub fn error_payload(is_private: bool) -> SlackPayload {
    SlackPayload::new(ResponseType::for_privacy(is_private), vec![
        Block::markdown(DEFAULT_USER_ERROR_MESSAGE)
    ])
}

pub fn help_payload() -> SlackPayload {
    SlackPayload::new(ResponseType::Ephemeral, vec![
        Block::header(ANSWER_TITLE),
        Block::Divider,
        Block::markdown(HELP_TEXT)
    ])
}

fn rating_buttons(message_id: i64) -> Block {
    let value = message_id.to_string();
    Block::Actions {
        elements: vec![
            Element::Button {
                action_id: ACTION_POSITIVE_FEEDBACK.into(),
                text: TextObject::emoji(":thumbsup:"),
                value: value.clone(),
                style: ButtonStyle::Primary,
            },
            Element::Button {
                action_id: ACTION_NEGATIVE_FEEDBACK.into(),
                text: TextObject::emoji(":thumbsdown:"),
                value,
                style: ButtonStyle::Danger,
            }
        ],
    }
}

/// Answer message. Question, answer and sources sit at block indexes 2, 4
/// and 6; the feedback flow reads them back from there.
pub fn answer_payload(response: &QueryResponse, is_private: bool) -> SlackPayload {
    let mut blocks = vec![
        Block::header(ANSWER_TITLE),
        Block::Divider,
        Block::markdown(format!(":question: {}", response.question)),
        Block::Divider,
        Block::markdown(response.answer.clone()),
        Block::Divider,
        Block::markdown(links_builder(&response.links)),
        Block::Divider
    ];
    if let Some(confidence) = response.confidence {
        blocks.push(
            Block::markdown_fields(vec![format!("*Answer Confidence Level:* {:.0}%", confidence)])
        );
        blocks.push(Block::Divider);
    }
    blocks.push(Block::markdown_fields(vec!["*Rate Answer:*".into()]));
    blocks.push(rating_buttons(response.message_id));

    SlackPayload::new(ResponseType::for_privacy(is_private), blocks)
}

pub fn rating_message(rating: Rating) -> &'static str {
    match rating {
        Rating::Positive => POSITIVE_RATING_MESSAGE,
        Rating::Negative => NEGATIVE_RATING_MESSAGE,
    }
}

/// Rewrites a rated answer: same content, buttons replaced by a thank-you.
pub fn rated_answer_payload(
    question: &str,
    answer: &str,
    links: &str,
    rating: Rating,
    is_private: bool
) -> SlackPayload {
    SlackPayload::new(ResponseType::for_privacy(is_private), vec![
        Block::header(ANSWER_TITLE),
        Block::Divider,
        Block::markdown(question),
        Block::Divider,
        Block::markdown(answer),
        Block::Divider,
        Block::markdown(links),
        Block::Divider,
        Block::markdown_fields(vec!["*Rate Answer:*".into()]),
        Block::markdown(rating_message(rating))
    ]).replacing_original()
}

/// Used when the rated message no longer has the expected layout.
pub fn rating_thanks_payload(rating: Rating, is_private: bool) -> SlackPayload {
    SlackPayload::new(ResponseType::for_privacy(is_private), vec![
        Block::header(ANSWER_TITLE),
        Block::Divider,
        Block::markdown(rating_message(rating))
    ])
}
