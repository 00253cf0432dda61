pub mod ask;
pub mod command;
pub mod feedback;
pub mod locks;

pub use ask::{ AskOutcome, AskRequest, AskSettings, AskWorkflow };
pub use command::SlackCommand;
pub use feedback::{ FeedbackOutcome, FeedbackWorkflow };
