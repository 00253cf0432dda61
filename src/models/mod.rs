pub mod chat;
pub mod slack;
