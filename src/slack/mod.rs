pub mod blocks;
pub mod messages;
pub mod reply;
pub mod signature;
