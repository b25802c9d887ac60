pub mod conversation;
pub mod events;
