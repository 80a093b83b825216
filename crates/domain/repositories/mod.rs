pub mod blogs;
pub mod comments;
pub mod events;
pub mod mailer;
pub mod media_assets;
pub mod orders;
pub mod questions;
pub mod storage;
pub mod users;
