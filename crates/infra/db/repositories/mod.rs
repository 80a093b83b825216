pub mod blogs;
pub mod comments;
pub mod events;
pub mod media_assets;
pub mod orders;
pub mod questions;
pub mod users;
