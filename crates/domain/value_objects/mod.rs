pub mod blogs;
pub mod enums;
pub mod events;
pub mod mail;
pub mod media_assets;
pub mod orders;
pub mod questions;
pub mod storage;
