pub mod blogs;
pub mod events;
pub mod media;
pub mod payments;
pub mod questions;
