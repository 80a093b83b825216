pub mod blogs;
pub mod content;
pub mod events;
pub mod media;
pub mod notifications;
pub mod payments;
pub mod pending_reminders;
pub mod questions;
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_support;
