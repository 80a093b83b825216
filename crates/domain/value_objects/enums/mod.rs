pub mod mail_markers;
pub mod media_kinds;
pub mod order_statuses;
