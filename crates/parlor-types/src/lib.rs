pub mod api;
pub mod models;

pub use models::{derive_user_id, mirror_channel_id};
