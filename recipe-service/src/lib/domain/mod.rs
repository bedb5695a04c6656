pub mod preferences;
pub mod user;
