pub mod preferences;
pub mod user;

pub use preferences::PostgresPreferencesRepository;
pub use user::PostgresUserRepository;
