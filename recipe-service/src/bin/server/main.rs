use std::sync::Arc;

use auth::SessionManager;
use auth::SessionPolicy;
use auth::SigningKey;
use auth::SystemClock;
use chrono::Duration;
use recipe_service::config::Config;
use recipe_service::domain::preferences::service::PreferencesService;
use recipe_service::domain::user::directory::RepositoryUserDirectory;
use recipe_service::domain::user::models::EmailAddress;
use recipe_service::domain::user::models::Password;
use recipe_service::domain::user::ports::UserServicePort;
use recipe_service::domain::user::service::UserService;
use recipe_service::inbound::http::router::create_router;
use recipe_service::outbound::repositories::PostgresPreferencesRepository;
use recipe_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "recipe-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_token_minutes = config.jwt.access_token_minutes,
        refresh_token_minutes = config.jwt.refresh_token_minutes,
        secure_cookies = config.cookies.secure,
        "Configuration loaded"
    );
    if !config.cookies.secure {
        tracing::warn!("Session cookies are sent without the Secure flag");
    }

    let signing_key = SigningKey::from_secret(config.jwt.secret.as_bytes())?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let preferences_repository = Arc::new(PostgresPreferencesRepository::new(pg_pool));

    let user_service = Arc::new(UserService::new(Arc::clone(&user_repository)));
    let preferences_service = Arc::new(PreferencesService::new(preferences_repository));

    if let Some(admin) = &config.admin {
        let email = EmailAddress::new(admin.email.clone())?;
        let password = Password::new(admin.password.clone())?;
        let (account, created) = user_service.ensure_admin(email, password).await?;
        tracing::info!(email = %account.email, created, "Admin account ensured");
    }

    let sessions = Arc::new(SessionManager::new(
        signing_key,
        Arc::new(RepositoryUserDirectory::new(user_repository)),
        Arc::new(SystemClock),
        SessionPolicy {
            access_ttl: Duration::minutes(config.jwt.access_token_minutes),
            refresh_ttl: Duration::minutes(config.jwt.refresh_token_minutes),
            secure_cookies: config.cookies.secure,
        },
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, preferences_service, sessions);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");
    Ok(())
}
