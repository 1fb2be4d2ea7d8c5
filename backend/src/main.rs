use backend::{
    build_rocket,
    config::Config,
    routes::AppState,
    session::SessionStore,
    store::PgStore,
};
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tracing::info;

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting course scorecard server");

    let config = Config::from_lookup(|key| secret_store.get(key));

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(CustomError::new)?;

    info!("📋 Migrations complete");

    let app_state = AppState::new(
        PgStore::new(pool),
        SessionStore::new(config.session_ttl_minutes),
    );

    Ok(build_rocket(app_state, &config).into())
}
