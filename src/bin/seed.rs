use registrar::{config::AppConfig, seed, state, telemetry, users::PgUserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("registrar=info");

    let config = AppConfig::from_env()?;
    let db = state::connect(&config).await?;

    if let Err(e) = seed::run(&PgUserStore::new(db)).await {
        tracing::error!(error = %e, "seeding failed");
        return Err(e);
    }
    Ok(())
}
