use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use talentgate_api::config::ApiConfig;
use talentgate_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // A missing .env is fine; the process environment may already be complete.
    dotenv().ok();

    let config = ApiConfig::from_env().wrap_err("Failed to load interview booking configuration")?;

    let db_pool = create_pool(
        &config.database_url,
        config.database_max_connections,
        config.database_acquire_timeout,
    )
    .await
    .wrap_err("Failed to connect to the interview database")?;

    initialize_database(&db_pool)
        .await
        .wrap_err("Failed to prepare the interview booking schema")?;

    talentgate_api::start_server(config, db_pool).await
}
