use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseSettings;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(connect_options(settings)?)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions> {
    match settings {
        DatabaseSettings::Url(url) => url
            .parse::<PgConnectOptions>()
            .context("DATABASE_URL is not a valid Postgres connection string"),
        DatabaseSettings::Parts {
            host,
            database,
            user,
            password,
            port,
        } => {
            let options = PgConnectOptions::new()
                .host(host)
                .database(database)
                .username(user)
                .port(*port);
            Ok(match password {
                Some(password) => options.password(password),
                None => options,
            })
        }
    }
}
