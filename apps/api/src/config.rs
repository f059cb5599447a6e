use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_PG_PORT: u16 = 5432;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which service holds job and CV rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordBackend {
    Postgres,
    Supabase,
}

/// Which service holds the original uploaded CV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Supabase,
}

/// Postgres connection parameters, either a full URL or discrete parts.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseSettings {
    Url(String),
    Parts {
        host: String,
        database: String,
        user: String,
        password: Option<String>,
        port: u16,
    },
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    /// When set, stored files are addressed through signed URLs instead of
    /// the public bucket path.
    pub signed_url_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub public_url: Option<String>,
}

/// Application configuration loaded from environment variables.
/// Startup fails if a variable required by the selected backends is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub record_backend: RecordBackend,
    pub storage_backend: StorageBackend,
    pub database: Option<DatabaseSettings>,
    pub supabase: Option<SupabaseConfig>,
    pub s3: Option<S3Config>,
    pub cv_bucket: String,
    pub static_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let record_backend = match get("RECORD_BACKEND").as_deref() {
            None | Some("postgres") => RecordBackend::Postgres,
            Some("supabase") => RecordBackend::Supabase,
            Some(other) => bail!("RECORD_BACKEND must be 'postgres' or 'supabase', got '{other}'"),
        };
        let storage_backend = match get("STORAGE_BACKEND").as_deref() {
            None | Some("supabase") => StorageBackend::Supabase,
            Some("s3") => StorageBackend::S3,
            Some(other) => bail!("STORAGE_BACKEND must be 's3' or 'supabase', got '{other}'"),
        };

        let database = resolve_database(&get)?;
        if record_backend == RecordBackend::Postgres && database.is_none() {
            bail!("RECORD_BACKEND=postgres needs DATABASE_URL, DB_HOST/DB_NAME/DB_USER or PGHOST/PGDATABASE/PGUSER");
        }

        let needs_supabase = record_backend == RecordBackend::Supabase
            || storage_backend == StorageBackend::Supabase;
        let supabase = if needs_supabase {
            Some(SupabaseConfig {
                url: require("SUPABASE_URL")?,
                key: require("SUPABASE_KEY")?,
                signed_url_ttl_secs: get("SUPABASE_SIGNED_URL_TTL_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("SUPABASE_SIGNED_URL_TTL_SECS must be a number of seconds")?,
            })
        } else {
            None
        };

        let s3 = if storage_backend == StorageBackend::S3 {
            Some(S3Config {
                endpoint: require("S3_ENDPOINT")?,
                region: get("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                public_url: get("S3_PUBLIC_URL"),
            })
        } else {
            None
        };

        Ok(Config {
            record_backend,
            storage_backend,
            database,
            supabase,
            s3,
            cv_bucket: get("CV_BUCKET").unwrap_or_else(|| "cvs".to_string()),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a number of bytes")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// DATABASE_URL wins, then the DB_* family, then libpq-style PG* variables.
fn resolve_database<G>(get: &G) -> Result<Option<DatabaseSettings>>
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(url) = get("DATABASE_URL") {
        return Ok(Some(DatabaseSettings::Url(url)));
    }

    for prefix in [
        ["DB_HOST", "DB_NAME", "DB_USER", "DB_PASSWORD", "DB_PORT"],
        ["PGHOST", "PGDATABASE", "PGUSER", "PGPASSWORD", "PGPORT"],
    ] {
        let [host, database, user, password, port] = prefix;
        let Some(host_value) = get(host) else {
            continue;
        };
        let port_value = match get(port) {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("{port} must be a valid port number"))?,
            None => DEFAULT_PG_PORT,
        };
        return Ok(Some(DatabaseSettings::Parts {
            host: host_value,
            database: get(database)
                .with_context(|| format!("{database} is required when {host} is set"))?,
            user: get(user).with_context(|| format!("{user} is required when {host} is set"))?,
            password: get(password),
            port: port_value,
        }));
    }

    Ok(None)
}
