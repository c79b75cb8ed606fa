//! Applies the relational schema for complaint intake. Idempotent: every
//! statement is CREATE ... IF NOT EXISTS.

use anyhow::Result;
use minwon_common::Config;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS agencies (
        agency_no   BIGSERIAL PRIMARY KEY,
        agency_name TEXT NOT NULL,
        region_code TEXT,
        agency_type TEXT NOT NULL DEFAULT 'REGIONAL',
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS agencies_name_region
        ON agencies (agency_name, COALESCE(region_code, ''))
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS complaints (
        complaint_no BIGSERIAL PRIMARY KEY,
        category     TEXT,
        title        TEXT NOT NULL,
        content      TEXT NOT NULL,
        is_public    BOOLEAN NOT NULL DEFAULT true,
        status       TEXT NOT NULL DEFAULT 'UNPROCESSED',
        user_no      BIGINT NOT NULL,
        image_path   TEXT,
        address      TEXT,
        latitude     DOUBLE PRECISION,
        longitude    DOUBLE PRECISION,
        agency_no    BIGINT REFERENCES agencies(agency_no),
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        CHECK ((latitude IS NULL) = (longitude IS NULL))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS spatial_features (
        feature_no   BIGSERIAL PRIMARY KEY,
        complaint_no BIGINT NOT NULL REFERENCES complaints(complaint_no) ON DELETE CASCADE,
        feature_type TEXT NOT NULL,
        addr_text    TEXT,
        geom         TEXT NOT NULL,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS complaint_agencies (
        complaint_no BIGINT NOT NULL REFERENCES complaints(complaint_no) ON DELETE CASCADE,
        agency_no    BIGINT NOT NULL REFERENCES agencies(agency_no),
        assigned_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (complaint_no, agency_no)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS complaint_agencies_agency
        ON complaint_agencies (agency_no)
    "#,
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;

    let mut tx = pool.begin().await?;
    for &statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("schema applied ({} statements)", SCHEMA.len());
    Ok(())
}
