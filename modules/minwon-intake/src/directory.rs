//! Agency directory lookups.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use minwon_common::Agency;

/// Read-only lookup of agency records.
///
/// Name matching is exact and case-sensitive: no fuzzy matching, no
/// whitespace normalization beyond what the caller already did. A miss is
/// a normal outcome, not an error.
#[async_trait]
pub trait AgencyDirectory: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Agency>>;
    async fn find_by_id(&self, agency_no: i64) -> Result<Option<Agency>>;
}

// ---------------------------------------------------------------------------
// Postgres directory (production)
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgAgencyDirectory {
    pool: PgPool,
}

impl PgAgencyDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AgencyRow {
    agency_no: i64,
    agency_name: String,
    region_code: Option<String>,
    agency_type: String,
}

impl AgencyRow {
    fn into_agency(self) -> Result<Agency> {
        Ok(Agency {
            agency_no: self.agency_no,
            agency_name: self.agency_name,
            region_code: self.region_code,
            agency_type: self.agency_type.parse()?,
        })
    }
}

#[async_trait]
impl AgencyDirectory for PgAgencyDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<Agency>> {
        let row = sqlx::query_as::<_, AgencyRow>(
            r#"
            SELECT agency_no, agency_name, region_code, agency_type
            FROM agencies
            WHERE agency_name = $1
            ORDER BY agency_no
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AgencyRow::into_agency).transpose()
    }

    async fn find_by_id(&self, agency_no: i64) -> Result<Option<Agency>> {
        let row = sqlx::query_as::<_, AgencyRow>(
            r#"
            SELECT agency_no, agency_name, region_code, agency_type
            FROM agencies
            WHERE agency_no = $1
            "#,
        )
        .bind(agency_no)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AgencyRow::into_agency).transpose()
    }
}

// ---------------------------------------------------------------------------
// MemoryAgencyDirectory (tests — no database required)
// ---------------------------------------------------------------------------

/// In-memory directory for testing.
pub struct MemoryAgencyDirectory {
    agencies: Vec<Agency>,
}

impl MemoryAgencyDirectory {
    pub fn new(agencies: Vec<Agency>) -> Self {
        Self { agencies }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl AgencyDirectory for MemoryAgencyDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<Agency>> {
        Ok(self
            .agencies
            .iter()
            .find(|a| a.agency_name == name)
            .cloned())
    }

    async fn find_by_id(&self, agency_no: i64) -> Result<Option<Agency>> {
        Ok(self
            .agencies
            .iter()
            .find(|a| a.agency_no == agency_no)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Arc<D> blanket — lets tests share one directory instance
// ---------------------------------------------------------------------------

#[async_trait]
impl<D: AgencyDirectory + ?Sized> AgencyDirectory for Arc<D> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Agency>> {
        self.as_ref().find_by_name(name).await
    }

    async fn find_by_id(&self, agency_no: i64) -> Result<Option<Agency>> {
        self.as_ref().find_by_id(agency_no).await
    }
}
