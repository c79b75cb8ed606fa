//! ComplaintStore implementations.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minwon_common::{ComplaintStatus, SpatialFeature};

/// Insert shape for one complaint row. The id is generated by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComplaint {
    pub category: Option<String>,
    pub title: String,
    pub content: String,
    pub is_public: bool,
    pub status: ComplaintStatus,
    pub user_no: i64,
    pub image_path: Option<String>,
    pub address: Option<String>,
    /// Always set together with `longitude` or not at all.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Primary (classifier-asserted) agency.
    pub agency_no: Option<i64>,
}

/// Durable writes for one intake.
///
/// Multi-step atomicity is the calling context's transaction boundary;
/// the store itself performs plain single-row writes.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Insert the complaint row and return the generated id.
    async fn insert_complaint(&self, complaint: &NewComplaint) -> Result<i64>;

    /// Insert the derived point feature for a complaint.
    async fn insert_spatial_feature(
        &self,
        complaint_no: i64,
        feature: &SpatialFeature,
    ) -> Result<()>;

    /// Insert one complaint–agency association. Set-like: inserting an
    /// existing pair is a no-op.
    async fn insert_complaint_agency(&self, complaint_no: i64, agency_no: i64) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Postgres store (production)
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgComplaintStore {
    pool: PgPool,
}

impl PgComplaintStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintStore for PgComplaintStore {
    async fn insert_complaint(&self, complaint: &NewComplaint) -> Result<i64> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO complaints
                (category, title, content, is_public, status, user_no,
                 image_path, address, latitude, longitude, agency_no)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING complaint_no
            "#,
        )
        .bind(&complaint.category)
        .bind(&complaint.title)
        .bind(&complaint.content)
        .bind(complaint.is_public)
        .bind(complaint.status.as_str())
        .bind(complaint.user_no)
        .bind(&complaint.image_path)
        .bind(&complaint.address)
        .bind(complaint.latitude)
        .bind(complaint.longitude)
        .bind(complaint.agency_no)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn insert_spatial_feature(
        &self,
        complaint_no: i64,
        feature: &SpatialFeature,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO spatial_features (complaint_no, feature_type, addr_text, geom)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(complaint_no)
        .bind(&feature.feature_type)
        .bind(&feature.addr_text)
        .bind(feature.geom.ewkt())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_complaint_agency(&self, complaint_no: i64, agency_no: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO complaint_agencies (complaint_no, agency_no)
            VALUES ($1, $2)
            ON CONFLICT (complaint_no, agency_no) DO NOTHING
            "#,
        )
        .bind(complaint_no)
        .bind(agency_no)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryComplaintStore (tests — no database required)
// ---------------------------------------------------------------------------

/// Complaint row captured by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoredComplaint {
    pub complaint_no: i64,
    pub complaint: NewComplaint,
    pub created_at: DateTime<Utc>,
}

/// Spatial feature row captured by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoredFeature {
    pub complaint_no: i64,
    pub feature: SpatialFeature,
}

/// In-memory complaint store for testing. Generates ids from an
/// incrementing counter. Thread-safe. Each write kind can be flipped into
/// a failing mode to exercise the per-step failure isolation.
pub struct MemoryComplaintStore {
    next_no: AtomicI64,
    complaints: Mutex<Vec<StoredComplaint>>,
    features: Mutex<Vec<StoredFeature>>,
    associations: Mutex<Vec<(i64, i64)>>,
    fail_complaints: AtomicBool,
    fail_features: AtomicBool,
    fail_associations: AtomicBool,
}

impl MemoryComplaintStore {
    pub fn new() -> Self {
        Self {
            next_no: AtomicI64::new(1),
            complaints: Mutex::new(Vec::new()),
            features: Mutex::new(Vec::new()),
            associations: Mutex::new(Vec::new()),
            fail_complaints: AtomicBool::new(false),
            fail_features: AtomicBool::new(false),
            fail_associations: AtomicBool::new(false),
        }
    }

    /// All persisted complaint rows (for test assertions).
    pub fn complaints(&self) -> Vec<StoredComplaint> {
        self.complaints.lock().unwrap().clone()
    }

    /// All persisted spatial feature rows.
    pub fn features(&self) -> Vec<StoredFeature> {
        self.features.lock().unwrap().clone()
    }

    /// All persisted (complaint_no, agency_no) pairs, in insert order.
    pub fn associations(&self) -> Vec<(i64, i64)> {
        self.associations.lock().unwrap().clone()
    }

    pub fn fail_complaint_inserts(&self) {
        self.fail_complaints.store(true, Ordering::SeqCst);
    }

    pub fn fail_feature_inserts(&self) {
        self.fail_features.store(true, Ordering::SeqCst);
    }

    pub fn fail_association_inserts(&self) {
        self.fail_associations.store(true, Ordering::SeqCst);
    }
}

impl Default for MemoryComplaintStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn insert_complaint(&self, complaint: &NewComplaint) -> Result<i64> {
        if self.fail_complaints.load(Ordering::SeqCst) {
            bail!("complaint insert failure injected");
        }
        let complaint_no = self.next_no.fetch_add(1, Ordering::SeqCst);
        self.complaints.lock().unwrap().push(StoredComplaint {
            complaint_no,
            complaint: complaint.clone(),
            created_at: Utc::now(),
        });
        Ok(complaint_no)
    }

    async fn insert_spatial_feature(
        &self,
        complaint_no: i64,
        feature: &SpatialFeature,
    ) -> Result<()> {
        if self.fail_features.load(Ordering::SeqCst) {
            bail!("spatial feature insert failure injected");
        }
        self.features.lock().unwrap().push(StoredFeature {
            complaint_no,
            feature: feature.clone(),
        });
        Ok(())
    }

    async fn insert_complaint_agency(&self, complaint_no: i64, agency_no: i64) -> Result<()> {
        if self.fail_associations.load(Ordering::SeqCst) {
            bail!("association insert failure injected");
        }
        let mut associations = self.associations.lock().unwrap();
        let pair = (complaint_no, agency_no);
        if !associations.contains(&pair) {
            associations.push(pair);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arc<S> blanket — lets tests share the store for assertions
// ---------------------------------------------------------------------------

#[async_trait]
impl<S: ComplaintStore + ?Sized> ComplaintStore for Arc<S> {
    async fn insert_complaint(&self, complaint: &NewComplaint) -> Result<i64> {
        self.as_ref().insert_complaint(complaint).await
    }

    async fn insert_spatial_feature(
        &self,
        complaint_no: i64,
        feature: &SpatialFeature,
    ) -> Result<()> {
        self.as_ref()
            .insert_spatial_feature(complaint_no, feature)
            .await
    }

    async fn insert_complaint_agency(&self, complaint_no: i64, agency_no: i64) -> Result<()> {
        self.as_ref()
            .insert_complaint_agency(complaint_no, agency_no)
            .await
    }
}
