//! The intake orchestrator.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use minwon_common::config::IntakeOptions;
use minwon_common::{ComplaintStatus, IntakeError, SpatialFeature};

use crate::directory::AgencyDirectory;
use crate::payload::{ComplaintPayload, LocationPayload};
use crate::resolver::{AgencyResolver, Resolution};
use crate::spatial::SpatialFeatureBuilder;
use crate::store::{ComplaintStore, NewComplaint};
use crate::upload::{Attachment, UploadService};

/// Orchestrates one intake: payload validation, the optional upload, the
/// optional spatial feature, agency resolution, then the ordered writes.
///
/// Only payload validation and the complaint insert itself can abort an
/// intake. Every other sub-step is isolated: its failure is logged and the
/// complaint is created without that piece. Atomicity across the write
/// sequence belongs to the calling context's transaction boundary; there
/// is no compensation logic here.
pub struct IntakeService<S, D> {
    store: S,
    directory: D,
    resolver: AgencyResolver,
    spatial: SpatialFeatureBuilder,
    uploader: Option<Arc<dyn UploadService>>,
}

impl<S: ComplaintStore, D: AgencyDirectory> IntakeService<S, D> {
    pub fn new(store: S, directory: D, options: IntakeOptions) -> Self {
        Self {
            resolver: AgencyResolver::new(options.clone()),
            spatial: SpatialFeatureBuilder::new(options.geometry_srid),
            store,
            directory,
            uploader: None,
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn UploadService>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Create one complaint for the given (already authenticated) user and
    /// return the generated complaint id.
    pub async fn create_complaint(
        &self,
        payload: ComplaintPayload,
        user_no: i64,
        attachment: Option<Attachment>,
    ) -> Result<i64, IntakeError> {
        payload.validate()?;
        info!(user_no, title = %payload.title, "creating complaint");

        let mut image_path = payload.image_path.clone();
        if let Some(attachment) = &attachment {
            match self.store_attachment(attachment).await {
                Ok(path) => image_path = Some(path),
                Err(err) => {
                    error!(file = %attachment.file_name, "failed to upload file during complaint creation: {err}");
                }
            }
        }

        let location = payload.location.as_ref();
        let address = location
            .and_then(|l| l.address.as_deref())
            .map(str::to_owned);

        // One coercion governs both the complaint row and the feature: the
        // coordinate pair lands on the row only when the feature built.
        let feature = self.build_feature(location);
        let (latitude, longitude) = match &feature {
            Some(f) => (Some(f.geom.y), Some(f.geom.x)),
            None => (None, None),
        };

        let resolution = match self
            .resolver
            .resolve(
                &self.directory,
                payload.agency_code.as_ref(),
                payload.agency_name.as_deref(),
                address.as_deref(),
            )
            .await
        {
            Ok(resolution) => resolution,
            Err(err) => {
                error!("agency resolution failed: {err}");
                Resolution::default()
            }
        };

        // Intake always starts at UNPROCESSED; status hints in the payload
        // are for the seeding utilities only.
        let complaint = NewComplaint {
            category: payload.category,
            title: payload.title,
            content: payload.content,
            is_public: payload.is_public,
            status: ComplaintStatus::Unprocessed,
            user_no,
            image_path,
            address,
            latitude,
            longitude,
            agency_no: resolution.primary_agency_no,
        };

        let complaint_no = self
            .store
            .insert_complaint(&complaint)
            .await
            .map_err(IntakeError::Storage)?;
        debug!(complaint_no, "complaint row inserted");

        if let Some(feature) = &feature {
            if let Err(err) = self
                .store
                .insert_spatial_feature(complaint_no, feature)
                .await
            {
                warn!(complaint_no, "spatial feature insert failed: {err}");
            }
        }

        for &agency_no in &resolution.associations {
            if let Err(err) = self
                .store
                .insert_complaint_agency(complaint_no, agency_no)
                .await
            {
                warn!(complaint_no, agency_no, "association insert failed: {err}");
            }
        }

        info!(
            complaint_no,
            associations = resolution.associations.len(),
            "complaint created"
        );
        Ok(complaint_no)
    }

    async fn store_attachment(&self, attachment: &Attachment) -> Result<String, IntakeError> {
        let Some(uploader) = &self.uploader else {
            return Err(IntakeError::UploadFailed(
                "no upload service configured".to_string(),
            ));
        };
        uploader
            .store(&attachment.file_name, &attachment.bytes)
            .await
            .map_err(|err| IntakeError::UploadFailed(err.to_string()))
    }

    /// Build the point feature when both coordinates are present. An
    /// unparseable value drops the feature, not the complaint.
    fn build_feature(&self, location: Option<&LocationPayload>) -> Option<SpatialFeature> {
        let location = location?;
        let (lat, lng) = location.coordinate_pair()?;
        match self
            .spatial
            .build(lat, lng, location.address.as_deref())
        {
            Ok(feature) => Some(feature),
            Err(err) => {
                warn!("skipping spatial feature: {err}");
                None
            }
        }
    }
}
