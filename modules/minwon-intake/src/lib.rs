//! Complaint intake and multi-agency resolution.
//!
//! One intake call turns a loosely-structured payload (free-text address,
//! optional classifier hints, optional coordinates) into a durable complaint
//! row, zero-or-one derived point feature, and up to two agency
//! associations. Sub-steps degrade independently so that a malformed
//! coordinate or a failed upload never aborts the complaint itself.

pub mod directory;
pub mod intake;
pub mod payload;
pub mod resolver;
pub mod spatial;
pub mod store;
pub mod upload;

pub use directory::{AgencyDirectory, MemoryAgencyDirectory, PgAgencyDirectory};
pub use intake::IntakeService;
pub use payload::{ComplaintPayload, LocationPayload, ScalarValue};
pub use resolver::{AgencyResolver, Resolution};
pub use spatial::SpatialFeatureBuilder;
pub use store::{ComplaintStore, MemoryComplaintStore, NewComplaint, PgComplaintStore};
pub use upload::{Attachment, MemoryUploadStore, UploadService};
