use thiserror::Error;

/// Failure taxonomy for complaint intake.
///
/// Only `MissingField` and the `Storage` error from the complaint insert
/// itself abort an intake. Everything else is recovered where it occurs:
/// the complaint is still created, just without the optional piece.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Latitude or longitude did not coerce to a finite number.
    /// Recovered locally; the spatial feature is omitted.
    #[error("invalid coordinate: {value}")]
    InvalidCoordinate { value: String },

    /// Classifier agency code did not coerce to an integer.
    /// Recovered locally; resolution falls through to the name lookup.
    #[error("invalid agency code: {value}")]
    InvalidAgencyCode { value: String },

    /// Upload collaborator failed. Recovered locally; the image
    /// reference is omitted.
    #[error("upload failed: {0}")]
    UploadFailed(String),

    /// A required payload field is absent or empty. Fatal.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// Storage write failure. Fatal when it hits the complaint insert,
    /// absorbed on the feature and association inserts.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
