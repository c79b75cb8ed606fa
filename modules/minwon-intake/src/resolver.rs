//! Two-tier agency resolution.
//!
//! Tier one takes the classifier-asserted agency (id, or name when the
//! fallback lookup is enabled). Tier two derives the jurisdiction agency
//! from the first token of the address. The result is an ordered,
//! deduplicated set of at most two agency ids. Resolution only reads;
//! writing associations is the orchestrator's job.

use anyhow::Result;
use tracing::{debug, info, warn};

use minwon_common::config::IntakeOptions;

use crate::directory::AgencyDirectory;
use crate::payload::ScalarValue;

/// Outcome of resolving one complaint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// The classifier-asserted agency, recorded on the complaint row itself.
    pub primary_agency_no: Option<i64>,
    /// Association targets in order: classification first, jurisdiction
    /// second, jurisdiction dropped when it matches the classification.
    pub associations: Vec<i64>,
}

pub struct AgencyResolver {
    options: IntakeOptions,
}

impl AgencyResolver {
    pub fn new(options: IntakeOptions) -> Self {
        Self { options }
    }

    pub async fn resolve<D: AgencyDirectory>(
        &self,
        directory: &D,
        agency_code: Option<&ScalarValue>,
        agency_name: Option<&str>,
        address: Option<&str>,
    ) -> Result<Resolution> {
        let classified = self
            .classified_agency(directory, agency_code, agency_name)
            .await?;
        let jurisdiction = self.jurisdiction_agency(directory, address).await?;

        let mut associations = Vec::new();
        if let Some(agency_no) = classified {
            associations.push(agency_no);
        }
        if let Some(agency_no) = jurisdiction {
            // Skip the jurisdiction entry when the classifier already
            // named the same agency.
            if classified != Some(agency_no) {
                associations.push(agency_no);
            } else {
                self.step(format!("jurisdiction agency {agency_no} skipped, same as classifier"));
            }
        }

        Ok(Resolution {
            primary_agency_no: classified,
            associations,
        })
    }

    /// Tier one: classifier hint. A positive integer code is accepted as-is
    /// without a directory existence check; existence surfaces when the
    /// association row is written. An unusable code falls through to the
    /// name lookup when that fallback is enabled.
    async fn classified_agency<D: AgencyDirectory>(
        &self,
        directory: &D,
        agency_code: Option<&ScalarValue>,
        agency_name: Option<&str>,
    ) -> Result<Option<i64>> {
        if let Some(raw) = agency_code {
            match raw.to_agency_code() {
                Ok(agency_no) if agency_no > 0 => {
                    self.step(format!("classifier agency accepted: {agency_no}"));
                    return Ok(Some(agency_no));
                }
                Ok(agency_no) => {
                    self.step(format!("classifier agency code ignored: {agency_no}"));
                }
                Err(err) => warn!(value = %raw, "{err}"),
            }
        }

        if !self.options.agency_name_fallback {
            return Ok(None);
        }
        let Some(name) = agency_name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };

        self.step(format!("looking up classifier agency by name: {name}"));
        match directory.find_by_name(name).await? {
            Some(agency) => {
                self.step(format!(
                    "classifier agency matched by name: {} ({})",
                    agency.agency_name, agency.agency_no
                ));
                Ok(Some(agency.agency_no))
            }
            None => {
                self.step(format!("no agency named {name}"));
                Ok(None)
            }
        }
    }

    /// Tier two: the first whitespace-delimited address token is read as the
    /// top-level administrative region name. A miss is expected for
    /// addresses outside the known regions.
    async fn jurisdiction_agency<D: AgencyDirectory>(
        &self,
        directory: &D,
        address: Option<&str>,
    ) -> Result<Option<i64>> {
        let Some(address) = address.filter(|a| !a.trim().is_empty()) else {
            return Ok(None);
        };
        let Some(region) = address.split_whitespace().next() else {
            return Ok(None);
        };

        self.step(format!("region lookup: {region}"));
        match directory.find_by_name(region).await? {
            Some(agency) => {
                self.step(format!(
                    "jurisdiction agency: {} ({})",
                    agency.agency_name, agency.agency_no
                ));
                Ok(Some(agency.agency_no))
            }
            None => {
                self.step(format!("no agency for region {region}"));
                Ok(None)
            }
        }
    }

    /// Resolution steps are info-level when verbose resolution is on,
    /// debug-level otherwise.
    fn step(&self, message: String) {
        if self.options.verbose_resolution {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }
}
