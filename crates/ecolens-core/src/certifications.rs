//! Certification claims with verification metadata.

use std::collections::BTreeMap;

use crate::lexicon::{verify_url, FSC_CODE_PATTERN};
use crate::signals::SignalHits;
use crate::types::{CertClaim, CertStatus};

/// Normalized FSC license code found in the blob, e.g. `FSC-C123456`.
pub fn fsc_code(blob: &str) -> Option<String> {
    FSC_CODE_PATTERN.find(blob).map(|m| {
        m.as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase()
    })
}

/// Verification status recorded by the caller, keyed by certification name.
pub type CertVerifications = BTreeMap<String, CertStatus>;

fn rank(status: CertStatus) -> u8 {
    match status {
        CertStatus::Claimed => 0,
        CertStatus::Verifiable => 1,
        CertStatus::Verified => 2,
    }
}

/// Turns certification hits into [`CertClaim`] records.
///
/// Caller-recorded statuses only ever raise a claim's status; a detected
/// license code is kept either way.
#[derive(Debug, Clone, Default)]
pub struct CertificationClaimBuilder {
    verifications: CertVerifications,
}

impl CertificationClaimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verifications(verifications: CertVerifications) -> Self {
        Self { verifications }
    }

    /// Status the caller recorded for `name`, matched case-insensitively.
    fn recorded(&self, name: &str) -> Option<CertStatus> {
        self.verifications
            .iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, status)| *status)
    }

    pub fn build(&self, hits: &SignalHits) -> Vec<CertClaim> {
        let code = fsc_code(&hits.blob);

        hits.certifications
            .iter()
            .map(|&name| {
                let mut claim = CertClaim {
                    name: name.to_string(),
                    status: CertStatus::Claimed,
                    verify_url: verify_url(name).unwrap_or_default().to_string(),
                    code: None,
                };
                if name == "fsc" {
                    if let Some(code) = &code {
                        claim.status = CertStatus::Verifiable;
                        claim.code = Some(code.clone());
                    }
                }
                if let Some(status) = self.recorded(name) {
                    if rank(status) > rank(claim.status) {
                        claim.status = status;
                    }
                }
                claim
            })
            .collect()
    }
}
