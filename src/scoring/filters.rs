use chrono::NaiveDate;

use crate::profile::{CandidateProfile, GeoPoint, JobRequest, RequiredLanguage};

/// Why a candidate failed the hard filters.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRejection {
    NoLocation,
    OutsideRadius { distance_m: f64 },
    /// Desired workload below the job's minimum.
    WorkloadTooLow { desired: u32 },
    /// Minimum acceptable workload above the job's maximum.
    WorkloadMinimumTooHigh { minimum: u32 },
    AvailableTooLate { available_from: NaiveDate },
    MissingLanguage { language: String },
}

/// Eligibility predicates of one job. All must pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HardFilters {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub pensum_min: u32,
    pub pensum_max: u32,
    pub available_before: Option<NaiveDate>,
    pub languages: Vec<RequiredLanguage>,
}

impl HardFilters {
    pub fn from_request(request: &JobRequest) -> Self {
        Self {
            center: request.location(),
            radius_m: request.radius_m(),
            pensum_min: request.pensum_min,
            pensum_max: request.pensum_max,
            available_before: request.required_available_before,
            languages: request
                .required_languages
                .iter()
                .filter(|l| !l.name.trim().is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn check(&self, candidate: &CandidateProfile) -> Result<(), FilterRejection> {
        let location = candidate.location.ok_or(FilterRejection::NoLocation)?;
        let distance_m = location.distance_m(&self.center);
        if distance_m > self.radius_m {
            return Err(FilterRejection::OutsideRadius { distance_m });
        }

        // Two independent inequalities, not a range overlap.
        if candidate.workload.desired < self.pensum_min {
            return Err(FilterRejection::WorkloadTooLow {
                desired: candidate.workload.desired,
            });
        }
        if candidate.workload.minimum > self.pensum_max {
            return Err(FilterRejection::WorkloadMinimumTooHigh {
                minimum: candidate.workload.minimum,
            });
        }

        if let (Some(deadline), Some(available_from)) = (self.available_before, candidate.available_from)
            && available_from > deadline
        {
            return Err(FilterRejection::AvailableTooLate { available_from });
        }

        for required in &self.languages {
            let speaks = candidate
                .languages
                .iter()
                .any(|skill| skill.is_language(&required.name) && skill.bucket().satisfies(&required.min_level));
            if !speaks {
                return Err(FilterRejection::MissingLanguage {
                    language: required.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn passes(&self, candidate: &CandidateProfile) -> bool {
        self.check(candidate).is_ok()
    }
}
