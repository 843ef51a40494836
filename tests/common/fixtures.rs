//! Test fixtures for integration tests.

use seniormatch::profile::{
    CandidateProfile, GeoPoint, JobRequest, LanguageSkill, RequiredLanguage, Workload,
    WorkExperienceEntry,
};
use seniormatch::record::{RawRecord, candidate_keys};

pub const CURRENT_YEAR: i32 = 2026;

pub const ZURICH: GeoPoint = GeoPoint {
    lat: 47.3769,
    lon: 8.5417,
};

pub const GOLDEN_TOP_THREE: [u64; 3] = [10004, 10001, 10009];

pub const GOLDEN_EXCLUDED: u64 = 10007;

const GOLDEN_SKILLS: &str = "IFRS, Swiss GAAP, consolidation, SAP FI";

const GOLDEN_EDUCATION: &str = "Swiss certified expert in accounting and controlling";

#[derive(Default)]
pub struct CandidateBuilder {
    post_id: u64,
    roles: Vec<WorkExperienceEntry>,
    skills: Option<String>,
    education: Option<String>,
    languages: Vec<LanguageSkill>,
    workload: Option<Workload>,
    location: Option<GeoPoint>,
}

impl CandidateBuilder {
    pub fn new(post_id: u64) -> Self {
        Self {
            post_id,
            location: Some(ZURICH),
            languages: vec![LanguageSkill::new("German", "Mother tongue")],
            ..Default::default()
        }
    }

    pub fn role(mut self, title: &str, start: i32, end: i32, industry: &str) -> Self {
        self.roles
            .push(WorkExperienceEntry::new(title, start, end).with_industry(industry));
        self
    }

    pub fn skills(mut self, skills: &str) -> Self {
        self.skills = Some(skills.to_string());
        self
    }

    pub fn education(mut self, education: &str) -> Self {
        self.education = Some(education.to_string());
        self
    }

    pub fn workload(mut self, desired: u32, minimum: u32) -> Self {
        self.workload = Some(Workload { desired, minimum });
        self
    }

    pub fn build(self) -> CandidateProfile {
        let mut profile = CandidateProfile {
            post_id: self.post_id,
            work_experiences: self.roles,
            languages: self.languages,
            location: self.location,
            work_radius_km: 50,
            skills_text: self.skills.unwrap_or_default(),
            education_text: self.education.unwrap_or_default(),
            ..Default::default()
        };
        if let Some(workload) = self.workload {
            profile.workload = workload;
        }
        profile.details.candidate_name = format!("Candidate {}", self.post_id);
        profile
    }
}

/// Head of Accounting in Real Estate, Zurich, 50–80 %, German C1.
pub fn golden_job() -> JobRequest {
    let mut job = JobRequest::new("Head of Accounting", ZURICH);
    job.industry = Some("Real Estate".to_string());
    job.required_skills = Some(GOLDEN_SKILLS.to_string());
    job.required_education = Some(GOLDEN_EDUCATION.to_string());
    job.expected_seniority_level = "manager".to_string();
    job.pensum_min = 50;
    job.pensum_max = 80;
    job.required_languages = vec![RequiredLanguage::new("German", "C1")];
    job
}

/// Ten candidates for [`golden_job`]; `10007` wants too small a workload.
pub fn golden_candidates() -> Vec<CandidateProfile> {
    vec![
        CandidateBuilder::new(10001)
            .role("Head of Accounting", 2012, CURRENT_YEAR, "Banking")
            .skills("IFRS, SAP FI, budgeting")
            .education(GOLDEN_EDUCATION)
            .build(),
        CandidateBuilder::new(10002)
            .role("Senior Accountant", 2010, CURRENT_YEAR, "Real Estate")
            .skills("Swiss GAAP, accounts payable")
            .education("Commercial apprenticeship")
            .build(),
        CandidateBuilder::new(10003)
            .role("Controller", 2018, CURRENT_YEAR, "Real Estate")
            .skills("Excel, budgeting")
            .education("Commercial apprenticeship")
            .build(),
        CandidateBuilder::new(10004)
            .role("Head of Accounting", 2012, CURRENT_YEAR, "Real Estate")
            .skills(GOLDEN_SKILLS)
            .education(GOLDEN_EDUCATION)
            .build(),
        CandidateBuilder::new(10005)
            .role("Software Engineer", 2015, CURRENT_YEAR, "Technology")
            .skills("Rust, Kubernetes")
            .education("Master of computer science")
            .build(),
        CandidateBuilder::new(10006)
            .role("Finance Manager", 2016, CURRENT_YEAR, "Insurance")
            .skills("IFRS, controlling")
            .education("Master in finance")
            .build(),
        CandidateBuilder::new(10007)
            .role("Bookkeeper", 2019, CURRENT_YEAR, "Retail")
            .skills("Excel")
            .education("Commercial apprenticeship")
            .workload(40, 20)
            .build(),
        CandidateBuilder::new(10008)
            .role("Sales Manager", 2010, CURRENT_YEAR, "Retail")
            .skills("Negotiation, CRM")
            .education("Bachelor of marketing")
            .build(),
        CandidateBuilder::new(10009)
            .role("Accounting Manager", 2015, CURRENT_YEAR, "Real Estate")
            .skills("IFRS, SAP FI, reporting")
            .education("Bachelor in business administration")
            .build(),
        CandidateBuilder::new(10010)
            .role("Junior Accountant", 2023, CURRENT_YEAR, "Real Estate")
            .skills("Accounts receivable")
            .education("Commercial apprenticeship")
            .build(),
    ]
}

// PHP `serialize()` helpers for raw upstream records.

pub fn php_string(value: &str) -> String {
    format!("s:{}:\"{}\";", value.len(), value)
}

pub fn php_assoc(pairs: &[(&str, &str)]) -> String {
    let body: String = pairs
        .iter()
        .map(|(k, v)| format!("{}{}", php_string(k), php_string(v)))
        .collect();
    format!("a:{}:{{{}}}", pairs.len(), body)
}

pub fn php_list(items: &[String]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("i:{i};{item}"))
        .collect();
    format!("a:{}:{{{}}}", items.len(), body)
}

pub fn php_role(title: &str, from: &str, to: &str, industry: &str) -> String {
    php_assoc(&[
        ("job_field_stellenbezeichnung", title),
        ("job_field_stellenbezeichnung_von", from),
        ("job_field_stellenbezeichnung_bis", to),
        ("job_field_name_des_unter", "Muster AG"),
        ("job_field_most_experience_branches5f2a", industry),
        ("job_field_beschreibung", "<p>Monthly and <b>annual</b> closing</p>"),
    ])
}

/// A located raw candidate with one role and German as mother tongue.
pub fn raw_candidate(post_id: u64, title: &str, from: &str, industry: &str) -> RawRecord {
    let mut raw = RawRecord::new(post_id)
        .with_title(format!("Candidate {post_id}"))
        .with_meta(
            candidate_keys::WORK_HISTORY,
            php_list(&[php_role(title, from, "now", industry)]),
        )
        .with_meta(
            candidate_keys::LANGUAGES,
            php_list(&[php_assoc(&[("lang", "German"), ("degree", "Mother tongue")])]),
        )
        .with_meta(candidate_keys::LAT, ZURICH.lat.to_string())
        .with_meta(candidate_keys::LON, ZURICH.lon.to_string())
        .with_meta(candidate_keys::PENSUM, "80")
        .with_meta(candidate_keys::PENSUM_FROM, "50")
        .with_meta(candidate_keys::SKILLS, "<ul><li>IFRS</li><li>SAP FI</li></ul>");
    raw.post_modified = Some(format!("2026-01-{:02} 09:00:00", post_id % 28 + 1));
    raw
}
