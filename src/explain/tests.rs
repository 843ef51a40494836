use super::*;
use crate::profile::{CandidateProfile, GeoPoint, JobRequest, TitleResolution, WorkExperienceEntry};
use crate::scoring::{ScoreBreakdown, Weights};
use crate::seniority::SeniorityTier;

fn entry(title: &str, industry: &str, weighted: f64) -> WorkExperienceEntry {
    let mut e = WorkExperienceEntry::new(title, 2015, 2020).with_industry(industry);
    e.weighted_years = Some(weighted);
    e
}

fn job() -> JobRequest {
    let mut job = JobRequest::new("Head of Accounting", GeoPoint::new(47.37, 8.54));
    job.industry = Some("Real Estate".into());
    job.required_skills = Some("IFRS, SAP FI, Excel, a".into());
    job.expected_seniority_level = "manager".into();
    job
}

fn candidate() -> CandidateProfile {
    CandidateProfile {
        work_experiences: vec![
            entry("Head of Accounting & Controlling", "Real Estate", 6.0),
            entry("Accountant", "Banking", 3.0),
        ],
        total_weighted_relevant_years: 9.4,
        seniority_level: Some(SeniorityTier::Manager),
        skills_text: "SAP FI/CO, IFRS, Excel, Swiss GAAP".into(),
        ..Default::default()
    }
}

fn breakdown() -> ScoreBreakdown {
    ScoreBreakdown::from_raw(1.5, &Weights::default())
}

#[test]
fn test_full_explanation() {
    let bullets = explain(&candidate(), &job(), &breakdown());
    assert_eq!(
        bullets,
        vec![
            "Job title match: Head of Accounting & Controlling",
            "9 years of relevant experience",
            "Industry match: Real Estate",
            "Ideal seniority level (manager)",
            "Skills: ifrs, sap, fi, excel",
            "Relevant certifications/education",
        ]
    );
}

#[test]
fn test_skills_match_next_to_punctuation() {
    let mut c = candidate();
    c.skills_text = "Excel; IFRS. SAP".into();
    let bullets = explain(&c, &job(), &breakdown());
    assert!(bullets.contains(&"Skills: ifrs, sap, excel".to_string()), "{bullets:?}");
}

#[test]
fn test_most_relevant_role_when_no_title_overlap() {
    let mut c = candidate();
    c.work_experiences = vec![
        entry("Buchhalter", "Banking", 1.0),
        entry("Leiter Finanzen", "Banking", 5.0)
            .with_canonical_title(TitleResolution::Canonical("Head of Finance".into())),
    ];
    let bullets = explain(&c, &job(), &breakdown());
    assert_eq!(bullets[0], "Most relevant role: Head of Finance");
}

#[test]
fn test_single_shared_word_is_not_a_title_match() {
    let mut c = candidate();
    c.work_experiences = vec![entry("Accounting Clerk", "", 2.0)];
    let bullets = explain(&c, &job(), &breakdown());
    assert_eq!(bullets[0], "Most relevant role: Accounting Clerk");
}

#[test]
fn test_generic_industry_list() {
    let mut c = candidate();
    c.work_experiences = vec![
        entry("A", "Banking", 1.0),
        entry("B", "Insurance", 1.0),
        entry("C", "Banking", 1.0),
        entry("D", "Retail", 1.0),
        entry("E", "Logistics", 1.0),
    ];
    let bullets = explain(&c, &job(), &breakdown());
    assert!(bullets.contains(&"Industry: Banking, Insurance, Retail".to_string()));
}

#[test]
fn test_seniority_mismatch_and_missing() {
    let mut c = candidate();
    c.seniority_level = Some(SeniorityTier::Senior);
    let bullets = explain(&c, &job(), &breakdown());
    assert!(bullets.contains(&"Seniority: senior (expected: manager)".to_string()));

    c.seniority_level = None;
    let bullets = explain(&c, &job(), &breakdown());
    assert!(!bullets.iter().any(|b| b.starts_with("Seniority") || b.starts_with("Ideal")));
}

#[test]
fn test_education_line_needs_share_above_five_percent() {
    let mut weights = Weights::default();
    weights.education = 0.04;
    let b = ScoreBreakdown::from_raw(1.5, &weights);
    let bullets = explain(&candidate(), &job(), &b);
    assert!(!bullets.contains(&"Relevant certifications/education".to_string()));
}

#[test]
fn test_empty_profile_yields_no_bullets() {
    let bullets = explain(
        &CandidateProfile::default(),
        &JobRequest::new("CFO", GeoPoint::new(47.0, 8.0)),
        &ScoreBreakdown::default(),
    );
    assert!(bullets.is_empty());
}

#[test]
fn test_bullets_are_capped() {
    assert!(explain(&candidate(), &job(), &breakdown()).len() <= MAX_BULLETS);
}
