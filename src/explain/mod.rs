//! Rank explanations: short, rule-based reasons a candidate was ranked.
//!
//! Best-effort and independent of the score except for the education line,
//! which compares displayed scores.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::profile::{CandidateProfile, JobRequest};
use crate::scoring::ScoreBreakdown;

/// Maximum number of bullets per candidate.
pub const MAX_BULLETS: usize = 8;
const MAX_INDUSTRIES: usize = 3;
const MAX_SKILLS: usize = 5;
/// Share of the displayed total the displayed education score must exceed.
const EDUCATION_SHARE: f64 = 0.05;

fn lowercase_tokens(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Builds up to [`MAX_BULLETS`] bullets for one ranked candidate.
pub fn explain(candidate: &CandidateProfile, job: &JobRequest, breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut bullets = Vec::new();

    bullets.extend(title_bullet(candidate, job));

    let years = candidate.total_weighted_relevant_years;
    if years > 0.0 {
        bullets.push(format!("{years:.0} years of relevant experience"));
    }

    bullets.extend(industry_bullet(candidate, job));
    bullets.extend(seniority_bullet(candidate, job));
    bullets.extend(skills_bullet(candidate, job));

    if breakdown.education > breakdown.total * EDUCATION_SHARE {
        bullets.push("Relevant certifications/education".to_string());
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

fn title_bullet(candidate: &CandidateProfile, job: &JobRequest) -> Option<String> {
    let job_words = lowercase_tokens(&job.title);
    let matched = candidate.work_experiences.iter().find(|e| {
        let raw = e.raw_title.trim();
        !raw.is_empty() && lowercase_tokens(raw).intersection(&job_words).count() >= 2
    });
    if let Some(entry) = matched {
        return Some(format!("Job title match: {}", entry.raw_title.trim()));
    }

    let best = candidate.most_relevant_entry()?;
    let title = best.display_title();
    (!title.is_empty()).then(|| format!("Most relevant role: {title}"))
}

fn industry_bullet(candidate: &CandidateProfile, job: &JobRequest) -> Option<String> {
    let industries: Vec<&str> = candidate
        .distinct_industries()
        .into_iter()
        .take(MAX_INDUSTRIES)
        .collect();
    if industries.is_empty() {
        return None;
    }

    let job_words = lowercase_tokens(job.industry.as_deref().unwrap_or_default());
    if !job_words.is_empty()
        && let Some(hit) = industries
            .iter()
            .find(|ind| !lowercase_tokens(ind).is_disjoint(&job_words))
    {
        return Some(format!("Industry match: {hit}"));
    }
    Some(format!("Industry: {}", industries.join(", ")))
}

fn seniority_bullet(candidate: &CandidateProfile, job: &JobRequest) -> Option<String> {
    let job_tier = job.expected_tier();
    let tier = candidate.seniority_level?;
    if tier == job_tier {
        Some(format!("Ideal seniority level ({job_tier})"))
    } else {
        Some(format!("Seniority: {tier} (expected: {job_tier})"))
    }
}

fn skills_bullet(candidate: &CandidateProfile, job: &JobRequest) -> Option<String> {
    let required = job.required_skills.as_deref()?.to_lowercase().replace(',', " ");
    let have = candidate.skills_text.to_lowercase();
    if have.trim().is_empty() {
        return None;
    }

    // Substring containment, so "ifrs" matches "IFRS." in free text.
    let mut found: Vec<&str> = Vec::new();
    for token in required.split_whitespace() {
        if token.chars().count() > 1 && have.contains(token) && !found.contains(&token) {
            found.push(token);
            if found.len() == MAX_SKILLS {
                break;
            }
        }
    }
    (!found.is_empty()).then(|| format!("Skills: {}", found.join(", ")))
}
