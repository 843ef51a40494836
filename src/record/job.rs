use super::candidate::parse_languages;
use super::coerce::{int_or, nonzero_float, text, truncate_chars};
use super::html::strip_html;
use super::{DegradationLog, NormalizedRecord, RawRecord};
use crate::constants::{
    DEFAULT_PENSUM_DESIRED, DEFAULT_PENSUM_FROM, DEFAULT_RADIUS_KM, MAX_REQUIREMENT_CHARS,
};
use crate::profile::{GeoPoint, JobDocument, RequiredLanguage};
use crate::seniority::SeniorityClassifier;

/// Job meta keys, in fallback order where a field has several.
pub mod keys {
    pub const SKILLS: [&str; 2] = ["_noo_job_field_skills", "_noo_job_field_job_skills"];
    pub const EDUCATION: [&str; 2] = ["_noo_job_field_education", "_noo_job_field_diplome"];
    pub const INDUSTRY: [&str; 3] = [
        "_noo_job_field_industry",
        "_noo_job_field_job_industry",
        "_job_category",
    ];
    pub const SENIORITY: [&str; 2] = ["_noo_job_field_seniority", "_noo_job_field_career_level"];
    pub const COORDINATES: [(&str, &str); 4] = [
        ("geolocation_lat", "geolocation_long"),
        ("_noo_job_field_address_lat", "_noo_job_field_address_lon"),
        ("_job_latitude", "_job_longitude"),
        ("_noo_job_lat", "_noo_job_lon"),
    ];
    pub const RADIUS: [&str; 2] = ["_noo_job_field_radius", "_job_radius"];
    pub const PENSUM_MIN: [&str; 2] = ["_noo_job_field_pensum_from", "_job_pensum_min"];
    pub const PENSUM_MAX: [&str; 2] = ["_noo_job_field_pensum", "_job_pensum_max"];
    pub const LANGUAGES: [&str; 2] = [
        "_noo_job_field_languages",
        "_noo_job_field_languages_required",
    ];
}

const DEFAULT_MIN_LEVEL: &str = "B2";

/// Normalizes a raw job posting into a storable job document.
///
/// Skills fall back to the post body when no dedicated field is set. The tier
/// comes from an explicit field when it names a tier, else from the title.
pub fn normalize_job(raw: &RawRecord, classifier: &SeniorityClassifier) -> NormalizedRecord<JobDocument> {
    let mut log = DegradationLog::default();

    let title = text(raw.post_title.as_deref());
    let skills_source = raw
        .first_meta(&keys::SKILLS)
        .or(raw.post_content.as_deref().filter(|s| !s.trim().is_empty()));
    let required_skills = requirement_text(skills_source);
    let required_education = requirement_text(raw.first_meta(&keys::EDUCATION));
    let industry = text(raw.first_meta(&keys::INDUSTRY));

    let explicit_tier = raw.first_meta(&keys::SENIORITY);
    let expected_seniority_level = classifier.infer_job(explicit_tier, &title);

    let location = keys::COORDINATES.iter().find_map(|(lat_key, lon_key)| {
        let lat = nonzero_float(raw.meta(lat_key))?;
        let lon = nonzero_float(raw.meta(lon_key))?;
        Some(GeoPoint::new(lat, lon))
    });

    let radius = log.take(
        "radius_km",
        int_or(raw.first_meta(&keys::RADIUS), i64::from(DEFAULT_RADIUS_KM)),
    );
    let pensum_min = log.take(
        "pensum_min",
        int_or(raw.first_meta(&keys::PENSUM_MIN), i64::from(DEFAULT_PENSUM_FROM)),
    );
    let pensum_max = log.take(
        "pensum_max",
        int_or(raw.first_meta(&keys::PENSUM_MAX), i64::from(DEFAULT_PENSUM_DESIRED)),
    );

    let required_languages = log
        .take("required_languages", parse_languages(raw.first_meta(&keys::LANGUAGES)))
        .into_iter()
        .map(|skill| {
            let min_level = if skill.degree.is_empty() {
                DEFAULT_MIN_LEVEL.to_string()
            } else {
                skill.degree
            };
            RequiredLanguage::new(skill.lang, min_level)
        })
        .collect();

    let document = JobDocument {
        post_id: raw.post_id,
        title,
        description: raw
            .post_content
            .as_deref()
            .map(|html| truncate_chars(&strip_html(html), MAX_REQUIREMENT_CHARS))
            .unwrap_or_default(),
        required_skills,
        required_education,
        industry,
        expected_seniority_level,
        location,
        radius_km: if radius > 0 { to_u32(radius) } else { DEFAULT_RADIUS_KM },
        pensum_min: to_u32(pensum_min),
        pensum_max: to_u32(pensum_max),
        required_languages,
        post_modified: raw.post_modified.clone(),
    };

    log.finish(document)
}

fn requirement_text(raw: Option<&str>) -> String {
    raw.map(|html| truncate_chars(&strip_html(html), MAX_REQUIREMENT_CHARS))
        .unwrap_or_default()
}

fn to_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}
