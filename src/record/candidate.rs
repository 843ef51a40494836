use tracing::debug;

use super::coerce::{Parsed, float_opt, int_or, text};
use super::date::{parse_available_from, parse_unix_date};
use super::html::{strip_html, strip_html_opt};
use super::php::{self, PhpValue};
use super::{DegradationLog, NormalizedRecord, RawRecord};
use crate::constants::{DEFAULT_PENSUM_DESIRED, DEFAULT_PENSUM_FROM, DEFAULT_RADIUS_KM};
use crate::profile::{
    CandidateDetails, CandidateProfile, GeoPoint, LanguageSkill, WorkExperienceEntry, Workload,
};

/// Candidate meta keys.
pub mod keys {
    pub const WORK_HISTORY: &str = "_noo_resume_field__taetigkeiten";
    pub const LANGUAGES: &str = "_noo_resume_field_languages_i_speak";
    pub const LAT: &str = "_resume_address_lat";
    pub const LON: &str = "_resume_address_lon";
    pub const ADDRESS: &str = "_resume_address";
    pub const PENSUM: &str = "_noo_resume_field_job_field_pensum";
    pub const PENSUM_FROM: &str = "_noo_resume_field_job_field_pensum_from";
    pub const PENSUM_DURATION: &str = "_noo_resume_field_job_field_pensum_duration";
    pub const RADIUS_KM: &str = "_noo_resume_field_job_field_arbeitsradius_km";
    pub const RADIUS_TEXT: &str = "_noo_resume_field_job_field_arbeitsradius";
    pub const AVAILABLE_FROM: &str = "_noo_resume_field_job_field_available_from";
    pub const SKILLS: &str = "_noo_resume_field_job_field_technische_kenntnisse";
    pub const EDUCATION: &str = "_noo_resume_field_job_field_diplome";
    pub const PHONE: &str = "_noo_resume_field__phone";
    pub const GENDER: &str = "_noo_resume_field__sex";
    pub const LINKEDIN: &str = "linkedin";
    pub const LINKEDIN_FIELD: &str = "_noo_resume_field_linkedin";
    pub const WEBSITE: &str = "website";
    pub const CV_FILE: &str = "_noo_resume_field_cvfile";
    pub const SHORT_DESCRIPTION: &str = "user_short_description";
    pub const EXPECTATIONS: &str = "_job_expectations";
    pub const HIGHEST_DEGREE: &str = "_highest_degree";
    pub const AI_PROFILE: &str = "_noo_resume_field_job_field_audio_describe_result";
    pub const AI_EXPERIENCE: &str = "_noo_resume_field_job_field_audio_experience_result";
    pub const AI_SKILLS: &str = "_noo_resume_field_job_field_audio_skill_result";
    pub const AI_TEXT_SKILLS: &str = "_noo_resume_field_job_field_text_skill_result";
    pub const MOST_EXPERIENCE_INDUSTRIES: &str = "_noo_resume_field_job_field_most_experience_branches";
    pub const CATEGORY_PRIMARY: &str = "_noo_resume_field_job_category_primary";
    pub const CATEGORY_SECONDARY: &str = "_noo_resume_field_job_category_secondary";
    pub const STATUS: &str = "_noo_resume_field__status";
    pub const REGISTRATION: &str = "_noo_resume_field__registration";
    pub const EXPIRES: &str = "_expires";
    pub const FEATURED: &str = "_featured";
    pub const ZIP: &str = "_noo_resume_field_job_field_zip";
    pub const VOLUNTARY: &str = "_noo_resume_field_job_field_freiwillig";
    pub const BIRTH_YEAR: &str = "_noo_resume_field__jahrgang";
    pub const RETIRED: &str = "_noo_resume_field_already_retired";
    pub const CONTRACT_BASIS: &str = "_noo_resume_field_job_field_auftragsbasis";

    // Work-history entry keys.
    pub const ENTRY_TITLE: &str = "job_field_stellenbezeichnung";
    pub const ENTRY_START: &str = "job_field_stellenbezeichnung_von";
    pub const ENTRY_END: &str = "job_field_stellenbezeichnung_bis";
    pub const ENTRY_EMPLOYER: &str = "job_field_name_des_unter";
    pub const ENTRY_INDUSTRY_PREFIX: &str = "job_field_most_experience_branches";
    pub const ENTRY_DESCRIPTION: &str = "job_field_beschreibung";
}

const ONGOING: &str = "now";

/// Normalizes a raw candidate record.
///
/// Derived fields (recency, seniority, canonical titles, vectors) stay unset.
/// A record without coordinates still normalizes; it is excluded at indexing.
pub fn normalize_candidate(raw: &RawRecord, current_year: i32) -> NormalizedRecord<CandidateProfile> {
    let mut log = DegradationLog::default();

    let work_experiences = log.take(
        "work_experiences",
        parse_work_history(raw.meta(keys::WORK_HISTORY), current_year),
    );
    let languages = log.take("languages", parse_languages(raw.meta(keys::LANGUAGES)));

    let lat = log.take("location.lat", float_opt(raw.meta(keys::LAT)));
    let lon = log.take("location.lon", float_opt(raw.meta(keys::LON)));
    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };

    let desired = log.take(
        "pensum_desired",
        int_or(raw.meta(keys::PENSUM), i64::from(DEFAULT_PENSUM_DESIRED)),
    );
    let minimum = log.take(
        "pensum_from",
        int_or(raw.meta(keys::PENSUM_FROM), i64::from(DEFAULT_PENSUM_FROM)),
    );
    let radius = log.take(
        "work_radius_km",
        int_or(raw.meta(keys::RADIUS_KM), i64::from(DEFAULT_RADIUS_KM)),
    );
    let available_from = log.take(
        "available_from",
        parse_available_from(raw.meta(keys::AVAILABLE_FROM)),
    );

    let birth_year = log.take("birth_year", int_or(raw.meta(keys::BIRTH_YEAR), 0));
    let most_experience_industries = log.take(
        "most_experience_industries",
        php::decode_string_list(raw.meta(keys::MOST_EXPERIENCE_INDUSTRIES)),
    );
    let job_categories_primary = log.take(
        "job_categories_primary",
        parse_category_ids(raw.meta(keys::CATEGORY_PRIMARY)),
    );
    let job_categories_secondary = log.take(
        "job_categories_secondary",
        parse_category_ids(raw.meta(keys::CATEGORY_SECONDARY)),
    );

    let address = text(raw.meta(keys::ADDRESS));
    let contract_basis = text(raw.meta(keys::CONTRACT_BASIS));

    let details = CandidateDetails {
        candidate_name: text(raw.post_title.as_deref()),
        phone: text(raw.meta(keys::PHONE)),
        gender: text(raw.meta(keys::GENDER)),
        linkedin_url: text(raw.first_meta(&[keys::LINKEDIN, keys::LINKEDIN_FIELD])),
        website_url: text(raw.meta(keys::WEBSITE)),
        cv_file: text(raw.meta(keys::CV_FILE)),
        short_description: strip_html_opt(raw.meta(keys::SHORT_DESCRIPTION)),
        job_expectations: strip_html_opt(raw.meta(keys::EXPECTATIONS)),
        highest_degree: text(raw.meta(keys::HIGHEST_DEGREE)),
        ai_profile_description: strip_html_opt(raw.meta(keys::AI_PROFILE)),
        ai_experience_description: strip_html_opt(raw.meta(keys::AI_EXPERIENCE)),
        ai_skills_description: strip_html_opt(raw.meta(keys::AI_SKILLS)),
        ai_text_skill_result: strip_html_opt(raw.meta(keys::AI_TEXT_SKILLS)),
        most_experience_industries,
        address: address.clone(),
        zip_code: text(raw.meta(keys::ZIP)),
        work_radius_text: text(raw.meta(keys::RADIUS_TEXT)),
        pensum_duration: text(raw.meta(keys::PENSUM_DURATION)),
        on_contract_basis: !contract_basis.is_empty(),
        voluntary: text(raw.meta(keys::VOLUNTARY)),
        birth_year: (birth_year > 0).then_some(birth_year as i32),
        retired: text(raw.meta(keys::RETIRED)) == "1",
        job_categories_primary,
        job_categories_secondary,
        profile_status: text(raw.meta(keys::STATUS)),
        registered_at: Some(text(raw.meta(keys::REGISTRATION))).filter(|s| !s.is_empty()),
        expires_at: parse_unix_date(raw.meta(keys::EXPIRES)),
        featured: text(raw.meta(keys::FEATURED)).eq_ignore_ascii_case("yes"),
        post_date: raw.post_date.clone(),
        post_modified: raw.post_modified.clone(),
    };

    let profile = CandidateProfile {
        post_id: raw.post_id,
        work_experiences,
        languages,
        location,
        workload: Workload {
            desired: clamp_u32(desired),
            minimum: clamp_u32(minimum),
        },
        work_radius_km: if radius > 0 { clamp_u32(radius) } else { DEFAULT_RADIUS_KM },
        available_from,
        seniority_level: None,
        skills_text: strip_html_opt(raw.meta(keys::SKILLS)),
        education_text: strip_html_opt(raw.meta(keys::EDUCATION)),
        total_weighted_relevant_years: 0.0,
        industry_parts: Vec::new(),
        vectors: Default::default(),
        details,
    };

    log.finish(profile)
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}

/// Parses the serialized work-history list.
///
/// An end year of `"now"` (or anything unparsable) is the current year. Entries
/// whose start or end year is not positive are dropped.
pub fn parse_work_history(raw: Option<&str>, current_year: i32) -> Parsed<Vec<WorkExperienceEntry>> {
    php::decode_list(raw).map(|values| {
        values
            .iter()
            .filter(|v| v.is_array())
            .filter_map(|entry| work_entry(entry, current_year))
            .collect()
    })
}

fn work_entry(entry: &PhpValue, current_year: i32) -> Option<WorkExperienceEntry> {
    let field = |key: &str| entry.get(key).map(PhpValue::to_text).unwrap_or_default();

    let start_year = field(keys::ENTRY_START).parse::<i32>().unwrap_or(0);
    let end_raw = field(keys::ENTRY_END);
    let end_year = if end_raw.eq_ignore_ascii_case(ONGOING) {
        current_year
    } else {
        end_raw.parse::<i32>().unwrap_or(current_year)
    };
    if start_year <= 0 || end_year <= 0 {
        debug!(start_year, end_year, "dropping work entry with non-positive year");
        return None;
    }

    let industry = entry
        .find_key_containing(keys::ENTRY_INDUSTRY_PREFIX)
        .map(PhpValue::first_text)
        .unwrap_or_default();

    Some(
        WorkExperienceEntry::new(field(keys::ENTRY_TITLE), start_year, end_year)
            .with_company(field(keys::ENTRY_EMPLOYER))
            .with_industry(industry)
            .with_description(strip_html(&field(keys::ENTRY_DESCRIPTION))),
    )
}

/// Parses a serialized `{lang, degree}` list; entries without a language are dropped.
pub fn parse_languages(raw: Option<&str>) -> Parsed<Vec<LanguageSkill>> {
    php::decode_list(raw).map(|values| {
        values
            .iter()
            .filter_map(|entry| {
                let lang = entry.get("lang").map(PhpValue::to_text).unwrap_or_default();
                let degree = entry.get("degree").map(PhpValue::to_text).unwrap_or_default();
                (!lang.is_empty()).then(|| LanguageSkill::new(lang, degree))
            })
            .collect()
    })
}

fn parse_category_ids(raw: Option<&str>) -> Parsed<Vec<String>> {
    php::decode_list(raw).map(|values| {
        values
            .iter()
            .map(PhpValue::to_text)
            .filter(|s| !s.is_empty())
            .collect()
    })
}
