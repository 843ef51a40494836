use chrono::{Datelike, NaiveDate};

use super::*;
use crate::seniority::{SeniorityClassifier, SeniorityTier};

fn s(v: &str) -> String {
    format!("s:{}:\"{}\";", v.len(), v)
}

fn assoc(pairs: &[(&str, &str)]) -> String {
    let body: String = pairs.iter().map(|(k, v)| format!("{}{}", s(k), s(v))).collect();
    format!("a:{}:{{{}}}", pairs.len(), body)
}

fn list(items: &[String]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("i:{i};{item}"))
        .collect();
    format!("a:{}:{{{}}}", items.len(), body)
}

fn work(title: &str, from: &str, to: &str, industry: &str) -> String {
    assoc(&[
        ("job_field_stellenbezeichnung", title),
        ("job_field_stellenbezeichnung_von", from),
        ("job_field_stellenbezeichnung_bis", to),
        ("job_field_name_des_unter", "ACME AG"),
        ("job_field_most_experience_branches266d8b19f5", industry),
        ("job_field_beschreibung", "<p>Led the <b>close</b></p>"),
    ])
}

#[test]
fn test_decode_scalars() {
    assert_eq!(php::decode("N;").unwrap(), PhpValue::Null);
    assert_eq!(php::decode("b:1;").unwrap(), PhpValue::Bool(true));
    assert_eq!(php::decode("i:-42;").unwrap(), PhpValue::Int(-42));
    assert_eq!(php::decode("d:0.5;").unwrap(), PhpValue::Float(0.5));
    assert_eq!(php::decode(&s("Zürich")).unwrap(), PhpValue::Str("Zürich".into()));
}

#[test]
fn test_decode_string_length_counts_bytes() {
    // "Zürich" is 7 bytes.
    assert!(php::decode("s:7:\"Zürich\";").is_ok());
    assert!(php::decode("s:6:\"Zürich\";").is_err());
}

#[test]
fn test_as_list_sorts_integer_keys() {
    let value = php::decode(r#"a:3:{i:2;s:1:"c";s:1:"0";s:1:"a";i:1;s:1:"b";}"#).unwrap();
    let texts: Vec<String> = value.as_list().iter().map(|v| v.to_text()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_decode_errors_carry_offset() {
    let err = php::decode("a:1:{i:0;s:3:\"ab\";}").unwrap_err();
    assert!(matches!(err, PhpDecodeError::UnexpectedByte { .. } | PhpDecodeError::UnexpectedEof { .. }));

    let err = php::decode("O:8:\"stdClass\":0:{}").unwrap_err();
    assert_eq!(err, PhpDecodeError::UnsupportedType { offset: 0, tag: 'O' });

    let err = php::decode("i:1;i:2;").unwrap_err();
    assert_eq!(err, PhpDecodeError::TrailingData { offset: 4 });
}

#[test]
fn test_decode_rejects_excessive_nesting() {
    let depth = php::MAX_DEPTH + 1;
    let input = format!("{}{}", "a:1:{i:0;".repeat(depth), "N;") + &"}".repeat(depth);
    assert!(matches!(php::decode(&input), Err(PhpDecodeError::TooDeep { .. })));
}

#[test]
fn test_decode_list_degrades() {
    assert!(php::decode_list(None).value().is_empty());
    assert!(!php::decode_list(Some("  ")).is_degraded());

    let plain = php::decode_list(Some("hello"));
    assert!(plain.is_degraded());
    assert!(plain.value().is_empty());

    let broken = php::decode_list(Some("a:2:{i:0;"));
    assert!(broken.is_degraded());
    assert!(broken.reason().is_some());
}

#[test]
fn test_decode_string_list_accepts_plain_string() {
    assert_eq!(php::decode_string_list(Some("Banking")).into_value(), vec!["Banking"]);
    let serialized = list(&[s("Banking"), s(""), s("Insurance")]);
    assert_eq!(
        php::decode_string_list(Some(&serialized)).into_value(),
        vec!["Banking", "Insurance"]
    );
}

#[test]
fn test_strip_html() {
    assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    assert_eq!(strip_html("a<br/>b"), "a b");
    assert_eq!(strip_html("<script>alert(1)</script>Text"), "Text");
    assert_eq!(strip_html("<!-- note -->SAP &amp; IFRS"), "SAP & IFRS");
    assert_eq!(strip_html("Z&uuml;rich&nbsp;&#x41;&#66;"), "Zürich AB");
    assert_eq!(strip_html("   "), "");
    assert_eq!(strip_html("5 < 6 &unknown;"), "5 < 6 &unknown;");
}

#[test]
fn test_int_or() {
    assert_eq!(int_or(None, 100), Parsed::Ok(100));
    assert_eq!(int_or(Some(" 80 "), 100), Parsed::Ok(80));
    let bad = int_or(Some("eighty"), 100);
    assert!(bad.is_degraded());
    assert_eq!(bad.into_value(), 100);
}

#[test]
fn test_nonzero_float() {
    assert_eq!(nonzero_float(Some("0")), None);
    assert_eq!(nonzero_float(Some("x")), None);
    assert_eq!(nonzero_float(Some("47.5")), Some(47.5));
}

#[test]
fn test_truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("äöü", 2), "äö");
    assert_eq!(truncate_chars("abc", 10), "abc");
}

#[test]
fn test_parse_available_from_formats() {
    let expected = NaiveDate::from_ymd_opt(2026, 3, 1);
    assert_eq!(parse_available_from(Some("2026-03-01")).into_value(), expected);
    assert_eq!(parse_available_from(Some("2026-03-01T00:00:00")).into_value(), expected);
    assert_eq!(parse_available_from(Some("2026/03/01")).into_value(), expected);
    assert_eq!(parse_available_from(Some("1.3.2026")).into_value(), expected);
    assert_eq!(parse_available_from(None), Parsed::Ok(None));

    let unknown = parse_available_from(Some("next spring"));
    assert!(unknown.is_degraded());
    assert_eq!(unknown.into_value(), None);
}

#[test]
fn test_parse_unix_date() {
    assert_eq!(
        parse_unix_date(Some("1767225600")),
        NaiveDate::from_ymd_opt(2026, 1, 1)
    );
    assert_eq!(parse_unix_date(Some("0")), None);
    assert_eq!(parse_unix_date(Some("soon")), None);
}

#[test]
fn test_parse_modified() {
    let dt = parse_modified("2025-06-01 12:30:00").unwrap();
    assert_eq!(dt.year(), 2025);
    assert!(parse_modified("2025-06-01T12:30:00Z").is_some());
    assert!(parse_modified("yesterday").is_none());
}

#[test]
fn test_parse_work_history() {
    let raw = list(&[
        work("Head of Accounting", "2019", "now", "Real Estate"),
        work("Accountant", "2012", "2019", "Banking"),
        work("Broken", "0", "2010", ""),
        work("Unknown End", "2005", "", ""),
    ]);
    let entries = parse_work_history(Some(&raw), 2026).into_value();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].raw_title, "Head of Accounting");
    assert_eq!(entries[0].end_year, 2026);
    assert_eq!(entries[0].years_in_role, 7);
    assert_eq!(entries[0].industry.as_deref(), Some("Real Estate"));
    assert_eq!(entries[0].company, "ACME AG");
    assert_eq!(entries[0].description, "Led the close");

    assert_eq!(entries[2].end_year, 2026);
    assert!(entries[2].industry.is_none());
}

#[test]
fn test_industry_uses_first_list_value() {
    let entry = format!(
        "a:3:{{{}{}{}{}{}{}}}",
        s("job_field_stellenbezeichnung"),
        s("Controller"),
        s("job_field_stellenbezeichnung_von"),
        s("2020"),
        s("job_field_most_experience_branches_x"),
        list(&[s("Insurance"), s("Banking")])
    );
    let entries = parse_work_history(Some(&list(&[entry])), 2026).into_value();
    assert_eq!(entries[0].industry.as_deref(), Some("Insurance"));
}

#[test]
fn test_parse_languages_drops_nameless() {
    let raw = list(&[
        assoc(&[("lang", "German"), ("degree", "Mother tongue")]),
        assoc(&[("lang", ""), ("degree", "Fluent")]),
        assoc(&[("lang", "English"), ("degree", "Fluent")]),
    ]);
    let langs = parse_languages(Some(&raw)).into_value();
    assert_eq!(langs.len(), 2);
    assert_eq!(langs[0].lang, "German");
    assert_eq!(langs[1].degree, "Fluent");
}

#[test]
fn test_normalize_candidate_full_record() {
    let raw = RawRecord::new(42)
        .with_title("Erika Muster")
        .with_meta(candidate_keys::WORK_HISTORY, list(&[work("CFO", "2018", "now", "Banking")]))
        .with_meta(
            candidate_keys::LANGUAGES,
            list(&[assoc(&[("lang", "German"), ("degree", "Mother tongue")])]),
        )
        .with_meta(candidate_keys::LAT, "47.3769")
        .with_meta(candidate_keys::LON, "8.5417")
        .with_meta(candidate_keys::PENSUM, "80")
        .with_meta(candidate_keys::PENSUM_FROM, "40")
        .with_meta(candidate_keys::RADIUS_KM, "0")
        .with_meta(candidate_keys::AVAILABLE_FROM, "01.02.2026")
        .with_meta(candidate_keys::SKILLS, "<ul><li>IFRS</li><li>SAP</li></ul>")
        .with_meta(candidate_keys::BIRTH_YEAR, "1960")
        .with_meta(candidate_keys::FEATURED, "Yes")
        .with_meta(candidate_keys::RETIRED, "1")
        .with_meta(candidate_keys::CONTRACT_BASIS, "Auftrag");

    let normalized = normalize_candidate(&raw, 2026);
    assert!(normalized.is_clean(), "{:?}", normalized.degradations);
    let profile = normalized.into_record();

    assert_eq!(profile.post_id, 42);
    assert_eq!(profile.work_experiences.len(), 1);
    assert_eq!(profile.languages[0].lang, "German");
    assert!(profile.location.is_some());
    assert_eq!(profile.workload.desired, 80);
    assert_eq!(profile.workload.minimum, 40);
    assert_eq!(profile.work_radius_km, 50);
    assert_eq!(profile.available_from, NaiveDate::from_ymd_opt(2026, 2, 1));
    assert_eq!(profile.skills_text, "IFRS SAP");
    assert!(profile.seniority_level.is_none());
    assert_eq!(profile.details.candidate_name, "Erika Muster");
    assert_eq!(profile.details.birth_year, Some(1960));
    assert!(profile.details.featured);
    assert!(profile.details.retired);
    assert!(profile.details.on_contract_basis);
}

#[test]
fn test_normalize_candidate_degrades_instead_of_failing() {
    let raw = RawRecord::new(7)
        .with_meta(candidate_keys::WORK_HISTORY, "a:1:{i:0;garbage")
        .with_meta(candidate_keys::LAT, "north")
        .with_meta(candidate_keys::LON, "8.5")
        .with_meta(candidate_keys::PENSUM, "full")
        .with_meta(candidate_keys::AVAILABLE_FROM, "asap");

    let normalized = normalize_candidate(&raw, 2026);
    let fields: Vec<&str> = normalized.degradations.iter().map(|d| d.field).collect();
    assert!(fields.contains(&"work_experiences"));
    assert!(fields.contains(&"location.lat"));
    assert!(fields.contains(&"pensum_desired"));
    assert!(fields.contains(&"available_from"));

    let profile = normalized.record;
    assert!(profile.work_experiences.is_empty());
    assert!(profile.location.is_none());
    assert_eq!(profile.workload.desired, 100);
    assert_eq!(profile.workload.minimum, 0);
    assert!(profile.available_from.is_none());
}

#[test]
fn test_normalize_candidate_missing_coordinates_still_normalizes() {
    let profile = normalize_candidate(&RawRecord::new(1), 2026).into_record();
    assert!(profile.location.is_none());
    assert_eq!(profile.work_radius_km, 50);
}

#[test]
fn test_normalize_job() {
    let classifier = SeniorityClassifier::new();
    let mut raw = RawRecord::new(900)
        .with_title("Leiter Finanzen")
        .with_meta("_noo_job_field_industry", " Real Estate ")
        .with_meta("geolocation_lat", "0")
        .with_meta("_noo_job_field_address_lat", "47.37")
        .with_meta("_noo_job_field_address_lon", "8.54")
        .with_meta("_noo_job_field_pensum_from", "60")
        .with_meta("_noo_job_field_radius", "-5")
        .with_meta(
            "_noo_job_field_languages",
            list(&[
                assoc(&[("lang", "German"), ("degree", "C1")]),
                assoc(&[("lang", "English"), ("degree", "")]),
            ]),
        );
    raw.post_content = Some("<p>IFRS, SAP</p>".into());

    let job = normalize_job(&raw, &classifier).into_record();
    assert_eq!(job.title, "Leiter Finanzen");
    assert_eq!(job.required_skills, "IFRS, SAP");
    assert_eq!(job.industry, "Real Estate");
    assert_eq!(job.expected_seniority_level, SeniorityTier::Manager);
    assert_eq!(job.location, Some(crate::profile::GeoPoint::new(47.37, 8.54)));
    assert_eq!(job.radius_km, 50);
    assert_eq!(job.pensum_min, 60);
    assert_eq!(job.pensum_max, 100);
    assert_eq!(job.required_languages.len(), 2);
    assert_eq!(job.required_languages[1].min_level, "B2");
}

#[test]
fn test_normalize_job_explicit_seniority_and_empty_title() {
    let classifier = SeniorityClassifier::new();
    let explicit = RawRecord::new(1)
        .with_title("Accountant")
        .with_meta("_noo_job_field_career_level", "Director");
    assert_eq!(
        normalize_job(&explicit, &classifier).record.expected_seniority_level,
        SeniorityTier::Director
    );

    let untitled = RawRecord::new(2).with_meta("_noo_job_field_seniority", "guru");
    let job = normalize_job(&untitled, &classifier).into_record();
    assert_eq!(job.expected_seniority_level, SeniorityTier::Senior);
    assert!(job.location.is_none());
}

#[test]
fn test_raw_record_from_json() {
    let raw: RawRecord = serde_json::from_str(
        r#"{"post_id": 5, "post_modified": "2025-01-01 00:00:00", "meta": {"website": "x"}}"#,
    )
    .unwrap();
    assert_eq!(raw.post_id, 5);
    assert_eq!(raw.meta("website"), Some("x"));
    assert!(raw.post_title.is_none());
}
