use backwatch_core::{
    FolderStatus, GroupKind, PathFilter, ScanConfig, ScanRecord, ScanSession, ScanWarning,
    WarningKind, cutoff_date,
};
use chrono::NaiveDate;
use std::path::Path;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_config_path_filter_matches_config() {
    let mut config = ScanConfig::new("/volume1");
    config.excluded_names.push("lost+found".to_string());

    let filter = config.path_filter();
    assert!(filter.should_skip("lost+found"));
    assert!(filter.should_skip("#snapshot"));
    assert!(filter.should_skip("@tmp"));
    assert!(!filter.should_skip("HostA"));
}

#[test]
fn test_filter_predicates_are_independent() {
    let filter = PathFilter::new(["#recycle"], "@");

    assert!(filter.is_excluded_name("#recycle"));
    assert!(!filter.has_excluded_prefix("#recycle"));

    assert!(!filter.is_excluded_name("@eaDir"));
    assert!(filter.has_excluded_prefix("@eaDir"));
}

#[test]
fn test_config_serde_defaults() {
    let config: ScanConfig = serde_json::from_str(r#"{"root": "/volume1"}"#).unwrap();

    assert_eq!(config.threshold_years, 2);
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.sentinel_name, "@eaDir");
    assert_eq!(config.archive_suffix, ".hbk");
    assert_eq!(config, ScanConfig::new("/volume1"));
}

#[test]
fn test_session_counter_invariants() {
    let today = date(2026, 10, 18);
    let mut session = ScanSession::new("/volume1", today, 2).unwrap();

    let dates = [
        date(2019, 3, 1),
        date(2024, 10, 17),
        date(2024, 10, 18),
        date(2026, 10, 18),
        date(2022, 12, 31),
    ];
    for (i, d) in dates.iter().enumerate() {
        session.record(Path::new(&format!("/volume1/Host/b{i}")), *d);
    }

    assert_eq!(session.total_analyzed(), session.events().len() as u64);
    assert_eq!(
        session.total_obsolete(),
        session
            .events()
            .iter()
            .filter(|e| e.status == FolderStatus::Obsolete)
            .count() as u64
    );
    assert_eq!(session.total_obsolete(), 3);
    assert!(session.total_obsolete() <= session.total_analyzed());

    for event in session.events() {
        assert_eq!(
            event.status.is_obsolete(),
            event.last_modified < session.cutoff()
        );
    }
}

#[test]
fn test_cutoff_fixed_for_session() {
    let session = ScanSession::new("/volume1", date(2026, 10, 18), 3).unwrap();
    assert_eq!(session.scan_date(), date(2026, 10, 18));
    assert_eq!(session.cutoff(), cutoff_date(date(2026, 10, 18), 3).unwrap());
    assert_eq!(session.cutoff(), date(2023, 10, 18));
}

#[test]
fn test_warnings_kept_apart_from_events() {
    let mut session = ScanSession::new("/volume1", date(2026, 10, 18), 2).unwrap();
    session.enter_group("HostC", GroupKind::Parent);
    session.warn(ScanWarning::permission_denied("/volume1/HostC"));

    assert!(session.has_warnings());
    assert_eq!(session.warnings()[0].kind, WarningKind::PermissionDenied);
    assert!(session.events().is_empty());
    assert_eq!(session.total_analyzed(), 0);
    assert!(matches!(session.records()[0], ScanRecord::Group { .. }));
}

#[test]
fn test_session_serializes() {
    let mut session = ScanSession::new("/volume1", date(2026, 10, 18), 2).unwrap();
    session.record(Path::new("/volume1/Host/nas.hbk"), date(2020, 6, 1));

    let json = serde_json::to_string(&session).unwrap();
    assert!(json.contains("\"obsolete\""));
    assert!(json.contains("2020-06-01"));
}
