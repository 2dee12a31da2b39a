use backwatch_scan::{
    BackupScanner, FolderStatus, ScanConfig, ScanRecord, ScanSession, WarningKind,
};
use chrono::{Local, NaiveDate, TimeZone};
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Set a directory's mtime to noon (local time) on the given date.
fn set_date(path: &Path, day: NaiveDate) {
    let noon = Local
        .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
        .single()
        .unwrap();
    set_file_mtime(path, FileTime::from_system_time(SystemTime::from(noon))).unwrap();
}

fn scan(root: &Path, max_depth: u32, today: NaiveDate) -> ScanSession {
    let config = ScanConfig::builder()
        .root(root)
        .max_depth(max_depth)
        .build()
        .unwrap();
    BackupScanner::new(config).unwrap().scan_as_of(today).unwrap()
}

fn names(session: &ScanSession) -> Vec<String> {
    session
        .events()
        .iter()
        .map(|e| e.folder_name.to_string())
        .collect()
}

#[test]
fn test_host_without_sentinel_is_ignored() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostA/Set1/backup.hbk")).unwrap();
    fs::create_dir_all(root.join("HostA/Data/sub1")).unwrap();

    let session = scan(root, 3, date(2026, 10, 18));

    assert_eq!(session.total_analyzed(), 0);
    assert!(session.events().is_empty());
}

#[test]
fn test_nested_archive_classified_once() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostB/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostB/Set1/backup.hbk/chunks")).unwrap();

    let session = scan(root, 3, date(2026, 10, 18));

    assert_eq!(names(&session), vec!["backup.hbk"]);
    assert_eq!(session.total_analyzed(), 1);
}

#[test]
fn test_archive_under_nested_sentinel_classified_once() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostB/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostB/Set1/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostB/Set1/backup.hbk")).unwrap();
    set_date(&root.join("HostB/Set1/backup.hbk"), date(2020, 3, 1));

    let session = scan(root, 3, date(2026, 10, 18));

    assert_eq!(session.total_analyzed(), 1);
    assert_eq!(session.total_obsolete(), 1);
    assert_eq!(names(&session), vec!["backup.hbk"]);
    assert_eq!(session.events()[0].path, root.join("HostB/Set1/backup.hbk"));
}

#[test]
fn test_archive_suffix_group_classified_directly() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostB/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostB/nas01.hbk/Pool/0")).unwrap();
    fs::create_dir_all(root.join("HostB/nas01.hbk/Config")).unwrap();

    let session = scan(root, 3, date(2026, 10, 18));

    // The archive is one unit; its contents are never classified.
    assert_eq!(names(&session), vec!["nas01.hbk"]);
}

#[test]
fn test_parent_group_children_classified_independently() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostC/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostC/Data/sub1")).unwrap();
    fs::create_dir_all(root.join("HostC/Data/sub2")).unwrap();

    set_date(&root.join("HostC/Data/sub1"), date(2020, 1, 15));
    set_date(&root.join("HostC/Data/sub2"), date(2026, 9, 1));

    let session = scan(root, 3, date(2026, 10, 18));

    assert_eq!(names(&session), vec!["sub1", "sub2"]);
    assert_eq!(session.events()[0].status, FolderStatus::Obsolete);
    assert_eq!(session.events()[1].status, FolderStatus::Valid);
    assert!(!session.events().iter().any(|e| e.folder_name.as_str() == "Data"));
    assert_eq!(session.total_obsolete(), 1);
    assert_eq!(session.total_valid(), 1);
}

#[test]
fn test_cutoff_boundary() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let today = date(2026, 10, 18);
    fs::create_dir_all(root.join("HostD/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostD/Sets/day_before")).unwrap();
    fs::create_dir_all(root.join("HostD/Sets/on_cutoff")).unwrap();
    fs::create_dir_all(root.join("HostD/Sets/day_after")).unwrap();

    set_date(&root.join("HostD/Sets/day_before"), date(2024, 10, 17));
    set_date(&root.join("HostD/Sets/on_cutoff"), date(2024, 10, 18));
    set_date(&root.join("HostD/Sets/day_after"), date(2024, 10, 19));

    let session = scan(root, 3, today);
    assert_eq!(session.cutoff(), date(2024, 10, 18));

    let status = |name: &str| {
        session
            .events()
            .iter()
            .find(|e| e.folder_name.as_str() == name)
            .map(|e| e.status)
            .unwrap()
    };
    assert_eq!(status("day_before"), FolderStatus::Obsolete);
    assert_eq!(status("on_cutoff"), FolderStatus::Valid);
    assert_eq!(status("day_after"), FolderStatus::Valid);

    let on_cutoff = session
        .events()
        .iter()
        .find(|e| e.folder_name.as_str() == "on_cutoff")
        .unwrap();
    assert_eq!(on_cutoff.last_modified, date(2024, 10, 18));
}

#[test]
fn test_excluded_entries_never_classified() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostE/@eaDir/SYNO@.fileindexdb")).unwrap();
    fs::create_dir_all(root.join("HostE/#recycle/old.hbk")).unwrap();
    fs::create_dir_all(root.join("HostE/#snapshot/GMT+01")).unwrap();
    fs::create_dir_all(root.join("HostE/ActiveBackupforBusiness/Task")).unwrap();
    fs::create_dir_all(root.join("HostE/@Recently-Snapshot/x.hbk")).unwrap();
    fs::create_dir_all(root.join("HostE/Data/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostE/Data/#recycle")).unwrap();
    fs::create_dir_all(root.join("HostE/Data/keep")).unwrap();

    let session = scan(root, 3, date(2026, 10, 18));

    assert_eq!(names(&session), vec!["keep"]);
}

#[test]
fn test_depth_limit() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    // Sentinel root at depth 2 is processed with max_depth 2.
    fs::create_dir_all(root.join("a/b/@eaDir")).unwrap();
    fs::create_dir_all(root.join("a/b/shallow.hbk")).unwrap();
    // Sentinel root at depth 3 is beyond reach.
    fs::create_dir_all(root.join("x/y/z/@eaDir")).unwrap();
    fs::create_dir_all(root.join("x/y/z/deep.hbk")).unwrap();

    let session = scan(root, 2, date(2026, 10, 18));
    assert_eq!(names(&session), vec!["shallow.hbk"]);

    let session = scan(root, 3, date(2026, 10, 18));
    let mut found = names(&session);
    found.sort();
    assert_eq!(found, vec!["deep.hbk", "shallow.hbk"]);
}

#[test]
fn test_records_mark_roots_and_groups() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostB/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostB/nas01.hbk")).unwrap();
    fs::create_dir_all(root.join("HostB/Set1/s1")).unwrap();

    let session = scan(root, 1, date(2026, 10, 18));
    let records = session.records();

    assert!(matches!(records[0], ScanRecord::Root { .. }));
    assert!(matches!(records[1], ScanRecord::Group { .. }));
    assert!(matches!(records[2], ScanRecord::Classified { index: 0 }));
    assert!(matches!(records[3], ScanRecord::Group { .. }));
    assert!(matches!(records[4], ScanRecord::Classified { index: 1 }));
    assert_eq!(records.len(), 5);
}

#[test]
fn test_counters_match_events() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let today = date(2026, 10, 18);
    fs::create_dir_all(root.join("Site/@eaDir")).unwrap();
    for (i, year) in [2018, 2021, 2023, 2025, 2026].iter().enumerate() {
        let path = root.join(format!("Site/Sets/set{i}"));
        fs::create_dir_all(&path).unwrap();
        set_date(&path, date(*year, 6, 1));
    }

    let session = scan(root, 3, today);

    assert_eq!(session.total_analyzed(), session.events().len() as u64);
    assert_eq!(
        session.total_obsolete(),
        session.obsolete_events().count() as u64
    );
    assert_eq!(session.total_obsolete(), 3);
    assert_eq!(session.total_valid(), 2);
}

#[cfg(unix)]
#[test]
fn test_permission_error_does_not_stop_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("HostF/@eaDir")).unwrap();
    fs::create_dir_all(root.join("HostF/Locked/hidden")).unwrap();
    fs::create_dir_all(root.join("HostF/Open/visible")).unwrap();
    fs::create_dir_all(root.join("Other/@eaDir")).unwrap();
    fs::create_dir_all(root.join("Other/far.hbk")).unwrap();

    let locked = root.join("HostF/Locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users bypass permission bits; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let session = scan(root, 3, date(2026, 10, 18));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let mut found = names(&session);
    found.sort();
    assert_eq!(found, vec!["far.hbk", "visible"]);
    assert_eq!(session.total_analyzed(), 2);
    assert!(
        session
            .warnings()
            .iter()
            .any(|w| w.path == locked && w.kind == WarningKind::PermissionDenied)
    );
}
