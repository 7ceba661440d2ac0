#![forbid(unsafe_code)]
use accueil::{MemberId, RecordIssue, Storage, TsvStorage};
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_loads_empty_roster() {
    let dir = tempdir().unwrap();
    let storage = TsvStorage::open(dir.path().join("HospitalityMembers.txt")).unwrap();
    let report = storage.load().unwrap();
    assert!(report.roster.is_empty());
    assert!(report.issues.is_empty());
}

#[test]
fn save_and_load_roundtrip_keeps_links_and_dates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.txt");
    fs::write(
        &path,
        "1\tAnn\tLee\t2\ttrue\t01/02/2021\n2\tBo\tKim\t\tfalse\t\n",
    )
    .unwrap();

    let storage = TsvStorage::open(&path).unwrap();
    let mut report = storage.load().unwrap();
    assert!(report.issues.is_empty());

    let bo = report.roster.find_by_id_mut(MemberId::new(2).unwrap()).unwrap();
    bo.last_scheduled = NaiveDate::from_ymd_opt(2024, 3, 15);
    storage.save(&report.roster).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "1\tAnn\tLee\t2\ttrue\t01/02/2021\n2\tBo\tKim\t\tfalse\t03/15/2024\n"
    );

    let again = storage.load().unwrap();
    let ann = again.roster.find_by_id(MemberId::new(1).unwrap()).unwrap();
    assert_eq!(ann.schedule_with, MemberId::new(2));
    assert!(ann.team_leader);
}

#[test]
fn unresolved_pairing_is_flagged_and_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.txt");
    fs::write(&path, "1\tAnn\tLee\t9\tfalse\t\n").unwrap();

    let report = TsvStorage::open(&path).unwrap().load().unwrap();
    let one = MemberId::new(1).unwrap();
    assert_eq!(
        report.issues,
        vec![RecordIssue::UnresolvedPairing {
            id: one,
            partner: MemberId::new(9).unwrap()
        }]
    );
    assert_eq!(report.roster.find_by_id(one).unwrap().schedule_with, None);
}
