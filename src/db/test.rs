use crate::data::{Day, Month, WorkSession, YearStore};
use crate::db::{StoreErr, YearFile};
use crate::parsing::duration::DurationMin;
use crate::parsing::time::Time;

use rand::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

struct TmpFile(PathBuf, TempDir);

impl TmpFile {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2022.json");
        TmpFile(path, dir)
    }

    fn path(&self) -> &std::path::Path {
        &self.0
    }
}

#[test]
fn create_writes_empty_year() {
    let file = TmpFile::new();
    let created = YearFile::create(file.path(), 2022).unwrap();
    assert_eq!(created.year(), 2022);
    assert_eq!(created.session_count(), 0);

    let loaded = YearFile::load(file.path()).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_invalid_year() {
    let file = TmpFile::new();
    assert!(matches!(
        YearFile::create(file.path(), 0),
        Err(StoreErr::InvalidYear(0))
    ));
    assert!(matches!(
        YearFile::create(file.path(), -3),
        Err(StoreErr::InvalidYear(-3))
    ));
}

#[test]
fn load_missing_file_fails() {
    let file = TmpFile::new();
    assert!(matches!(
        YearFile::load(file.path()),
        Err(StoreErr::CannotOpen(_, _))
    ));
}

#[test]
fn load_malformed_json_fails() {
    let file = TmpFile::new();
    std::fs::write(file.path(), b"{\"year\": 2022, \"months\": [1, 2]}").unwrap();
    assert!(matches!(
        YearFile::load(file.path()),
        Err(StoreErr::InvalidFile(_, _))
    ));

    std::fs::write(file.path(), b"not json at all").unwrap();
    assert!(matches!(
        YearFile::load(file.path()),
        Err(StoreErr::InvalidFile(_, _))
    ));
}

#[test]
fn load_fills_missing_months() {
    let file = TmpFile::new();
    std::fs::write(
        file.path(),
        br#"{"year": 2022, "months": {"3": [{"begin_date": "2022-03-01", "begin_time": "08:00", "duration": 60, "description": "x"}]}}"#,
    )
    .unwrap();

    let loaded = YearFile::load(file.path()).unwrap();
    assert_eq!(loaded.months().count(), 12);
    assert_eq!(loaded.month(Month::new(3).unwrap()).len(), 1);
    assert_eq!(loaded.session_count(), 1);
}

#[test]
fn random_store_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5717);
    let mut store = YearStore::new(2022);

    for month in Month::all() {
        let sessions = rng.gen_range(0..8);
        for _ in 0..sessions {
            store.month_mut(month).push(random_session(&mut rng, month));
        }
    }

    let file = TmpFile::new();
    YearFile::save(file.path(), &store).unwrap();
    let loaded = YearFile::load(file.path()).unwrap();
    assert_eq!(loaded, store);
}

fn random_session(rng: &mut StdRng, month: Month) -> WorkSession {
    WorkSession {
        begin_date: Day::ymd(2022, month.number(), rng.gen_range(1..=28)),
        begin_time: Time::hm(rng.gen_range(0..24), rng.gen_range(0..60)),
        duration: DurationMin::new(rng.gen_range(0..600)),
        description: format!("task {}", rng.gen_range(0..1000)),
        hourly_wage: rng.gen_range(0..500),
    }
}
