//! Save/load behaviour of whole documents.

use proptest::prelude::*;
use rewind_core::{CopyId, Rules, TimelineError, Vec3};
use rewind_sim::{resolve_all, LogView, Resolutions};
use rewind_store::{
    compare_replays, load, load_from_path, load_with_rules, save, save_to_path, timeline_hash,
    StoreError,
};
use rewind_test_utils::fixtures::{head_on, patrol, push_neighbour};

fn encoded(rules: &Rules, timeline: &rewind_core::Timeline) -> Vec<u8> {
    let mut buf = Vec::new();
    save(&mut buf, rules, timeline).unwrap();
    buf
}

#[test]
fn load_recomputes_identical_replay() {
    let (rules, tl) = push_neighbour();
    let doc = load(encoded(&rules, &tl).as_slice()).unwrap();
    assert_eq!(timeline_hash(&doc.timeline), timeline_hash(&tl));

    let mut before = Resolutions::new();
    resolve_all(&rules, &tl, &mut before);
    let mut after = Resolutions::new();
    resolve_all(&doc.rules, &doc.timeline, &mut after);
    assert_eq!(before, after);
    assert!(compare_replays(
        LogView::new(&rules, &tl, &before),
        LogView::new(&doc.rules, &doc.timeline, &after),
        0..101,
        &[CopyId(0), CopyId(1)],
    )
    .is_none());
}

#[test]
fn load_with_other_rules_is_rejected() {
    let (rules, tl) = head_on();
    let other = Rules {
        flashback_zone: 3,
        ..rules.clone()
    };
    let bytes = encoded(&rules, &tl);
    assert!(load_with_rules(bytes.as_slice(), &rules).is_ok());
    assert!(matches!(
        load_with_rules(bytes.as_slice(), &other),
        Err(StoreError::RulesMismatch { .. })
    ));
}

#[test]
fn invalid_timeline_is_rejected() {
    let (rules, mut tl) = head_on();
    tl.cursors_mut().action_points_left = 7;
    let err = load(encoded(&rules, &tl).as_slice()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidTimeline(TimelineError::BudgetMismatch { found: 7, .. })
    ));
}

#[test]
fn invalid_rules_are_rejected() {
    let (_, tl) = head_on();
    let bad = Rules {
        ap_per_turn: 95,
        ..Rules::default()
    };
    assert!(matches!(
        load(encoded(&bad, &tl).as_slice()),
        Err(StoreError::InvalidRules(_))
    ));
}

#[test]
fn trailing_bytes_are_rejected() {
    let (rules, tl) = head_on();
    let mut bytes = encoded(&rules, &tl);
    bytes.push(0);
    assert!(matches!(
        load(bytes.as_slice()),
        Err(StoreError::MalformedRecord { .. })
    ));
}

#[test]
fn file_round_trip_creates_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debug").join("timeline.rwnd");
    let (rules, tl) = patrol(3, 2);
    save_to_path(&path, &rules, &tl).unwrap();
    let doc = load_from_path(&path).unwrap();
    assert_eq!(doc.rules, rules);
    assert_eq!(doc.timeline, tl);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_from_path(dir.path().join("absent.rwnd")),
        Err(StoreError::Io(_))
    ));
}

proptest! {
    #[test]
    fn truncated_documents_never_load(cut in 0usize..10_000) {
        let (rules, tl) = patrol(2, 2);
        let bytes = encoded(&rules, &tl);
        let cut = cut % bytes.len();
        prop_assert!(load(&bytes[..cut]).is_err());
    }

    #[test]
    fn spawn_positions_survive(x in -50i32..50, y in -50i32..50) {
        let rules = Rules::default();
        let origin = Vec3::new(x as f32 * 10.0, y as f32 * 10.0, 0.0);
        let tl = rewind_core::Timeline::new(&rules, origin);
        let doc = load(encoded(&rules, &tl).as_slice()).unwrap();
        prop_assert_eq!(doc.timeline.spawn_position(CopyId(0)), Some(origin));
    }
}
