//! Tests for building, scanning and validating scenario trees.
mod common;
use common::*;
use std::fs;
use std::path::PathBuf;
use tracesmith::error::ScenarioError;
use tracesmith::scenario::{ScenarioBuilder, ScenarioTree, scan};
use tracesmith::session::Denylist;

fn names(tree: &ScenarioTree, ids: &[tracesmith::scenario::NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tree.get(id).unwrap().name.clone())
        .collect()
}

#[test]
fn test_weights_are_attached_to_siblings() {
    let built = ScenarioBuilder::new().build(weighted_listing()).unwrap();
    let tree = &built.tree;

    let root = tree.top_level()[0];
    assert_eq!(tree.get(root).unwrap().name, "root");
    assert_eq!(tree.get(root).unwrap().weight, Some(1));
    assert_eq!(tree.get(tree.root()).unwrap().weight, None);

    let children = tree.get(root).unwrap().children().to_vec();
    assert_eq!(names(tree, &children), vec!["s1", "s2"]);
    let weights: Vec<Option<u32>> = children.iter().map(|&c| tree.get(c).unwrap().weight).collect();
    assert_eq!(weights, vec![Some(1), Some(3)]);
    assert!(built.skipped.is_empty());
}

#[test]
fn test_top_level_weight_only_applies_to_its_own_path() {
    let mut listing = listing(vec![
        trace("x/a.har", &["https://example.com/x"]),
        trace("y/a.har", &["https://example.com/y"]),
    ]);
    listing.weights.push(weight("x/a.weight", "3"));
    let built = ScenarioBuilder::new().build(listing).unwrap();

    let weights: Vec<Option<u32>> = built
        .tree
        .top_level()
        .iter()
        .map(|&id| built.tree.get(id).unwrap().weight)
        .collect();
    assert_eq!(weights, vec![Some(3), Some(1)]);
}

#[test]
fn test_top_level_weight_for_a_namesake_elsewhere_is_dangling() {
    let mut listing = listing(vec![trace("y/a.har", &["https://example.com/y"])]);
    listing.weights.push(weight("x/a.weight", "3"));
    match ScenarioBuilder::new().build(listing).unwrap_err() {
        ScenarioError::DanglingWeight { names, .. } => {
            assert_eq!(names, vec!["x/a.weight".to_string()]);
        }
        other => panic!("Expected DanglingWeight error, got {:?}", other),
    }
}

#[test]
fn test_scan_keeps_top_level_weights_with_their_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let (x, y) = (dir.path().join("x"), dir.path().join("y"));
    fs::create_dir(&x).unwrap();
    fs::create_dir(&y).unwrap();
    let xa = write_har(&x, "a.har", &["https://example.com/x"]);
    let ya = write_har(&y, "a.har", &["https://example.com/y"]);
    fs::write(x.join("a.weight"), "4").unwrap();

    let scanned = scan(&[&xa, &ya]).unwrap();
    let built = ScenarioBuilder::new().build(scanned.listing).unwrap();
    let weights: Vec<Option<u32>> = built
        .tree
        .top_level()
        .iter()
        .map(|&id| built.tree.get(id).unwrap().weight)
        .collect();
    assert_eq!(weights, vec![Some(4), Some(1)]);
}

#[test]
fn test_collision_is_detected_at_top_level() {
    let listing = listing(vec![
        trace("checkout", &["https://example.com/"]),
        trace("checkout", &["https://example.com/"]),
    ]);
    let err = ScenarioBuilder::new().build(listing).unwrap_err();
    assert!(matches!(err, ScenarioError::Collision { .. }), "{:?}", err);
}

#[test]
fn test_collision_is_detected_deep_in_the_tree() {
    let listing = listing(vec![group(
        "root",
        vec![group(
            "root/sub",
            vec![
                trace("root/sub/login.har", &["https://example.com/"]),
                trace("root/sub/login.json", &["https://example.com/"]),
            ],
            vec![],
        )],
        vec![],
    )]);
    match ScenarioBuilder::new().build(listing).unwrap_err() {
        ScenarioError::Collision { path, groups } => {
            assert_eq!(path, PathBuf::from("root/sub"));
            assert_eq!(groups.len(), 1);
            assert!(groups[0].contains("login.har") && groups[0].contains("login.json"));
        }
        other => panic!("Expected Collision error, got {:?}", other),
    }
}

#[test]
fn test_dangling_weight_is_fatal() {
    let listing = listing(vec![group(
        "root",
        vec![trace("root/s1.har", &["https://example.com/"])],
        vec![weight("root/s3.weight", "2")],
    )]);
    match ScenarioBuilder::new().build(listing).unwrap_err() {
        ScenarioError::DanglingWeight { path, names } => {
            assert_eq!(path, PathBuf::from("root"));
            assert_eq!(names, vec!["root/s3.weight".to_string()]);
        }
        other => panic!("Expected DanglingWeight error, got {:?}", other),
    }
}

#[test]
fn test_invalid_weight_value_is_fatal() {
    for content in ["0", "-2", "two", "1.5", ""] {
        let listing = listing(vec![group(
            "root",
            vec![trace("root/s1.har", &["https://example.com/"])],
            vec![weight("root/s1.weight", content)],
        )]);
        let err = ScenarioBuilder::new().build(listing).unwrap_err();
        assert!(
            matches!(err, ScenarioError::WeightValue { .. }),
            "{:?} gave {:?}",
            content,
            err
        );
    }
}

#[test]
fn test_denylist_drops_matching_requests() {
    let listing = listing(vec![trace(
        "session",
        &["https://www.google.com", "https://example.com"],
    )]);
    let built = ScenarioBuilder::new()
        .with_denylist(Denylist::parse("google\n"))
        .build(listing)
        .unwrap();
    let leaf = built.tree.top_level()[0];
    let targets: Vec<&str> = built
        .tree
        .get(leaf)
        .unwrap()
        .tasks()
        .iter()
        .map(|t| t.request().target())
        .collect();
    assert_eq!(targets, vec!["https://example.com/"]);
}

#[test]
fn test_fully_denylisted_leaf_is_kept_and_reported() {
    let listing = listing(vec![group(
        "root",
        vec![
            trace("root/ads.har", &["https://ads.google.com/x"]),
            trace("root/shop.har", &["https://example.com/"]),
        ],
        vec![],
    )]);
    let built = ScenarioBuilder::new()
        .with_denylist(Denylist::from_patterns(["google"]))
        .build(listing)
        .unwrap();

    let root = built.tree.top_level()[0];
    let children = built.tree.get(root).unwrap().children().to_vec();
    assert_eq!(names(&built.tree, &children), vec!["ads", "shop"]);
    assert!(built.tree.get(children[0]).unwrap().tasks().is_empty());

    assert_eq!(built.skipped.len(), 1);
    assert_eq!(built.skipped[0].path, PathBuf::from("root/ads.har"));
}

#[test]
fn test_empty_group_is_skipped_but_fatal_at_top_level() {
    let nested = listing(vec![group(
        "root",
        vec![
            group("root/empty", vec![], vec![]),
            trace("root/s1.har", &["https://example.com/"]),
        ],
        vec![],
    )]);
    let built = ScenarioBuilder::new().build(nested).unwrap();
    assert_eq!(built.skipped.len(), 1);
    assert_eq!(built.skipped[0].path, PathBuf::from("root/empty"));

    let top = listing(vec![group("empty", vec![], vec![])]);
    let err = ScenarioBuilder::new().build(top).unwrap_err();
    assert!(matches!(err, ScenarioError::Skippable(_)), "{:?}", err);
}

#[test]
fn test_scan_reads_traces_and_weights() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("shop");
    fs::create_dir(&root).unwrap();
    write_har(&root, "browse.har", &["https://example.com/", "https://example.com/items"]);
    write_har(&root, "buy.har", &["https://example.com/cart"]);
    fs::write(root.join("buy.weight"), " 3 \n").unwrap();
    fs::write(root.join("notes.txt"), "not a trace").unwrap();

    let scanned = scan(&[&root]).unwrap();
    assert_eq!(scanned.skipped.len(), 1);
    assert_eq!(scanned.skipped[0].path, root.join("notes.txt"));

    let built = ScenarioBuilder::new().build(scanned.listing).unwrap();
    let top = built.tree.top_level()[0];
    let children = built.tree.get(top).unwrap().children().to_vec();
    assert_eq!(names(&built.tree, &children), vec!["browse", "buy"]);
    assert_eq!(built.tree.get(children[0]).unwrap().tasks().len(), 2);
    assert_eq!(built.tree.get(children[1]).unwrap().weight, Some(3));
}

#[test]
fn test_scan_reports_dangling_weight_files() {
    let dir = tempfile::tempdir().unwrap();
    write_har(dir.path(), "s1.har", &["https://example.com/"]);
    fs::write(dir.path().join("s3.weight"), "2").unwrap();

    let scanned = scan(&[dir.path()]).unwrap();
    let err = ScenarioBuilder::new().build(scanned.listing).unwrap_err();
    assert!(matches!(err, ScenarioError::DanglingWeight { .. }), "{:?}", err);
}

#[test]
fn test_scan_fails_on_missing_top_level_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan(&[dir.path().join("missing.har")]).unwrap_err();
    assert!(matches!(err, ScenarioError::Skippable(_)), "{:?}", err);
}

#[test]
fn test_scan_rejects_traces_with_unsupported_methods() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.har");
    fs::write(
        &path,
        r#"{"log":{"entries":[{"startedDateTime":"2018-01-01T00:00:00Z",
            "request":{"method":"PATCH","url":"https://example.com/"}}]}}"#,
    )
    .unwrap();
    let err = scan(&[&path]).unwrap_err();
    assert!(matches!(err, ScenarioError::Trace { .. }), "{:?}", err);
}
