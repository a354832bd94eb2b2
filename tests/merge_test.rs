use conx::json::{JsonNode, load_connection};
use conx::{Connection, into_nodes, merge_append, merge_prepend, remove_node};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> Connection<JsonNode> {
    load_connection(fixture(name), "id")
        .expect("Failed to load fixture")
        .expect("Fixture should not be null")
}

#[test]
fn test_scroll_through_overlapping_pages() {
    let first = load("users_page1.json");
    let second = load("users_page2.json");

    let merged = merge_append(first.clone(), Some(second.clone()));

    assert_eq!(merged.node_ids(), vec!["u1", "u2", "u3", "u4", "u5"]);
    assert_eq!(merged.page_info, second.page_info);
    assert!(!merged.page_info.has_next_page);

    // Prior nodes keep their relative order
    let prior: Vec<&str> = merged
        .node_ids()
        .into_iter()
        .filter(|id| first.contains(id))
        .collect();
    assert_eq!(prior, first.node_ids());
}

#[test]
fn test_refetching_same_page_does_not_grow() {
    let first = load("users_page1.json");
    let second = load("users_page2.json");

    let once = merge_append(first, Some(second.clone()));
    let twice = merge_append(once.clone(), Some(second));

    assert_eq!(twice.node_ids(), once.node_ids());
    assert_eq!(twice.page_info, once.page_info);
}

#[test]
fn test_partial_response_is_normalized() {
    let partial = load("users_partial.json");

    assert_eq!(partial.node_ids(), vec!["u6"]);
    assert_eq!(partial.page_info.end_cursor, None);
    assert!(!partial.page_info.has_next_page);

    let merged = merge_append(load("users_page1.json"), Some(partial));
    assert_eq!(merged.node_ids(), vec!["u1", "u2", "u3", "u6"]);
}

#[test]
fn test_null_incoming_file_keeps_previous() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let null_page = temp_dir.path().join("null.json");
    fs::write(&null_page, "null").expect("Failed to write fixture");

    let incoming = load_connection(&null_page, "id").expect("Failed to load null page");
    assert!(incoming.is_none());

    let previous = load("users_page1.json");
    assert_eq!(merge_append(previous.clone(), incoming), previous);
}

#[test]
fn test_created_node_moves_to_front() {
    let previous = load("users_page1.json");
    let created = load("user_created.json");

    let merged = merge_prepend(previous.clone(), Some(created));

    assert_eq!(merged.node_ids(), vec!["u2", "u1", "u3"]);
    assert_eq!(merged.edges[0].node.value()["email"], "robert@example.com");
    assert_eq!(merged.page_info, previous.page_info);
}

#[test]
fn test_remove_then_flatten() {
    let merged = merge_append(load("users_page1.json"), Some(load("users_page2.json")));
    let removed = remove_node(merged, "u3");

    assert!(!removed.contains("u3"));
    assert_eq!(removed.len(), 4);

    let nodes = into_nodes(removed);
    let names: Vec<&str> = nodes
        .iter()
        .filter_map(|n| n.value()["name"].as_str())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "dave", "erin"]);
}

#[test]
fn test_merged_output_round_trips_through_json() {
    let merged = merge_append(load("users_page1.json"), Some(load("users_page2.json")));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let out = temp_dir.path().join("merged.json");
    fs::write(&out, serde_json::to_string_pretty(&merged).unwrap()).unwrap();

    let reloaded = load_connection(&out, "id").unwrap().unwrap();
    assert_eq!(reloaded, merged);

    let ids: HashSet<&str> = reloaded.node_ids().into_iter().collect();
    assert_eq!(ids.len(), reloaded.len());
}

#[test]
fn test_custom_id_field() {
    let by_email = load_connection(fixture("users_page1.json"), "email")
        .unwrap()
        .unwrap();
    assert_eq!(
        by_email.node_ids(),
        vec!["alice@example.com", "bob@example.com", "carol@example.com"]
    );
}
