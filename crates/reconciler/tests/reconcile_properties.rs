//! End-to-end properties of a reconciliation run over report-shaped input.

use std::collections::HashSet;

use adlens_core::types::{ActiveGroup, CreativeRecord};
use adlens_reconciler::{MatchStrategy, Reconciler};
use serde_json::json;

fn groups(value: serde_json::Value) -> Vec<ActiveGroup> {
    serde_json::from_value(value).unwrap()
}

fn pool(value: serde_json::Value) -> Vec<CreativeRecord> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn one_result_per_spending_group() {
    let groups = groups(json!([
        {"adset_id": "1", "adset_name": "a", "spend": 10},
        {"adset_id": "2", "adset_name": "b", "spend": 0},
        {"adset_id": "3", "adset_name": "c", "spend": 5.5},
        {"adset_id": "4", "adset_name": "d", "spend": -1}
    ]));
    let output = Reconciler::default().reconcile(&groups, &[]).unwrap();

    assert_eq!(output.results.len(), 2);
    assert!(output.results.iter().all(|r| r.group_id != "2" && r.group_id != "4"));
    assert_eq!(output.summary.unmatched, 2);
}

#[test]
fn exact_id_takes_priority() {
    let groups = groups(json!([{"id": "A123456789012", "name": "X", "spend": 100}]));
    let pool = pool(json!([
        {"id": "A123456789012_other", "name": "X", "body": "richer"},
        {"id": "A123456789012", "name": "Y"}
    ]));
    let output = Reconciler::default().reconcile(&groups, &pool).unwrap();

    assert_eq!(
        output.results[0].matched_creative_id.as_deref(),
        Some("A123456789012")
    );
    assert_eq!(output.results[0].matched_by, Some(MatchStrategy::ExactId));
}

#[test]
fn prefix_match_on_shared_leading_id() {
    let groups = groups(json!([{"id": "A123456789012_extra", "name": "X", "spend": 100}]));
    let pool = pool(json!([{"id": "A123456789012_other", "name": "Y"}]));
    let output = Reconciler::default().reconcile(&groups, &pool).unwrap();

    let result = &output.results[0];
    assert_eq!(result.matched_creative_id.as_deref(), Some("A123456789012_other"));
    assert_eq!(result.matched_by, Some(MatchStrategy::IdPrefix));
    assert_eq!(result.ad_id, "A123456789012_other");
    assert_eq!(result.group_id, "A123456789012_extra");
}

#[test]
fn no_creative_is_claimed_twice() {
    let groups = groups(json!([
        {"adset_id": "120200000000_1", "adset_name": "芳香磚_spring_a", "spend": 300},
        {"adset_id": "120200000000_2", "adset_name": "芳香磚_spring_b", "spend": 200},
        {"adset_id": "120200000000_3", "adset_name": "芳香磚 retarget", "spend": 100}
    ]));
    let pool = pool(json!([
        {"ad_id": "120200000000_9", "ad_name": "芳香磚_spring_main", "body": "copy"}
    ]));
    let output = Reconciler::default().reconcile(&groups, &pool).unwrap();

    let claimed: Vec<_> = output
        .results
        .iter()
        .filter_map(|r| r.matched_creative_id.clone())
        .collect();
    let unique: HashSet<_> = claimed.iter().collect();
    assert_eq!(claimed.len(), unique.len());
    assert_eq!(output.summary.matched, 1);
    assert_eq!(output.summary.unmatched, 2);
}

#[test]
fn media_capped_at_carousel_limit() {
    let items: Vec<_> = (0..10)
        .map(|i| json!({"image_url": format!("https://cdn.example.com/{i}.jpg")}))
        .collect();
    let groups = groups(json!([{"id": "G1", "name": "n", "spend": 1}]));
    let pool = pool(json!([{"id": "G1", "name": "n", "media_items": items}]));
    let output = Reconciler::default().reconcile(&groups, &pool).unwrap();

    assert_eq!(output.results[0].media_refs_resolved.len(), 7);
    assert_eq!(output.results[0].media_found, 10);
}

#[test]
fn fallback_image_used_without_media_items() {
    let groups = groups(json!([{"id": "G1", "name": "n", "spend": 1}]));
    let pool = pool(json!([
        {"id": "G1", "name": "n", "fallback_image_url": "https://cdn.example.com/main.jpg", "title": "Headline"}
    ]));
    let output = Reconciler::default().reconcile(&groups, &pool).unwrap();

    assert_eq!(
        output.results[0].media_refs_resolved,
        vec!["https://cdn.example.com/main.jpg".to_string()]
    );
    assert_eq!(output.results[0].copy_text, "Headline");
}

#[test]
fn ordered_by_descending_spend() {
    let groups = groups(json!([
        {"id": "a", "name": "a", "spend": 50},
        {"id": "b", "name": "b", "spend": 200},
        {"id": "c", "name": "c", "spend": 10}
    ]));
    let output = Reconciler::default().reconcile(&groups, &[]).unwrap();
    let spends: Vec<f64> = output.results.iter().map(|r| r.metrics.spend).collect();
    assert_eq!(spends, vec![200.0, 50.0, 10.0]);
}

#[test]
fn repeated_runs_are_identical() {
    let groups = groups(json!([
        {"adset_id": "120200000000_1", "adset_name": "LM_a", "spend": 30, "impressions": 1000, "ctr": 2.0, "purchases": 2},
        {"adset_id": "X", "adset_name": "LM other", "spend": 20}
    ]));
    let pool = pool(json!([
        {"ad_id": "120200000000_7", "ad_name": "LM_a_carousel", "carousel_images": ["https://cdn.example.com/1.jpg"]},
        {"ad_id": "9", "ad_name": "LM fallback"}
    ]));
    let reconciler = Reconciler::default();

    let first = reconciler.reconcile(&groups, &pool).unwrap();
    let second = reconciler.reconcile(&groups, &pool).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.results[0].metrics.clicks, 20);
    assert_eq!(first.results[0].metrics.cvr, 10.0);
    assert_eq!(first.results[1].matched_by, Some(MatchStrategy::Keyword));
}

#[test]
fn empty_input_yields_empty_output() {
    let output = Reconciler::default().reconcile(&[], &[]).unwrap();
    assert!(output.results.is_empty());
    assert_eq!(output.summary.total, 0);
}

#[test]
fn null_fields_in_pool_still_match() {
    let groups = groups(json!([{"adset_id": "C1", "adset_name": "x", "spend": 10}]));
    let pool = pool(json!([
        {"id": "C1", "name": null, "media_items": null, "resolved_media_urls": null,
         "image_url": "https://cdn.example.com/main.jpg"}
    ]));
    let output = Reconciler::default().reconcile(&groups, &pool).unwrap();

    let result = &output.results[0];
    assert_eq!(result.matched_by, Some(MatchStrategy::ExactId));
    assert_eq!(result.ad_name, "x");
    assert_eq!(result.media_refs_resolved, vec!["https://cdn.example.com/main.jpg"]);
}
