use pretty_assertions::assert_eq;
use repo_stats::error::StatsError;
use repo_stats::model::{CommitSummary, FileRecord, PullRequest, RankEntry};
use repo_stats::stats::{top_n, IgnoreRules, Stats};
use std::collections::{BTreeMap, HashMap};

fn prs(json: &str) -> Vec<PullRequest> {
    serde_json::from_str(json).unwrap()
}

fn commits(names: &[&str]) -> Vec<CommitSummary> {
    let items: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                r#"{{"sha":"s{i}","url":"https://api.test/c/{i}","commit":{{"committer":{{"name":"{name}"}}}},"parents":[{{"sha":"p"}}]}}"#
            )
        })
        .collect();
    serde_json::from_str(&format!("[{}]", items.join(","))).unwrap()
}

fn table(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn entry(name: &str, count: u64) -> RankEntry {
    RankEntry {
        name: name.to_string(),
        count,
    }
}

#[test]
fn pr_attribution_counts_per_login() {
    let mut stats = Stats::new("o", "r", IgnoreRules::default());
    stats.set_prs(&prs(
        r#"[{"user":{"login":"alice"}},{"user":{"login":"bob"}},{"user":{"login":"alice"}}]"#,
    ));

    assert_eq!(stats.pr_attribution(), &table(&[("alice", 2), ("bob", 1)]));
    assert_eq!(stats.top_prs(1), vec![entry("alice", 2)]);
    assert_eq!(stats.num_prs(), 3);
}

#[test]
fn pr_attribution_skips_bots() {
    let mut stats = Stats::new("o", "r", IgnoreRules::default()).with_bot_logins(["ci-helper"]);
    stats.set_prs(&prs(
        r#"[
            {"user":{"login":"alice"}},
            {"user":{"login":"dependabot[bot]","type":"Bot"}},
            {"user":{"login":"renovate","type":"Bot"}},
            {"user":{"login":"ci-helper","type":"User"}},
            {"user":null}
        ]"#,
    ));

    assert_eq!(stats.pr_attribution(), &table(&[("alice", 1)]));
    assert_eq!(stats.num_prs(), 5);
}

#[test]
fn automated_merge_committer_is_not_attributed() {
    let mut stats = Stats::new("o", "r", IgnoreRules::default());
    stats.set_prs(&[]);
    stats
        .set_commits(&commits(&["Alice", "GitHub", "Bob", "Alice"]))
        .unwrap();

    assert_eq!(stats.commit_attribution(), &table(&[("Alice", 2), ("Bob", 1)]));
    assert_eq!(stats.num_commits(), 4);
}

#[test]
fn phases_must_run_in_order() {
    let mut stats = Stats::new("o", "r", IgnoreRules::default());

    let err = stats.set_commits(&commits(&["Alice"])).unwrap_err();
    assert!(matches!(err, StatsError::OutOfOrder { .. }));

    stats.set_prs(&[]);
    let err = stats.set_file_sizes(&table(&[("a.rs", 1)])).unwrap_err();
    assert!(matches!(err, StatsError::OutOfOrder { .. }));

    stats.set_commits(&commits(&["Alice"])).unwrap();
    stats.set_file_sizes(&table(&[("a.rs", 1)])).unwrap();
}

#[test]
fn replaying_a_phase_is_idempotent() {
    let mut stats = Stats::new("o", "r", IgnoreRules::default());
    let list = prs(r#"[{"user":{"login":"alice"}},{"user":{"login":"bob"}}]"#);
    stats.set_prs(&list);
    stats.set_prs(&list);
    assert_eq!(stats.pr_attribution(), &table(&[("alice", 1), ("bob", 1)]));

    stats.set_commits(&commits(&["Alice"])).unwrap();
    stats.set_file_sizes(&table(&[("a.rs", 7)])).unwrap();
    stats.set_file_sizes(&table(&[("a.rs", 7)])).unwrap();
    assert_eq!(stats.total_lines_of_code(), 7);
}

#[test]
fn top_n_is_bounded_descending_and_exact() {
    let input = table(&[("a", 3), ("b", 9), ("c", 1), ("d", 9), ("e", 4)]);

    for n in 0..8 {
        let top = top_n(&input, n);
        assert_eq!(top.len(), n.min(input.len()));
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        for e in &top {
            assert_eq!(input.get(&e.name), Some(&e.count));
        }
    }
}

#[test]
fn top_n_breaks_ties_by_name() {
    let input = table(&[("zed", 2), ("amy", 2), ("kim", 5)]);
    assert_eq!(
        top_n(&input, 3),
        vec![entry("kim", 5), entry("amy", 2), entry("zed", 2)]
    );
}

#[test]
fn file_rankings_apply_ignore_rules() {
    let rules = IgnoreRules::new(["md"], ["package-lock.json"], ["vendor"]);
    let mut stats = Stats::new("o", "r", rules);
    stats.set_prs(&[]);
    stats.set_commits(&[]).unwrap();

    let sizes = table(&[
        ("src/main.rs", 120),
        ("README.md", 400),
        ("web/package-lock.json", 9000),
        ("vendor/dep.c", 5000),
        ("vendored/parser.c", 30),
    ]);
    let changes = table(&[
        ("src/main.rs", 12),
        ("CHANGELOG.md", 99),
        ("vendor/dep.c", 70),
        ("src/removed.rs", 40),
    ]);
    stats.set_file_sizes(&sizes).unwrap();
    stats.set_file_changes(&changes).unwrap();

    assert_eq!(stats.total_lines_of_code(), 150);
    assert_eq!(
        stats.largest_files(5),
        vec![entry("src/main.rs", 120), entry("vendored/parser.c", 30)]
    );
    assert_eq!(
        stats.most_changed_files(5),
        vec![entry("src/removed.rs", 40), entry("src/main.rs", 12)]
    );

    assert_eq!(
        stats.file_records(),
        vec![
            FileRecord {
                path: "src/main.rs".into(),
                size_in_lines: Some(120),
                changed_lines: 12
            },
            FileRecord {
                path: "src/removed.rs".into(),
                size_in_lines: None,
                changed_lines: 40
            },
            FileRecord {
                path: "vendored/parser.c".into(),
                size_in_lines: Some(30),
                changed_lines: 0
            },
        ]
    );
}

#[test]
fn file_urls_are_filtered_like_the_other_maps() {
    let rules = IgnoreRules::new(["md"], Vec::<String>::new(), Vec::<String>::new());
    let mut stats = Stats::new("o", "r", rules);
    stats.set_prs(&[]);
    stats.set_commits(&[]).unwrap();

    let urls: BTreeMap<String, String> = [
        ("README.md".to_string(), "https://raw.test/README.md".to_string()),
        ("src/lib.rs".to_string(), "https://raw.test/src/lib.rs".to_string()),
    ]
    .into_iter()
    .collect();
    stats.set_file_urls(&urls).unwrap();

    assert_eq!(stats.file_urls().keys().collect::<Vec<_>>(), vec!["src/lib.rs"]);
}

#[test]
fn exclusion_reasons_combine_with_or() {
    let rules = IgnoreRules::new(["rs"], ["build.rs"], ["gen"]);
    // Each path hits one, two, or all three rules.
    assert!(rules.excludes("src/lib.rs"));
    assert!(rules.excludes("build.rs"));
    assert!(rules.excludes("gen/build.rs"));
    assert!(rules.excludes("gen/schema.json"));
    assert!(!rules.excludes("src/schema.json"));
    assert!(!IgnoreRules::default().excludes("src/lib.rs"));
}
