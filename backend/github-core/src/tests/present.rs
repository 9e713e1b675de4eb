// Unit tests for human-readable formatting and the Presented wrapper

use crate::github::{
    IssueList, IssueState, IssueSummary, RepositoryHit, SearchItems, SearchResult, SearchType,
};
use crate::present::{Presented, format_issues, format_search, human_bytes};

fn search_result(total_count: u64, items: Vec<RepositoryHit>) -> SearchResult {
    SearchResult {
        search_type: SearchType::Repositories,
        query: "tokio".to_string(),
        total_count,
        showing: items.len(),
        incomplete_results: false,
        items: SearchItems::Repositories(items),
    }
}

fn repo(name: &str, stars: u64) -> RepositoryHit {
    RepositoryHit {
        full_name: name.to_string(),
        description: Some("An async runtime".to_string()),
        url: format!("https://github.com/{name}"),
        language: Some("Rust".to_string()),
        stars,
        forks: 3,
        open_issues: 0,
        updated_at: None,
    }
}

/// **VALUE**: Verifies that the summary keeps "total matches" and "shown" apart.
///
/// **WHY THIS MATTERS**: Agents relay the formatted text verbatim. Saying
/// "found 5" when GitHub reports 1208 matches misleads the user.
///
/// **BUG THIS CATCHES**: Would catch the formatter printing `items.len()` as
/// the total.
#[test]
fn given_search_result_when_formatted_then_total_and_showing_both_appear() {
    // GIVEN
    let result = search_result(1208, vec![repo("tokio-rs/tokio", 30_000), repo("a/b", 1)]);

    // WHEN
    let text = format_search(&result);

    // THEN
    assert!(text.starts_with("Found 1208 repositories for \"tokio\" (showing 2)"));
    assert!(text.contains("1. tokio-rs/tokio (30000 stars, 3 forks) [Rust]"));
    assert!(text.contains("2. a/b"));
}

#[test]
fn given_empty_search_when_formatted_then_says_no_results() {
    let text = format_search(&search_result(0, Vec::new()));

    assert!(text.ends_with("No results."));
}

#[test]
fn given_issue_list_when_formatted_then_each_issue_has_number_and_labels() {
    let list = IssueList {
        repository: "o/r".to_string(),
        state: IssueState::Open,
        total: 1,
        issues: vec![IssueSummary {
            number: 7,
            title: "Crash on start".to_string(),
            state: "open".to_string(),
            author: Some("octocat".to_string()),
            labels: vec!["bug".to_string(), "P1".to_string()],
            comments: 2,
            url: "https://github.com/o/r/issues/7".to_string(),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: None,
            closed_at: None,
        }],
    };

    let text = format_issues(&list);

    assert!(text.starts_with("1 open issues in o/r"));
    assert!(text.contains("#7 Crash on start [open]"));
    assert!(text.contains("by octocat | 2 comments"));
    assert!(text.contains("labels: bug, P1"));
}

/// **VALUE**: Verifies the combined shape: data fields at the top level plus `formatted`.
///
/// **WHY THIS MATTERS**: Tool consumers read fields like `total_count`
/// directly off the result object. Nesting them under `data` breaks them.
///
/// **BUG THIS CATCHES**: Would catch removing `#[serde(flatten)]`.
#[test]
fn given_presented_result_when_serialized_then_fields_are_flattened() {
    // GIVEN
    let presented = Presented::new(search_result(42, vec![repo("x/y", 9)]), format_search);

    // WHEN
    let json = serde_json::to_value(&presented).expect("serializes");

    // THEN
    assert_eq!(json["total_count"], 42);
    assert_eq!(json["showing"], 1);
    assert_eq!(json["search_type"], "repositories");
    assert_eq!(json["items"][0]["full_name"], "x/y");
    assert_eq!(json["formatted"], presented.formatted.as_str());
    assert!(json.get("data").is_none());
}

#[test]
fn given_byte_counts_when_humanized_then_binary_units_used() {
    assert_eq!(human_bytes(512), "512 B");
    assert_eq!(human_bytes(1536), "1.5 KiB");
    assert_eq!(human_bytes(8 * 1024 * 1024 * 1024), "8.0 GiB");
}
