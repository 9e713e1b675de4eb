// Unit tests for domain operation parameters and payload reshaping
// HTTP behaviour is covered in integration_tests/github/

use crate::error::OperationError;
use crate::github::repository::{README_MAX_CHARS, decode_readme, language_shares};
use crate::github::user::top_by_stars;
use crate::github::{
    IssueSort, IssueState, ListIssuesParams, RepositoryExtension, RepositoryHit, SearchParams,
    SearchType, UserExtension,
};

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

fn params_of(endpoint: &crate::Endpoint) -> Vec<(&str, &str)> {
    endpoint
        .params()
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

fn hit(name: &str, stars: u64) -> RepositoryHit {
    RepositoryHit {
        full_name: name.to_string(),
        description: None,
        url: format!("https://github.com/{name}"),
        language: None,
        stars,
        forks: 0,
        open_issues: 0,
        updated_at: None,
    }
}

// ============================================
// search
// ============================================

/// **VALUE**: Verifies the search query string sent to GitHub.
///
/// **WHY THIS MATTERS**: `order` without `sort` is ignored by GitHub, and a
/// missing `per_page` would return 30 items for a limit of 5.
///
/// **BUG THIS CATCHES**: Would catch always sending `order`, or dropping the
/// limit from the request.
#[test]
fn given_search_params_when_endpoint_built_then_sort_and_order_travel_together() {
    // GIVEN
    let plain = SearchParams::new("tokio", SearchType::Repositories).with_limit(5);
    let sorted = SearchParams::new("tokio", SearchType::Repositories).with_sort("stars");

    // WHEN / THEN
    assert_eq!(plain.endpoint().segments(), ["search", "repositories"]);
    assert_eq!(params_of(&plain.endpoint()), [("q", "tokio"), ("per_page", "5")]);
    assert_eq!(
        params_of(&sorted.endpoint()),
        [("q", "tokio"), ("per_page", "10"), ("sort", "stars"), ("order", "desc")]
    );
}

#[test]
fn given_search_limits_when_validated_then_only_one_to_thirty_pass() {
    let base = SearchParams::new("rust", SearchType::Code);

    assert!(base.clone().with_limit(1).validate().is_ok());
    assert!(base.clone().with_limit(30).validate().is_ok());
    for limit in [0, 31, 100] {
        assert!(matches!(
            base.clone().with_limit(limit).validate(),
            Err(OperationError::InvalidInput { .. })
        ));
    }
}

#[test]
fn given_sort_for_wrong_type_when_validated_then_rejected() {
    // GIVEN: "stars" is a repository sort, not a user sort
    let users = SearchParams::new("linus", SearchType::Users).with_sort("stars");
    let repos = SearchParams::new("linus", SearchType::Repositories).with_sort("stars");

    // THEN
    let error = users.validate().expect_err("invalid sort");
    assert!(error.to_string().contains("followers, repositories, joined"));
    assert!(repos.validate().is_ok());
}

#[test]
fn given_blank_query_when_validated_then_rejected() {
    let error = SearchParams::new("   ", SearchType::Repositories)
        .validate()
        .expect_err("blank query");

    assert!(error.to_string().contains("query is required"));
}

#[test]
fn given_type_names_when_parsed_then_case_insensitive() {
    assert_eq!("Users".parse::<SearchType>(), Ok(SearchType::Users));
    assert_eq!("code".parse::<SearchType>(), Ok(SearchType::Code));
    assert!("issues".parse::<SearchType>().is_err());
    assert_eq!("README".parse::<RepositoryExtension>(), Ok(RepositoryExtension::Readme));
    assert_eq!("orgs".parse::<UserExtension>(), Ok(UserExtension::Orgs));
}

// ============================================
// issues
// ============================================

#[test]
fn given_issue_params_when_endpoint_built_then_labels_are_comma_joined() {
    // GIVEN
    let params = ListIssuesParams::new("rust-lang", "rust")
        .with_state(IssueState::All)
        .with_sort(IssueSort::Comments)
        .with_labels(["bug", " ", "E-easy "])
        .with_limit(20);

    // WHEN
    let endpoint = params.endpoint();

    // THEN
    assert_eq!(endpoint.segments(), ["repos", "rust-lang", "rust", "issues"]);
    assert_eq!(
        params_of(&endpoint),
        [
            ("state", "all"),
            ("sort", "comments"),
            ("direction", "desc"),
            ("per_page", "20"),
            ("labels", "bug,E-easy")
        ]
    );
}

#[test]
fn given_issue_limits_when_validated_then_only_one_to_fifty_pass() {
    let base = ListIssuesParams::new("o", "r");

    assert!(base.clone().with_limit(50).validate().is_ok());
    assert!(base.clone().with_limit(51).validate().is_err());
    assert!(base.clone().with_limit(0).validate().is_err());
    assert!(ListIssuesParams::new("", "r").validate().is_err());
}

// ============================================
// repository
// ============================================

#[test]
fn given_base64_readme_with_line_breaks_when_decoded_then_text_restored() {
    // GIVEN: GitHub wraps base64 content at 60 columns
    let encoded = BASE64.encode("# Hello\n\nWorld");
    let wrapped = format!("{}\n{}\n", &encoded[..8], &encoded[8..]);

    // WHEN
    let decoded = decode_readme(&wrapped, "base64");

    // THEN
    assert_eq!(decoded.as_deref(), Some("# Hello\n\nWorld"));
    assert_eq!(decode_readme("!!!", "base64"), None);
}

#[test]
fn given_oversized_readme_when_decoded_then_truncated_with_marker() {
    let long = "x".repeat(README_MAX_CHARS + 10);

    let decoded = decode_readme(&long, "utf-8").expect("text");

    assert!(decoded.starts_with(&"x".repeat(README_MAX_CHARS)));
    assert!(decoded.ends_with("[README truncated]"));
}

#[test]
fn given_language_bytes_when_shared_then_sorted_desc_with_percentages() {
    // GIVEN
    let languages = BTreeMap::from([
        ("Shell".to_string(), 100),
        ("Rust".to_string(), 700),
        ("Python".to_string(), 200),
    ]);

    // WHEN
    let shares = language_shares(languages);

    // THEN
    let names: Vec<&str> = shares.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Rust", "Python", "Shell"]);
    assert_eq!(shares[0].percentage, 70.0);
    assert_eq!(shares[2].percentage, 10.0);
    assert!(language_shares(BTreeMap::new()).is_empty());
}

// ============================================
// user
// ============================================

#[test]
fn given_owned_repositories_when_ranked_then_top_five_by_stars() {
    let repos = vec![
        hit("u/a", 5),
        hit("u/b", 50),
        hit("u/c", 1),
        hit("u/d", 500),
        hit("u/e", 50),
        hit("u/f", 0),
        hit("u/g", 7),
    ];

    let top = top_by_stars(repos, 5);

    let names: Vec<&str> = top.iter().map(|r| r.full_name.as_str()).collect();
    assert_eq!(names, ["u/d", "u/b", "u/e", "u/g", "u/a"]);
}
