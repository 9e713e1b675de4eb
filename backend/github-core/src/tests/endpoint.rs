// Unit tests for endpoint construction and URL resolution

use crate::client::RequestTarget;
use crate::endpoint::Endpoint;

use url::Url;

fn api() -> Url {
    Url::parse("https://api.github.com").expect("valid base")
}

/// **VALUE**: Verifies that user-supplied values cannot alter the path or query structure.
///
/// **WHY THIS MATTERS**: Owner, repo and query strings come straight from an
/// LLM or a terminal. A `/` or `&` in them must stay data.
///
/// **BUG THIS CATCHES**: Would catch someone replacing the builder with
/// `format!("/repos/{owner}/{repo}")`.
#[test]
fn given_reserved_characters_when_resolved_then_values_are_percent_encoded() {
    // GIVEN: Segments and a query value with reserved characters
    let endpoint = Endpoint::new(["repos", "a/b", "c?d"])
        .param("q", "rust lang&stars:>10");

    // WHEN
    let url = endpoint.resolve(&api()).expect("resolves");

    // THEN
    assert_eq!(url.path(), "/repos/a%2Fb/c%3Fd");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs, vec![("q".to_string(), "rust lang&stars:>10".to_string())]);
}

#[test]
fn given_base_with_path_when_resolved_then_endpoint_is_appended() {
    // GIVEN: A GitHub Enterprise style base
    let base = Url::parse("https://ghe.example.com/api/v3/").expect("valid base");

    // WHEN
    let url = Endpoint::new(["users", "octocat"])
        .resolve(&base)
        .expect("resolves");

    // THEN
    assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/users/octocat");
}

#[test]
fn given_relative_path_with_query_when_parsed_then_segments_and_params_split() {
    // WHEN
    let endpoint = Endpoint::parse("/search/repositories?q=tokio&per_page=5");

    // THEN
    assert_eq!(endpoint.segments(), ["search", "repositories"]);
    assert_eq!(
        endpoint.params(),
        [
            ("q".to_string(), "tokio".to_string()),
            ("per_page".to_string(), "5".to_string())
        ]
    );
    assert_eq!(endpoint.to_string(), "/search/repositories?q=tokio&per_page=5");
}

#[test]
fn given_optional_params_when_absent_then_not_added() {
    let endpoint = Endpoint::new(["x"])
        .param_opt("sort", None::<&str>)
        .param_opt("order", Some("desc"));

    assert_eq!(endpoint.params(), [("order".to_string(), "desc".to_string())]);
}

/// **VALUE**: Verifies already-encoded relative paths reach GitHub unchanged.
///
/// **WHY THIS MATTERS**: Paths copied from GitHub responses or docs are
/// already percent-encoded. Encoding them a second time (`%20` → `%2520`)
/// asks for a different, usually missing, resource.
///
/// **BUG THIS CATCHES**: Would catch `parse` keeping `%XX` sequences literally
/// while `resolve` encodes every segment.
#[test]
fn given_encoded_relative_path_when_resolved_then_encoding_is_not_doubled() {
    // GIVEN
    let target = RequestTarget::from("/repos/o/r/contents/a%20b.md");
    let encoded_slash = Endpoint::parse("/repos/a%2Fb/c");

    // WHEN
    let url = match target {
        RequestTarget::Endpoint(endpoint) => endpoint.resolve(&api()).expect("resolves"),
        other => panic!("relative paths become endpoints, got {other:?}"),
    };
    let slash_url = encoded_slash.resolve(&api()).expect("resolves");

    // THEN
    assert_eq!(url.as_str(), "https://api.github.com/repos/o/r/contents/a%20b.md");
    assert_eq!(encoded_slash.segments(), ["repos", "a/b", "c"]);
    assert_eq!(slash_url.path(), "/repos/a%2Fb/c");
}
