// Integration tests for user-info and its extensions

use crate::helpers::{client_for, repository_json, test_token};

use github_core::github::{UserExtension, UserParams, get_user};

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "name": "The Octocat",
            "type": "User",
            "bio": "",
            "company": "@github",
            "blog": "https://github.blog",
            "html_url": "https://github.com/octocat",
            "public_repos": 8,
            "followers": 20000,
            "following": 9,
            "created_at": "2011-01-25T18:44:36Z"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn given_profile_when_fetching_then_empty_strings_become_absent() {
    // GIVEN
    let server = MockServer::start().await;
    mount_profile(&server).await;

    // WHEN
    let profile = get_user(&client_for(&server), &UserParams::new("octocat"), None)
        .await
        .expect("fetch succeeds");

    // THEN
    assert_eq!(profile.name.as_deref(), Some("The Octocat"));
    assert_eq!(profile.account_type, "User");
    assert_eq!(profile.bio, None);
    assert_eq!(profile.followers, 20_000);
    assert!(profile.top_repositories.is_none());
    assert!(profile.organizations.is_none());
}

/// **VALUE**: Verifies the repos extension ranks by stars and keeps five.
///
/// **WHY THIS MATTERS**: GitHub lists repositories by update time; "top
/// repositories" is only meaningful after re-ranking.
///
/// **BUG THIS CATCHES**: Would catch returning the first five by update time.
#[tokio::test]
async fn given_repos_and_orgs_requested_when_fetching_then_top_five_and_orgs_returned() {
    // GIVEN: Seven repositories in update order, plus two orgs
    let server = MockServer::start().await;
    mount_profile(&server).await;
    let stars = [3, 900, 12, 45, 0, 7000, 60];
    let repos: Vec<_> = stars
        .iter()
        .enumerate()
        .map(|(i, stars)| repository_json(&format!("octocat/repo-{i}"), *stars))
        .collect();
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("sort", "updated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/orgs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "github", "description": "How people build software." },
            { "login": "octo-org", "description": "" }
        ])))
        .mount(&server)
        .await;

    // WHEN
    let params = UserParams::new("octocat").with_include(UserExtension::ALL);
    let profile = get_user(&client_for(&server), &params, None)
        .await
        .expect("fetch succeeds");

    // THEN
    let top: Vec<u64> = profile
        .top_repositories
        .as_ref()
        .expect("repos requested")
        .iter()
        .map(|repo| repo.stars)
        .collect();
    assert_eq!(top, [7000, 900, 60, 45, 12]);

    let orgs = profile.organizations.as_ref().expect("orgs requested");
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].url, "https://github.com/github");
    assert_eq!(orgs[1].description, None);
}

#[tokio::test]
async fn given_credential_when_fetching_then_every_request_is_authenticated() {
    // GIVEN: Mocks that only match with the bearer header
    let server = MockServer::start().await;
    let bearer = format!("Bearer {}", test_token().as_str());
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octocat" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/orgs"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let token = test_token();
    let params = UserParams::new("octocat").with_include([UserExtension::Orgs]);
    let profile = get_user(&client_for(&server), &params, Some(&token))
        .await
        .expect("fetch succeeds");

    // THEN
    assert_eq!(profile.organizations, Some(Vec::new()));
}

#[tokio::test]
async fn given_unknown_user_when_fetching_then_error_names_the_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost-that-does-not-exist"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let error = get_user(
        &client_for(&server),
        &UserParams::new("ghost-that-does-not-exist"),
        None,
    )
    .await
    .expect_err("404");

    assert!(error.to_string().starts_with("Failed to get user info: Not Found: Not Found"));
}
