// Unit tests for RedactedToken
// The token must never leak through Debug, Display or serde

use crate::RedactedToken;

/// **VALUE**: Verifies that formatting a token never prints the secret.
///
/// **WHY THIS MATTERS**: Tokens flow through structs that get logged with
/// `{:?}`. A derived Debug would write the credential straight into log files.
///
/// **BUG THIS CATCHES**: Would catch if someone replaces the manual Debug or
/// Display impl with `#[derive(Debug)]`.
#[test]
fn given_token_when_formatted_then_value_is_redacted() {
    // GIVEN: A token with a recognisable value
    let token = RedactedToken::new("ghp_secretvalue");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{token:?}");
    let display = format!("{token}");

    // THEN: Neither output contains the secret
    assert!(!debug.contains("secretvalue"));
    assert!(!display.contains("secretvalue"));
    assert_eq!(display, "ghp_sec***");
    assert_eq!(debug, "RedactedToken(ghp_sec***)");
    assert_eq!(token.as_str(), "ghp_secretvalue");
    assert_eq!(token.len(), 15);
}

/// **VALUE**: Verifies that serializing a token fails loudly.
///
/// **WHY THIS MATTERS**: Tool results are serialized to JSON and handed to an
/// external agent framework. A token inside one must not be written out.
///
/// **BUG THIS CATCHES**: Would catch if the custom Serialize impl is replaced
/// by a derive.
#[test]
fn given_token_when_serialized_then_returns_error() {
    let token = RedactedToken::new("ghp_secretvalue");

    let result = serde_json::to_string(&token);

    assert!(result.is_err(), "Token serialization must be refused");
    assert!(result.unwrap_err().to_string().contains("refusing to serialize GitHub token ghp_sec***"));
}

/// **VALUE**: Verifies the mask boundary at exactly seven characters.
///
/// **WHY THIS MATTERS**: Logs identify which token is configured by its
/// prefix. Short values carry no useful prefix and are hidden entirely.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one that hides 7-character
/// tokens completely or shows part of a 6-character one.
#[test]
fn given_tokens_around_prefix_length_when_masked_then_boundary_is_exact() {
    use crate::redacted_token::{MASK_SUFFIX, mask};

    assert_eq!(mask("abcdefg"), "abcdefg***");
    assert_eq!(RedactedToken::new("abcdefg").masked(), "abcdefg***");
    assert_eq!(mask("abcdef"), MASK_SUFFIX);
    assert_eq!(mask(""), MASK_SUFFIX);
}

#[test]
fn given_raw_values_when_normalized_then_blank_is_absent_and_content_is_trimmed() {
    assert_eq!(RedactedToken::from_optional(None), None);
    assert_eq!(RedactedToken::from_optional(Some(" \n\t")), None);

    let token = RedactedToken::from_optional(Some("  ghp_abc\n")).expect("has content");
    assert_eq!(token.as_str(), "ghp_abc");
}
