//! GitHub credential helpers.
//!
//! Tokens are only normalized and inspected here, never sent anywhere.
//! Read operations work without a token (at a much lower rate limit), so
//! `validate_format` is informational and never gates a request.

use crate::error::AuthError;

use common::RedactedToken;

pub use common::redacted_token::{MASK_PREFIX_LEN, MASK_SUFFIX, mask};

use std::sync::OnceLock;

use regex::Regex;

const TOKEN_FORMAT_PATTERN: &str =
    r"^(?:(?P<prefixed>gh[pousr])_[A-Za-z0-9]{36}|(?P<fine>github_pat_)[A-Za-z0-9_]{82}|(?P<legacy>[0-9a-f]{40}))$";

static TOKEN_FORMAT_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_format_regex() -> &'static Regex {
    TOKEN_FORMAT_REGEX.get_or_init(|| Regex::new(TOKEN_FORMAT_PATTERN).expect("valid regex pattern"))
}

/// Kinds of GitHub credentials recognised by their prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    PersonalAccess,
    FineGrainedPersonalAccess,
    OAuth,
    UserToServer,
    ServerToServer,
    Refresh,
    Legacy,
}

impl TokenKind {
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::PersonalAccess => "personal access token",
            TokenKind::FineGrainedPersonalAccess => "fine-grained personal access token",
            TokenKind::OAuth => "OAuth access token",
            TokenKind::UserToServer => "GitHub App user-to-server token",
            TokenKind::ServerToServer => "GitHub App installation token",
            TokenKind::Refresh => "GitHub App refresh token",
            TokenKind::Legacy => "legacy token",
        }
    }
}

/// Returns the token if it carries any non-whitespace content, trimmed.
pub fn normalize_optional(token: Option<&str>) -> Option<RedactedToken> {
    RedactedToken::from_optional(token)
}

/// Returns the token, or `AuthError::TokenRequired` when there is none.
#[track_caller]
pub fn require_token(token: Option<&RedactedToken>) -> Result<&RedactedToken, AuthError> {
    match token {
        Some(token) if !token.as_str().trim().is_empty() => Ok(token),
        _ => Err(AuthError::token_required()),
    }
}

/// Identify the token convention, if it matches a known GitHub format.
pub fn detect_kind(token: &str) -> Option<TokenKind> {
    let captures = token_format_regex().captures(token)?;

    if let Some(prefix) = captures.name("prefixed") {
        return match prefix.as_str() {
            "ghp" => Some(TokenKind::PersonalAccess),
            "gho" => Some(TokenKind::OAuth),
            "ghu" => Some(TokenKind::UserToServer),
            "ghs" => Some(TokenKind::ServerToServer),
            "ghr" => Some(TokenKind::Refresh),
            _ => None,
        };
    }

    if captures.name("fine").is_some() {
        return Some(TokenKind::FineGrainedPersonalAccess);
    }

    captures.name("legacy").map(|_| TokenKind::Legacy)
}

/// True only when the token follows a known GitHub prefix-and-length convention.
pub fn validate_format(token: &str) -> bool {
    detect_kind(token).is_some()
}

/// One-line description of the configured credential for startup logs.
pub fn describe(token: Option<&RedactedToken>) -> String {
    match token {
        None => String::from("no GitHub token (unauthenticated, 60 requests/hour)"),
        Some(token) => match detect_kind(token.as_str()) {
            Some(kind) => format!("{} ({})", token.masked(), kind.description()),
            None => format!("{} (unrecognised token format)", token.masked()),
        },
    }
}
