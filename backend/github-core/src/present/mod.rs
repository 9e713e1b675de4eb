//! Human-readable rendering of domain results.
//!
//! Formatting is kept apart from the data records: operations return plain
//! records and these functions derive the display text. [`Presented`] joins
//! the two for callers (tools, `--json` output) that want both in one object.

use crate::github::{
    IssueList, RepositoryHit, RepositoryInfo, SearchItems, SearchResult, UserProfile,
};
use crate::system::SystemSnapshot;

use std::fmt::Write;
use std::time::Duration;

use serde::Serialize;

const DESCRIPTION_PREVIEW_CHARS: usize = 100;
const README_PREVIEW_CHARS: usize = 500;
const BYTE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// A data record flattened together with its rendered summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presented<T> {
    #[serde(flatten)]
    pub data: T,
    pub formatted: String,
}

impl<T> Presented<T> {
    pub fn new(data: T, render: impl FnOnce(&T) -> String) -> Self {
        let formatted = render(&data);
        Self { data, formatted }
    }
}

// ============================================
// HELPERS
// ============================================

fn preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// `1536` → `1.5 KiB`
pub fn human_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    match unit {
        0 => format!("{bytes} B"),
        _ => format!("{value:.1} {}", BYTE_UNITS[unit]),
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn repository_line(out: &mut String, index: usize, repo: &RepositoryHit) {
    let _ = writeln!(
        out,
        "{}. {} ({} stars, {} forks){}",
        index + 1,
        repo.full_name,
        repo.stars,
        repo.forks,
        repo.language
            .as_deref()
            .map(|lang| format!(" [{lang}]"))
            .unwrap_or_default()
    );
    if let Some(description) = &repo.description {
        let _ = writeln!(out, "   {}", preview(description, DESCRIPTION_PREVIEW_CHARS));
    }
    let _ = writeln!(out, "   {}", repo.url);
}

// ============================================
// FORMATTERS
// ============================================

pub fn format_search(result: &SearchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Found {} {} for \"{}\" (showing {}){}",
        result.total_count,
        result.search_type,
        result.query,
        result.showing,
        if result.incomplete_results { ", results incomplete" } else { "" }
    );

    if result.items.is_empty() {
        out.push_str("No results.");
        return out;
    }
    out.push('\n');

    match &result.items {
        SearchItems::Repositories(items) => {
            for (index, repo) in items.iter().enumerate() {
                repository_line(&mut out, index, repo);
            }
        }
        SearchItems::Users(items) => {
            for (index, user) in items.iter().enumerate() {
                let _ = writeln!(out, "{}. {} ({})", index + 1, user.login, user.account_type);
                let _ = writeln!(out, "   {}", user.url);
            }
        }
        SearchItems::Code(items) => {
            for (index, hit) in items.iter().enumerate() {
                let _ = writeln!(out, "{}. {} in {}", index + 1, hit.path, hit.repository);
                let _ = writeln!(out, "   {}", hit.url);
            }
        }
    }

    out.trim_end().to_string()
}

pub fn format_repository(info: &RepositoryInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", info.full_name);
    if let Some(description) = &info.description {
        let _ = writeln!(out, "{description}");
    }
    let _ = writeln!(out, "{}", info.url);
    out.push('\n');

    let _ = writeln!(
        out,
        "Stars: {}  Forks: {}  Open issues: {}  Watchers: {}",
        info.stars, info.forks, info.open_issues, info.watchers
    );
    let _ = writeln!(out, "Language: {}", or_dash(info.language.as_deref()));
    let _ = writeln!(out, "License: {}", or_dash(info.license.as_deref()));
    let _ = writeln!(out, "Default branch: {}", info.default_branch);
    if !info.topics.is_empty() {
        let _ = writeln!(out, "Topics: {}", info.topics.join(", "));
    }
    if let Some(homepage) = &info.homepage {
        let _ = writeln!(out, "Homepage: {homepage}");
    }
    if info.archived {
        let _ = writeln!(out, "Archived: yes");
    }
    let _ = writeln!(
        out,
        "Created: {}  Last push: {}",
        or_dash(info.created_at.as_deref()),
        or_dash(info.pushed_at.as_deref())
    );

    if let Some(languages) = &info.languages {
        out.push_str("\nLanguages:\n");
        if languages.is_empty() {
            out.push_str("  (none reported)\n");
        }
        for language in languages {
            let _ = writeln!(
                out,
                "  {}: {:.1}% ({})",
                language.name,
                language.percentage,
                human_bytes(language.bytes)
            );
        }
    }

    if let Some(contributors) = &info.contributors {
        out.push_str("\nTop contributors:\n");
        if contributors.is_empty() {
            out.push_str("  (none reported)\n");
        }
        for contributor in contributors {
            let _ = writeln!(
                out,
                "  {} ({} contributions)",
                contributor.login, contributor.contributions
            );
        }
    }

    if let Some(release) = &info.latest_release {
        out.push_str("\nLatest release: ");
        match release {
            Some(release) => {
                let _ = writeln!(
                    out,
                    "{}{} ({})",
                    release.tag_name,
                    release
                        .name
                        .as_deref()
                        .filter(|name| *name != release.tag_name)
                        .map(|name| format!(" \"{name}\""))
                        .unwrap_or_default(),
                    or_dash(release.published_at.as_deref())
                );
            }
            None => out.push_str("none\n"),
        }
    }

    if let Some(readme) = &info.readme {
        out.push_str("\nREADME:\n");
        match readme {
            Some(readme) => {
                let _ = writeln!(out, "{}", preview(readme, README_PREVIEW_CHARS));
            }
            None => out.push_str("(no README)\n"),
        }
    }

    out.trim_end().to_string()
}

pub fn format_issues(list: &IssueList) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} issues in {}",
        list.total, list.state, list.repository
    );

    if list.issues.is_empty() {
        out.push_str("No issues found.");
        return out;
    }
    out.push('\n');

    for issue in &list.issues {
        let _ = writeln!(
            out,
            "#{} {} [{}]",
            issue.number, issue.title, issue.state
        );
        let _ = writeln!(
            out,
            "   by {} | {} comments | opened {}",
            or_dash(issue.author.as_deref()),
            issue.comments,
            or_dash(issue.created_at.as_deref())
        );
        if !issue.labels.is_empty() {
            let _ = writeln!(out, "   labels: {}", issue.labels.join(", "));
        }
        let _ = writeln!(out, "   {}", issue.url);
    }

    out.trim_end().to_string()
}

pub fn format_user(profile: &UserProfile) -> String {
    let mut out = String::new();
    match &profile.name {
        Some(name) => {
            let _ = writeln!(out, "{name} ({})", profile.login);
        }
        None => {
            let _ = writeln!(out, "{}", profile.login);
        }
    }
    if let Some(bio) = &profile.bio {
        let _ = writeln!(out, "{bio}");
    }
    let _ = writeln!(out, "{}", profile.url);
    out.push('\n');

    let _ = writeln!(
        out,
        "Followers: {}  Following: {}  Public repos: {}  Gists: {}",
        profile.followers, profile.following, profile.public_repos, profile.public_gists
    );
    let _ = writeln!(out, "Type: {}", profile.account_type);
    for (label, value) in [
        ("Company", &profile.company),
        ("Location", &profile.location),
        ("Blog", &profile.blog),
        ("Email", &profile.email),
        ("Twitter", &profile.twitter_username),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "{label}: {value}");
        }
    }
    let _ = writeln!(out, "Joined: {}", or_dash(profile.created_at.as_deref()));

    if let Some(repositories) = &profile.top_repositories {
        out.push_str("\nTop repositories:\n");
        if repositories.is_empty() {
            out.push_str("(none)\n");
        }
        for (index, repo) in repositories.iter().enumerate() {
            repository_line(&mut out, index, repo);
        }
    }

    if let Some(organizations) = &profile.organizations {
        out.push_str("\nOrganizations:\n");
        if organizations.is_empty() {
            out.push_str("  (none)\n");
        }
        for org in organizations {
            let _ = writeln!(out, "  {} ({})", org.login, org.url);
        }
    }

    out.trim_end().to_string()
}

pub fn format_system(snapshot: &SystemSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Host: {}",
        or_dash(snapshot.host_name.as_deref())
    );
    let _ = writeln!(
        out,
        "OS: {} {} (kernel {})",
        or_dash(snapshot.os_name.as_deref()),
        or_dash(snapshot.os_version.as_deref()),
        or_dash(snapshot.kernel_version.as_deref())
    );
    let _ = writeln!(
        out,
        "Uptime: {}",
        humantime::format_duration(Duration::from_secs(snapshot.uptime_secs))
    );
    let _ = writeln!(
        out,
        "CPU: {} x {} at {:.1}% (load {:.2} {:.2} {:.2})",
        snapshot.cpu_count,
        or_dash(snapshot.cpu_brand.as_deref()),
        snapshot.cpu_usage_percent,
        snapshot.load_average.one,
        snapshot.load_average.five,
        snapshot.load_average.fifteen
    );
    let _ = writeln!(
        out,
        "Memory: {} / {} ({:.1}%), {} available",
        human_bytes(snapshot.used_memory_bytes),
        human_bytes(snapshot.total_memory_bytes),
        snapshot.memory_usage_percent(),
        human_bytes(snapshot.available_memory_bytes)
    );
    let _ = writeln!(
        out,
        "Swap: {} / {} ({:.1}%)",
        human_bytes(snapshot.used_swap_bytes),
        human_bytes(snapshot.total_swap_bytes),
        snapshot.swap_usage_percent()
    );
    let _ = write!(out, "Processes: {}", snapshot.process_count);

    out
}
