//! Kubernetes API version priority
//!
//! Kube-like version names sort before anything else: GA versions first
//! (newest first), then beta, then alpha. Names that do not follow the
//! `v<digits>[alpha|beta<digits>]` pattern sort last, lexicographically.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v(\d+)(?:(alpha|beta)(\d+))?$").expect("valid version pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Alpha,
    Beta,
    Ga,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedVersion {
    major: u64,
    stage: Stage,
    stage_version: u64,
}

fn parse(name: &str) -> Option<ParsedVersion> {
    let captures = VERSION_PATTERN.captures(name)?;
    let major = captures[1].parse().ok()?;
    let (stage, stage_version) = match captures.get(2).map(|m| m.as_str()) {
        None => (Stage::Ga, 0),
        Some("beta") => (Stage::Beta, captures[3].parse().ok()?),
        Some(_) => (Stage::Alpha, captures[3].parse().ok()?),
    };
    Some(ParsedVersion {
        major,
        stage,
        stage_version,
    })
}

/// Total order over version names, highest priority first.
pub fn compare_priority(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(left), Some(right)) => right
            .stage
            .cmp(&left.stage)
            .then(right.major.cmp(&left.major))
            .then(right.stage_version.cmp(&left.stage_version)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sorts items carrying a version name by priority, highest first.
pub fn sort_by_priority<T>(mut items: Vec<T>, name_of: impl Fn(&T) -> &str) -> Vec<T> {
    items.sort_by(|a, b| compare_priority(name_of(a), name_of(b)));
    items
}
