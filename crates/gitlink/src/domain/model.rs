//! Domain models for remotes, provider templates, and line ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Hosting location of a repository as extracted from its remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteInfo {
    pub domain: String,
    /// Namespace path. May contain `/` for nested groups (e.g. `group/subgroup`).
    pub owner: String,
    pub repo: String,
}

impl RemoteInfo {
    pub fn new(
        domain: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

/// URL pattern for one hosting service, keyed by exact domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTemplate {
    pub name: String,
    pub domain: String,
    #[serde(alias = "urlTemplate")]
    pub url_template: String,
}

impl ProviderTemplate {
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        url_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            url_template: url_template.into(),
        }
    }
}

/// 1-based inclusive line span. A single cursor line has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Result<Self, DomainError> {
        if start == 0 || start > end {
            return Err(DomainError::InvalidLineRange(format!("{start}-{end}")));
        }
        Ok(Self { start, end })
    }

    /// Range covering one line. Line numbers below 1 are clamped to 1.
    pub fn single(line: usize) -> Self {
        let line = line.max(1);
        Self {
            start: line,
            end: line,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start == self.end
    }
}

impl Default for LineRange {
    fn default() -> Self {
        Self::single(1)
    }
}

impl FromStr for LineRange {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || DomainError::InvalidLineRange(trimmed.to_owned());

        let (start, end) = match trimmed.split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (trimmed, trimmed),
        };
        let start: usize = start.parse().map_err(|_| invalid())?;
        let end: usize = end.parse().map_err(|_| invalid())?;

        Self::new(start, end).map_err(|_| invalid())
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_line() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_line_and_span() {
        assert_eq!("7".parse::<LineRange>().unwrap(), LineRange::single(7));
        assert_eq!(
            " 10-20 ".parse::<LineRange>().unwrap(),
            LineRange::new(10, 20).unwrap()
        );
    }

    #[test]
    fn rejects_zero_reversed_and_garbage() {
        for input in ["0", "0-3", "9-2", "", "a-b", "3-", "-3", "1-2-3"] {
            assert!(
                input.parse::<LineRange>().is_err(),
                "expected '{input}' to be rejected"
            );
        }
    }

    #[test]
    fn single_clamps_to_first_line() {
        assert_eq!(LineRange::single(0), LineRange::single(1));
        assert!(LineRange::default().is_single_line());
    }

    #[test]
    fn display_matches_parse_format() {
        assert_eq!(LineRange::single(4).to_string(), "4");
        assert_eq!(LineRange::new(4, 9).unwrap().to_string(), "4-9");
    }

    #[test]
    fn provider_template_accepts_camel_case_key() {
        let provider: ProviderTemplate = toml::from_str(
            r#"
name = "Gitea"
domain = "git.example.com"
urlTemplate = "https://{domain}/{owner}/{repo}"
"#,
        )
        .unwrap();
        assert_eq!(provider.url_template, "https://{domain}/{owner}/{repo}");
    }
}
