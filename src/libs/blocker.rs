//! Site-blocking rules.
//!
//! While a work phase runs, navigation to blocked domains is denied. The
//! rule list is declarative and always replaced as a whole:
//!
//! - **Allow rules** (priority 2) let through any URL that starts with an
//!   allowed URL.
//! - **Block rules** (priority 1) deny any URL whose host, without a leading
//!   `www.`, equals a blocked domain. Their filter is written `||domain/`.
//!
//! Ids are numbered from 1, allow rules first. When several rules match a
//! URL the highest priority wins, so an allowed URL on a blocked domain stays
//! reachable.
//!
//! ```rust
//! use pomodoro_grande::libs::blocker::RuleSet;
//!
//! let rules = RuleSet::build(&["example.com".into()], &["https://example.com/docs".into()]);
//! assert!(rules.is_blocked("https://www.example.com/feed").unwrap());
//! assert!(!rules.is_blocked("https://example.com/docs/intro").unwrap());
//! assert!(!rules.is_blocked("https://rust-lang.org/").unwrap());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const ALLOW_PRIORITY: u8 = 2;
pub const BLOCK_PRIORITY: u8 = 1;

#[derive(Debug, Error)]
pub enum BlockerError {
    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, #[source] url::ParseError),
    #[error("'{0}' has no host name")]
    MissingHost(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: u32,
    pub priority: u8,
    pub action: RuleAction,
    pub url_filter: String,
}

impl Rule {
    fn matches(&self, url: &Url) -> bool {
        match self.action {
            RuleAction::Allow => url.as_str().starts_with(&self.url_filter),
            RuleAction::Block => match (filter_domain(&self.url_filter), url.host_str()) {
                (Some(domain), Some(host)) => strip_www(host).eq_ignore_ascii_case(domain),
                _ => false,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn build(blocked_sites: &[String], allowed_urls: &[String]) -> Self {
        let mut next_id: u32 = 0;
        let mut rules = Vec::with_capacity(blocked_sites.len() + allowed_urls.len());

        for allowed in allowed_urls.iter().filter(|url| !url.trim().is_empty()) {
            next_id += 1;
            rules.push(Rule {
                id: next_id,
                priority: ALLOW_PRIORITY,
                action: RuleAction::Allow,
                url_filter: normalize_url(allowed),
            });
        }
        for site in blocked_sites.iter().filter(|site| !site.trim().is_empty()) {
            next_id += 1;
            rules.push(Rule {
                id: next_id,
                priority: BLOCK_PRIORITY,
                action: RuleAction::Block,
                url_filter: format!("||{}/", site.trim().to_lowercase()),
            });
        }

        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.rules.iter().map(|rule| rule.id).collect()
    }

    /// The rule deciding a navigation to `url`, if any rule matches.
    pub fn evaluate(&self, url: &str) -> Result<Option<&Rule>, BlockerError> {
        let url = Url::parse(url).map_err(|e| BlockerError::InvalidUrl(url.to_string(), e))?;
        Ok(self
            .rules
            .iter()
            .filter(|rule| rule.matches(&url))
            .max_by(|a, b| a.priority.cmp(&b.priority).then(b.id.cmp(&a.id))))
    }

    pub fn is_blocked(&self, url: &str) -> Result<bool, BlockerError> {
        Ok(matches!(self.evaluate(url)?, Some(rule) if rule.action == RuleAction::Block))
    }
}

/// Turns user input such as `https://www.Example.com/path` or
/// `example.com` into the bare domain `example.com`.
pub fn normalize_domain(input: &str) -> Result<String, BlockerError> {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&candidate).map_err(|e| BlockerError::InvalidUrl(input.to_string(), e))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(strip_www(host).to_lowercase()),
        _ => Err(BlockerError::MissingHost(input.to_string())),
    }
}

/// Canonical form of an allowed URL, used as its prefix filter.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    Url::parse(trimmed).map(|url| url.to_string()).unwrap_or_else(|_| trimmed.to_string())
}

fn filter_domain(filter: &str) -> Option<&str> {
    filter.strip_prefix("||").map(|rest| rest.trim_end_matches('/'))
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_allow_rules_first() {
        let rules = RuleSet::build(&["a.com".into(), "b.com".into()], &["https://a.com/ok".into()]);
        assert_eq!(rules.ids(), vec![1, 2, 3]);
        assert_eq!(rules.rules[0].action, RuleAction::Allow);
        assert_eq!(rules.rules[0].priority, ALLOW_PRIORITY);
        assert_eq!(rules.rules[1].url_filter, "||a.com/");
        assert_eq!(rules.rules[2].priority, BLOCK_PRIORITY);
    }

    #[test]
    fn subdomains_other_than_www_are_not_blocked() {
        let rules = RuleSet::build(&["example.com".into()], &[]);
        assert!(rules.is_blocked("https://www.example.com/").unwrap());
        assert!(!rules.is_blocked("https://news.example.com/").unwrap());
    }

    #[test]
    fn normalizes_user_input_to_a_domain() {
        assert_eq!(normalize_domain("https://www.YouTube.com/watch?v=1").unwrap(), "youtube.com");
        assert_eq!(normalize_domain(" reddit.com ").unwrap(), "reddit.com");
        assert!(normalize_domain("").is_err());
    }
}
