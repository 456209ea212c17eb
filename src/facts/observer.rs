//! Which repositories of an organization are still current, and whether each one carries a README.

use crate::facts::github::OrgRepo;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use core::fmt;

const LOG_TARGET: &str = "  observer";

/// Reason reported for a repository without a README.
pub const MISSING_README: &str = "Missing README";

/// Decides whether a repository is recent or active enough to be held to the README rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyPolicy {
    /// Repositories created after this instant are always current.
    pub created_after: DateTime<Utc>,

    /// Repositories pushed within this long of now are current.
    pub pushed_within: TimeDelta,
}

impl CurrencyPolicy {
    /// Day the observer started watching organizations; older repositories need recent pushes.
    pub const DEFAULT_CREATED_AFTER: NaiveDate = match NaiveDate::from_ymd_opt(2013, 5, 6) {
        Some(date) => date,
        None => NaiveDate::MIN,
    };

    pub const DEFAULT_PUSHED_WITHIN_DAYS: u32 = 30;

    /// A policy for repositories created after the start of `created_after` or pushed within `pushed_within_days`.
    #[must_use]
    pub fn new(created_after: NaiveDate, pushed_within_days: u32) -> Self {
        Self {
            created_after: created_after.and_time(NaiveTime::MIN).and_utc(),
            pushed_within: TimeDelta::days(i64::from(pushed_within_days)),
        }
    }

    /// Whether `repo` is current as of `now`. A repository never pushed to is not.
    #[must_use]
    pub fn is_current(&self, repo: &OrgRepo, now: DateTime<Utc>) -> bool {
        let Some(pushed_at) = repo.pushed_at else {
            log::debug!(target: LOG_TARGET, "'{}' has never been pushed", repo.full_name);
            return false;
        };

        if repo.created_at > self.created_after {
            log::debug!(target: LOG_TARGET, "'{}' created recently enough: {}", repo.full_name, repo.created_at);
            return true;
        }

        if pushed_at > crate::metrics::window_start(now, self.pushed_within) {
            log::debug!(target: LOG_TARGET, "'{}' updated recently enough: {pushed_at}", repo.full_name);
            return true;
        }

        log::debug!(target: LOG_TARGET, "'{}' is too old: {pushed_at}", repo.full_name);
        false
    }
}

impl Default for CurrencyPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CREATED_AFTER, Self::DEFAULT_PUSHED_WITHIN_DAYS)
    }
}

/// The README verdict for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub repo: String,
    pub readme_sha: Option<String>,
    pub reasons: Vec<String>,
}

impl Observation {
    /// The verdict for `repo` given the sha of its README, if it has one.
    #[must_use]
    pub fn from_readme(repo: impl Into<String>, readme_sha: Option<String>) -> Self {
        let reasons = if readme_sha.is_some() {
            Vec::new()
        } else {
            vec![MISSING_README.to_string()]
        };

        Self {
            repo: repo.into(),
            readme_sha,
            reasons,
        }
    }

    /// Whether the repository met every rule.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// `pass <repo> <sha>` or `fail <repo> <reasons>`, one line per repository.
impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "pass {} {}", self.repo, self.readme_sha.as_deref().unwrap_or_default())
        } else {
            write!(f, "fail {} {}", self.repo, self.reasons.join("; "))
        }
    }
}
