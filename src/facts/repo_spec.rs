use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::bail;
use url::Url;

/// A GitHub repository named as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    owner: Box<str>,
    repo: Box<str>,
}

impl RepoSpec {
    /// Parse `owner/name`, or a `https://github.com/owner/name` URL.
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();

        if id.contains("://") {
            let Ok(url) = Url::parse(id) else {
                bail!("invalid repository URL: {id}");
            };
            return Self::from_url(&url);
        }

        let mut parts = id.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) => Self::from_parts(owner, repo, id),
            _ => bail!("invalid repository identifier '{id}', expected 'owner/name'"),
        }
    }

    fn from_url(url: &Url) -> Result<Self> {
        if url.host_str() != Some("github.com") {
            bail!("not a GitHub URL: {url}");
        }

        let segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();
        if segments.len() < 2 {
            bail!("invalid repository URL format: {url}");
        }

        Self::from_parts(segments[0], segments[1].trim_end_matches(".git"), url.as_str())
    }

    fn from_parts(owner: &str, repo: &str, original: &str) -> Result<Self> {
        if owner.is_empty() || repo.is_empty() {
            bail!("invalid repository identifier '{original}': empty owner or repo name");
        }

        let valid = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid(owner) || !valid(repo) {
            bail!("invalid repository identifier '{original}': unexpected characters");
        }

        Ok(Self {
            owner: Box::from(owner),
            repo: Box::from(repo),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier() {
        let spec = RepoSpec::parse("octo/repo").unwrap();
        assert_eq!(spec.owner(), "octo");
        assert_eq!(spec.repo(), "repo");
        assert_eq!(spec.to_string(), "octo/repo");
    }

    #[test]
    fn test_parse_url() {
        let spec = RepoSpec::parse("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(spec.owner(), "rust-lang");
        assert_eq!(spec.repo(), "rust");
    }

    #[test]
    fn test_rejects_ill_formed() {
        for id in ["", "octo", "octo/", "/repo", "a/b/c", "octo/re po", "https://gitlab.com/a/b", "https://github.com/a"] {
            let _ = RepoSpec::parse(id).unwrap_err();
        }
    }
}
