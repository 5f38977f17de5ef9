use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the denylist file looked up in the working directory by default.
pub const DEFAULT_DENYLIST_FILE: &str = ".urlignore";

/// Patterns of request targets that must not end up in generated programs.
///
/// A request is denied when its target URL contains any pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Denylist {
    patterns: Vec<String>,
}

impl Denylist {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::empty();
        for p in patterns {
            let p = p.into();
            if !p.is_empty() && !list.patterns.contains(&p) {
                list.patterns.push(p);
            }
        }
        list
    }

    /// Parses one pattern per line; trailing whitespace and blank lines are ignored.
    pub fn parse(content: &str) -> Self {
        Self::from_patterns(content.lines().map(str::trim_end))
    }

    /// Reads a denylist file. An unreadable file means an empty denylist.
    pub fn from_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Could not read denylist file");
                Self::empty()
            }
        }
    }

    pub fn is_denied(&self, target: &str) -> bool {
        self.patterns.iter().any(|p| target.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_substring() {
        let d = Denylist::parse("google\n\nfacebook  \n");
        assert_eq!(d.patterns().len(), 2);
        assert!(d.is_denied("https://www.google.com"));
        assert!(d.is_denied("https://facebook.com/tr"));
        assert!(!d.is_denied("https://example.com"));
    }

    #[test]
    fn missing_file_is_empty() {
        let d = Denylist::from_file(Path::new("/definitely/not/here/.urlignore"));
        assert!(d.is_empty());
    }
}
