//! Domain models for embed requests, source locations, and line selections.

use std::fmt;

use serde::Serialize;

/// Prefix marking a location inside the local store rather than a remote URL.
pub const LOCAL_SCHEME: &str = "vault://";

/// Canonical set of 1-based line indices, sorted ascending without duplicates.
///
/// An empty set means "no filtering": every line of the source is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LineSet(Vec<usize>);

impl LineSet {
    /// Build a set from arbitrary indices, dropping zeros and duplicates.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut lines: Vec<usize> = indices.into_iter().filter(|line| *line > 0).collect();
        lines.sort_unstable();
        lines.dedup();
        Self(lines)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Collapse the set into inclusive `(start, end)` runs of consecutive lines.
    pub fn runs(&self) -> Vec<(usize, usize)> {
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for line in self.iter() {
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == line => *end = line,
                _ => runs.push((line, line)),
            }
        }
        runs
    }
}

/// Renders the canonical range syntax, e.g. `3-5,9`.
impl fmt::Display for LineSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (start, end)) in self.runs().into_iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }
        Ok(())
    }
}

/// Where the content of an embed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// Path inside the local store, scheme prefix already stripped.
    Local(String),
    /// Anything else is fetched over HTTP.
    Remote(String),
}

impl SourceDescriptor {
    /// Classify a location string by its scheme prefix.
    pub fn classify(location: &str) -> Self {
        match location.strip_prefix(LOCAL_SCHEME) {
            Some(path) => SourceDescriptor::Local(path.to_owned()),
            None => SourceDescriptor::Remote(location.to_owned()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, SourceDescriptor::Local(_))
    }
}

/// One self-contained instruction to resolve, filter, and label a text excerpt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedRequest {
    pub location: Option<String>,
    pub lines: Option<String>,
    pub title: Option<String>,
    pub language: String,
}

impl EmbedRequest {
    pub fn new(location: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            lines: None,
            title: None,
            language: language.into(),
        }
    }

    pub fn with_lines(mut self, lines: impl Into<String>) -> Self {
        self.lines = Some(lines.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Assembled excerpt ready to be wrapped in a code block by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub text: String,
    pub title: String,
    pub language: String,
}
