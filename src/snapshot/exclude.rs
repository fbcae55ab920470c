// src/snapshot/exclude.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled exclusion globs for the initial walk.
///
/// Patterns are matched against paths relative to the watch root, using
/// forward slashes (e.g. `".git/**"`, `"target/**"`, `"**/*.swp"`).
#[derive(Clone)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl fmt::Debug for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludeSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl ExcludeSet {
    /// An exclusion set that matches nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: None,
        }
    }

    pub fn new(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::empty());
        }

        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let glob = Glob::new(pat)
                .with_context(|| format!("invalid glob pattern: {pat}"))?;
            builder.add(glob);
        }

        Ok(Self {
            patterns: patterns.to_vec(),
            set: Some(builder.build()?),
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_none()
    }

    /// Returns true if the root-relative path should be left out of the store.
    pub fn matches(&self, rel_path: &str) -> bool {
        match &self.set {
            Some(set) => set.is_match(rel_path),
            None => false,
        }
    }
}
