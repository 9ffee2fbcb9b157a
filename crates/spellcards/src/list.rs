//! Spell list files: one spell name or URL per line.
use std::{fs, path::Path};

use crate::{
    error::Result,
    layout::{paginate, CardSlot},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellList {
    pub entries: Vec<String>,
}

impl SpellList {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// `#` lines are comments and blank lines are skipped. For URLs only the
    /// last non-empty path segment is kept.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(|line| {
                let line = line.trim();
                if line.starts_with("http") {
                    let path = line.trim_end_matches('/');
                    path.rsplit('/').next().unwrap_or(path).trim()
                } else {
                    line
                }
            })
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped into pages of nine, in file order.
    pub fn pages(&self) -> Vec<Vec<(CardSlot, &String)>> {
        paginate(&self.entries)
    }
}
