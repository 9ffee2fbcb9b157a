//! Test support utilities for spellcards.
//!
//! This module provides helper types and functions that are useful for testing
//! deck rendering, but are not part of the public API.

use std::collections::HashMap;

use serde_json::Value;

use crate::{
    deck::{DeckConfig, DeckTarget, PlacedCard},
    error::{CardError, Result},
    source::SpellSource,
};

/// A memory target useful for tests.
///
/// Captures every drawn card, grouped by page, so it can be inspected.
#[derive(Default)]
pub struct RecordingTarget {
    pub pages: Vec<Vec<PlacedCard>>,
    pub finished_pages: usize,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

impl DeckTarget for RecordingTarget {
    type Error = CardError;

    fn begin_page(&mut self, _page_index: usize, _config: &DeckConfig) -> Result<()> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn draw_card(&mut self, card: &PlacedCard, _config: &DeckConfig) -> Result<()> {
        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| CardError::Render("card drawn before first page".into()))?;
        page.push(card.clone());
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        self.finished_pages += 1;
        Ok(())
    }
}

/// In-memory records keyed by lower-cased identifier.
#[derive(Default)]
pub struct MemorySource {
    records: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, record: Value) -> Self {
        self.records.insert(id.to_lowercase(), record);
        self
    }
}

impl SpellSource for MemorySource {
    fn fetch(&self, id: &str) -> Result<Value> {
        self.records
            .get(&id.to_lowercase())
            .cloned()
            .ok_or_else(|| CardError::NotFound(id.to_string()))
    }
}
