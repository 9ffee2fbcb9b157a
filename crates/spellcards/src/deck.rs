//! Deck rendering: fetch, parse, compose and place every card of a list,
//! then hand it to a [`DeckTarget`].
use std::fmt::Display;

use crate::{
    compose::CardText,
    error::{CardError, Result},
    layout::{place, CardGeometry, CardRegions, CardSlot, PageGeometry},
    list::SpellList,
    source::SpellSource,
    spell::RecordFormat,
};

/// Layout and typography of a deck. Owned by the caller and passed down to
/// every target call; nothing here is looked up globally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckConfig {
    pub page: PageGeometry,
    pub card: CardGeometry,
    pub font_family: String,
    pub title_font_size_pt: u32,
    pub level_font_size_pt: u32,
    pub body_font_size_pt: u32,
    pub footer_font_size_pt: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::a4(),
            card: CardGeometry::default(),
            font_family: "Open Sans".to_string(),
            title_font_size_pt: 11,
            level_font_size_pt: 15,
            body_font_size_pt: 10,
            footer_font_size_pt: 7,
        }
    }
}

/// A composed card with its absolute position on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedCard {
    pub slot: CardSlot,
    pub regions: CardRegions,
    pub text: CardText,
}

/// Something cards can be drawn onto, page by page.
pub trait DeckTarget {
    type Error: Display;

    fn begin_page(&mut self, page_index: usize, config: &DeckConfig)
        -> std::result::Result<(), Self::Error>;

    fn draw_card(
        &mut self,
        card: &PlacedCard,
        config: &DeckConfig,
    ) -> std::result::Result<(), Self::Error>;

    /// Called after the last card of a page. Default does nothing.
    fn end_page(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeckSummary {
    pub pages: usize,
    pub cards: usize,
}

fn render_error(e: impl Display) -> CardError {
    CardError::Render(e.to_string())
}

/// Fetches, parses and composes one card for `slot`.
pub fn prepare_card<S: SpellSource + ?Sized>(
    id: &str,
    slot: CardSlot,
    source: &S,
    format: RecordFormat,
    config: &DeckConfig,
) -> Result<PlacedCard> {
    let raw = source.fetch(id)?;
    let spell = format.parse(id, raw)?;
    let origin = place(&config.page, &config.card, slot);
    Ok(PlacedCard {
        slot,
        regions: config.card.regions(origin),
        text: CardText::compose(&spell),
    })
}

/// Renders every entry of `list`. The first failing spell aborts the run.
pub fn render_deck<S, T>(
    list: &SpellList,
    source: &S,
    format: RecordFormat,
    config: &DeckConfig,
    target: &mut T,
) -> Result<DeckSummary>
where
    S: SpellSource + ?Sized,
    T: DeckTarget,
{
    let mut summary = DeckSummary::default();
    for (page_index, page) in list.pages().into_iter().enumerate() {
        tracing::debug!(page = page_index, cards = page.len(), "rendering page");
        target
            .begin_page(page_index, config)
            .map_err(render_error)?;
        for (slot, id) in page {
            let card = prepare_card(id, slot, source, format, config)?;
            tracing::debug!(spell = %id, row = slot.row, col = slot.col, "placing card");
            target.draw_card(&card, config).map_err(render_error)?;
            summary.cards += 1;
        }
        target.end_page().map_err(render_error)?;
        summary.pages += 1;
    }
    tracing::info!(pages = summary.pages, cards = summary.cards, "deck rendered");
    Ok(summary)
}
