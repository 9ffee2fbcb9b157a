//! spellcards: printable spell cards from spell records.
//! Markup normalization, styled runs, card composition, 3x3 page layout and
//! presentation output.

pub mod compose;
pub mod deck;
mod error;
pub mod layout;
pub mod list;
pub mod markup;
pub mod pptx;
pub mod segment;
pub mod source;
pub mod spell;

pub use compose::CardText;
pub use deck::{render_deck, DeckConfig, DeckSummary, DeckTarget, PlacedCard};
pub use error::{CardError, Result};
pub use layout::{CardGeometry, CardRegions, CardSlot, Length, PageGeometry, Point, Rect};
pub use list::SpellList;
pub use markup::normalize;
pub use pptx::PptxWriter;
pub use segment::{segment, style_description, Rgb, Segment, StyleTag, StyledDocument, StyledRun};
pub use source::{CachedSource, Download, LocalSource, SpellSource};
#[cfg(feature = "http")]
pub use source::{TtgClient, DEFAULT_TTG_BASE_URL};
pub use spell::{Components, RecordFormat, SpellRecord};

// Test utilities
pub mod test_support;
