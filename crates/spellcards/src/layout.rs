//! Card grid geometry.
//!
//! Lengths are English Metric Units (EMU), the unit of DrawingML:
//! 360 000 EMU per centimetre, 12 700 per point.
use std::ops::{Add, Div, Mul, Sub};

pub const EMU_PER_CM: f64 = 360_000.0;
pub const EMU_PER_PT: i64 = 12_700;

/// Cards per row and rows per page.
pub const GRID: usize = 3;
pub const CARDS_PER_PAGE: usize = GRID * GRID;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length(pub i64);

impl Length {
    pub fn cm(cm: f64) -> Self {
        Length((cm * EMU_PER_CM).round() as i64)
    }

    pub fn pt(pt: i64) -> Self {
        Length(pt * EMU_PER_PT)
    }

    pub fn emu(self) -> i64 {
        self.0
    }

    pub fn as_cm(self) -> f64 {
        self.0 as f64 / EMU_PER_CM
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<i64> for Length {
    type Output = Length;
    fn mul(self, rhs: i64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<i64> for Length {
    type Output = Length;
    fn div(self, rhs: i64) -> Length {
        Length(self.0 / rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub left: Length,
    pub top: Length,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

impl Rect {
    pub fn new(left: Length, top: Length, width: Length, height: Length) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A card's position in the 3×3 grid of one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardSlot {
    pub page_index: usize,
    pub row: usize,
    pub col: usize,
}

impl CardSlot {
    /// Row-major slot for the `index`-th entry of a page.
    pub fn from_index(page_index: usize, index: usize) -> Self {
        Self {
            page_index,
            row: index / GRID,
            col: index % GRID,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageGeometry {
    pub width: Length,
    pub height: Length,
    /// Space between neighbouring cards.
    pub gap: Length,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: Length::cm(21.0),
            height: Length::cm(29.7),
            gap: Length::cm(0.32),
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Outer size of a card and the insets of its text regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardGeometry {
    pub width: Length,
    pub height: Length,
    pub border: Length,
    pub title_gap_left: Length,
    pub title_gap_top: Length,
    pub title_gap_bottom: Length,
    pub body_gap_left: Length,
    pub body_gap_top: Length,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            width: Length::cm(6.365),
            height: Length::cm(8.89),
            border: Length::cm(0.3),
            title_gap_left: Length::cm(0.25),
            title_gap_top: Length::cm(0.25),
            title_gap_bottom: Length::cm(0.1),
            body_gap_left: Length::cm(0.4),
            body_gap_top: Length::cm(0.9),
        }
    }
}

/// Absolute rectangles of one placed card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardRegions {
    pub frame: Rect,
    pub title: Rect,
    pub level: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl CardGeometry {
    /// Side of the square level badge.
    pub fn level_size(&self) -> Length {
        self.body_gap_top - self.title_gap_bottom
    }

    fn header_height(&self) -> Length {
        self.body_gap_top - self.title_gap_bottom - self.title_gap_top
    }

    pub fn regions(&self, origin: Point) -> CardRegions {
        let Point { left, top } = origin;
        let level = self.level_size();
        CardRegions {
            frame: Rect::new(left, top, self.width, self.height),
            title: Rect::new(
                left + self.title_gap_left,
                top + self.title_gap_top,
                self.width - self.title_gap_left * 5 / 2 - level,
                self.header_height(),
            ),
            level: Rect::new(
                left + self.width - self.title_gap_left - level,
                top + self.title_gap_top / 4,
                level,
                level,
            ),
            body: Rect::new(
                left + self.body_gap_left,
                top + self.body_gap_top,
                self.width - self.body_gap_left * 2,
                self.height - self.body_gap_top * 2,
            ),
            footer: Rect::new(
                left + self.title_gap_left,
                top + self.height - self.body_gap_top + self.title_gap_bottom,
                self.width - self.title_gap_left * 2,
                self.header_height(),
            ),
        }
    }
}

/// Top-left corner of the card at `(row, col)` with the 3×3 block centred
/// on the page.
pub fn slot(
    page_width: Length,
    page_height: Length,
    card_width: Length,
    card_height: Length,
    gap: Length,
    row: usize,
    col: usize,
) -> Point {
    let n = GRID as i64;
    let left_origin = (page_width - card_width * n - gap * (n - 1)) / 2;
    let top_origin = (page_height - card_height * n - gap * (n - 1)) / 2;
    Point {
        left: left_origin + (card_width + gap) * col as i64,
        top: top_origin + (card_height + gap) * row as i64,
    }
}

/// Position of `slot` for the given page and card geometry.
pub fn place(page: &PageGeometry, card: &CardGeometry, slot_at: CardSlot) -> Point {
    slot(
        page.width,
        page.height,
        card.width,
        card.height,
        page.gap,
        slot_at.row,
        slot_at.col,
    )
}

/// Splits entries into pages of at most nine, each entry paired with its
/// row-major slot.
pub fn paginate<T>(entries: &[T]) -> Vec<Vec<(CardSlot, &T)>> {
    entries
        .chunks(CARDS_PER_PAGE)
        .enumerate()
        .map(|(page_index, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(i, entry)| (CardSlot::from_index(page_index, i), entry))
                .collect()
        })
        .collect()
}
