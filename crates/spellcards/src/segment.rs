//! Splits normalized description text into styled runs.
use crate::markup::{self, BLOCK_SEPARATOR, BOLD, ITALIC, RUN_BREAK, SAVE_THROW, STAT};

/// 24-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parses `rrggbb` (no leading `#`), lowercase hex digits only.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6
            || !hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Uppercase `RRGGBB`, as stored in DrawingML `srgbClr`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const SAVE_THROW_COLOR: Rgb = Rgb(254, 94, 0);
pub const DISADVANTAGE_COLOR: Rgb = Rgb(0xdd, 0x00, 0x00);
pub const ADVANTAGE_COLOR: Rgb = Rgb(0x00, 0xdd, 0x00);
pub const DICE_COLOR: Rgb = Rgb(0x33, 0x33, 0xff);

/// Stat lines are set in a reduced size.
pub const STAT_FONT_SIZE_PT: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleTag {
    Plain,
    Bold,
    Italic,
    Stat,
    SaveThrow,
    DisadvantageColor,
    AdvantageColor,
    DiceColor,
    CustomHex(Rgb),
}

/// Font attributes a renderer applies on top of the text box defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunFont {
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Rgb>,
    pub size_pt: Option<u32>,
}

impl StyleTag {
    fn from_hex_marker(rgb: Rgb) -> Self {
        match rgb {
            DISADVANTAGE_COLOR => StyleTag::DisadvantageColor,
            ADVANTAGE_COLOR => StyleTag::AdvantageColor,
            DICE_COLOR => StyleTag::DiceColor,
            other => StyleTag::CustomHex(other),
        }
    }

    pub fn color(self) -> Option<Rgb> {
        match self {
            StyleTag::SaveThrow => Some(SAVE_THROW_COLOR),
            StyleTag::DisadvantageColor => Some(DISADVANTAGE_COLOR),
            StyleTag::AdvantageColor => Some(ADVANTAGE_COLOR),
            StyleTag::DiceColor => Some(DICE_COLOR),
            StyleTag::CustomHex(rgb) => Some(rgb),
            StyleTag::Plain | StyleTag::Bold | StyleTag::Italic | StyleTag::Stat => None,
        }
    }

    pub fn font(self) -> RunFont {
        RunFont {
            bold: self == StyleTag::Bold,
            italic: matches!(self, StyleTag::Italic | StyleTag::Stat),
            color: self.color(),
            size_pt: (self == StyleTag::Stat).then_some(STAT_FONT_SIZE_PT),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: StyleTag,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: StyleTag) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, StyleTag::Plain)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Run(StyledRun),
    /// Forced line break ending a paragraph.
    Break,
}

/// Ordered styled runs and forced breaks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledDocument {
    pub segments: Vec<Segment>,
}

impl StyledDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_run(&mut self, run: StyledRun) {
        self.segments.push(Segment::Run(run));
    }

    pub fn push_break(&mut self) {
        self.segments.push(Segment::Break);
    }

    pub fn extend(&mut self, other: StyledDocument) {
        self.segments.extend(other.segments);
    }

    pub fn runs(&self) -> impl Iterator<Item = &StyledRun> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Run(run) => Some(run),
            Segment::Break => None,
        })
    }

    pub fn break_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Break))
            .count()
    }

    /// Concatenated run text, ignoring styles and breaks.
    pub fn visible_text(&self) -> String {
        self.runs().map(|r| r.text.as_str()).collect()
    }

    /// Groups runs into the lines delimited by breaks. A trailing group
    /// without a closing break is included.
    pub fn lines(&self) -> Vec<Vec<&StyledRun>> {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Run(run) => current.push(run),
                Segment::Break => lines.push(std::mem::take(&mut current)),
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Classifies one run by its leading style marker.
pub fn classify_run(run: &str) -> StyledRun {
    const PREFIXES: [(&str, StyleTag); 4] = [
        (BOLD, StyleTag::Bold),
        (STAT, StyleTag::Stat),
        (ITALIC, StyleTag::Italic),
        (SAVE_THROW, StyleTag::SaveThrow),
    ];
    for (prefix, style) in PREFIXES {
        if let Some(text) = run.strip_prefix(prefix) {
            return StyledRun::new(text, style);
        }
    }
    if let Some(rgb) = run
        .strip_prefix('#')
        .and_then(|rest| rest.get(..6))
        .and_then(Rgb::from_hex)
    {
        return StyledRun::new(&run[7..], StyleTag::from_hex_marker(rgb));
    }
    StyledRun::plain(run)
}

/// Splits intermediate text into paragraphs and runs.
///
/// Each paragraph is closed by a [`Segment::Break`]. Empty runs are dropped;
/// an empty tail after the final block separator does not open a new
/// paragraph.
pub fn segment(intermediate: &str) -> StyledDocument {
    let mut doc = StyledDocument::new();
    let mut paragraphs: Vec<&str> = intermediate.split(BLOCK_SEPARATOR).collect();
    if paragraphs.len() > 1 && paragraphs.last().is_some_and(|p| p.is_empty()) {
        paragraphs.pop();
    }
    for paragraph in paragraphs {
        for run in paragraph.split(RUN_BREAK) {
            if run.is_empty() {
                continue;
            }
            let styled = classify_run(run);
            if !styled.text.is_empty() {
                doc.push_run(styled);
            }
        }
        doc.push_break();
    }
    doc
}

/// Normalizes and segments description markup in one step.
pub fn style_description(markup: &str) -> StyledDocument {
    segment(&markup::normalize(markup))
}
