use spellcards::{
    segment::RunFont, DeckConfig, DeckTarget, PlacedCard, Segment, StyledDocument,
};
use std::fmt::Write;

const RESET: &str = "\x1B[0m";

fn sgr(font: RunFont) -> String {
    let mut codes = Vec::new();
    if font.bold {
        codes.push("1".to_string());
    }
    if font.italic {
        codes.push("3".to_string());
    }
    if let Some(c) = font.color {
        codes.push(format!("38;2;{};{};{}", c.0, c.1, c.2));
    }
    if codes.is_empty() {
        String::new()
    } else {
        format!("\x1B[{}m", codes.join(";"))
    }
}

/// Prints deck pages as ANSI-styled text, one block per card.
pub struct ConsoleRenderer {
    lines: Vec<String>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn into_ansi_string(self) -> String {
        self.lines.join("\n")
    }

    fn push_body(&mut self, body: &StyledDocument) -> std::fmt::Result {
        let mut line = String::new();
        for segment in &body.segments {
            match segment {
                Segment::Run(run) => {
                    let style = sgr(run.style.font());
                    if style.is_empty() {
                        line.push_str(&run.text);
                    } else {
                        write!(line, "{style}{}{RESET}", run.text)?;
                    }
                }
                Segment::Break => self.lines.push(format!("  {}", std::mem::take(&mut line))),
            }
        }
        if !line.is_empty() {
            self.lines.push(format!("  {line}"));
        }
        Ok(())
    }
}

impl DeckTarget for ConsoleRenderer {
    type Error = std::fmt::Error;

    fn begin_page(&mut self, page_index: usize, _config: &DeckConfig) -> std::fmt::Result {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("=== Page {} ===", page_index + 1));
        Ok(())
    }

    fn draw_card(&mut self, card: &PlacedCard, _config: &DeckConfig) -> std::fmt::Result {
        let text = &card.text;
        self.lines.push(String::new());
        self.lines.push(format!(
            "[{},{}] \x1B[1m{}{RESET} \x1B[38;2;175;0;0m({}){RESET}",
            card.slot.row, card.slot.col, text.title, text.level
        ));
        self.push_body(&text.body)?;
        self.lines.push(format!("  \x1B[2m{}{RESET}", text.footer));
        Ok(())
    }
}
