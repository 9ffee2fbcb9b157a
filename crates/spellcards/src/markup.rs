//! Description markup normalizer.
//!
//! Spell descriptions arrive as a small, closed dialect of HTML (paragraphs,
//! lists, links, tooltip and dice-roller wrappers, a few semantic `span`
//! classes). [`normalize`] rewrites that dialect into an intermediate tagged
//! text made of three kinds of markers:
//!
//! - [`BLOCK_SEPARATOR`] ends a paragraph, list item or blockquote,
//! - [`RUN_BREAK`] cuts a paragraph into separately styled runs,
//! - an inline style prefix at the start of a run ([`BOLD`], [`ITALIC`],
//!   [`STAT`], [`SAVE_THROW`] or a `#rrggbb` color literal).
//!
//! The rewrite is an ordered list of named [`Stage`]s. Each stage documents
//! which markers it expects earlier stages to have produced; reordering them
//! changes the output. Markup outside the dialect passes through untouched.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Forced paragraph break (vertical tab).
pub const BLOCK_SEPARATOR: char = '\u{0B}';
/// Boundary between two differently styled runs of one paragraph.
pub const RUN_BREAK: char = '\n';

pub const BOLD: &str = "#!bold";
pub const ITALIC: &str = "#!italic";
pub const STAT: &str = "#!stats";
pub const SAVE_THROW: &str = "#!save_throw";

pub const DISADVANTAGE_HEX: &str = "#dd0000";
pub const ADVANTAGE_HEX: &str = "#00dd00";
pub const DICE_HEX: &str = "#3333ff";

/// One named rewrite of the normalizer pipeline.
pub struct Stage {
    pub name: &'static str,
    rewrite: fn(&str) -> Cow<'_, str>,
}

impl Stage {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        (self.rewrite)(text)
    }
}

static STAGES: [Stage; 13] = [
    Stage {
        name: "block-tags",
        rewrite: strip_block_tags,
    },
    Stage {
        name: "quote-entities",
        rewrite: replace_quote_entities,
    },
    Stage {
        name: "tooltip-links",
        rewrite: collapse_tooltip_links,
    },
    Stage {
        name: "bare-links",
        rewrite: collapse_links,
    },
    Stage {
        name: "list-items",
        rewrite: bullet_list_items,
    },
    Stage {
        name: "saving-throws",
        rewrite: mark_saving_throws,
    },
    Stage {
        name: "disadvantage",
        rewrite: mark_disadvantage,
    },
    Stage {
        name: "advantage",
        rewrite: mark_advantage,
    },
    Stage {
        name: "dice-roller",
        rewrite: collapse_dice_rollers,
    },
    Stage {
        name: "generic-spans",
        rewrite: reflow_generic_spans,
    },
    Stage {
        name: "dice-notation",
        rewrite: color_dice_notation,
    },
    Stage {
        name: "strong",
        rewrite: mark_strong,
    },
    Stage {
        name: "em",
        rewrite: mark_em,
    },
];

/// The rewrite stages in the order [`normalize`] applies them.
pub fn stages() -> &'static [Stage] {
    &STAGES
}

/// Rewrites description markup into the intermediate tagged text.
pub fn normalize(markup: &str) -> String {
    let mut text = markup.to_string();
    for stage in stages() {
        let rewritten = match stage.apply(&text) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(rewritten) => rewritten,
        };
        tracing::trace!(stage = stage.name, "description rewritten");
        text = rewritten;
    }
    if let Some(tag) = LEFTOVER_TAG.find(&text) {
        tracing::trace!(tag = tag.as_str(), "unrecognized markup left in description");
    }
    text
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("markup pattern is invalid")
}

const BLOCK_TAGS: [(&str, &str); 7] = [
    ("<p>", ""),
    ("</p>", "\u{0B}"),
    ("<blockquote>", ""),
    ("</blockquote>", "\u{0B}"),
    ("<ul>", ""),
    ("</ul>", "\u{0B}"),
    ("&nbsp;", ""),
];

// Runs first: every later stage may assume block containers are gone and
// paragraph ends are already BLOCK_SEPARATOR.
fn strip_block_tags(text: &str) -> Cow<'_, str> {
    if !BLOCK_TAGS.iter().any(|(tag, _)| text.contains(tag)) {
        return Cow::Borrowed(text);
    }
    let mut out = text.to_string();
    for (tag, replacement) in BLOCK_TAGS {
        out = out.replace(tag, replacement);
    }
    Cow::Owned(out)
}

fn replace_quote_entities(text: &str) -> Cow<'_, str> {
    if !text.contains("&laquo;") && !text.contains("&raquo;") {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("&laquo;", "\"").replace("&raquo;", "\""))
}

static TOOLTIP_LINK: Lazy<Regex> = Lazy::new(|| {
    regex(r#"<detail-tooltip type=".+?"><a href=".+?">(.+?)</a></detail-tooltip>"#)
});
static LINK: Lazy<Regex> = Lazy::new(|| regex(r#"<a href=".+?">(.+?)</a>"#));

// Must precede bare-links, otherwise the anchor inside the tooltip is
// collapsed first and the tooltip wrapper no longer matches.
fn collapse_tooltip_links(text: &str) -> Cow<'_, str> {
    TOOLTIP_LINK.replace_all(text, "${1}")
}

fn collapse_links(text: &str) -> Cow<'_, str> {
    LINK.replace_all(text, "${1}")
}

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| regex(r"<li>(.+?)</li>"));

// Links inside items are already plain text here.
fn bullet_list_items(text: &str) -> Cow<'_, str> {
    LIST_ITEM.replace_all(text, "· ${1}\u{0B}")
}

static SAVING_THROW: Lazy<Regex> =
    Lazy::new(|| regex(r#"<span class="saving_throw">([а-яА-ЯёЁ\s]+)</span>"#));
static DISADVANTAGE: Lazy<Regex> =
    Lazy::new(|| regex(r#"<span class="disadvantage">([а-яА-ЯёЁ\s]+)</span>"#));
static ADVANTAGE: Lazy<Regex> =
    Lazy::new(|| regex(r#"<span class="advantage">([а-яА-ЯёЁ\s]+)</span>"#));

// The three semantic span stages must run before generic-spans, which would
// otherwise swallow them as plain reflow points.
fn mark_saving_throws(text: &str) -> Cow<'_, str> {
    SAVING_THROW.replace_all(text, "\n#!save_throw${1}\n")
}

fn mark_disadvantage(text: &str) -> Cow<'_, str> {
    DISADVANTAGE.replace_all(text, "\n#dd0000${1}\n")
}

fn mark_advantage(text: &str) -> Cow<'_, str> {
    ADVANTAGE.replace_all(text, "\n#00dd00${1}\n")
}

static DICE_ROLLER: Lazy<Regex> =
    Lazy::new(|| regex(r#"<dice-roller formula=".+?"( label=".+?")?>(.+?)</dice-roller>"#));

// Leaves the visible formula in place so dice-notation can color it.
fn collapse_dice_rollers(text: &str) -> Cow<'_, str> {
    DICE_ROLLER.replace_all(text, "${2}")
}

static GENERIC_SPAN: Lazy<Regex> = Lazy::new(|| regex(r#"<span .+?=".+?">(.+?)</span>"#));

fn reflow_generic_spans(text: &str) -> Cow<'_, str> {
    GENERIC_SPAN.replace_all(text, "\n${1}\n")
}

// An already colored token is matched together with its marker and kept as
// is, so a second pass over normalized text does not wrap it twice.
static DICE_NOTATION: Lazy<Regex> = Lazy::new(|| {
    regex(&format!(
        r"({})?((?:\d*к\d+)+)",
        regex::escape(DICE_HEX)
    ))
});

// Runs after every tag-collapsing stage so formulas hidden in attributes
// are gone, and before strong/em so a bare formula is never inside a
// half-rewritten emphasis tag.
fn color_dice_notation(text: &str) -> Cow<'_, str> {
    DICE_NOTATION.replace_all(text, |caps: &Captures| {
        if caps.get(1).is_some() {
            caps[0].to_string()
        } else {
            format!("{RUN_BREAK}{DICE_HEX}{}{RUN_BREAK}", &caps[2])
        }
    })
}

static STRONG: Lazy<Regex> = Lazy::new(|| regex(r"<strong>(.+?)</strong>"));
static EM: Lazy<Regex> = Lazy::new(|| regex(r"<em>(.+?)</em>"));

fn mark_strong(text: &str) -> Cow<'_, str> {
    STRONG.replace_all(text, "\n#!bold${1}\n")
}

fn mark_em(text: &str) -> Cow<'_, str> {
    EM.replace_all(text, "\n#!italic${1}\n")
}

static LEFTOVER_TAG: Lazy<Regex> = Lazy::new(|| regex(r"</?[a-zA-Z][a-zA-Z-]*[^>]*>"));

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_untouched() {
        let text = "Вы касаетесь существа. Оно восстанавливает хиты.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn paragraphs_become_block_separators() {
        assert_eq!(normalize("<p>один</p><p>два</p>"), "один\u{0B}два\u{0B}");
    }

    #[test]
    fn nbsp_is_dropped_and_quotes_unfolded() {
        assert_eq!(
            normalize("слово&nbsp;&laquo;цитата&raquo;"),
            "слово\"цитата\""
        );
    }

    #[test]
    fn tooltip_collapses_to_link_text() {
        let markup =
            r#"<detail-tooltip type="condition"><a href="/screen/1">испуганным</a></detail-tooltip>"#;
        assert_eq!(normalize(markup), "испуганным");
    }

    #[test]
    fn bare_link_collapses_to_text() {
        assert_eq!(
            normalize(r#"см. <a href="/spells/shield">щит</a>."#),
            "см. щит."
        );
    }

    #[test]
    fn list_items_get_bullets() {
        assert_eq!(
            normalize("<ul><li>раз</li><li>два</li></ul>"),
            "· раз\u{0B}· два\u{0B}\u{0B}"
        );
    }

    #[test]
    fn semantic_spans_get_markers() {
        assert_eq!(
            normalize(r#"<span class="saving_throw">Ловкости</span>"#),
            "\n#!save_throwЛовкости\n"
        );
        assert_eq!(
            normalize(r#"<span class="disadvantage">помеха</span>"#),
            "\n#dd0000помеха\n"
        );
        assert_eq!(
            normalize(r#"<span class="advantage">преимущество</span>"#),
            "\n#00dd00преимущество\n"
        );
    }

    #[test]
    fn saving_throw_with_latin_text_falls_to_generic_span() {
        assert_eq!(
            normalize(r#"<span class="saving_throw">Dex</span>"#),
            "\nDex\n"
        );
    }

    #[test]
    fn dice_roller_keeps_formula_and_colors_it() {
        let markup = r#"<dice-roller formula="8к6" label="Урон">8к6</dice-roller> урона"#;
        assert_eq!(normalize(markup), "\n#3333ff8к6\n урона");
    }

    #[test]
    fn dice_without_count_is_colored() {
        assert_eq!(normalize("бросок к20"), "бросок \n#3333ffк20\n");
    }

    #[test]
    fn strong_and_em_get_markers() {
        assert_eq!(
            normalize("<strong>На больших уровнях.</strong> <em>шёпот</em>"),
            "\n#!boldНа больших уровнях.\n \n#!italicшёпот\n"
        );
    }

    #[test]
    fn unknown_tags_pass_through() {
        let markup = "<table><tr><td>x</td></tr></table>";
        assert_eq!(normalize(markup), markup);
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let once = normalize(
            r#"<p><strong>Hit</strong>: 2к6 огнём, <span class="saving_throw">Ловкость</span></p><ul><li>a</li></ul>"#,
        );
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn stage_order_is_stable() {
        let names: Vec<_> = stages().iter().map(|s| s.name).collect();
        assert_eq!(names.first(), Some(&"block-tags"));
        assert_eq!(names.last(), Some(&"em"));
        let dice = names.iter().position(|n| *n == "dice-notation");
        let strong = names.iter().position(|n| *n == "strong");
        assert!(dice < strong);
    }
}
