//! Card text composition: title, level, body document and footer line.
use crate::{
    segment::{style_description, StyleTag, StyledDocument, StyledRun},
    spell::{Components, SpellRecord},
};

/// Everything a renderer writes onto one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub level: u32,
    pub body: StyledDocument,
    pub footer: String,
}

impl CardText {
    pub fn compose(spell: &SpellRecord) -> Self {
        Self {
            title: spell.name.clone(),
            level: spell.level,
            body: compose_body(spell),
            footer: compose_footer(spell),
        }
    }
}

fn stat_line(doc: &mut StyledDocument, label: &str, value: &str) {
    doc.push_run(StyledRun::new(format!("{label}: {value}"), StyleTag::Stat));
    doc.push_break();
}

/// Stat lines (materials only when present, duration, activation) followed
/// by the styled description.
pub fn compose_body(spell: &SpellRecord) -> StyledDocument {
    let mut doc = StyledDocument::new();
    if let Some(material) = &spell.components.material {
        stat_line(&mut doc, "Материалы", material);
    }
    stat_line(&mut doc, "Длительность", &spell.duration);
    stat_line(&mut doc, "Активация", &spell.activation);
    doc.extend(style_description(&spell.description_markup));
    doc
}

/// Component letters in vocal, somatic, material order.
pub fn component_letters(components: &Components) -> String {
    [
        components.vocal.then_some("В"),
        components.somatic.then_some("С"),
        components.material.as_ref().map(|_| "М"),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ")
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn compose_footer(spell: &SpellRecord) -> String {
    format!(
        "{} — {} — {} — {}",
        capitalize(&spell.school),
        component_letters(&spell.components),
        spell.range,
        spell.source
    )
}
