use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use spellcards::{
    render_deck,
    test_support::{MemorySource, RecordingTarget},
    CardError, DeckConfig, Length, RecordFormat, SpellList, StyleTag,
};

fn ttg_record(name: &str, level: u32) -> Value {
    json!({
        "name": { "rus": name },
        "classes": [{ "name": "Волшебник" }],
        "description": "<p><strong>Попадание</strong>: 1к6 урона огнём.</p><p>Второй абзац.</p>",
        "source": { "shortName": "PHB" },
        "time": "1 действие",
        "duration": "Мгновенная",
        "range": "60 футов",
        "level": level,
        "school": "воплощение",
        "components": { "v": true, "s": true }
    })
}

fn source_with(count: usize) -> (SpellList, MemorySource) {
    let mut source = MemorySource::new();
    let mut content = String::from("# колода\n");
    for i in 0..count {
        let id = format!("spell-{i}");
        source = source.with(&id, ttg_record(&format!("Заклинание {i}"), i as u32 % 10));
        content.push_str(&format!("https://ttg.club/spells/{id}\n"));
    }
    (SpellList::parse(&content), source)
}

#[test]
fn ten_spells_make_two_pages() {
    let (list, source) = source_with(10);
    let config = DeckConfig::default();
    let mut target = RecordingTarget::new();
    let summary = render_deck(&list, &source, RecordFormat::Ttg, &config, &mut target).unwrap();

    assert_eq!((summary.pages, summary.cards), (2, 10));
    assert_eq!(target.pages.len(), 2);
    assert_eq!(target.finished_pages, 2);
    assert_eq!(target.pages[0].len(), 9);
    assert_eq!(target.pages[1].len(), 1);

    let last = &target.pages[1][0];
    assert_eq!((last.slot.page_index, last.slot.row, last.slot.col), (1, 0, 0));
    assert_eq!(last.text.title, "Заклинание 9");
    assert_eq!(last.regions, target.pages[0][0].regions);
}

#[test]
fn cards_fill_rows_left_to_right() {
    let (list, source) = source_with(9);
    let config = DeckConfig::default();
    let mut target = RecordingTarget::new();
    render_deck(&list, &source, RecordFormat::Ttg, &config, &mut target).unwrap();

    let page = &target.pages[0];
    let step_x = config.card.width + config.page.gap;
    let step_y = config.card.height + config.page.gap;
    assert_eq!(page[1].regions.frame.left - page[0].regions.frame.left, step_x);
    assert_eq!(page[3].regions.frame.top - page[0].regions.frame.top, step_y);
    assert_eq!(page[4].slot.row, 1);
    assert_eq!(page[4].slot.col, 1);
    assert_eq!(page[0].regions.frame.width, Length::cm(6.365));
}

#[test]
fn composed_card_text() {
    let (list, source) = source_with(1);
    let mut target = RecordingTarget::new();
    render_deck(
        &list,
        &source,
        RecordFormat::Ttg,
        &DeckConfig::default(),
        &mut target,
    )
    .unwrap();

    let text = &target.pages[0][0].text;
    assert_eq!(text.level, 0);
    assert_eq!(text.footer, "Воплощение — В, С — 60 футов — PHB");

    let lines = text.body.lines();
    assert_eq!(lines[0][0].text, "Длительность: Мгновенная");
    assert_eq!(lines[0][0].style, StyleTag::Stat);
    assert_eq!(lines[1][0].text, "Активация: 1 действие");
    let hit: Vec<_> = lines[2].iter().map(|r| (r.text.as_str(), r.style)).collect();
    assert_eq!(
        hit,
        vec![
            ("Попадание", StyleTag::Bold),
            (": ", StyleTag::Plain),
            ("1к6", StyleTag::DiceColor),
            (" урона огнём.", StyleTag::Plain),
        ]
    );
    assert_eq!(lines[3][0].text, "Второй абзац.");
    assert_eq!(lines.len(), 4);
}

#[test]
fn first_missing_spell_aborts_the_run() {
    let (_, source) = source_with(3);
    let list = SpellList::parse("spell-0\nfireball\nspell-1\n");
    let mut target = RecordingTarget::new();
    let err = render_deck(
        &list,
        &source,
        RecordFormat::Ttg,
        &DeckConfig::default(),
        &mut target,
    )
    .unwrap_err();

    assert!(matches!(err, CardError::NotFound(ref id) if id == "fireball"));
    assert_eq!(target.card_count(), 1);
    assert_eq!(target.finished_pages, 0);
}

#[test]
fn malformed_record_names_the_spell() {
    let source = MemorySource::new().with("broken", json!({ "name": "нет" }));
    let list = SpellList::parse("broken\n");
    let mut target = RecordingTarget::new();
    let err = render_deck(
        &list,
        &source,
        RecordFormat::Ttg,
        &DeckConfig::default(),
        &mut target,
    )
    .unwrap_err();
    assert!(matches!(err, CardError::MalformedRecord { ref id, .. } if id == "broken"));
}

#[test]
fn empty_list_renders_nothing() {
    let mut target = RecordingTarget::new();
    let summary = render_deck(
        &SpellList::default(),
        &MemorySource::new(),
        RecordFormat::Ttg,
        &DeckConfig::default(),
        &mut target,
    )
    .unwrap();
    assert_eq!((summary.pages, summary.cards), (0, 0));
    assert!(target.pages.is_empty());
}
