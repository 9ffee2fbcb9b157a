use std::io::Read;

use serde_json::json;
use spellcards::{
    render_deck, test_support::MemorySource, DeckConfig, PptxWriter, RecordFormat, SpellList,
};

#[test]
fn deck_saves_as_presentation() {
    let source = MemorySource::new().with(
        "shield",
        json!({
            "name": "Щит",
            "classes": ["Волшебник"],
            "system": {
                "description": { "value": "<p>Невидимый барьер &amp; <em>защита</em>.</p>" },
                "source": "PHB",
                "activation": { "cost": 1, "type": "реакция" },
                "duration": { "value": 1, "units": "раунд" },
                "range": { "value": null, "units": "на себя" },
                "level": 1,
                "school": "ограждение",
                "components": { "vocal": true, "somatic": true }
            }
        }),
    );
    let list = SpellList::parse("shield\n");
    let config = DeckConfig::default();
    let mut writer = PptxWriter::new();
    render_deck(&list, &source, RecordFormat::Lss, &config, &mut writer).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    writer.save(&path).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert!(archive.by_name("ppt/presentation.xml").is_ok());
    assert!(archive.by_name("ppt/slides/slide2.xml").is_err());

    let mut slide = String::new();
    archive
        .by_name("ppt/slides/slide1.xml")
        .unwrap()
        .read_to_string(&mut slide)
        .unwrap();
    assert!(slide.contains("<a:t>Щит</a:t>"));
    assert!(slide.contains("Длительность: 1 раунд"));
    assert!(slide.contains("<a:t>Невидимый барьер &amp;amp; </a:t>"));
    assert!(slide.contains("Ограждение — В, С — на себя — PHB"));

    let mut theme = String::new();
    archive
        .by_name("ppt/theme/theme1.xml")
        .unwrap()
        .read_to_string(&mut theme)
        .unwrap();
    assert!(theme.contains(r#"<a:latin typeface="Open Sans"/>"#));
}
