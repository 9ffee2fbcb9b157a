use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, path::Path};

const SHIELD: &str = r#"{
    "name": "Щит",
    "classes": ["Волшебник", "Чародей"],
    "system": {
        "description": { "value": "<p>Невидимый барьер даёт <strong>+5</strong> к КД.</p>" },
        "source": "PHB",
        "activation": { "cost": 1, "type": "реакция" },
        "duration": { "value": 1, "units": "раунд" },
        "range": { "value": null, "units": "на себя" },
        "level": 1,
        "school": "ограждение",
        "components": { "vocal": true, "somatic": true }
    }
}"#;

const BLESS: &str = r#"{
    "name": "Благословение",
    "classes": ["Жрец", "Паладин"],
    "system": {
        "description": { "value": "<p>Добавьте 1к4 к броску.</p>" },
        "source": "PHB",
        "activation": { "cost": 1, "type": "действие" },
        "duration": { "value": 1, "units": "минута" },
        "range": { "value": 30, "units": "футов" },
        "level": 1,
        "school": "очарование",
        "components": { "vocal": true, "somatic": true, "value": "капля святой воды" }
    }
}"#;

fn fixtures(root: &Path) {
    let dir = root.join("spells/lss");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("shield.json"), SHIELD).unwrap();
    fs::write(dir.join("bless.json"), BLESS).unwrap();
    fs::write(
        root.join("list.txt"),
        "# мои заклинания\nShield\n\nhttps://ttg.club/spells/bless/\n",
    )
    .unwrap();
}

fn spellcards() -> Command {
    let mut cmd = Command::cargo_bin("spellcards").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn build_writes_presentation() {
    let tmp = tempfile::tempdir().unwrap();
    fixtures(tmp.path());
    let output = tmp.path().join("deck.pptx");

    spellcards()
        .arg("build")
        .arg("--spell-path")
        .arg(tmp.path().join("list.txt"))
        .arg("--output-file")
        .arg(&output)
        .args(["--parser", "lss", "--cache-path"])
        .arg(tmp.path())
        .env("RUST_LOG", "spellcards=info")
        .assert()
        .success()
        .stderr(predicate::str::contains("spell list loaded"))
        .stderr(predicate::str::contains("presentation written"));

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn preview_prints_cards() {
    let tmp = tempfile::tempdir().unwrap();
    fixtures(tmp.path());

    spellcards()
        .arg("preview")
        .arg("--spell-path")
        .arg(tmp.path().join("list.txt"))
        .args(["--parser", "lss", "--cache-path"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Page 1 ==="))
        .stdout(predicate::str::contains("Щит"))
        .stdout(predicate::str::contains("Материалы: капля святой воды"))
        .stdout(predicate::str::contains("Ограждение — В, С — на себя — PHB"));
}

#[test]
fn inspect_shows_metadata() {
    let tmp = tempfile::tempdir().unwrap();
    fixtures(tmp.path());

    spellcards()
        .args(["inspect", "--spell", "bless", "--parser", "lss", "--cache-path"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Spell: Благословение"))
        .stdout(predicate::str::contains("Components: В, С, М"))
        .stdout(predicate::str::contains("Material: капля святой воды"));
}

#[test]
fn missing_spell_fails() {
    let tmp = tempfile::tempdir().unwrap();
    fixtures(tmp.path());
    fs::write(tmp.path().join("list.txt"), "shield\nfireball\n").unwrap();
    let output = tmp.path().join("deck.pptx");

    spellcards()
        .arg("build")
        .arg("--spell-path")
        .arg(tmp.path().join("list.txt"))
        .arg("--output-file")
        .arg(&output)
        .args(["--parser", "lss", "--cache-path"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("spell not found: fireball"));
    assert!(!output.exists());
}

#[test]
fn unknown_parser_is_rejected() {
    spellcards()
        .args(["inspect", "--spell", "x", "--parser", "yaml"])
        .assert()
        .failure();
}
