//! Spell records and the adapters that build them from raw JSON.
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CardError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Components {
    pub vocal: bool,
    pub somatic: bool,
    /// Material description; `None` when the spell has no material component.
    pub material: Option<String>,
}

/// Source-agnostic spell data, description still in markup form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellRecord {
    pub name: String,
    pub level: u32,
    pub school: String,
    pub classes: Vec<String>,
    pub activation: String,
    pub duration: String,
    pub range: String,
    pub source: String,
    pub components: Components,
    pub description_markup: String,
}

/// Shape of the raw record handed out by a spell source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordFormat {
    /// ttg.club API v1.
    Ttg,
    /// Foundry-style item export (LSS).
    Lss,
}

impl RecordFormat {
    pub fn parse(self, id: &str, raw: Value) -> Result<SpellRecord> {
        match self {
            RecordFormat::Ttg => serde_json::from_value::<TtgSpell>(raw)
                .map(SpellRecord::from)
                .map_err(|e| CardError::malformed(id, e)),
            RecordFormat::Lss => serde_json::from_value::<LssSpell>(raw)
                .map(SpellRecord::from)
                .map_err(|e| CardError::malformed(id, e)),
        }
    }
}

#[derive(Deserialize)]
struct TtgSpell {
    name: TtgName,
    classes: Vec<TtgClass>,
    description: String,
    #[serde(default)]
    upper: Option<String>,
    source: TtgSource,
    time: String,
    duration: String,
    range: String,
    level: u32,
    school: String,
    components: TtgComponents,
}

#[derive(Deserialize)]
struct TtgName {
    rus: String,
}

#[derive(Deserialize)]
struct TtgClass {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TtgSource {
    short_name: String,
}

#[derive(Deserialize)]
struct TtgComponents {
    #[serde(default)]
    v: bool,
    #[serde(default)]
    s: bool,
    #[serde(default)]
    m: Option<TtgMaterial>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TtgMaterial {
    Text(String),
    Detailed { text: String },
}

impl From<TtgSpell> for SpellRecord {
    fn from(raw: TtgSpell) -> Self {
        let mut description_markup = raw.description;
        if let Some(upper) = raw.upper {
            description_markup.push_str(&upper);
        }
        let material = raw.components.m.map(|m| match m {
            TtgMaterial::Text(text) | TtgMaterial::Detailed { text } => text,
        });
        SpellRecord {
            name: raw.name.rus,
            level: raw.level,
            school: raw.school,
            classes: raw.classes.into_iter().map(|c| c.name).collect(),
            activation: raw.time,
            duration: raw.duration,
            range: raw.range,
            source: raw.source.short_name,
            components: Components {
                vocal: raw.components.v,
                somatic: raw.components.s,
                material,
            },
            description_markup,
        }
    }
}

#[derive(Deserialize)]
struct LssSpell {
    name: String,
    #[serde(default)]
    classes: Vec<String>,
    system: LssSystem,
}

#[derive(Deserialize)]
struct LssSystem {
    description: LssText,
    source: String,
    activation: LssActivation,
    duration: LssAmount,
    range: LssAmount,
    level: u32,
    school: String,
    components: LssComponents,
    #[serde(default)]
    materials: Option<LssMaterials>,
}

#[derive(Deserialize)]
struct LssText {
    value: String,
}

#[derive(Deserialize)]
struct LssMaterials {
    #[serde(default)]
    value: Option<String>,
}

// `Value` fields are required but may be `null`.
#[derive(Deserialize)]
struct LssActivation {
    cost: Value,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct LssAmount {
    value: Value,
    units: String,
}

#[derive(Deserialize)]
struct LssComponents {
    vocal: bool,
    somatic: bool,
    #[serde(default)]
    value: Option<String>,
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn joined(first: &str, second: &str) -> String {
    format!("{first} {second}").trim().to_string()
}

impl From<LssSpell> for SpellRecord {
    fn from(raw: LssSpell) -> Self {
        let system = raw.system;
        let duration = if system.duration.units == "inst" {
            "Мгновенная".to_string()
        } else {
            joined(&scalar_text(&system.duration.value), &system.duration.units)
        };
        let present = |m: &String| !m.trim().is_empty();
        let material = system
            .components
            .value
            .filter(present)
            .or_else(|| system.materials.and_then(|m| m.value).filter(present));
        SpellRecord {
            name: raw.name,
            level: system.level,
            school: system.school,
            classes: raw.classes,
            activation: joined(&scalar_text(&system.activation.cost), &system.activation.kind),
            duration,
            range: joined(&scalar_text(&system.range.value), &system.range.units),
            source: system.source,
            components: Components {
                vocal: system.components.vocal,
                somatic: system.components.somatic,
                material,
            },
            description_markup: system.description.value,
        }
    }
}
