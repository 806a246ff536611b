//! read-only object model consumed by the lookup core
//!
//! forms are the categorized records a filter can reference (factions, races,
//! perks, form lists, ...). actors are placed characters pointing at an npc
//! base template. everything is owned by a [`FormDatabase`]; the lookup layer
//! only ever borrows from it.

mod database;
mod plugin;

pub use database::{DatabaseError, FormDatabase, FormDump, NpcHandle};
pub use plugin::{PluginFile, LIGHT_PLUGIN_INDEX};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// number of template slots carried by leveled creature data
pub const TEMPLATE_SLOTS: usize = 13;

/// numeric form identifier, stable within one load session
///
/// the top byte is the plugin load index; light plugins use `0xFE` and keep
/// their own index in bits 12..24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(into = "String")]
pub struct FormId(pub u32);

impl FormId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// load index of the plugin this id belongs to
    pub const fn plugin_index(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// light plugin index (only meaningful when `plugin_index() == 0xFE`)
    pub const fn light_index(self) -> u16 {
        ((self.0 >> 12) & 0xFFF) as u16
    }

    /// parse an explicit `0x`-prefixed hex id, returns None for anything else
    pub fn parse_prefixed(s: &str) -> Option<Self> {
        let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
        u32::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.0)
    }
}

impl FromStr for FormId {
    type Err = std::num::ParseIntError;

    /// accepts `0x0001A2B3` or bare `0001A2B3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        u32::from_str_radix(hex, 16).map(Self)
    }
}

impl From<FormId> for String {
    fn from(id: FormId) -> Self {
        format!("0x{}", id)
    }
}

impl From<u32> for FormId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl<'de> Deserialize<'de> for FormId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => u32::try_from(n)
                .map(FormId)
                .map_err(|_| serde::de::Error::custom(format!("form id out of range: {}", n))),
            Repr::Text(s) => s
                .parse()
                .map_err(|e| serde::de::Error::custom(format!("invalid form id '{}': {}", s, e))),
        }
    }
}

/// closed set of form categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormType {
    Keyword,
    CombatStyle,
    Class,
    Faction,
    Race,
    Outfit,
    Npc,
    VoiceType,
    Spell,
    Armor,
    Location,
    Perk,
    FormList,
    Other,
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormType::Keyword => "keyword",
            FormType::CombatStyle => "combat_style",
            FormType::Class => "class",
            FormType::Faction => "faction",
            FormType::Race => "race",
            FormType::Outfit => "outfit",
            FormType::Npc => "npc",
            FormType::VoiceType => "voice_type",
            FormType::Spell => "spell",
            FormType::Armor => "armor",
            FormType::Location => "location",
            FormType::Perk => "perk",
            FormType::FormList => "form_list",
            FormType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// category-specific payload of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormKind {
    Keyword,
    CombatStyle,
    Class,
    Faction,
    Race(Race),
    Outfit,
    Npc(Npc),
    VoiceType,
    Spell,
    Armor,
    Location,
    Perk,
    FormList(FormList),
    #[serde(other)]
    Other,
}

/// a categorized record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    #[serde(default)]
    pub editor_id: String,
    #[serde(flatten)]
    pub kind: FormKind,
}

impl Form {
    pub fn new(id: impl Into<FormId>, editor_id: impl Into<String>, kind: FormKind) -> Self {
        Self {
            id: id.into(),
            editor_id: editor_id.into(),
            kind,
        }
    }

    pub fn form_type(&self) -> FormType {
        match &self.kind {
            FormKind::Keyword => FormType::Keyword,
            FormKind::CombatStyle => FormType::CombatStyle,
            FormKind::Class => FormType::Class,
            FormKind::Faction => FormType::Faction,
            FormKind::Race(_) => FormType::Race,
            FormKind::Outfit => FormType::Outfit,
            FormKind::Npc(_) => FormType::Npc,
            FormKind::VoiceType => FormType::VoiceType,
            FormKind::Spell => FormType::Spell,
            FormKind::Armor => FormType::Armor,
            FormKind::Location => FormType::Location,
            FormKind::Perk => FormType::Perk,
            FormKind::FormList(_) => FormType::FormList,
            FormKind::Other => FormType::Other,
        }
    }

    pub fn as_npc(&self) -> Option<&Npc> {
        match &self.kind {
            FormKind::Npc(npc) => Some(npc),
            _ => None,
        }
    }

    pub fn as_race(&self) -> Option<&Race> {
        match &self.kind {
            FormKind::Race(race) => Some(race),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&FormList> {
        match &self.kind {
            FormKind::FormList(list) => Some(list),
            _ => None,
        }
    }

    /// ids this form points at, labelled by field (used for validation)
    pub(crate) fn references(&self) -> Vec<(&'static str, FormId)> {
        match &self.kind {
            FormKind::Npc(npc) => npc.references(),
            FormKind::Race(race) => race.keywords.iter().map(|k| ("keywords", *k)).collect(),
            FormKind::FormList(list) => list.forms.iter().map(|f| ("forms", *f)).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.editor_id.is_empty() {
            write!(f, "[{} {}]", self.form_type(), self.id)
        } else {
            write!(f, "{} [{} {}]", self.editor_id, self.form_type(), self.id)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Race {
    pub keywords: Vec<FormId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormList {
    pub forms: Vec<FormId>,
}

/// faction membership entry; a negative rank means "listed but not a member"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRank {
    pub faction: FormId,
    #[serde(default)]
    pub rank: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerkRank {
    pub perk: FormId,
    #[serde(default = "default_perk_rank")]
    pub rank: u8,
}

fn default_perk_rank() -> u8 {
    1
}

/// npc base template record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Npc {
    /// display name
    pub name: String,
    pub level: u16,
    pub keywords: Vec<FormId>,
    pub race: Option<FormId>,
    pub class: Option<FormId>,
    pub combat_style: Option<FormId>,
    pub outfit: Option<FormId>,
    pub voice_type: Option<FormId>,
    /// body/skin override armor
    pub skin: Option<FormId>,
    pub factions: Vec<FactionRank>,
    pub spells: Vec<FormId>,
    pub perks: Vec<PerkRank>,
    /// further template this npc inherits from
    pub base_template: Option<FormId>,
}

impl Npc {
    pub fn is_in_faction(&self, faction: FormId) -> bool {
        self.factions
            .iter()
            .any(|f| f.faction == faction && f.rank >= 0)
    }

    pub fn has_spell(&self, spell: FormId) -> bool {
        self.spells.contains(&spell)
    }

    pub fn perk_rank(&self, perk: FormId) -> u8 {
        self.perks
            .iter()
            .filter(|p| p.perk == perk)
            .map(|p| p.rank)
            .max()
            .unwrap_or(0)
    }

    fn references(&self) -> Vec<(&'static str, FormId)> {
        let singles = [
            ("race", self.race),
            ("class", self.class),
            ("combat_style", self.combat_style),
            ("outfit", self.outfit),
            ("voice_type", self.voice_type),
            ("skin", self.skin),
            ("base_template", self.base_template),
        ];

        singles
            .into_iter()
            .filter_map(|(field, id)| id.map(|id| (field, id)))
            .chain(self.keywords.iter().map(|k| ("keywords", *k)))
            .chain(self.factions.iter().map(|f| ("factions", f.faction)))
            .chain(self.spells.iter().map(|s| ("spells", *s)))
            .chain(self.perks.iter().map(|p| ("perks", p.perk)))
            .collect()
    }
}

/// resolution data attached to actors spawned from leveled lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeveledCreature {
    /// npc originally rolled from the leveled list
    #[serde(default)]
    pub original_base: Option<FormId>,
    /// per-slot template overrides, in slot order
    #[serde(default, deserialize_with = "deserialize_template_slots")]
    pub templates: [Option<FormId>; TEMPLATE_SLOTS],
}

fn deserialize_template_slots<'de, D>(
    deserializer: D,
) -> Result<[Option<FormId>; TEMPLATE_SLOTS], D::Error>
where
    D: Deserializer<'de>,
{
    let slots: Vec<Option<FormId>> = Vec::deserialize(deserializer)?;
    if slots.len() > TEMPLATE_SLOTS {
        return Err(serde::de::Error::custom(format!(
            "at most {} template slots allowed, got {}",
            TEMPLATE_SLOTS,
            slots.len()
        )));
    }

    let mut templates = [None; TEMPLATE_SLOTS];
    for (slot, id) in templates.iter_mut().zip(slots) {
        *slot = id;
    }
    Ok(templates)
}

/// a placed character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: FormId,
    /// npc base template
    pub base: FormId,
    /// overrides the base template's race when set
    #[serde(default)]
    pub race: Option<FormId>,
    /// flagged as juvenile
    #[serde(default)]
    pub child: bool,
    #[serde(default)]
    pub leveled: Option<LeveledCreature>,
    #[serde(default)]
    pub editor_location: Option<FormId>,
    #[serde(default)]
    pub perks: Vec<PerkRank>,
}

impl Actor {
    pub fn new(id: impl Into<FormId>, base: impl Into<FormId>) -> Self {
        Self {
            id: id.into(),
            base: base.into(),
            race: None,
            child: false,
            leveled: None,
            editor_location: None,
            perks: Vec::new(),
        }
    }

    pub fn is_leveled_creature(&self) -> bool {
        self.leveled.is_some()
    }

    pub(crate) fn references(&self) -> Vec<(&'static str, FormId)> {
        let mut refs = vec![("base", self.base)];
        refs.extend(self.race.map(|r| ("race", r)));
        refs.extend(self.editor_location.map(|l| ("editor_location", l)));
        refs.extend(self.perks.iter().map(|p| ("perks", p.perk)));
        if let Some(leveled) = &self.leveled {
            refs.extend(leveled.original_base.map(|b| ("original_base", b)));
            refs.extend(leveled.templates.iter().flatten().map(|t| ("templates", *t)));
        }
        refs
    }
}
