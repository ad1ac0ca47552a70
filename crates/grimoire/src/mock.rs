//! Static SRD payloads served when every upstream is down.
//!
//! Each entry mirrors the list shape of the reference API:
//! `{count, results: [{index, name, url}]}` with `count == results.len()`.

use serde_json::{json, Map, Value};

use crate::types::MOCK_MESSAGE;

type Entries = &'static [(&'static str, &'static str)];

const CLASSES: Entries = &[
    ("barbarian", "Barbarian"),
    ("bard", "Bard"),
    ("cleric", "Cleric"),
    ("druid", "Druid"),
    ("fighter", "Fighter"),
    ("monk", "Monk"),
    ("paladin", "Paladin"),
    ("ranger", "Ranger"),
    ("rogue", "Rogue"),
    ("sorcerer", "Sorcerer"),
    ("warlock", "Warlock"),
    ("wizard", "Wizard"),
];

const RACES: Entries = &[
    ("dragonborn", "Dragonborn"),
    ("dwarf", "Dwarf"),
    ("elf", "Elf"),
    ("gnome", "Gnome"),
    ("half-elf", "Half-Elf"),
    ("half-orc", "Half-Orc"),
    ("halfling", "Halfling"),
    ("human", "Human"),
    ("tiefling", "Tiefling"),
];

const SPELLS: Entries = &[
    ("acid-arrow", "Acid Arrow"),
    ("bless", "Bless"),
    ("cure-wounds", "Cure Wounds"),
    ("detect-magic", "Detect Magic"),
    ("fireball", "Fireball"),
    ("healing-word", "Healing Word"),
    ("light", "Light"),
    ("mage-hand", "Mage Hand"),
    ("magic-missile", "Magic Missile"),
    ("shield", "Shield"),
];

const MONSTERS: Entries = &[
    ("aboleth", "Aboleth"),
    ("adult-red-dragon", "Adult Red Dragon"),
    ("goblin", "Goblin"),
    ("kobold", "Kobold"),
    ("ogre", "Ogre"),
    ("orc", "Orc"),
    ("owlbear", "Owlbear"),
    ("skeleton", "Skeleton"),
    ("troll", "Troll"),
    ("zombie", "Zombie"),
];

const EQUIPMENT: Entries = &[
    ("battleaxe", "Battleaxe"),
    ("chain-mail", "Chain Mail"),
    ("dagger", "Dagger"),
    ("explorers-pack", "Explorer's Pack"),
    ("longbow", "Longbow"),
    ("longsword", "Longsword"),
    ("rope-hempen-50-feet", "Rope, hempen (50 feet)"),
    ("shield", "Shield"),
    ("shortsword", "Shortsword"),
    ("torch", "Torch"),
];

const ABILITY_SCORES: Entries = &[
    ("cha", "CHA"),
    ("con", "CON"),
    ("dex", "DEX"),
    ("int", "INT"),
    ("str", "STR"),
    ("wis", "WIS"),
];

const SKILLS: Entries = &[
    ("acrobatics", "Acrobatics"),
    ("animal-handling", "Animal Handling"),
    ("arcana", "Arcana"),
    ("athletics", "Athletics"),
    ("deception", "Deception"),
    ("history", "History"),
    ("insight", "Insight"),
    ("intimidation", "Intimidation"),
    ("investigation", "Investigation"),
    ("medicine", "Medicine"),
    ("nature", "Nature"),
    ("perception", "Perception"),
    ("performance", "Performance"),
    ("persuasion", "Persuasion"),
    ("religion", "Religion"),
    ("sleight-of-hand", "Sleight of Hand"),
    ("stealth", "Stealth"),
    ("survival", "Survival"),
];

const CONDITIONS: Entries = &[
    ("blinded", "Blinded"),
    ("charmed", "Charmed"),
    ("deafened", "Deafened"),
    ("exhaustion", "Exhaustion"),
    ("frightened", "Frightened"),
    ("grappled", "Grappled"),
    ("incapacitated", "Incapacitated"),
    ("invisible", "Invisible"),
    ("paralyzed", "Paralyzed"),
    ("petrified", "Petrified"),
    ("poisoned", "Poisoned"),
    ("prone", "Prone"),
    ("restrained", "Restrained"),
    ("stunned", "Stunned"),
    ("unconscious", "Unconscious"),
];

const DAMAGE_TYPES: Entries = &[
    ("acid", "Acid"),
    ("bludgeoning", "Bludgeoning"),
    ("cold", "Cold"),
    ("fire", "Fire"),
    ("force", "Force"),
    ("lightning", "Lightning"),
    ("necrotic", "Necrotic"),
    ("piercing", "Piercing"),
    ("poison", "Poison"),
    ("psychic", "Psychic"),
    ("radiant", "Radiant"),
    ("slashing", "Slashing"),
    ("thunder", "Thunder"),
];

const LANGUAGES: Entries = &[
    ("abyssal", "Abyssal"),
    ("celestial", "Celestial"),
    ("common", "Common"),
    ("deep-speech", "Deep Speech"),
    ("draconic", "Draconic"),
    ("dwarvish", "Dwarvish"),
    ("elvish", "Elvish"),
    ("giant", "Giant"),
    ("gnomish", "Gnomish"),
    ("goblin", "Goblin"),
    ("halfling", "Halfling"),
    ("infernal", "Infernal"),
    ("orc", "Orc"),
    ("primordial", "Primordial"),
    ("sylvan", "Sylvan"),
    ("undercommon", "Undercommon"),
];

const ALIGNMENTS: Entries = &[
    ("chaotic-evil", "Chaotic Evil"),
    ("chaotic-good", "Chaotic Good"),
    ("chaotic-neutral", "Chaotic Neutral"),
    ("lawful-evil", "Lawful Evil"),
    ("lawful-good", "Lawful Good"),
    ("lawful-neutral", "Lawful Neutral"),
    ("neutral", "Neutral"),
    ("neutral-evil", "Neutral Evil"),
    ("neutral-good", "Neutral Good"),
];

const MAGIC_SCHOOLS: Entries = &[
    ("abjuration", "Abjuration"),
    ("conjuration", "Conjuration"),
    ("divination", "Divination"),
    ("enchantment", "Enchantment"),
    ("evocation", "Evocation"),
    ("illusion", "Illusion"),
    ("necromancy", "Necromancy"),
    ("transmutation", "Transmutation"),
];

/// Endpoint names that have a canned payload.
pub const KNOWN_ENDPOINTS: &[&str] = &[
    "classes",
    "races",
    "spells",
    "monsters",
    "equipment",
    "ability-scores",
    "skills",
    "conditions",
    "damage-types",
    "languages",
    "alignments",
    "magic-schools",
];

fn entries_for(endpoint: &str) -> Entries {
    match endpoint {
        "classes" => CLASSES,
        "races" => RACES,
        "spells" => SPELLS,
        "monsters" => MONSTERS,
        "equipment" => EQUIPMENT,
        "ability-scores" => ABILITY_SCORES,
        "skills" => SKILLS,
        "conditions" => CONDITIONS,
        "damage-types" => DAMAGE_TYPES,
        "languages" => LANGUAGES,
        "alignments" => ALIGNMENTS,
        "magic-schools" => MAGIC_SCHOOLS,
        _ => &[],
    }
}

/// The canned `{count, results}` payload for `endpoint`, without annotations.
///
/// Unknown names get `{count: 0, results: []}`.
pub fn payload_for(endpoint: &str) -> Value {
    let results: Vec<Value> = entries_for(endpoint)
        .iter()
        .map(|(index, name)| {
            json!({
                "index": index,
                "name": name,
                "url": format!("/api/{endpoint}/{index}"),
            })
        })
        .collect();

    json!({
        "count": results.len(),
        "results": results,
    })
}

/// The canned payload tagged with `_mock: true` and the explanatory `_message`.
pub fn mock_response(endpoint: &str) -> Value {
    let mut payload = payload_for(endpoint);
    if let Some(obj) = payload.as_object_mut() {
        annotate(obj);
    }
    payload
}

fn annotate(obj: &mut Map<String, Value>) {
    obj.insert("_mock".to_string(), Value::Bool(true));
    obj.insert("_message".to_string(), Value::String(MOCK_MESSAGE.to_string()));
}
