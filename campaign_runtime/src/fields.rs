//! The editable field layout of a character template.
//!
//! Fields are arranged in rows; a `(row, column)` pair addresses exactly one
//! field. Each field carries its own range, step and clamp policy.

use campaign_schema::{CharacterFlags, CharacterTemplate, ShadeSlot};

/// Counts of the externally enumerated catalogs a template indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub face_count: usize,
    pub shade_count: usize,
    pub gun_count: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            face_count: 11,
            shade_count: 14,
            gun_count: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    Appearance,
    Attributes,
    FlagsA,
    FlagsB,
    Weapon,
}

static APPEARANCE_FIELDS: [Field; 6] = [
    Field::Face,
    Field::Shade(ShadeSlot::Skin),
    Field::Shade(ShadeSlot::Hair),
    Field::Shade(ShadeSlot::Body),
    Field::Shade(ShadeSlot::Arms),
    Field::Shade(ShadeSlot::Legs),
];

static ATTRIBUTE_FIELDS: [Field; 6] = [
    Field::Speed,
    Field::Health,
    Field::MoveChance,
    Field::TrackChance,
    Field::ShootChance,
    Field::ActionDelay,
];

static FLAG_A_FIELDS: [Field; 7] = [
    Field::Trait(CharacterFlags::ASBESTOS),
    Field::Trait(CharacterFlags::IMMUNITY),
    Field::Trait(CharacterFlags::SEE_THROUGH),
    Field::Trait(CharacterFlags::RUNS_AWAY),
    Field::Trait(CharacterFlags::SNEAKY),
    Field::Trait(CharacterFlags::GOOD_GUY),
    Field::Trait(CharacterFlags::SLEEP_ALWAYS),
];

static FLAG_B_FIELDS: [Field; 6] = [
    Field::Trait(CharacterFlags::PRISONER),
    Field::Trait(CharacterFlags::INVULNERABLE),
    Field::Trait(CharacterFlags::FOLLOWER),
    Field::Trait(CharacterFlags::PENALTY),
    Field::Trait(CharacterFlags::VICTIM),
    Field::Trait(CharacterFlags::AWAKE_ALWAYS),
];

static WEAPON_FIELDS: [Field; 1] = [Field::Gun];

impl Row {
    pub const ALL: [Row; 5] = [
        Row::Appearance,
        Row::Attributes,
        Row::FlagsA,
        Row::FlagsB,
        Row::Weapon,
    ];

    pub fn index(self) -> usize {
        match self {
            Row::Appearance => 0,
            Row::Attributes => 1,
            Row::FlagsA => 2,
            Row::FlagsB => 3,
            Row::Weapon => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            Row::Appearance => &APPEARANCE_FIELDS,
            Row::Attributes => &ATTRIBUTE_FIELDS,
            Row::FlagsA => &FLAG_A_FIELDS,
            Row::FlagsB => &FLAG_B_FIELDS,
            Row::Weapon => &WEAPON_FIELDS,
        }
    }

    pub fn column_count(self) -> usize {
        self.fields().len()
    }

    pub fn last_column(self) -> usize {
        self.column_count() - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Row::Appearance => "appearance",
            Row::Attributes => "attributes",
            Row::FlagsA => "flags_a",
            Row::FlagsB => "flags_b",
            Row::Weapon => "weapon",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "appearance" | "looks" => Some(Row::Appearance),
            "attributes" | "attr" | "stats" => Some(Row::Attributes),
            "flags_a" | "flags" | "flags1" => Some(Row::FlagsA),
            "flags_b" | "flags2" => Some(Row::FlagsB),
            "weapon" | "gun" => Some(Row::Weapon),
            other => other.parse::<usize>().ok().and_then(Row::from_index),
        }
    }
}

/// How a numeric field reacts to an edit that leaves its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampPolicy {
    /// Stick at the bound.
    Saturate,
    /// Jump to the opposite bound.
    Wrap,
    /// Single bit, flipped by every change.
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub policy: ClampPolicy,
}

impl FieldSpec {
    const fn saturating(min: i32, max: i32, step: i32) -> Self {
        Self {
            min,
            max,
            step,
            policy: ClampPolicy::Saturate,
        }
    }

    fn wrapping(count: usize) -> Self {
        Self {
            min: 0,
            max: count.saturating_sub(1) as i32,
            step: 1,
            policy: ClampPolicy::Wrap,
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp `value` into range according to the policy.
    pub fn clamp(&self, value: i32) -> i32 {
        match self.policy {
            ClampPolicy::Saturate | ClampPolicy::Toggle => clamp_saturating(value, self.min, self.max),
            ClampPolicy::Wrap => clamp_wrap(value, self.min, self.max),
        }
    }
}

pub fn clamp_saturating(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max)
}

/// Values past `max` land on `min` and values below `min` land on `max`.
pub fn clamp_wrap(value: i32, min: i32, max: i32) -> i32 {
    if value > max {
        min
    } else if value < min {
        max
    } else {
        value
    }
}

/// One editable property of a [`CharacterTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Face,
    Shade(ShadeSlot),
    Speed,
    Health,
    MoveChance,
    TrackChance,
    ShootChance,
    ActionDelay,
    Trait(CharacterFlags),
    Gun,
}

impl Field {
    pub fn spec(self, limits: &CatalogLimits) -> FieldSpec {
        match self {
            Field::Face => FieldSpec::wrapping(limits.face_count),
            Field::Shade(_) => FieldSpec::wrapping(limits.shade_count),
            Field::Speed => FieldSpec::saturating(128, 512, 64),
            Field::Health => FieldSpec::saturating(10, 500, 10),
            Field::MoveChance | Field::TrackChance | Field::ShootChance => {
                FieldSpec::saturating(0, 100, 5)
            }
            Field::ActionDelay => FieldSpec::saturating(0, 50, 1),
            Field::Trait(_) => FieldSpec {
                min: 0,
                max: 1,
                step: 1,
                policy: ClampPolicy::Toggle,
            },
            Field::Gun => FieldSpec::wrapping(limits.gun_count),
        }
    }

    pub fn read(self, template: &CharacterTemplate) -> i32 {
        match self {
            Field::Face => i32::from(template.face),
            Field::Shade(slot) => i32::from(template.shades.get(slot)),
            Field::Speed => i32::from(template.speed),
            Field::Health => i32::from(template.health),
            Field::MoveChance => i32::from(template.probability_to_move),
            Field::TrackChance => i32::from(template.probability_to_track),
            Field::ShootChance => i32::from(template.probability_to_shoot),
            Field::ActionDelay => i32::from(template.action_delay),
            Field::Trait(flag) => i32::from(template.flags.contains(flag)),
            Field::Gun => i32::from(template.gun),
        }
    }

    /// Store an already range-checked value. Trait fields treat any non-zero
    /// value as "on".
    pub fn write(self, template: &mut CharacterTemplate, value: i32) {
        match self {
            Field::Face => template.face = value as u16,
            Field::Shade(slot) => *template.shades.get_mut(slot) = value as u8,
            Field::Speed => template.speed = value as u16,
            Field::Health => template.health = value as u16,
            Field::MoveChance => template.probability_to_move = value as u8,
            Field::TrackChance => template.probability_to_track = value as u8,
            Field::ShootChance => template.probability_to_shoot = value as u8,
            Field::ActionDelay => template.action_delay = value as u8,
            Field::Trait(flag) => template.flags.set(flag, value != 0),
            Field::Gun => template.gun = value as u16,
        }
    }

    /// Where the field sits in the row layout. Traits without a row
    /// (wake-on-approach) return `None`.
    pub fn selector(self) -> Option<FieldSelector> {
        Row::ALL.iter().find_map(|row| {
            row.fields()
                .iter()
                .position(|field| *field == self)
                .map(|column| FieldSelector::new(*row, column))
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Face => "face",
            Field::Shade(ShadeSlot::Skin) => "skin",
            Field::Shade(ShadeSlot::Hair) => "hair",
            Field::Shade(ShadeSlot::Body) => "body",
            Field::Shade(ShadeSlot::Arms) => "arms",
            Field::Shade(ShadeSlot::Legs) => "legs",
            Field::Speed => "speed",
            Field::Health => "health",
            Field::MoveChance => "move",
            Field::TrackChance => "track",
            Field::ShootChance => "shoot",
            Field::ActionDelay => "delay",
            Field::Trait(flag) => trait_name(flag),
            Field::Gun => "gun",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Face => "Face",
            Field::Shade(ShadeSlot::Skin) => "Skin",
            Field::Shade(ShadeSlot::Hair) => "Hair",
            Field::Shade(ShadeSlot::Body) => "Body",
            Field::Shade(ShadeSlot::Arms) => "Arms",
            Field::Shade(ShadeSlot::Legs) => "Legs",
            Field::Speed => "Speed",
            Field::Health => "Hp",
            Field::MoveChance => "Move",
            Field::TrackChance => "Track",
            Field::ShootChance => "Shoot",
            Field::ActionDelay => "Delay",
            Field::Trait(flag) => flag.label().unwrap_or("?"),
            Field::Gun => "Gun",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        let lowered = token.to_ascii_lowercase();
        let field = match lowered.as_str() {
            "face" => Field::Face,
            "skin" => Field::Shade(ShadeSlot::Skin),
            "hair" => Field::Shade(ShadeSlot::Hair),
            "body" => Field::Shade(ShadeSlot::Body),
            "arms" => Field::Shade(ShadeSlot::Arms),
            "legs" => Field::Shade(ShadeSlot::Legs),
            "speed" => Field::Speed,
            "health" | "hp" => Field::Health,
            "move" => Field::MoveChance,
            "track" => Field::TrackChance,
            "shoot" => Field::ShootChance,
            "delay" | "action_delay" => Field::ActionDelay,
            "gun" | "weapon" => Field::Gun,
            other => return parse_trait(other).map(Field::Trait),
        };
        Some(field)
    }
}

fn trait_name(flag: CharacterFlags) -> &'static str {
    TRAIT_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == flag)
        .map(|(_, name)| *name)
        .unwrap_or("flags")
}

static TRAIT_NAMES: [(CharacterFlags, &str); 14] = [
    (CharacterFlags::ASBESTOS, "asbestos"),
    (CharacterFlags::IMMUNITY, "immunity"),
    (CharacterFlags::SEE_THROUGH, "see_through"),
    (CharacterFlags::RUNS_AWAY, "runs_away"),
    (CharacterFlags::SNEAKY, "sneaky"),
    (CharacterFlags::GOOD_GUY, "good_guy"),
    (CharacterFlags::SLEEP_ALWAYS, "sleep_always"),
    (CharacterFlags::SLEEPING, "sleeping"),
    (CharacterFlags::PRISONER, "prisoner"),
    (CharacterFlags::INVULNERABLE, "invulnerable"),
    (CharacterFlags::FOLLOWER, "follower"),
    (CharacterFlags::PENALTY, "penalty"),
    (CharacterFlags::VICTIM, "victim"),
    (CharacterFlags::AWAKE_ALWAYS, "awake_always"),
];

pub(crate) fn parse_trait(token: &str) -> Option<CharacterFlags> {
    let normalized = token.to_ascii_lowercase().replace('-', "_");
    let alias = match normalized.as_str() {
        "c_thru" | "cthru" | "seethrough" => "see_through",
        "run_away" | "runaway" => "runs_away",
        "goodguy" => "good_guy",
        "asleep" => "sleep_always",
        "invuln" => "invulnerable",
        "awake" => "awake_always",
        other => other,
    };
    TRAIT_NAMES
        .iter()
        .find(|(_, name)| *name == alias)
        .map(|(flag, _)| *flag)
}

/// A `(row, column)` address into the field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSelector {
    pub row: Row,
    pub column: usize,
}

impl FieldSelector {
    pub const fn new(row: Row, column: usize) -> Self {
        Self { row, column }
    }

    /// The addressed field, or `None` when the column lies outside the row.
    pub fn field(&self) -> Option<Field> {
        self.row.fields().get(self.column).copied()
    }
}

impl Default for FieldSelector {
    fn default() -> Self {
        Self::new(Row::Appearance, 0)
    }
}
