use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub const BODY_UNARMED: u8 = 0;
pub const BODY_ARMED: u8 = 1;
pub const FACE_OGRE: u16 = 2;
pub const GUN_MACHINE: u16 = 1;
pub const SHADE_GREEN: u8 = 3;
pub const SHADE_DARK_GRAY: u8 = 7;
pub const SHADE_BLACK: u8 = 12;

/// Fixed-point speed unit: 256 is normal walking speed.
pub const SPEED_UNIT: u16 = 256;

bitflags! {
    /// Behaviour traits of a non-player character. Bits are independent;
    /// no combination is rejected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CharacterFlags: u32 {
        const ASBESTOS = 1 << 0;
        const IMMUNITY = 1 << 1;
        const SEE_THROUGH = 1 << 2;
        const RUNS_AWAY = 1 << 3;
        const SNEAKY = 1 << 4;
        const GOOD_GUY = 1 << 5;
        const SLEEP_ALWAYS = 1 << 6;
        const SLEEPING = 1 << 7;
        const PRISONER = 1 << 8;
        const INVULNERABLE = 1 << 9;
        const FOLLOWER = 1 << 10;
        const PENALTY = 1 << 11;
        const VICTIM = 1 << 12;
        const AWAKE_ALWAYS = 1 << 13;
    }
}

impl CharacterFlags {
    /// Every single trait with its short label and hover text, in bit order.
    pub const TRAITS: [(CharacterFlags, &'static str, &'static str); 14] = [
        (CharacterFlags::ASBESTOS, "Asbestos", "Immune to fire"),
        (CharacterFlags::IMMUNITY, "Immunity", "Immune to poison"),
        (CharacterFlags::SEE_THROUGH, "C-thru", "Drawn see-through"),
        (CharacterFlags::RUNS_AWAY, "Run-away", "Runs away from player"),
        (CharacterFlags::SNEAKY, "Sneaky", "Shoots back when player shoots"),
        (CharacterFlags::GOOD_GUY, "Good guy", "Same team as players"),
        (CharacterFlags::SLEEP_ALWAYS, "Asleep", "Doesn't move unless seen"),
        (CharacterFlags::SLEEPING, "Sleeping", "Wakes up when players approach"),
        (CharacterFlags::PRISONER, "Prisoner", "Doesn't move until touched"),
        (CharacterFlags::INVULNERABLE, "Invuln.", "Cannot be hurt"),
        (CharacterFlags::FOLLOWER, "Follower", "Follows players"),
        (CharacterFlags::PENALTY, "Penalty", "Large score penalty when shot"),
        (CharacterFlags::VICTIM, "Victim", "Takes damage from everyone"),
        (CharacterFlags::AWAKE_ALWAYS, "Awake", "Doesn't go to sleep after players leave"),
    ];

    /// Short label for a single trait. `None` for empty or combined masks.
    pub fn label(self) -> Option<&'static str> {
        Self::TRAITS
            .iter()
            .find(|(flag, _, _)| *flag == self)
            .map(|(_, label, _)| *label)
    }

    pub fn description(self) -> Option<&'static str> {
        Self::TRAITS
            .iter()
            .find(|(flag, _, _)| *flag == self)
            .map(|(_, _, description)| *description)
    }
}

/// Which of the five palette shades of a character is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadeSlot {
    Skin,
    Hair,
    Body,
    Arms,
    Legs,
}

impl ShadeSlot {
    pub const ALL: [ShadeSlot; 5] = [
        ShadeSlot::Skin,
        ShadeSlot::Hair,
        ShadeSlot::Body,
        ShadeSlot::Arms,
        ShadeSlot::Legs,
    ];
}

/// Palette shade indices for each recoloured body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShadeSet {
    pub skin: u8,
    pub hair: u8,
    pub body: u8,
    pub arms: u8,
    pub legs: u8,
}

impl ShadeSet {
    pub fn get(&self, slot: ShadeSlot) -> u8 {
        match slot {
            ShadeSlot::Skin => self.skin,
            ShadeSlot::Hair => self.hair,
            ShadeSlot::Body => self.body,
            ShadeSlot::Arms => self.arms,
            ShadeSlot::Legs => self.legs,
        }
    }

    pub fn get_mut(&mut self, slot: ShadeSlot) -> &mut u8 {
        match slot {
            ShadeSlot::Skin => &mut self.skin,
            ShadeSlot::Hair => &mut self.hair,
            ShadeSlot::Body => &mut self.body,
            ShadeSlot::Arms => &mut self.arms,
            ShadeSlot::Legs => &mut self.legs,
        }
    }
}

/// Appearance, stats and behaviour of one non-player character.
///
/// Templates carry no identity of their own; a template is identified by its
/// position in the campaign's character collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub armed_body: u8,
    pub unarmed_body: u8,
    pub face: u16,
    /// Fixed point, [`SPEED_UNIT`] is 100%.
    pub speed: u16,
    pub probability_to_move: u8,
    pub probability_to_track: u8,
    pub probability_to_shoot: u8,
    pub action_delay: u8,
    pub gun: u16,
    pub shades: ShadeSet,
    pub health: u16,
    pub flags: CharacterFlags,
}

impl CharacterTemplate {
    /// The stock enemy new characters start from.
    pub const fn default_enemy() -> Self {
        Self {
            armed_body: BODY_ARMED,
            unarmed_body: BODY_UNARMED,
            face: FACE_OGRE,
            speed: SPEED_UNIT,
            probability_to_move: 50,
            probability_to_track: 25,
            probability_to_shoot: 2,
            action_delay: 15,
            gun: GUN_MACHINE,
            shades: ShadeSet {
                skin: SHADE_GREEN,
                hair: SHADE_DARK_GRAY,
                body: SHADE_DARK_GRAY,
                arms: SHADE_DARK_GRAY,
                legs: SHADE_BLACK,
            },
            health: 40,
            flags: CharacterFlags::IMMUNITY,
        }
    }

    /// All-zero template, what an untouched scratch buffer reads as.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn speed_percent(&self) -> u32 {
        u32::from(self.speed) * 100 / u32::from(SPEED_UNIT)
    }

    pub fn has_flag(&self, flag: CharacterFlags) -> bool {
        self.flags.contains(flag)
    }
}
