//! Data contracts for campaign settings edited by the character editor.
//!
//! Everything here is plain data: character templates, the trait bitmask,
//! the tile item flag word with its packed objective index, and the campaign
//! setting that owns the character collection. Editor behaviour lives in
//! `editor_core`; this crate only knows how the data is shaped and stored.

mod campaign;
mod character;
mod tile_item;

pub use campaign::{CampaignIoError, CampaignSetting};
pub use character::{
    CharacterFlags, CharacterTemplate, ShadeSet, ShadeSlot, BODY_ARMED, BODY_UNARMED, FACE_OGRE,
    GUN_MACHINE, SHADE_BLACK, SHADE_DARK_GRAY, SHADE_GREEN, SPEED_UNIT,
};
pub use tile_item::{
    decode_objective, encode_objective, is_objective, objective_index, ObjectiveIndexError,
    ObjectiveProgress, ObjectiveTally, TileItemFlags, MAX_OBJECTIVE_INDEX, OBJECTIVE_FIELD_MASK,
    OBJECTIVE_FIELD_WIDTH, OBJECTIVE_SHIFT,
};
