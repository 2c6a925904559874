//! Tile item flag word and the objective index packed into it.
//!
//! The objective index is stored off by one so that an all-zero field means
//! "no objective". Whether a tile counts as an objective at all is carried by
//! the separate [`TileItemFlags::OBJECTIVE`] bit, which callers check before
//! decoding.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OBJECTIVE_SHIFT: u32 = 3;
pub const OBJECTIVE_FIELD_WIDTH: u32 = 5;
pub const OBJECTIVE_FIELD_MASK: u32 = ((1 << OBJECTIVE_FIELD_WIDTH) - 1) << OBJECTIVE_SHIFT;
/// Largest encodable index: the field holds `index + 1` and zero is reserved.
pub const MAX_OBJECTIVE_INDEX: u8 = (1 << OBJECTIVE_FIELD_WIDTH) - 2;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TileItemFlags: u32 {
        const IMPASSABLE = 1 << 0;
        const CAN_BE_SHOT = 1 << 1;
        const CAN_BE_TAKEN = 1 << 2;
        const IS_WRECK = 1 << 8;
        const DRAW_LAST = 1 << 9;
        const OBJECTIVE = 1 << 10;
        // Index bits are data, not flags; keep them when converting words.
        const _ = OBJECTIVE_FIELD_MASK;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ObjectiveIndexError {
    #[error("objective index {index} exceeds maximum {max}")]
    OutOfRange { index: usize, max: u8 },
}

/// Pack an objective index into its field of the flag word.
///
/// The result holds only the index field; OR it with
/// [`TileItemFlags::OBJECTIVE`] to mark the tile.
pub fn encode_objective(index: usize) -> Result<u32, ObjectiveIndexError> {
    if index > MAX_OBJECTIVE_INDEX as usize {
        return Err(ObjectiveIndexError::OutOfRange {
            index,
            max: MAX_OBJECTIVE_INDEX,
        });
    }
    Ok(((index as u32) + 1) << OBJECTIVE_SHIFT)
}

/// Unpack the objective index field.
///
/// Only meaningful for words with the objective bit set; returns `None` when
/// the field holds the reserved zero.
pub fn decode_objective(flags: u32) -> Option<u8> {
    debug_assert!(
        is_objective(flags),
        "decoding objective index of a non-objective tile"
    );
    let field = (flags & OBJECTIVE_FIELD_MASK) >> OBJECTIVE_SHIFT;
    field.checked_sub(1).map(|index| index as u8)
}

pub fn is_objective(flags: u32) -> bool {
    flags & TileItemFlags::OBJECTIVE.bits() != 0
}

/// Checked decode: the index of an objective tile, `None` otherwise.
pub fn objective_index(flags: u32) -> Option<u8> {
    if is_objective(flags) {
        decode_objective(flags)
    } else {
        None
    }
}

/// Required and completed counts for one mission objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectiveProgress {
    pub required: u32,
    pub done: u32,
}

impl ObjectiveProgress {
    pub fn is_met(&self) -> bool {
        self.done >= self.required
    }
}

/// Per-mission objective bookkeeping driven by tile item flag words.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveTally {
    objectives: Vec<ObjectiveProgress>,
}

impl ObjectiveTally {
    pub fn new(required: impl IntoIterator<Item = u32>) -> Self {
        Self {
            objectives: required
                .into_iter()
                .map(|required| ObjectiveProgress { required, done: 0 })
                .collect(),
        }
    }

    pub fn objectives(&self) -> &[ObjectiveProgress] {
        &self.objectives
    }

    /// Count a collected or destroyed tile item towards its objective.
    ///
    /// Returns `true` when the flag word belonged to a known objective.
    pub fn record_pickup(&mut self, flags: u32) -> bool {
        let Some(index) = objective_index(flags) else {
            return false;
        };
        match self.objectives.get_mut(index as usize) {
            Some(progress) => {
                progress.done = progress.done.saturating_add(1);
                true
            }
            None => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(ObjectiveProgress::is_met)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objective_word(index: usize) -> u32 {
        encode_objective(index).expect("index in range") | TileItemFlags::OBJECTIVE.bits()
    }

    #[test]
    fn every_index_survives_the_flag_word() {
        for index in 0..=MAX_OBJECTIVE_INDEX as usize {
            let flags = objective_word(index) | TileItemFlags::CAN_BE_TAKEN.bits();
            assert_eq!(decode_objective(flags), Some(index as u8));
        }
    }

    #[test]
    fn index_bits_alone_do_not_make_an_objective() {
        for index in 0..=MAX_OBJECTIVE_INDEX as usize {
            let flags = encode_objective(index).unwrap() | TileItemFlags::IMPASSABLE.bits();
            assert!(!is_objective(flags));
            assert_eq!(objective_index(flags), None);
        }
    }

    #[test]
    fn objective_bit_is_independent_of_index() {
        assert!(is_objective(TileItemFlags::OBJECTIVE.bits()));
        assert_eq!(objective_index(TileItemFlags::OBJECTIVE.bits()), None);
    }

    #[test]
    fn encoding_stays_inside_its_field() {
        for index in 0..=MAX_OBJECTIVE_INDEX as usize {
            assert_eq!(encode_objective(index).unwrap() & !OBJECTIVE_FIELD_MASK, 0);
        }
        assert_eq!(
            encode_objective(MAX_OBJECTIVE_INDEX as usize + 1),
            Err(ObjectiveIndexError::OutOfRange { index: 31, max: 30 })
        );
    }

    #[test]
    fn unknown_bits_round_trip_through_flags() {
        let word = objective_word(4) | TileItemFlags::IS_WRECK.bits();
        let flags = TileItemFlags::from_bits_retain(word);
        assert_eq!(flags.bits(), word);
        assert!(flags.contains(TileItemFlags::OBJECTIVE));
    }

    #[test]
    fn flag_words_persist_with_their_index() {
        let flags = TileItemFlags::from_bits_retain(
            objective_word(17) | TileItemFlags::CAN_BE_TAKEN.bits(),
        );

        let json = serde_json::to_string(&flags).unwrap();
        let from_json: TileItemFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(objective_index(from_json.bits()), Some(17));

        let bytes = bincode::serialize(&flags).unwrap();
        let from_bytes: TileItemFlags = bincode::deserialize(&bytes).unwrap();
        assert_eq!(from_bytes, flags);
    }

    #[test]
    fn tally_counts_pickups_per_objective() {
        let mut tally = ObjectiveTally::new([2, 1]);
        assert!(!tally.is_complete());

        assert!(tally.record_pickup(objective_word(0)));
        assert!(tally.record_pickup(objective_word(1)));
        assert!(!tally.is_complete());

        assert!(!tally.record_pickup(TileItemFlags::CAN_BE_SHOT.bits()));
        assert!(!tally.record_pickup(objective_word(5)));

        assert!(tally.record_pickup(objective_word(0)));
        assert!(tally.is_complete());
        assert_eq!(tally.objectives()[0].done, 2);
    }
}
