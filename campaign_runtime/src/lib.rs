//! Shared editor contracts for campaign tools.
//!
//! This crate re-exports the data contracts from `campaign_schema` and adds
//! the pieces every editor front end agrees on (the editable field table,
//! the command vocabulary, the text command syntax) without depending on the
//! Bevy runtime in `editor_core`.

pub use campaign_schema::*;

mod command_text;
mod commands;
mod fields;

pub use command_text::{parse_command_line, parse_script, CommandParseError};
pub use commands::{Direction, EditorCommand};
pub use fields::{
    clamp_saturating, clamp_wrap, CatalogLimits, ClampPolicy, Field, FieldSelector, FieldSpec, Row,
};
