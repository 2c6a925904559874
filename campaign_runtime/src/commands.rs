use campaign_schema::CharacterFlags;

use crate::fields::{Field, FieldSelector};

/// Cursor movement across the field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Everything an input layer (keyboard, pointer, text script, GUI callback)
/// can ask the character editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    MoveCursor(Direction),
    /// Jump straight to a field; the selector is re-clamped like a cursor move.
    FocusField(FieldSelector),
    /// Step the focused field of the selected character by `delta` steps.
    Change {
        delta: i32,
    },
    /// Set a field of the selected character to an absolute value,
    /// saturating into the field's range.
    SetValue {
        field: Field,
        value: i32,
    },
    ToggleFlag(CharacterFlags),
    Select(usize),
    SelectPrevious,
    SelectNext,
    /// Insert the default template at the selection.
    Insert,
    /// Add the default template at the end and select it.
    Append,
    Delete,
    Cut,
    Copy,
    Paste,
}

impl EditorCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            EditorCommand::MoveCursor(_) => "move_cursor",
            EditorCommand::FocusField(_) => "focus",
            EditorCommand::Change { .. } => "change",
            EditorCommand::SetValue { .. } => "set",
            EditorCommand::ToggleFlag(_) => "toggle",
            EditorCommand::Select(_) => "select",
            EditorCommand::SelectPrevious => "select_previous",
            EditorCommand::SelectNext => "select_next",
            EditorCommand::Insert => "insert",
            EditorCommand::Append => "append",
            EditorCommand::Delete => "delete",
            EditorCommand::Cut => "cut",
            EditorCommand::Copy => "copy",
            EditorCommand::Paste => "paste",
        }
    }
}
