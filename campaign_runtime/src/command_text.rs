use std::num::ParseIntError;

use thiserror::Error;

use crate::fields::{parse_trait, Field, FieldSelector, Row};
use crate::{Direction, EditorCommand};

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid integer '{value}' for {context}: {source}")]
    InvalidInteger {
        value: String,
        context: &'static str,
        source: ParseIntError,
    },
    #[error("unknown row '{0}'")]
    UnknownRow(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<CommandParseError>,
    },
}

pub fn parse_command_line(input: &str) -> Result<EditorCommand, CommandParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CommandParseError::Empty);
    }

    let mut parts = trimmed.split_whitespace();
    let verb = parts
        .next()
        .map(|v| v.to_ascii_lowercase())
        .ok_or(CommandParseError::Empty)?;

    match verb.as_str() {
        "up" => Ok(EditorCommand::MoveCursor(Direction::Up)),
        "down" => Ok(EditorCommand::MoveCursor(Direction::Down)),
        "left" => Ok(EditorCommand::MoveCursor(Direction::Left)),
        "right" => Ok(EditorCommand::MoveCursor(Direction::Right)),
        "focus" => {
            let row_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("row"))?;
            let row =
                Row::parse(row_str).ok_or_else(|| CommandParseError::UnknownRow(row_str.to_string()))?;
            let column_str = parts.next().unwrap_or("0");
            let column = parse_usize(column_str, "focus column")?;
            Ok(EditorCommand::FocusField(FieldSelector::new(row, column)))
        }
        "inc" | "dec" => {
            let steps_str = parts.next().unwrap_or("1");
            let steps = parse_i32(steps_str, "change steps")?;
            let delta = if verb == "dec" {
                steps.saturating_neg()
            } else {
                steps
            };
            Ok(EditorCommand::Change { delta })
        }
        "change" => {
            let delta_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("delta"))?;
            let delta = parse_i32(delta_str, "change delta")?;
            Ok(EditorCommand::Change { delta })
        }
        "set" => {
            let field_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("field"))?;
            let value_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("value"))?;
            let field = Field::parse(field_str)
                .ok_or_else(|| CommandParseError::UnknownField(field_str.to_string()))?;
            let value = match value_str.to_ascii_lowercase().as_str() {
                "on" | "true" => 1,
                "off" | "false" => 0,
                _ => parse_i32(value_str, "set value")?,
            };
            Ok(EditorCommand::SetValue { field, value })
        }
        "toggle" => {
            let flag_str = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("flag"))?;
            let flag = parse_trait(flag_str)
                .ok_or_else(|| CommandParseError::UnknownFlag(flag_str.to_string()))?;
            Ok(EditorCommand::ToggleFlag(flag))
        }
        "select" => {
            let target = parts
                .next()
                .ok_or(CommandParseError::MissingArgument("index"))?;
            match target.to_ascii_lowercase().as_str() {
                "prev" | "previous" | "home" => Ok(EditorCommand::SelectPrevious),
                "next" | "end" => Ok(EditorCommand::SelectNext),
                _ => Ok(EditorCommand::Select(parse_usize(target, "select index")?)),
            }
        }
        "insert" => Ok(EditorCommand::Insert),
        "append" | "new" => Ok(EditorCommand::Append),
        "delete" | "del" => Ok(EditorCommand::Delete),
        "cut" => Ok(EditorCommand::Cut),
        "copy" => Ok(EditorCommand::Copy),
        "paste" => Ok(EditorCommand::Paste),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Parse a whole script, one command per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_script(script: &str) -> Result<Vec<EditorCommand>, CommandParseError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(number, line)| {
            parse_command_line(line).map_err(|source| CommandParseError::AtLine {
                line: number + 1,
                source: Box::new(source),
            })
        })
        .collect()
}

fn parse_i32(value: &str, context: &'static str) -> Result<i32, CommandParseError> {
    value
        .trim_start_matches('+')
        .parse::<i32>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}

fn parse_usize(value: &str, context: &'static str) -> Result<usize, CommandParseError> {
    value
        .parse::<usize>()
        .map_err(|source| CommandParseError::InvalidInteger {
            value: value.to_string(),
            context,
            source,
        })
}
