//! Translation of terminal input into editor commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::prelude::Rect;

use campaign_runtime::{Direction, EditorCommand, FieldSelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Command(EditorCommand),
    Save,
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<HostAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let command = match key.code {
        KeyCode::Esc => return Some(HostAction::Quit),
        KeyCode::Char('q') if !chord => return Some(HostAction::Quit),
        KeyCode::Char('s') | KeyCode::Char('S')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            return Some(HostAction::Save)
        }
        KeyCode::Up => EditorCommand::MoveCursor(Direction::Up),
        KeyCode::Down => EditorCommand::MoveCursor(Direction::Down),
        KeyCode::Left => EditorCommand::MoveCursor(Direction::Left),
        KeyCode::Right => EditorCommand::MoveCursor(Direction::Right),
        KeyCode::PageUp => EditorCommand::Change { delta: 1 },
        KeyCode::PageDown => EditorCommand::Change { delta: -1 },
        KeyCode::Home => EditorCommand::SelectPrevious,
        KeyCode::End => EditorCommand::SelectNext,
        KeyCode::Insert => EditorCommand::Insert,
        KeyCode::Delete => EditorCommand::Delete,
        KeyCode::Char(c) if chord => match c.to_ascii_lowercase() {
            'x' => EditorCommand::Cut,
            'c' => EditorCommand::Copy,
            'v' => EditorCommand::Paste,
            'n' => EditorCommand::Append,
            _ => return None,
        },
        _ => return None,
    };
    Some(HostAction::Command(command))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInput {
    Primary,
    Secondary,
    WheelUp,
    WheelDown,
}

pub fn pointer_input(kind: MouseEventKind) -> Option<PointerInput> {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerInput::Primary),
        MouseEventKind::Down(MouseButton::Right) => Some(PointerInput::Secondary),
        MouseEventKind::ScrollUp => Some(PointerInput::WheelUp),
        MouseEventKind::ScrollDown => Some(PointerInput::WheelDown),
        _ => None,
    }
}

/// What a screen cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Field(FieldSelector),
    Character(usize),
}

/// Clickable regions recorded by the last draw.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    targets: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn push(&mut self, area: Rect, target: HitTarget) {
        self.targets.push((area, target));
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.targets
            .iter()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(_, target)| *target)
    }
}

/// Commands for a pointer event over `target`.
///
/// Clicking a field focuses it and steps it, up for the primary button and
/// down for the secondary one. The wheel only steps a field that already has
/// focus. Clicking a character selects it.
pub fn map_pointer(
    input: PointerInput,
    target: HitTarget,
    focused: FieldSelector,
    character_count: usize,
) -> Vec<EditorCommand> {
    match (target, input) {
        (HitTarget::Field(selector), PointerInput::Primary) => vec![
            EditorCommand::FocusField(selector),
            EditorCommand::Change { delta: 1 },
        ],
        (HitTarget::Field(selector), PointerInput::Secondary) => vec![
            EditorCommand::FocusField(selector),
            EditorCommand::Change { delta: -1 },
        ],
        (HitTarget::Field(selector), PointerInput::WheelUp) if selector == focused => {
            vec![EditorCommand::Change { delta: 1 }]
        }
        (HitTarget::Field(selector), PointerInput::WheelDown) if selector == focused => {
            vec![EditorCommand::Change { delta: -1 }]
        }
        (HitTarget::Character(index), PointerInput::Primary | PointerInput::Secondary)
            if index < character_count =>
        {
            vec![EditorCommand::Select(index)]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_runtime::Row;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn command(code: KeyCode, modifiers: KeyModifiers) -> Option<EditorCommand> {
        match map_key(key(code, modifiers)) {
            Some(HostAction::Command(command)) => Some(command),
            _ => None,
        }
    }

    #[test]
    fn legacy_keys_map_to_commands() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            command(KeyCode::Left, none),
            Some(EditorCommand::MoveCursor(Direction::Left))
        );
        assert_eq!(
            command(KeyCode::PageUp, none),
            Some(EditorCommand::Change { delta: 1 })
        );
        assert_eq!(
            command(KeyCode::PageDown, none),
            Some(EditorCommand::Change { delta: -1 })
        );
        assert_eq!(command(KeyCode::Home, none), Some(EditorCommand::SelectPrevious));
        assert_eq!(command(KeyCode::End, none), Some(EditorCommand::SelectNext));
        assert_eq!(command(KeyCode::Insert, none), Some(EditorCommand::Insert));
        assert_eq!(command(KeyCode::Delete, none), Some(EditorCommand::Delete));
    }

    #[test]
    fn control_and_alt_chords_edit_the_clipboard() {
        assert_eq!(
            command(KeyCode::Char('x'), KeyModifiers::CONTROL),
            Some(EditorCommand::Cut)
        );
        assert_eq!(
            command(KeyCode::Char('c'), KeyModifiers::ALT),
            Some(EditorCommand::Copy)
        );
        assert_eq!(
            command(KeyCode::Char('V'), KeyModifiers::CONTROL | KeyModifiers::SHIFT),
            Some(EditorCommand::Paste)
        );
        assert_eq!(
            command(KeyCode::Char('n'), KeyModifiers::ALT),
            Some(EditorCommand::Append)
        );
        assert_eq!(command(KeyCode::Char('x'), KeyModifiers::NONE), None);
    }

    #[test]
    fn host_actions() {
        assert_eq!(
            map_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(HostAction::Save)
        );
        assert_eq!(map_key(key(KeyCode::Esc, KeyModifiers::NONE)), Some(HostAction::Quit));
        assert_eq!(
            map_key(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(HostAction::Quit)
        );
        let mut release = key(KeyCode::Esc, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn click_focuses_then_steps() {
        let speed = FieldSelector::new(Row::Attributes, 0);
        let face = FieldSelector::new(Row::Appearance, 0);
        assert_eq!(
            map_pointer(PointerInput::Primary, HitTarget::Field(speed), face, 3),
            vec![
                EditorCommand::FocusField(speed),
                EditorCommand::Change { delta: 1 }
            ]
        );
        assert_eq!(
            map_pointer(PointerInput::Secondary, HitTarget::Field(speed), face, 3),
            vec![
                EditorCommand::FocusField(speed),
                EditorCommand::Change { delta: -1 }
            ]
        );
    }

    #[test]
    fn wheel_only_steps_the_focused_field() {
        let speed = FieldSelector::new(Row::Attributes, 0);
        let face = FieldSelector::new(Row::Appearance, 0);
        assert!(map_pointer(PointerInput::WheelUp, HitTarget::Field(speed), face, 3).is_empty());
        assert_eq!(
            map_pointer(PointerInput::WheelDown, HitTarget::Field(speed), speed, 3),
            vec![EditorCommand::Change { delta: -1 }]
        );
    }

    #[test]
    fn clicking_a_character_selects_it_when_in_range() {
        let focus = FieldSelector::default();
        assert_eq!(
            map_pointer(PointerInput::Primary, HitTarget::Character(2), focus, 3),
            vec![EditorCommand::Select(2)]
        );
        assert!(map_pointer(PointerInput::Primary, HitTarget::Character(3), focus, 3).is_empty());
        assert!(map_pointer(PointerInput::WheelUp, HitTarget::Character(0), focus, 3).is_empty());
    }

    #[test]
    fn hit_map_finds_enclosing_region() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(2, 1, 10, 1), HitTarget::Character(0));
        hits.push(
            Rect::new(12, 1, 10, 1),
            HitTarget::Field(FieldSelector::new(Row::Weapon, 0)),
        );
        assert_eq!(hits.hit(2, 1), Some(HitTarget::Character(0)));
        assert_eq!(hits.hit(11, 1), Some(HitTarget::Character(0)));
        assert_eq!(
            hits.hit(12, 1),
            Some(HitTarget::Field(FieldSelector::new(Row::Weapon, 0)))
        );
        assert_eq!(hits.hit(12, 2), None);
        hits.clear();
        assert_eq!(hits.hit(2, 1), None);
    }
}
