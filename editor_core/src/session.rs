//! Editing state of one open campaign and the command dispatcher over it.

use bevy::prelude::{Event, Resource};
use tracing::{debug, info, warn};

use campaign_runtime::{
    CampaignSetting, CatalogLimits, CharacterFlags, CharacterTemplate, EditorCommand, Field,
    FieldSelector,
};

use crate::{
    cursor::EditorCursor,
    editor_config::EditorConfig,
    field_editor::{apply_change, apply_value, sanitize},
    store::{clamp_selection, CharacterStore, Clipboard},
};

/// Something that happened to the session as a result of a command.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// A field of the character at `index` was written, whether or not the
    /// stored value ended up different.
    FieldEdited { index: usize, field: Field },
    CharacterInserted { index: usize },
    CharacterRemoved { index: usize },
    SelectionChanged { index: Option<usize> },
    CursorMoved { selector: FieldSelector },
    ClipboardFilled,
}

impl EditorEvent {
    /// Whether the event leaves the campaign with unsaved changes.
    pub fn marks_unsaved(&self) -> bool {
        matches!(
            self,
            EditorEvent::FieldEdited { .. }
                | EditorEvent::CharacterInserted { .. }
                | EditorEvent::CharacterRemoved { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    NoSelection,
    AtCapacity,
    IndexOutOfRange,
    /// The cursor or flag does not address a single editable field.
    InvalidField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(Vec<EditorEvent>),
    Declined(DeclineReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied(_))
    }

    pub fn events(&self) -> &[EditorEvent] {
        match self {
            CommandOutcome::Applied(events) => events,
            CommandOutcome::Declined(_) => &[],
        }
    }

    pub fn marks_unsaved(&self) -> bool {
        self.events().iter().any(EditorEvent::marks_unsaved)
    }

    pub fn declined(&self) -> Option<DeclineReason> {
        match self {
            CommandOutcome::Declined(reason) => Some(*reason),
            CommandOutcome::Applied(_) => None,
        }
    }
}

/// Everything the editor knows about the open campaign: the characters,
/// which one is selected, which field is focused and the clipboard.
///
/// The selection is always `None` or a valid index; every operation that
/// changes the collection re-clamps it.
#[derive(Resource, Debug, Clone)]
pub struct EditorSession {
    title: String,
    author: String,
    description: String,
    store: CharacterStore,
    selection: Option<usize>,
    cursor: EditorCursor,
    clipboard: Clipboard,
    limits: CatalogLimits,
}

impl EditorSession {
    /// Open `setting` for editing. Loaded templates and the insert template
    /// are pulled into the configured ranges and the first character is
    /// selected.
    pub fn new(setting: CampaignSetting, config: &EditorConfig) -> Self {
        let limits = config.limits();
        let CampaignSetting {
            title,
            author,
            description,
            mut characters,
        } = setting;

        let adjusted = characters
            .iter_mut()
            .map(|template| sanitize(template, &limits))
            .filter(|adjusted| *adjusted)
            .count();
        if adjusted > 0 {
            warn!(
                target: "char_editor::session",
                adjusted,
                "session.templates_sanitized"
            );
        }

        let mut default_template = config.default_template();
        if sanitize(&mut default_template, &limits) {
            warn!(
                target: "char_editor::session",
                "session.default_template_sanitized"
            );
        }

        let store = CharacterStore::new(characters, config.max_characters)
            .with_default_template(default_template);
        let selection = clamp_selection(Some(0), store.len());
        Self {
            title,
            author,
            description,
            store,
            selection,
            cursor: EditorCursor::default(),
            clipboard: Clipboard::default(),
            limits,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn characters(&self) -> &[CharacterTemplate] {
        self.store.as_slice()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected(&self) -> Option<&CharacterTemplate> {
        self.selection.and_then(|index| self.store.get(index))
    }

    pub fn cursor(&self) -> EditorCursor {
        self.cursor
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn limits(&self) -> &CatalogLimits {
        &self.limits
    }

    /// Snapshot of the campaign as it would be saved now.
    pub fn to_setting(&self) -> CampaignSetting {
        CampaignSetting {
            title: self.title.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            characters: self.store.as_slice().to_vec(),
        }
    }

    pub fn into_setting(self) -> CampaignSetting {
        CampaignSetting {
            title: self.title,
            author: self.author,
            description: self.description,
            characters: self.store.into_vec(),
        }
    }

    /// Apply one command. Commands that need a selected character are
    /// declined when nothing is selected.
    pub fn dispatch(&mut self, command: EditorCommand) -> CommandOutcome {
        let outcome = match command {
            EditorCommand::MoveCursor(direction) => {
                self.cursor = self.cursor.moved(direction);
                self.cursor_moved()
            }
            EditorCommand::FocusField(selector) => {
                self.cursor = self.cursor.focused(selector);
                self.cursor_moved()
            }
            EditorCommand::Change { delta } => self.change(delta),
            EditorCommand::SetValue { field, value } => self.set_value(field, value),
            EditorCommand::ToggleFlag(flag) => self.toggle_flag(flag),
            EditorCommand::Select(index) => self.select(index),
            EditorCommand::SelectPrevious => match self.selection {
                Some(index) if index > 0 => self.select(index - 1),
                Some(_) => CommandOutcome::Declined(DeclineReason::IndexOutOfRange),
                None => CommandOutcome::Declined(DeclineReason::NoSelection),
            },
            EditorCommand::SelectNext => match self.selection {
                Some(index) => self.select(index + 1),
                None => CommandOutcome::Declined(DeclineReason::NoSelection),
            },
            EditorCommand::Insert => self.insert_at(self.selection.unwrap_or(0), None),
            EditorCommand::Append => {
                let outcome = self.insert_at(self.store.len(), None);
                match outcome {
                    CommandOutcome::Applied(mut events) => {
                        let index = self.store.len() - 1;
                        self.set_selection(Some(index), &mut events);
                        CommandOutcome::Applied(events)
                    }
                    declined => declined,
                }
            }
            EditorCommand::Delete => self.with_selection(Self::delete_at),
            EditorCommand::Cut => self.with_selection(Self::cut_at),
            EditorCommand::Copy => self.with_selection(Self::copy_at),
            EditorCommand::Paste => self.paste_at(self.selection.unwrap_or(0)),
        };

        match &outcome {
            CommandOutcome::Applied(events) => debug!(
                target: "char_editor::session",
                command = command.verb(),
                events = events.len(),
                "command.applied"
            ),
            CommandOutcome::Declined(reason) => debug!(
                target: "char_editor::session",
                command = command.verb(),
                ?reason,
                "command.declined"
            ),
        }
        outcome
    }

    /// Insert `template`, or the default template, before `index`.
    ///
    /// The selection keeps its index, so a selected character slides down
    /// and the new one takes its place. An empty selection picks the new
    /// character.
    pub fn insert_at(&mut self, index: usize, template: Option<CharacterTemplate>) -> CommandOutcome {
        let Some(index) = self.store.insert(index, template) else {
            info!(
                target: "char_editor::session",
                capacity = self.store.capacity(),
                "character.insert.at_capacity"
            );
            return CommandOutcome::Declined(DeclineReason::AtCapacity);
        };
        let mut events = vec![EditorEvent::CharacterInserted { index }];
        if self.selection.is_none() {
            self.set_selection(Some(index), &mut events);
        }
        info!(
            target: "char_editor::session",
            index,
            count = self.store.len(),
            "character.inserted"
        );
        CommandOutcome::Applied(events)
    }

    /// Remove the character at `index` and re-clamp the selection.
    pub fn delete_at(&mut self, index: usize) -> CommandOutcome {
        if self.store.remove(index).is_none() {
            return CommandOutcome::Declined(DeclineReason::IndexOutOfRange);
        }
        let mut events = vec![EditorEvent::CharacterRemoved { index }];
        self.set_selection(clamp_selection(self.selection, self.store.len()), &mut events);
        info!(
            target: "char_editor::session",
            index,
            count = self.store.len(),
            "character.removed"
        );
        CommandOutcome::Applied(events)
    }

    pub fn copy_at(&mut self, index: usize) -> CommandOutcome {
        match self.store.get(index) {
            Some(template) => {
                self.clipboard.store(*template);
                CommandOutcome::Applied(vec![EditorEvent::ClipboardFilled])
            }
            None => CommandOutcome::Declined(DeclineReason::IndexOutOfRange),
        }
    }

    pub fn cut_at(&mut self, index: usize) -> CommandOutcome {
        let CommandOutcome::Applied(mut events) = self.copy_at(index) else {
            return CommandOutcome::Declined(DeclineReason::IndexOutOfRange);
        };
        events.extend(self.delete_at(index).events().iter().copied());
        CommandOutcome::Applied(events)
    }

    /// Insert the clipboard contents before `index`. An empty clipboard
    /// pastes a zeroed template, which is not clamped into range.
    pub fn paste_at(&mut self, index: usize) -> CommandOutcome {
        let template = self.clipboard.contents();
        self.insert_at(index, Some(template))
    }

    fn with_selection(&mut self, op: fn(&mut Self, usize) -> CommandOutcome) -> CommandOutcome {
        match self.selection {
            Some(index) => op(self, index),
            None => CommandOutcome::Declined(DeclineReason::NoSelection),
        }
    }

    fn cursor_moved(&self) -> CommandOutcome {
        CommandOutcome::Applied(vec![EditorEvent::CursorMoved {
            selector: self.cursor.selector(),
        }])
    }

    fn select(&mut self, index: usize) -> CommandOutcome {
        if index >= self.store.len() {
            return CommandOutcome::Declined(DeclineReason::IndexOutOfRange);
        }
        let mut events = Vec::new();
        self.set_selection(Some(index), &mut events);
        CommandOutcome::Applied(events)
    }

    fn set_selection(&mut self, selection: Option<usize>, events: &mut Vec<EditorEvent>) {
        if self.selection != selection {
            self.selection = selection;
            events.push(EditorEvent::SelectionChanged { index: selection });
        }
    }

    /// Step the focused field. The edit counts even when clamping leaves the
    /// value where it was.
    fn change(&mut self, delta: i32) -> CommandOutcome {
        let Some(index) = self.selection else {
            return CommandOutcome::Declined(DeclineReason::NoSelection);
        };
        let selector = self.cursor.selector();
        let (Some(template), Some(field)) = (self.store.get_mut(index), selector.field()) else {
            return CommandOutcome::Declined(DeclineReason::InvalidField);
        };
        apply_change(template, selector, delta, &self.limits);
        CommandOutcome::Applied(vec![EditorEvent::FieldEdited { index, field }])
    }

    fn set_value(&mut self, field: Field, value: i32) -> CommandOutcome {
        if let Field::Trait(flag) = field {
            if flag.bits().count_ones() != 1 {
                return CommandOutcome::Declined(DeclineReason::InvalidField);
            }
        }
        let Some(index) = self.selection else {
            return CommandOutcome::Declined(DeclineReason::NoSelection);
        };
        let Some(template) = self.store.get_mut(index) else {
            return CommandOutcome::Declined(DeclineReason::IndexOutOfRange);
        };
        apply_value(template, field, value, &self.limits);
        CommandOutcome::Applied(vec![EditorEvent::FieldEdited { index, field }])
    }

    fn toggle_flag(&mut self, flag: CharacterFlags) -> CommandOutcome {
        if flag.bits().count_ones() != 1 {
            return CommandOutcome::Declined(DeclineReason::InvalidField);
        }
        let Some(index) = self.selection else {
            return CommandOutcome::Declined(DeclineReason::NoSelection);
        };
        let Some(template) = self.store.get_mut(index) else {
            return CommandOutcome::Declined(DeclineReason::IndexOutOfRange);
        };
        template.flags.toggle(flag);
        CommandOutcome::Applied(vec![EditorEvent::FieldEdited {
            index,
            field: Field::Trait(flag),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_runtime::{Direction, Row};

    fn template(health: u16) -> CharacterTemplate {
        CharacterTemplate {
            health,
            ..CharacterTemplate::default_enemy()
        }
    }

    fn session_with(count: u16) -> EditorSession {
        let mut setting = CampaignSetting::new("Test");
        setting.characters = (0..count).map(|i| template(10 + i * 10)).collect();
        EditorSession::new(setting, &EditorConfig::default())
    }

    fn healths(session: &EditorSession) -> Vec<u16> {
        session.characters().iter().map(|t| t.health).collect()
    }

    #[test]
    fn opening_selects_first_character() {
        assert_eq!(session_with(3).selection(), Some(0));
        assert_eq!(session_with(0).selection(), None);
    }

    #[test]
    fn opening_sanitizes_loaded_templates() {
        let mut setting = CampaignSetting::new("Broken");
        setting.characters = vec![CharacterTemplate::zeroed()];
        let session = EditorSession::new(setting, &EditorConfig::default());
        assert_eq!(session.characters()[0].speed, 128);
        assert_eq!(session.characters()[0].health, 10);
    }

    #[test]
    fn appended_characters_fit_small_catalogs() {
        let mut config = EditorConfig::default();
        config.catalog.faces.truncate(4);
        config.catalog.shades.truncate(5);
        config.catalog.guns.truncate(3);
        let limits = config.limits();
        let mut session = EditorSession::new(CampaignSetting::new("Small"), &config);

        assert!(session.dispatch(EditorCommand::Append).is_applied());
        assert!(session.dispatch(EditorCommand::Insert).is_applied());
        for template in session.characters() {
            for field in Row::ALL.iter().flat_map(|row| row.fields()) {
                let spec = field.spec(&limits);
                assert!(
                    spec.contains(field.read(template)),
                    "{} out of range",
                    field.name()
                );
            }
        }
        assert_eq!(session.characters()[0].shades.legs, 4);
    }

    #[test]
    fn deleting_before_selection_clamps_it() {
        let mut session = session_with(3);
        session.dispatch(EditorCommand::Select(2));
        let outcome = session.delete_at(1);
        assert!(outcome.marks_unsaved());
        assert_eq!(session.selection(), Some(1));
        assert_eq!(healths(&session), vec![10, 30]);
    }

    #[test]
    fn deleting_last_character_clears_selection() {
        let mut session = session_with(1);
        let outcome = session.dispatch(EditorCommand::Delete);
        assert_eq!(
            outcome.events(),
            &[
                EditorEvent::CharacterRemoved { index: 0 },
                EditorEvent::SelectionChanged { index: None },
            ]
        );
        assert_eq!(session.selection(), None);
        assert_eq!(
            session.dispatch(EditorCommand::Delete),
            CommandOutcome::Declined(DeclineReason::NoSelection)
        );
    }

    #[test]
    fn insert_then_delete_restores_collection() {
        let mut session = session_with(3);
        let before = session.characters().to_vec();
        session.dispatch(EditorCommand::Select(1));
        assert!(session.dispatch(EditorCommand::Insert).is_applied());
        assert_eq!(session.characters()[1], CharacterTemplate::default_enemy());
        assert_eq!(session.selection(), Some(1));
        session.dispatch(EditorCommand::Delete);
        assert_eq!(session.characters(), before.as_slice());
    }

    #[test]
    fn cut_then_paste_at_same_index_restores_collection() {
        let mut session = session_with(4);
        let before = session.characters().to_vec();
        session.cut_at(2);
        assert_eq!(session.len(), 3);
        session.paste_at(2);
        assert_eq!(session.characters(), before.as_slice());
    }

    #[test]
    fn copy_paste_duplicates_selection() {
        let mut session = session_with(2);
        session.dispatch(EditorCommand::Select(1));
        let copied = session.dispatch(EditorCommand::Copy);
        assert!(!copied.marks_unsaved());
        session.dispatch(EditorCommand::Paste);
        assert_eq!(healths(&session), vec![10, 20, 20]);
    }

    #[test]
    fn empty_clipboard_pastes_zeroed_template() {
        let mut session = session_with(1);
        session.dispatch(EditorCommand::Paste);
        assert_eq!(session.characters()[0], CharacterTemplate::zeroed());
    }

    #[test]
    fn append_selects_new_character() {
        let mut session = session_with(2);
        let outcome = session.dispatch(EditorCommand::Append);
        assert_eq!(
            outcome.events(),
            &[
                EditorEvent::CharacterInserted { index: 2 },
                EditorEvent::SelectionChanged { index: Some(2) },
            ]
        );
        assert_eq!(session.selection(), Some(2));
    }

    #[test]
    fn insert_into_empty_campaign_selects_it() {
        let mut session = session_with(0);
        session.dispatch(EditorCommand::Insert);
        assert_eq!(session.selection(), Some(0));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn capacity_declines_insert_without_marking_unsaved() {
        let config = EditorConfig {
            max_characters: 2,
            ..EditorConfig::default()
        };
        let mut setting = CampaignSetting::new("Full");
        setting.characters = vec![template(10), template(20)];
        let mut session = EditorSession::new(setting, &config);
        let outcome = session.dispatch(EditorCommand::Append);
        assert_eq!(outcome, CommandOutcome::Declined(DeclineReason::AtCapacity));
        assert!(!outcome.marks_unsaved());
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn clamped_change_still_marks_unsaved() {
        let mut session = session_with(1);
        session.dispatch(EditorCommand::FocusField(FieldSelector::new(Row::Attributes, 0)));
        session.dispatch(EditorCommand::SetValue {
            field: Field::Speed,
            value: 512,
        });
        let outcome = session.dispatch(EditorCommand::Change { delta: 1 });
        assert!(outcome.marks_unsaved());
        assert_eq!(session.characters()[0].speed, 512);
    }

    #[test]
    fn change_without_selection_is_declined() {
        let mut session = session_with(0);
        let outcome = session.dispatch(EditorCommand::Change { delta: 1 });
        assert_eq!(outcome, CommandOutcome::Declined(DeclineReason::NoSelection));
        assert!(!outcome.marks_unsaved());
    }

    #[test]
    fn cursor_moves_do_not_mark_unsaved() {
        let mut session = session_with(1);
        let outcome = session.dispatch(EditorCommand::MoveCursor(Direction::Down));
        assert!(outcome.is_applied());
        assert!(!outcome.marks_unsaved());
        assert_eq!(session.cursor().row(), Row::Attributes);
    }

    #[test]
    fn selection_steps_stop_at_ends() {
        let mut session = session_with(2);
        assert_eq!(
            session.dispatch(EditorCommand::SelectPrevious),
            CommandOutcome::Declined(DeclineReason::IndexOutOfRange)
        );
        session.dispatch(EditorCommand::SelectNext);
        assert_eq!(session.selection(), Some(1));
        assert!(!session.dispatch(EditorCommand::SelectNext).is_applied());
        assert_eq!(
            session.dispatch(EditorCommand::Select(5)),
            CommandOutcome::Declined(DeclineReason::IndexOutOfRange)
        );
    }

    #[test]
    fn toggle_reaches_rowless_trait_and_rejects_masks() {
        let mut session = session_with(1);
        session.dispatch(EditorCommand::ToggleFlag(CharacterFlags::SLEEPING));
        assert!(session.characters()[0].has_flag(CharacterFlags::SLEEPING));
        assert_eq!(
            session.dispatch(EditorCommand::ToggleFlag(
                CharacterFlags::SNEAKY | CharacterFlags::VICTIM
            )),
            CommandOutcome::Declined(DeclineReason::InvalidField)
        );
    }
}
