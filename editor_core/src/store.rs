//! The ordered character collection and the single-slot clipboard.

use campaign_runtime::CharacterTemplate;

pub const DEFAULT_CHARACTER_CAPACITY: usize = 1000;

/// Ordered character templates. A template is identified only by its index,
/// so inserts and removals renumber everything after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterStore {
    characters: Vec<CharacterTemplate>,
    capacity: usize,
    default_template: CharacterTemplate,
}

impl Default for CharacterStore {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_CHARACTER_CAPACITY)
    }
}

impl CharacterStore {
    /// Wrap an existing collection. A collection already above `capacity` is
    /// kept whole; only further inserts are refused.
    pub fn new(characters: Vec<CharacterTemplate>, capacity: usize) -> Self {
        Self {
            characters,
            capacity,
            default_template: CharacterTemplate::default_enemy(),
        }
    }

    pub fn with_default_template(mut self, template: CharacterTemplate) -> Self {
        self.default_template = template;
        self
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.characters.len() >= self.capacity
    }

    pub fn default_template(&self) -> &CharacterTemplate {
        &self.default_template
    }

    pub fn get(&self, index: usize) -> Option<&CharacterTemplate> {
        self.characters.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CharacterTemplate> {
        self.characters.get_mut(index)
    }

    pub fn as_slice(&self) -> &[CharacterTemplate] {
        &self.characters
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterTemplate> {
        self.characters.iter()
    }

    pub fn into_vec(self) -> Vec<CharacterTemplate> {
        self.characters
    }

    /// Insert `template`, or the default template when `None`, before
    /// `index`. Indices past the end append.
    ///
    /// Returns the index the template landed at, or `None` at capacity.
    pub fn insert(&mut self, index: usize, template: Option<CharacterTemplate>) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = index.min(self.characters.len());
        self.characters
            .insert(index, template.unwrap_or(self.default_template));
        Some(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<CharacterTemplate> {
        (index < self.characters.len()).then(|| self.characters.remove(index))
    }
}

/// Keep a selection valid for a collection of `len` entries: past the end
/// moves to the last entry, an empty collection selects nothing.
pub fn clamp_selection(selection: Option<usize>, len: usize) -> Option<usize> {
    match (selection, len) {
        (_, 0) => None,
        (Some(index), len) => Some(index.min(len - 1)),
        (None, _) => None,
    }
}

/// Single template slot shared by cut, copy and paste.
///
/// An untouched clipboard holds nothing and pastes as a zeroed template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clipboard {
    slot: Option<CharacterTemplate>,
}

impl Clipboard {
    pub fn store(&mut self, template: CharacterTemplate) {
        self.slot = Some(template);
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// What a paste inserts. Copies; the clipboard keeps its contents.
    pub fn contents(&self) -> CharacterTemplate {
        self.slot.unwrap_or_else(CharacterTemplate::zeroed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(health: u16) -> CharacterTemplate {
        CharacterTemplate {
            health,
            ..CharacterTemplate::default_enemy()
        }
    }

    fn store_of(count: u16) -> CharacterStore {
        CharacterStore::new((0..count).map(template).collect(), DEFAULT_CHARACTER_CAPACITY)
    }

    #[test]
    fn insert_none_uses_default_template() {
        let mut store = store_of(2);
        assert_eq!(store.insert(1, None), Some(1));
        assert_eq!(store.get(1), Some(&CharacterTemplate::default_enemy()));
        assert_eq!(store.get(2).map(|t| t.health), Some(1));
    }

    #[test]
    fn insert_past_end_appends() {
        let mut store = store_of(2);
        assert_eq!(store.insert(99, Some(template(77))), Some(2));
        assert_eq!(store.get(2).map(|t| t.health), Some(77));
    }

    #[test]
    fn insert_then_remove_restores_collection() {
        let mut store = store_of(4);
        let before = store.clone();
        let index = store.insert(2, None).unwrap();
        assert_eq!(store.len(), 5);
        store.remove(index);
        assert_eq!(store, before);
    }

    #[test]
    fn capacity_refuses_inserts() {
        let mut store = CharacterStore::new(vec![template(1)], 2);
        assert_eq!(store.insert(0, None), Some(0));
        assert!(store.is_full());
        assert_eq!(store.insert(0, None), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut store = store_of(1);
        assert_eq!(store.remove(1), None);
        assert_eq!(store.remove(0), Some(template(0)));
        assert!(store.is_empty());
    }

    #[test]
    fn selection_clamps_after_removal() {
        let mut store = store_of(3);
        store.remove(1);
        assert_eq!(clamp_selection(Some(2), store.len()), Some(1));
        assert_eq!(clamp_selection(Some(0), store.len()), Some(0));
        assert_eq!(clamp_selection(Some(0), 0), None);
        assert_eq!(clamp_selection(None, 3), None);
    }

    #[test]
    fn empty_clipboard_pastes_zeroed_template() {
        let mut clipboard = Clipboard::default();
        assert!(clipboard.is_empty());
        assert_eq!(clipboard.contents(), CharacterTemplate::zeroed());

        clipboard.store(template(90));
        assert_eq!(clipboard.contents().health, 90);
        assert_eq!(clipboard.contents().health, 90);
    }
}
