//! Per-character render resources.
//!
//! Each character owns one handle per drawn body part. Handles are acquired
//! when a character is inserted, released when it is removed, and every
//! outstanding handle is released when the registry goes away.

use std::collections::HashSet;

use bevy::prelude::Resource;
use tracing::{debug, warn};

use crate::session::EditorEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Head,
    Hair,
    Body,
    Legs,
    Gun,
}

impl BodyPart {
    pub const COUNT: usize = 5;
    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Head,
        BodyPart::Hair,
        BodyPart::Body,
        BodyPart::Legs,
        BodyPart::Gun,
    ];

    fn slot(self) -> usize {
        match self {
            BodyPart::Head => 0,
            BodyPart::Hair => 1,
            BodyPart::Body => 2,
            BodyPart::Legs => 3,
            BodyPart::Gun => 4,
        }
    }
}

/// The handles held for one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleSet {
    handles: [HandleId; BodyPart::COUNT],
}

impl HandleSet {
    pub fn get(&self, part: BodyPart) -> HandleId {
        self.handles[part.slot()]
    }

    pub fn as_slice(&self) -> &[HandleId] {
        &self.handles
    }
}

/// Source of render handles, normally backed by the renderer's texture pool.
pub trait HandleAllocator: Send + Sync {
    fn allocate(&mut self) -> HandleId;
    fn release(&mut self, handle: HandleId);
    /// Handles allocated and not yet released.
    fn live(&self) -> usize;
}

/// Hands out increasing ids and tracks which are outstanding.
#[derive(Debug, Default)]
pub struct SequentialAllocator {
    next: u32,
    live: HashSet<HandleId>,
}

impl HandleAllocator for SequentialAllocator {
    fn allocate(&mut self) -> HandleId {
        let handle = HandleId(self.next);
        self.next = self.next.wrapping_add(1);
        self.live.insert(handle);
        handle
    }

    fn release(&mut self, handle: HandleId) {
        if !self.live.remove(&handle) {
            warn!(
                target: "char_editor::render",
                handle = handle.0,
                "render_handle.release_unknown"
            );
        }
    }

    fn live(&self) -> usize {
        self.live.len()
    }
}

/// Handle sets kept parallel to the character collection: entry `i`
/// belongs to character `i`.
#[derive(Resource)]
pub struct RenderHandleRegistry {
    allocator: Box<dyn HandleAllocator>,
    sets: Vec<HandleSet>,
}

impl RenderHandleRegistry {
    pub fn new(allocator: Box<dyn HandleAllocator>) -> Self {
        Self {
            allocator,
            sets: Vec::new(),
        }
    }

    /// Registry already holding handles for `count` loaded characters.
    pub fn with_entries(allocator: Box<dyn HandleAllocator>, count: usize) -> Self {
        let mut registry = Self::new(allocator);
        for index in 0..count {
            registry.acquire_at(index);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HandleSet> {
        self.sets.get(index)
    }

    pub fn live_handles(&self) -> usize {
        self.allocator.live()
    }

    /// Acquire a handle set for a character inserted at `index`.
    pub fn acquire_at(&mut self, index: usize) -> &HandleSet {
        let allocator = &mut self.allocator;
        let set = HandleSet {
            handles: std::array::from_fn(|_| allocator.allocate()),
        };
        let index = index.min(self.sets.len());
        self.sets.insert(index, set);
        &self.sets[index]
    }

    /// Release the set of the character removed from `index`.
    pub fn release_at(&mut self, index: usize) -> bool {
        if index >= self.sets.len() {
            return false;
        }
        let set = self.sets.remove(index);
        for handle in set.handles {
            self.allocator.release(handle);
        }
        true
    }

    pub fn release_all(&mut self) {
        if self.sets.is_empty() {
            return;
        }
        let released = self.sets.len();
        for set in self.sets.drain(..) {
            for handle in set.handles {
                self.allocator.release(handle);
            }
        }
        debug!(
            target: "char_editor::render",
            released,
            "render_handles.released_all"
        );
    }

    /// Follow a collection change so entries stay parallel to characters.
    pub fn apply(&mut self, event: &EditorEvent) {
        match *event {
            EditorEvent::CharacterInserted { index } => {
                self.acquire_at(index);
            }
            EditorEvent::CharacterRemoved { index } => {
                if !self.release_at(index) {
                    warn!(
                        target: "char_editor::render",
                        index,
                        "render_handles.release_missing"
                    );
                }
            }
            _ => {}
        }
    }
}

impl Drop for RenderHandleRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}
