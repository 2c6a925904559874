use std::collections::VecDeque;

use bevy::prelude::*;

use campaign_runtime::EditorCommand;

use crate::{
    metrics::EditorMetrics,
    render_handles::RenderHandleRegistry,
    session::{CommandOutcome, EditorEvent, EditorSession},
};

/// Commands submitted by the host since the last frame, applied in order.
#[derive(Resource, Debug, Default)]
pub struct PendingCommands {
    queue: VecDeque<EditorCommand>,
}

impl PendingCommands {
    pub fn push(&mut self, command: EditorCommand) {
        self.queue.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<EditorCommand> {
        self.queue.drain(..).collect()
    }
}

/// Save state of the open campaign as seen by the host.
#[derive(Resource, Debug, Default, Clone)]
pub struct SessionStatus {
    pub unsaved_changes: bool,
    pub last_outcome: Option<CommandOutcome>,
}

impl SessionStatus {
    pub fn mark_saved(&mut self) {
        self.unsaved_changes = false;
    }
}

pub fn apply_editor_commands(
    mut pending: ResMut<PendingCommands>,
    mut session: ResMut<EditorSession>,
    mut status: ResMut<SessionStatus>,
    mut metrics: ResMut<EditorMetrics>,
    mut events: EventWriter<EditorEvent>,
) {
    for command in pending.drain() {
        let outcome = session.dispatch(command);
        match &outcome {
            CommandOutcome::Applied(applied) => {
                metrics.commands_applied += 1;
                for event in applied {
                    events.send(*event);
                }
            }
            CommandOutcome::Declined(_) => metrics.commands_declined += 1,
        }
        status.last_outcome = Some(outcome);
    }
}

pub fn sync_render_handles(
    mut events: EventReader<EditorEvent>,
    mut registry: ResMut<RenderHandleRegistry>,
) {
    for event in events.read() {
        registry.apply(event);
    }
}

pub fn track_unsaved_changes(
    mut events: EventReader<EditorEvent>,
    mut status: ResMut<SessionStatus>,
) {
    for event in events.read() {
        if event.marks_unsaved() && !status.unsaved_changes {
            status.unsaved_changes = true;
            tracing::debug!(target: "char_editor::session", ?event, "session.unsaved");
        }
    }
}
