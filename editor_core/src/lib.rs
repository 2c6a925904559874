//! Core crate of the campaign character editor.
//!
//! Holds the editing session, range-checked field edits and per-character
//! render handles, and drives them through a Bevy schedule: every
//! [`run_frame`] applies the commands submitted since the previous frame.

pub mod cursor;
pub mod editor_config;
pub mod field_editor;
pub mod metrics;
pub mod render_handles;
pub mod session;
pub mod store;
mod systems;

use std::sync::Arc;

use bevy::prelude::*;

use campaign_runtime::{CampaignSetting, EditorCommand};

pub use cursor::EditorCursor;
pub use editor_config::{
    load_editor_config, load_editor_config_from_env, EditorConfig, EditorConfigError,
    EditorConfigHandle, EditorConfigMetadata, BUILTIN_EDITOR_CONFIG, EDITOR_CONFIG_ENV,
};
pub use field_editor::{apply_change, apply_value, sanitize, step_field};
pub use metrics::EditorMetrics;
pub use render_handles::{
    BodyPart, HandleAllocator, HandleId, HandleSet, RenderHandleRegistry, SequentialAllocator,
};
pub use session::{CommandOutcome, DeclineReason, EditorEvent, EditorSession};
pub use store::{clamp_selection, CharacterStore, Clipboard, DEFAULT_CHARACTER_CAPACITY};
pub use systems::{PendingCommands, SessionStatus};

/// Construct a Bevy [`App`] editing `setting`, with render handles drawn
/// from a [`SequentialAllocator`].
pub fn build_editor_app(setting: CampaignSetting, config: Arc<EditorConfig>) -> App {
    build_editor_app_with_allocator(setting, config, Box::<SequentialAllocator>::default())
}

pub fn build_editor_app_with_allocator(
    setting: CampaignSetting,
    config: Arc<EditorConfig>,
    allocator: Box<dyn HandleAllocator>,
) -> App {
    let mut app = App::new();

    let session = EditorSession::new(setting, &config);
    let registry = RenderHandleRegistry::with_entries(allocator, session.len());
    tracing::info!(
        target: "char_editor::session",
        title = session.title(),
        characters = session.len(),
        "session.opened"
    );

    app.insert_resource(session)
        .insert_resource(registry)
        .insert_resource(EditorConfigHandle::new(config))
        .insert_resource(PendingCommands::default())
        .insert_resource(SessionStatus::default())
        .insert_resource(EditorMetrics::default())
        .add_event::<EditorEvent>()
        .add_plugins(MinimalPlugins)
        .add_systems(
            Update,
            (
                systems::apply_editor_commands,
                systems::sync_render_handles,
                systems::track_unsaved_changes,
                metrics::collect_metrics,
            )
                .chain(),
        );

    app
}

/// Queue a command for the next frame.
pub fn submit_command(app: &mut App, command: EditorCommand) {
    app.world.resource_mut::<PendingCommands>().push(command);
}

/// Execute a single editor frame.
///
/// Each call processes the chained systems configured in [`build_editor_app`]
/// (commands → render handles → unsaved tracking → metrics).
pub fn run_frame(app: &mut App) {
    app.update();
}

/// Tear the app down, releasing every render handle, and hand back the
/// campaign as edited.
pub fn shutdown_editor(mut app: App) -> Option<CampaignSetting> {
    if let Some(mut registry) = app.world.remove_resource::<RenderHandleRegistry>() {
        registry.release_all();
    }
    let setting = app
        .world
        .remove_resource::<EditorSession>()
        .map(EditorSession::into_setting);
    tracing::info!(target: "char_editor::session", "session.closed");
    setting
}
