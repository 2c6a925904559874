use bevy::prelude::*;

use crate::{render_handles::RenderHandleRegistry, session::EditorSession};

#[derive(Resource, Default, Debug, Clone)]
pub struct EditorMetrics {
    pub frames: u64,
    pub commands_applied: u64,
    pub commands_declined: u64,
    pub characters: usize,
    pub live_handles: usize,
}

pub fn collect_metrics(
    session: Res<EditorSession>,
    registry: Res<RenderHandleRegistry>,
    mut metrics: ResMut<EditorMetrics>,
) {
    metrics.frames += 1;
    metrics.characters = session.len();
    metrics.live_handles = registry.live_handles();
}
