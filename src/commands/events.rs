use crate::services::pipeline::PipelineEvent;
use crate::state::AppStateHandle;
use tauri::{AppHandle, Emitter};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

/// Single consumer of pipeline events: folds them into the shared state and
/// forwards them to the window
pub fn spawn_event_forwarder(
    app: AppHandle,
    state: AppStateHandle,
    mut events: UnboundedReceiver<PipelineEvent>,
) {
    tauri::async_runtime::spawn(async move {
        while let Some(event) = events.recv().await {
            let stale = {
                let mut guard = state.lock();
                let stale = guard.is_stale(&event);
                guard.apply(&event);
                stale
            };
            if stale {
                debug!(channel = event.channel(), batch = ?event.batch(), "Dropping result of an earlier batch");
                continue;
            }

            if let Err(e) = app.emit(event.channel(), &event) {
                warn!(channel = event.channel(), error = %e, "Failed to emit event");
            }
        }
        debug!("Pipeline event channel closed");
    });
}
