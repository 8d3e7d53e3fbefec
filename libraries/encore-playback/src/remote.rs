//! Fire-and-forget remote updates
//!
//! Optimistic mutations are sent to the music service on the ambient tokio
//! runtime. Their outcome never feeds back into playback state: failures are
//! logged and dropped.

use encore_core::TrackId;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn a remote update without awaiting it
///
/// Returns `None` when called outside a tokio runtime; the update is then
/// dropped with a warning.
pub(crate) fn spawn_detached<F>(
    operation: &'static str,
    track_id: TrackId,
    request: F,
) -> Option<JoinHandle<()>>
where
    F: Future<Output = encore_core::Result<()>> + Send + 'static,
{
    let Ok(handle) = Handle::try_current() else {
        warn!(
            operation,
            track_id = %track_id,
            "No async runtime available, remote update dropped"
        );
        return None;
    };

    Some(handle.spawn(async move {
        match request.await {
            Ok(()) => debug!(operation, track_id = %track_id, "Remote update acknowledged"),
            Err(e) => warn!(
                operation,
                track_id = %track_id,
                error = %e,
                "Remote update failed, local state kept"
            ),
        }
    }))
}
