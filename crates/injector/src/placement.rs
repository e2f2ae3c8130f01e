//! Placement engine: insert a control relative to a resolved anchor.

use uigraft_core_types::{NodeId, PlacementMode};
use uigraft_host_adapter::{HostError, UiTree};

use crate::errors::InjectError;

/// Place `control` relative to `anchor` per `mode`.
///
/// Anchor resolution is the caller's responsibility; this is only invoked
/// with an anchor known to exist in the live tree at the time of the query.
pub async fn place(
    ui: &dyn UiTree,
    control: NodeId,
    anchor: NodeId,
    mode: PlacementMode,
) -> Result<(), InjectError> {
    match mode {
        PlacementMode::Before => ui.insert_before(control, anchor).await?,
        PlacementMode::After => match ui.next_sibling(anchor).await? {
            Some(next) => ui.insert_before(control, next).await?,
            None => {
                // Anchor is the last child: land at the end of its parent.
                let parent = ui
                    .parent_of(anchor)
                    .await?
                    .ok_or(HostError::Detached(anchor))?;
                ui.append_child(parent, control).await?;
            }
        },
        PlacementMode::Child => ui.append_child(anchor, control).await?,
    }
    Ok(())
}
