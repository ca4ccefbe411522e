//! Role resolver: is the requester an admin member of a channel?
//!
//! Resolves every member's workspace-admin flag and checks whether the
//! requester is in the resulting admin set. Nothing is cached across
//! channels; each stale channel pays one lookup per member.

use std::collections::HashSet;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use chansweep_core::error::ApiError;
use chansweep_core::WorkspaceApi;

/// Workspace admins among a channel's members.
///
/// Lookups run with at most `concurrency` in flight. A failed lookup counts
/// as "not an admin". Only the member-list fetch itself can fail this call.
pub async fn channel_admins(
    api: &dyn WorkspaceApi,
    channel_id: &str,
    concurrency: usize,
) -> Result<HashSet<String>, ApiError> {
    let members = api.members(channel_id).await?;
    debug!(channel = %channel_id, members = members.len(), "resolving member roles");

    let admins = stream::iter(members)
        .map(|member| async move {
            let verdict = api.is_admin(&member).await;
            (member, verdict)
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|(member, verdict)| async move {
            match verdict {
                Ok(true) => Some(member),
                Ok(false) => None,
                Err(e) => {
                    warn!(
                        channel = %channel_id,
                        member = %member,
                        error = %e,
                        "admin lookup failed, treating member as non-admin"
                    );
                    None
                }
            }
        })
        .collect::<HashSet<String>>()
        .await;

    Ok(admins)
}

/// `true` iff `requester` is among the admin members of the channel.
pub async fn requester_is_channel_admin(
    api: &dyn WorkspaceApi,
    channel_id: &str,
    requester: &str,
    concurrency: usize,
) -> Result<bool, ApiError> {
    let admins = channel_admins(api, channel_id, concurrency).await?;
    Ok(admins.contains(requester))
}
