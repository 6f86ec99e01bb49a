//! One full pass over every board the configured accounts can see.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::mapping::{configured_mappings, parse_mappings};
use crate::mover::move_completed;
use crate::reconcile::reconcile;
use crate::remote::Remote;
use crate::transport::Transport;
use crate::types::{Board, Credentials};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedoSummary {
    pub boards: usize,
    pub mappings: usize,
    pub cloned: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoneSummary {
    pub boards: usize,
    pub moved: usize,
}

/// Reconcile every mapping on every board.
///
/// Boards come from the configured accounts; boards named only in
/// `board_mappings` are visited as well. Mappings run in order, directive
/// mappings first, and the first `ApiError` ends the pass.
pub fn redo_all<T: Transport>(
    remote: &Remote<T>,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<RedoSummary, ApiError> {
    let mut boards = remote.boards(&config.credentials.usernames)?;
    for entry in &config.board_mappings {
        if !boards.iter().any(|board| board.id == entry.board_id) {
            boards.push(Board {
                id: entry.board_id.clone(),
                name: entry.board_id.clone(),
                lists: None,
            });
        }
    }

    let mut summary = RedoSummary::default();
    for board in &mut boards {
        let lists = remote.lists(board)?;
        let mut mappings = parse_mappings(&lists);
        for entry in config.board_mappings.iter().filter(|e| e.board_id == board.id) {
            mappings.extend(configured_mappings(&lists, &entry.list_mapping));
        }
        debug!(board = %board.name, mappings = mappings.len(), "resolved mappings");

        for mapping in &mut mappings {
            summary.cloned += reconcile(remote, mapping, now)?.len();
        }
        summary.mappings += mappings.len();
        summary.boards += 1;
        board.lists = Some(lists);
    }

    info!(?summary, "reconciliation pass finished");
    Ok(summary)
}

/// Move completed cards into "Done" on every board.
pub fn done_all<T: Transport>(remote: &Remote<T>, credentials: &Credentials) -> Result<DoneSummary, ApiError> {
    let mut summary = DoneSummary::default();
    for board in remote.boards(&credentials.usernames)? {
        let lists = remote.lists(&board)?;
        summary.moved += move_completed(remote, lists)?.len();
        summary.boards += 1;
    }

    info!(?summary, "completion pass finished");
    Ok(summary)
}
