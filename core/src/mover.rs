//! Move completed cards into the board's "Done" list.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::remote::Remote;
use crate::transport::Transport;
use crate::types::{BoardList, Card};

pub const DONE_LIST_NAME: &str = "Done";

/// Move every card with `dueComplete` set from the other lists into "Done".
///
/// Boards without exactly one list named "Done" are left untouched. Card
/// reads fan out across lists; moves are issued one at a time. Returns the
/// moved cards as the service reported them.
pub fn move_completed<T: Transport>(
    remote: &Remote<T>,
    mut lists: Vec<BoardList>,
) -> Result<Vec<Card>, ApiError> {
    let done_at = {
        let mut done = lists
            .iter()
            .enumerate()
            .filter(|(_, list)| list.name == DONE_LIST_NAME);
        match (done.next(), done.next()) {
            (Some((index, _)), None) => index,
            (None, _) => {
                debug!("no Done list on board, skipping");
                return Ok(Vec::new());
            }
            (Some(_), Some(_)) => {
                debug!("several Done lists on board, skipping");
                return Ok(Vec::new());
            }
        }
    };
    let mut done = lists.remove(done_at);

    remote.load_cards(&mut lists)?;

    let mut moved = Vec::new();
    for list in &lists {
        for card in list.cards().iter().filter(|card| card.due_complete) {
            let updated = remote.move_card(card, &done)?;
            done.push_card(updated.clone());
            moved.push(updated);
        }
    }

    if !moved.is_empty() {
        info!(moved = moved.len(), "moved completed cards");
    }
    Ok(moved)
}
