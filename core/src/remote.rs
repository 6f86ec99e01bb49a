//! `BoardClient` and a `Transport` glued into one round-trip per call.
//!
//! # Design
//! Reads may fan out across lists of one board (`load_cards`); every write
//! goes out one at a time from the calling thread. The service's write path
//! does not cope with bursts, so nothing here parallelises clones or moves.

use std::collections::HashSet;
use std::thread;

use tracing::{debug, info};

use crate::client::BoardClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Board, BoardList, Card};

pub struct Remote<T> {
    client: BoardClient,
    transport: T,
}

impl<T: Transport> Remote<T> {
    pub fn new(client: BoardClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Boards of every account in `usernames`, first-seen order, one entry
    /// per board id even when several accounts share it.
    pub fn boards<S: AsRef<str>>(&self, usernames: &[S]) -> Result<Vec<Board>, ApiError> {
        let mut seen = HashSet::new();
        let mut boards = Vec::new();
        for username in usernames {
            let req = self.client.build_member_boards(username.as_ref());
            for board in self.client.parse_boards(self.send(&req)?)? {
                if seen.insert(board.id.clone()) {
                    boards.push(board);
                }
            }
        }
        debug!(count = boards.len(), "fetched boards");
        Ok(boards)
    }

    pub fn lists(&self, board: &Board) -> Result<Vec<BoardList>, ApiError> {
        let req = self.client.build_board_lists(&board.id);
        self.client.parse_lists(self.send(&req)?)
    }

    pub fn cards(&self, list: &BoardList) -> Result<Vec<Card>, ApiError> {
        let req = self.client.build_list_cards(&list.id);
        self.client.parse_cards(self.send(&req)?)
    }

    /// Fetch the cards of every list concurrently and store them on the
    /// list they belong to. Returns once every fetch has finished; the first
    /// error (in list order) wins and no list is updated.
    pub fn load_cards(&self, lists: &mut [BoardList]) -> Result<(), ApiError> {
        let fetched: Vec<Result<Vec<Card>, ApiError>> = thread::scope(|scope| {
            let handles: Vec<_> = lists
                .iter()
                .map(|list| scope.spawn(move || self.cards(list)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(ApiError::Transport("card fetch panicked".to_string())))
                })
                .collect()
        });

        let fetched = fetched.into_iter().collect::<Result<Vec<_>, _>>()?;
        for (list, cards) in lists.iter_mut().zip(fetched) {
            list.cards = Some(cards);
        }
        Ok(())
    }

    pub fn clone_card(&self, card: &Card, target: &BoardList, due: &str) -> Result<Card, ApiError> {
        let req = self.client.build_clone_card(card, &target.id, due);
        let created = self.client.parse_card(self.send(&req)?)?;
        info!(card = %card.name, list = %target.name, due, "cloned card");
        Ok(created)
    }

    pub fn move_card(&self, card: &Card, list: &BoardList) -> Result<Card, ApiError> {
        let req = self.client.build_move_card(&card.id, &list.id);
        let moved = self.client.parse_card(self.send(&req)?)?;
        info!(card = %card.name, list = %list.name, "moved card");
        Ok(moved)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request)
    }
}
