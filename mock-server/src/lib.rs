use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    pub id_board: String,
    pub closed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub due: Option<String>,
    pub due_complete: bool,
    pub id_list: String,
    pub id_board: String,
}

/// In-memory board service state. Members map to the boards they can see.
#[derive(Debug, Default)]
pub struct Store {
    pub key: String,
    pub token: String,
    pub members: HashMap<String, Vec<String>>,
    pub boards: Vec<Board>,
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
}

impl Store {
    pub fn new(key: &str, token: &str) -> Self {
        Self {
            key: key.to_string(),
            token: token.to_string(),
            ..Self::default()
        }
    }

    pub fn add_board(&mut self, name: &str, members: &[&str]) -> String {
        let id = new_id();
        self.boards.push(Board {
            id: id.clone(),
            name: name.to_string(),
        });
        for member in members {
            self.members.entry(member.to_string()).or_default().push(id.clone());
        }
        id
    }

    pub fn add_list(&mut self, board_id: &str, name: &str) -> String {
        let id = new_id();
        self.lists.push(List {
            id: id.clone(),
            name: name.to_string(),
            id_board: board_id.to_string(),
            closed: false,
        });
        id
    }

    pub fn add_card(&mut self, list_id: &str, name: &str, due_complete: bool) -> String {
        let id = new_id();
        let id_board = self.board_of(list_id).unwrap_or_default();
        self.cards.push(Card {
            id: id.clone(),
            name: name.to_string(),
            desc: format!("{name} description"),
            due: None,
            due_complete,
            id_list: list_id.to_string(),
            id_board,
        });
        id
    }

    pub fn cards_in(&self, list_id: &str) -> Vec<Card> {
        self.cards.iter().filter(|c| c.id_list == list_id).cloned().collect()
    }

    fn board_of(&self, list_id: &str) -> Option<String> {
        self.lists.iter().find(|l| l.id == list_id).map(|l| l.id_board.clone())
    }

    fn authorized(&self, params: &Params) -> bool {
        params.get("key") == Some(&self.key) && params.get("token") == Some(&self.token)
    }
}

pub type Db = Arc<RwLock<Store>>;

type Params = HashMap<String, String>;

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(Store::new("key", "token"))))
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/members/{username}/boards", get(member_boards))
        .route("/boards/{id}/lists", get(board_lists))
        .route("/lists/{id}/cards", get(list_cards))
        .route("/cards", post(create_card))
        .route("/cards/{id}", put(update_card))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn member_boards(
    State(db): State<Db>,
    Path(username): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<Board>>, StatusCode> {
    let store = db.read().await;
    if !store.authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let ids = store.members.get(&username).ok_or(StatusCode::NOT_FOUND)?;
    let boards: Vec<Board> = store.boards.iter().filter(|b| ids.contains(&b.id)).cloned().collect();
    Ok(Json(boards))
}

async fn board_lists(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<List>>, StatusCode> {
    let store = db.read().await;
    if !store.authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if !store.boards.iter().any(|b| b.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(store.lists.iter().filter(|l| l.id_board == id).cloned().collect()))
}

async fn list_cards(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<Card>>, StatusCode> {
    let store = db.read().await;
    if !store.authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    store.board_of(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(store.cards_in(&id)))
}

/// `idCardSource` copies that card; otherwise `name` is required.
async fn create_card(
    State(db): State<Db>,
    Query(params): Query<Params>,
) -> Result<Json<Card>, StatusCode> {
    let mut store = db.write().await;
    if !store.authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let id_list = params.get("idList").ok_or(StatusCode::BAD_REQUEST)?;
    let id_board = store.board_of(id_list).ok_or(StatusCode::NOT_FOUND)?;

    let mut card = match params.get("idCardSource") {
        Some(source) => store
            .cards
            .iter()
            .find(|c| &c.id == source)
            .cloned()
            .ok_or(StatusCode::NOT_FOUND)?,
        None => Card {
            id: String::new(),
            name: params.get("name").cloned().ok_or(StatusCode::BAD_REQUEST)?,
            desc: String::new(),
            due: None,
            due_complete: false,
            id_list: String::new(),
            id_board: String::new(),
        },
    };
    card.id = new_id();
    card.id_list = id_list.clone();
    card.id_board = id_board;
    card.due_complete = false;
    if let Some(due) = params.get("due") {
        card.due = Some(due.clone());
    }

    store.cards.push(card.clone());
    Ok(Json(card))
}

async fn update_card(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<Card>, StatusCode> {
    let mut store = db.write().await;
    if !store.authorized(&params) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let id_board = match params.get("idList") {
        Some(id_list) => Some(store.board_of(id_list).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };
    let card = store.cards.iter_mut().find(|c| c.id == id).ok_or(StatusCode::NOT_FOUND)?;
    if let (Some(id_list), Some(id_board)) = (params.get("idList"), id_board) {
        card.id_list = id_list.clone();
        card.id_board = id_board;
    }
    if let Some(name) = params.get("name") {
        card.name = name.clone();
    }
    if let Some(due) = params.get("due") {
        card.due = Some(due.clone());
    }
    if let Some(done) = params.get("dueComplete") {
        card.due_complete = done == "true";
    }
    Ok(Json(card.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_serializes_with_service_field_names() {
        let mut store = Store::new("k", "t");
        let board = store.add_board("Chores", &["s.law"]);
        let list = store.add_list(&board, "Daily");
        store.add_card(&list, "Dishes", true);

        let json = serde_json::to_value(&store.cards[0]).unwrap();
        assert_eq!(json["name"], "Dishes");
        assert_eq!(json["dueComplete"], true);
        assert_eq!(json["idList"], list.as_str());
        assert_eq!(json["idBoard"], board.as_str());
        assert!(json["due"].is_null());
    }

    #[test]
    fn shared_board_is_listed_for_every_member() {
        let mut store = Store::new("k", "t");
        let board = store.add_board("Shared", &["a", "b"]);
        assert_eq!(store.members["a"], vec![board.clone()]);
        assert_eq!(store.members["b"], vec![board]);
    }

    #[test]
    fn cards_in_filters_by_list() {
        let mut store = Store::new("k", "t");
        let board = store.add_board("B", &["a"]);
        let one = store.add_list(&board, "one");
        let two = store.add_list(&board, "two");
        store.add_card(&one, "x", false);
        store.add_card(&two, "y", false);
        let names: Vec<_> = store.cards_in(&two).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["y"]);
    }

    #[test]
    fn authorization_needs_key_and_token() {
        let store = Store::new("k", "t");
        let mut params = Params::new();
        params.insert("key".to_string(), "k".to_string());
        assert!(!store.authorized(&params));
        params.insert("token".to_string(), "t".to_string());
        assert!(store.authorized(&params));
    }
}
