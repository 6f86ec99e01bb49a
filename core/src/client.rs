//! Stateless HTTP request builder and response parser for the board service.
//!
//! # Design
//! `BoardClient` holds the base URL and the key/token pair and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller (usually `Remote`) executes the round-trip.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Board, BoardList, Card, Credentials};

/// Synchronous, stateless client for the board service.
#[derive(Clone)]
pub struct BoardClient {
    base_url: String,
    key: String,
    token: String,
}

impl BoardClient {
    pub fn new(base_url: &str, credentials: &Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            key: credentials.key.clone(),
            token: credentials.token.clone(),
        }
    }

    pub fn build_member_boards(&self, username: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/members/{username}/boards"), &[])
    }

    pub fn build_board_lists(&self, board_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/boards/{board_id}/lists"), &[])
    }

    pub fn build_list_cards(&self, list_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/lists/{list_id}/cards"), &[])
    }

    /// Server-side copy of `card` into `target_list_id` with `due` overridden.
    pub fn build_clone_card(&self, card: &Card, target_list_id: &str, due: &str) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            "/cards".to_string(),
            &[("idList", target_list_id), ("idCardSource", card.id.as_str()), ("due", due)],
        )
    }

    pub fn build_move_card(&self, card_id: &str, list_id: &str) -> HttpRequest {
        self.request(HttpMethod::Put, format!("/cards/{card_id}"), &[("idList", list_id)])
    }

    pub fn parse_boards(&self, response: HttpResponse) -> Result<Vec<Board>, ApiError> {
        parse_json(response)
    }

    pub fn parse_lists(&self, response: HttpResponse) -> Result<Vec<BoardList>, ApiError> {
        parse_json(response)
    }

    pub fn parse_cards(&self, response: HttpResponse) -> Result<Vec<Card>, ApiError> {
        parse_json(response)
    }

    /// Parse the card returned by a clone or move.
    pub fn parse_card(&self, response: HttpResponse) -> Result<Card, ApiError> {
        parse_json(response)
    }

    fn request(&self, method: HttpMethod, path: String, params: &[(&str, &str)]) -> HttpRequest {
        let mut query = vec![
            ("key".to_string(), self.key.clone()),
            ("token".to_string(), self.token.clone()),
        ];
        query.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            query,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}
