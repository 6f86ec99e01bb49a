//! Reconciler and mover behavior against a scripted in-memory transport.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use redoit_core::{
    move_completed, reconcile, ApiError, BoardClient, BoardList, Credentials, HttpMethod,
    HttpRequest, HttpResponse, ListMapping, Remote, Transport,
};

/// Serves card listings from a fixed table and echoes writes back as cards.
#[derive(Default)]
struct Scripted {
    cards: HashMap<String, String>,
    fail_source: Option<String>,
    log: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_reads: AtomicUsize,
    peak_writes: AtomicUsize,
}

impl Scripted {
    fn with_cards(lists: &[(&str, &str)]) -> Self {
        Self {
            cards: lists.iter().map(|(id, body)| (id.to_string(), body.to_string())).collect(),
            ..Self::default()
        }
    }

    fn writes(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|line| !line.starts_with("GET"))
            .cloned()
            .collect()
    }
}

impl Transport for Scripted {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let peak = match request.method {
            HttpMethod::Get => &self.peak_reads,
            _ => &self.peak_writes,
        };
        peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));

        let path = request.url.trim_start_matches("http://fake");
        let line = match request.method {
            HttpMethod::Get => format!("GET {path}"),
            HttpMethod::Post => format!(
                "POST {} -> {}",
                request.query_value("idCardSource").unwrap_or_default(),
                request.query_value("idList").unwrap_or_default()
            ),
            HttpMethod::Put => format!("PUT {path} -> {}", request.query_value("idList").unwrap_or_default()),
        };
        self.log.lock().unwrap().push(line);

        let response = match request.method {
            HttpMethod::Get => {
                let list_id = path
                    .trim_start_matches("/lists/")
                    .trim_end_matches("/cards");
                match self.cards.get(list_id) {
                    Some(body) => ok(body.clone()),
                    None => HttpResponse {
                        status: 404,
                        body: String::new(),
                    },
                }
            }
            HttpMethod::Post => {
                let source = request.query_value("idCardSource").unwrap_or_default();
                if self.fail_source.as_deref() == Some(source) {
                    HttpResponse {
                        status: 500,
                        body: "write failed".to_string(),
                    }
                } else {
                    ok(serde_json::json!({
                        "id": format!("copy-of-{source}"),
                        "name": format!("copy {source}"),
                        "due": request.query_value("due"),
                        "idList": request.query_value("idList"),
                    })
                    .to_string())
                }
            }
            HttpMethod::Put => {
                let id = path.trim_start_matches("/cards/");
                ok(serde_json::json!({
                    "id": id,
                    "name": id,
                    "dueComplete": true,
                    "idList": request.query_value("idList"),
                })
                .to_string())
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(response)
    }
}

fn ok(body: String) -> HttpResponse {
    HttpResponse { status: 200, body }
}

fn remote(transport: Scripted) -> Remote<Scripted> {
    let credentials = Credentials {
        key: "k".to_string(),
        token: "t".to_string(),
        usernames: Vec::new(),
    };
    Remote::new(BoardClient::new("http://fake", &credentials), transport)
}

fn mapping() -> ListMapping {
    ListMapping {
        source: BoardList::new("src", "Template"),
        target: BoardList::new("dst", "Week"),
        interval: 2,
    }
}

#[test]
fn clones_are_issued_one_at_a_time_in_source_order() {
    let remote = remote(Scripted::with_cards(&[
        ("src", r#"[{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"c","name":"C"}]"#),
        ("dst", r#"[{"id":"x","name":"B"}]"#),
    ]));
    let mut mapping = mapping();
    let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();

    let created = reconcile(&remote, &mut mapping, now).unwrap();

    assert_eq!(created.len(), 2);
    assert_eq!(created[0].due.as_deref(), Some("2026-10-19T12:00:00Z"));
    let transport = remote_transport(&remote);
    assert_eq!(transport.writes(), vec!["POST a -> dst", "POST c -> dst"]);
    assert_eq!(transport.peak_writes.load(Ordering::SeqCst), 1);
    let target_ids: Vec<_> = mapping.target.cards().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(target_ids, vec!["x", "copy-of-a", "copy-of-c"]);
}

#[test]
fn failed_clone_aborts_the_rest_of_the_mapping() {
    let mut transport = Scripted::with_cards(&[
        ("src", r#"[{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"c","name":"C"}]"#),
        ("dst", "[]"),
    ]);
    transport.fail_source = Some("b".to_string());
    let remote = remote(transport);
    let mut mapping = mapping();

    let err = reconcile(&remote, &mut mapping, Utc::now()).unwrap_err();

    assert!(matches!(err, ApiError::Http { status: 500, .. }));
    assert_eq!(remote_transport(&remote).writes(), vec!["POST a -> dst", "POST b -> dst"]);
    assert_eq!(mapping.target.cards().len(), 1);
}

#[test]
fn load_cards_fans_out_and_assigns_each_list_its_own_cards() {
    let remote = remote(Scripted::with_cards(&[
        ("l1", r#"[{"id":"1","name":"one"}]"#),
        ("l2", r#"[{"id":"2","name":"two"},{"id":"3","name":"three"}]"#),
        ("l3", "[]"),
    ]));
    let mut lists = vec![
        BoardList::new("l1", "One"),
        BoardList::new("l2", "Two"),
        BoardList::new("l3", "Three"),
    ];

    remote.load_cards(&mut lists).unwrap();

    assert_eq!(lists[0].cards().len(), 1);
    assert_eq!(lists[1].cards()[1].name, "three");
    assert!(lists[2].cards.as_ref().unwrap().is_empty());
    assert!(remote_transport(&remote).peak_reads.load(Ordering::SeqCst) > 1);
}

#[test]
fn load_cards_error_leaves_lists_unloaded() {
    let remote = remote(Scripted::with_cards(&[("l1", "[]")]));
    let mut lists = vec![BoardList::new("l1", "One"), BoardList::new("gone", "Gone")];

    let err = remote.load_cards(&mut lists).unwrap_err();

    assert!(matches!(err, ApiError::NotFound));
    assert!(lists.iter().all(|l| l.cards.is_none()));
}

#[test]
fn mover_moves_completed_cards_sequentially() {
    let remote = remote(Scripted::with_cards(&[
        ("l1", r#"[{"id":"a","name":"A","dueComplete":true},{"id":"b","name":"B"}]"#),
        ("l2", r#"[{"id":"c","name":"C","dueComplete":true}]"#),
        ("done", r#"[{"id":"z","name":"Z","dueComplete":true}]"#),
    ]));
    let lists = vec![
        BoardList::new("l1", "Daily"),
        BoardList::new("done", "Done"),
        BoardList::new("l2", "Weekly"),
    ];

    let moved = move_completed(&remote, lists).unwrap();

    let ids: Vec<_> = moved.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    let transport = remote_transport(&remote);
    assert_eq!(transport.writes(), vec!["PUT /cards/a -> done", "PUT /cards/c -> done"]);
    assert_eq!(transport.peak_writes.load(Ordering::SeqCst), 1);
    assert!(
        !transport.log.lock().unwrap().iter().any(|l| l == "GET /lists/done/cards"),
        "Done list is never read"
    );
}

#[test]
fn mover_skips_board_with_two_done_lists() {
    let remote = remote(Scripted::default());
    let lists = vec![BoardList::new("d1", "Done"), BoardList::new("d2", "Done")];

    assert!(move_completed(&remote, lists).unwrap().is_empty());
    assert!(remote_transport(&remote).log.lock().unwrap().is_empty());
}

fn remote_transport(remote: &Remote<Scripted>) -> &Scripted {
    remote.transport()
}
