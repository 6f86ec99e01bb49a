use std::sync::Arc;

use mock_server::Store;
use tokio::{net::TcpListener, sync::RwLock};

/// Serves a demo board for `demo` with key `key` and token `token`.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let mut store = Store::new("key", "token");
    let board = store.add_board("Chores", &["demo"]);
    let weekly = store.add_list(&board, r#"Weekly {"interval": 7, "target": "This week"}"#);
    store.add_list(&board, "This week");
    store.add_list(&board, "Done");
    for name in ["Vacuum", "Laundry", "Water plants"] {
        store.add_card(&weekly, name, false);
    }

    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run_with(listener, Arc::new(RwLock::new(store))).await
}
