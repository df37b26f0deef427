// Shared fixtures for unit and router tests.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    extract::{RawQuery, State},
    http::StatusCode,
    routing::get,
};
use tokio::sync::Mutex;

use crate::models::song::Song;

pub fn song(id: i64, title: &str, release_date: &str, text: &str) -> Song {
    Song {
        sound_id: id,
        group: format!("Group {}", id),
        song: title.to_string(),
        release_date: release_date.to_string(),
        text: text.to_string(),
        link: String::new(),
    }
}

#[derive(Clone)]
struct InfoState {
    status: StatusCode,
    body: &'static str,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
}

/// Stand-in for the song info service, answering every `/info` request with
/// a fixed status and body.
pub struct InfoServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
}

impl InfoServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn last_query(&self) -> Option<String> {
        self.last_query.lock().await.clone()
    }
}

async fn info_route(
    State(state): State<InfoState>,
    RawQuery(query): RawQuery,
) -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().await = query;
    (
        state.status,
        [("content-type", "application/json")],
        state.body,
    )
}

pub async fn spawn_info_server(status: u16, body: &'static str) -> InfoServer {
    let state = InfoState {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        hits: Arc::new(AtomicUsize::new(0)),
        last_query: Arc::new(Mutex::new(None)),
    };
    let server = InfoServer {
        base_url: String::new(),
        hits: state.hits.clone(),
        last_query: state.last_query.clone(),
    };

    let app = Router::new()
        .route("/info", get(info_route))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    InfoServer {
        base_url: format!("http://{}", addr),
        ..server
    }
}
