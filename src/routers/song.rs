use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::warn;

use crate::models::song::{Song, SongRequest};
use crate::routers::AppState;

const DEFAULT_SORT: &str = "sound_id";
const DEFAULT_PAGE: usize = 1;
const DEFAULT_SONGS_PAGE_SIZE: usize = 10;
const DEFAULT_VERSES_PAGE_SIZE: usize = 1;

pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(get_songs_route).post(insert_song_route))
        .route(
            "/songs/{song_id}",
            get(get_song_route)
                .put(update_song_route)
                .delete(delete_song_route),
        )
        .route("/songs/{song_id}/text", get(get_song_text_route))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({"message": message}))).into_response()
}

fn parse_song_id(raw: &str) -> Result<i64, Response> {
    raw.parse::<i64>().map_err(|_| {
        warn!("Invalid song_id {:?}", raw);
        error_response(StatusCode::BAD_REQUEST, "Invalid song_id")
    })
}

/// Reads a positive integer query parameter, falling back to `default` when
/// it is missing, malformed or below 1.
fn positive_param(query: &HashMap<String, String>, key: &str, default: usize) -> usize {
    match query.get(key) {
        None => default,
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if value >= 1 => value,
            _ => {
                warn!("Invalid {}={:?}, using {}", key, raw, default);
                default
            }
        },
    }
}

/// GET /songs?sort=&page=&page_size=
pub async fn get_songs_route(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let sort = query.get("sort").map(String::as_str).unwrap_or(DEFAULT_SORT);
    let page = positive_param(&query, "page", DEFAULT_PAGE);
    let page_size = positive_param(&query, "page_size", DEFAULT_SONGS_PAGE_SIZE);

    match state.songs.get_songs(sort, page, page_size).await {
        Ok(songs) => Json(songs).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /songs/{song_id}
pub async fn get_song_route(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> Response {
    let song_id = match parse_song_id(&song_id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match state.songs.get_song(song_id).await {
        Ok(song) => Json(song).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /songs/{song_id}/text?page=&page_size=
pub async fn get_song_text_route(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let song_id = match parse_song_id(&song_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let page = positive_param(&query, "page", DEFAULT_PAGE);
    let page_size = positive_param(&query, "page_size", DEFAULT_VERSES_PAGE_SIZE);

    match state.songs.get_song_text(song_id, page_size, page).await {
        Ok(verses) => Json(verses).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /songs
pub async fn insert_song_route(
    State(state): State<AppState>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected insert body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    if !request.is_complete() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Group and Song fields are required",
        );
    }

    match state.songs.insert_song(request).await {
        Ok(_) => message_response(StatusCode::CREATED, "Song inserted successfully"),
        Err(e) => e.into_response(),
    }
}

/// PUT /songs/{song_id}
pub async fn update_song_route(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
    payload: Result<Json<Song>, JsonRejection>,
) -> Response {
    let song_id = match parse_song_id(&song_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let song = match payload {
        Ok(Json(song)) => song,
        Err(rejection) => {
            warn!("Rejected update body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    match state.songs.update_song(song_id, song).await {
        Ok(()) => message_response(StatusCode::OK, "Song updated successfully"),
        Err(e) => e.into_response(),
    }
}

/// DELETE /songs/{song_id}
pub async fn delete_song_route(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> Response {
    let song_id = match parse_song_id(&song_id) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match state.songs.delete_song(song_id).await {
        Ok(()) => message_response(StatusCode::OK, "Song deleted successfully"),
        Err(e) => e.into_response(),
    }
}
