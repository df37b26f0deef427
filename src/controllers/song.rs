use std::cmp::Ordering;
use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::controllers::paging::page_window;
use crate::db::{RepoError, SongRepository};
use crate::models::song::{Song, SongDetail, SongRequest};

const VERSE_SEPARATOR: &str = "\n\n";
const RELEASE_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, thiserror::Error)]
pub enum SongError {
    #[error("failed to retrieve songs: {0}")]
    List(#[source] RepoError),
    #[error(transparent)]
    Lookup(RepoError),
    #[error("external api error: invalid url: {0}")]
    ExternalUrl(#[from] url::ParseError),
    #[error("external api error: {0}")]
    ExternalRequest(#[from] reqwest::Error),
    #[error("external api error: bad request, status: {}", .0.as_u16())]
    ExternalStatus(reqwest::StatusCode),
    #[error("insert method: {0}")]
    Insert(#[source] RepoError),
    #[error("put method: {0}")]
    Update(#[source] RepoError),
    #[error("delete method: {0}")]
    Delete(#[source] RepoError),
}

impl SongError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SongError::Lookup(RepoError::NotFound(_)))
    }
}

// Every controller failure is reported as 500, missing rows included.
impl IntoResponse for SongError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            warn!("{}", self);
        } else {
            error!("{}", self);
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": self.to_string()})),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    SoundId,
    TextLength,
    Song,
    ReleaseDate,
}

impl SortKey {
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "sound_id" => Some(SortKey::SoundId),
            "text_length" => Some(SortKey::TextLength),
            "song" => Some(SortKey::Song),
            "release_date" => Some(SortKey::ReleaseDate),
            _ => None,
        }
    }

    /// Stable in-memory sort. Release dates that do not parse as
    /// `DD.MM.YYYY` compare equal to each other and before any valid date.
    pub fn sort(self, songs: &mut [Song]) {
        match self {
            SortKey::SoundId => songs.sort_by_key(|s| s.sound_id),
            SortKey::TextLength => songs.sort_by_key(|s| s.text.chars().count()),
            SortKey::Song => songs.sort_by_cached_key(|s| s.song.to_lowercase()),
            SortKey::ReleaseDate => songs.sort_by(|a, b| compare_release_dates(a, b)),
        }
    }
}

fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), RELEASE_DATE_FORMAT).ok()
}

fn compare_release_dates(a: &Song, b: &Song) -> Ordering {
    parse_release_date(&a.release_date).cmp(&parse_release_date(&b.release_date))
}

pub fn split_verses(text: &str) -> Vec<String> {
    text.split(VERSE_SEPARATOR).map(str::to_string).collect()
}

pub struct SongController {
    repo: Arc<dyn SongRepository>,
    client: Client,
    info_url: String,
}

impl SongController {
    pub fn new(repo: Arc<dyn SongRepository>, external_api_url: &str) -> Self {
        SongController {
            repo,
            client: Client::new(),
            info_url: format!("{}/info", external_api_url.trim_end_matches('/')),
        }
    }

    pub async fn get_songs(
        &self,
        sort: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Song>, SongError> {
        debug!(
            "get_songs sort={} page={} page_size={}",
            sort, page, page_size
        );

        let mut songs = self.repo.get_songs().await.map_err(SongError::List)?;

        let key = SortKey::from_param(sort).unwrap_or_else(|| {
            debug!("Invalid sort parameter {:?}, defaulting to sound_id", sort);
            SortKey::SoundId
        });
        key.sort(&mut songs);
        debug!("Sorted {} songs by {:?}", songs.len(), key);

        let window = page_window(songs.len(), page, page_size);
        let page_songs: Vec<Song> = songs.drain(window).collect();

        info!(
            "Returning {} songs from page {} with page size {}",
            page_songs.len(),
            page,
            page_size
        );
        Ok(page_songs)
    }

    pub async fn get_song(&self, song_id: i64) -> Result<Song, SongError> {
        debug!("get_song song_id={}", song_id);
        let song = self.repo.get_song(song_id).await.map_err(SongError::Lookup)?;
        info!("Retrieved song {}", song_id);
        Ok(song)
    }

    pub async fn get_song_text(
        &self,
        song_id: i64,
        page_size: usize,
        page: usize,
    ) -> Result<Vec<String>, SongError> {
        let page_size = page_size.max(1);
        let page = page.max(1);
        debug!(
            "get_song_text song_id={} page={} page_size={}",
            song_id, page, page_size
        );

        let song = self.repo.get_song(song_id).await.map_err(SongError::Lookup)?;
        let mut verses = split_verses(&song.text);
        let window = page_window(verses.len(), page, page_size);
        let page_verses: Vec<String> = verses.drain(window).collect();

        info!(
            "Returning {} verses from page {} with page size {}",
            page_verses.len(),
            page,
            page_size
        );
        Ok(page_verses)
    }

    async fn fetch_detail(&self, request: &SongRequest) -> Result<SongDetail, SongError> {
        let mut url = url::Url::parse(&self.info_url)?;
        url.query_pairs_mut()
            .append_pair("group", &request.group)
            .append_pair("song", &request.song);
        debug!("Calling external API: {}", url);

        let res = self.client.get(url).send().await?;
        let status = res.status();
        debug!("External API response status: {}", status);
        if status != reqwest::StatusCode::OK {
            return Err(SongError::ExternalStatus(status));
        }

        Ok(res.json::<SongDetail>().await?)
    }

    pub async fn insert_song(&self, request: SongRequest) -> Result<i64, SongError> {
        let detail = self.fetch_detail(&request).await?;
        let song = Song::new(request, detail);
        let id = self
            .repo
            .insert_song(&song)
            .await
            .map_err(SongError::Insert)?;
        info!("Inserted {:?} by {:?} as {}", song.song, song.group, id);
        Ok(id)
    }

    pub async fn update_song(&self, song_id: i64, song: Song) -> Result<(), SongError> {
        debug!("update_song song_id={} data={:?}", song_id, song);

        let previous = self.repo.get_song(song_id).await.map_err(SongError::Lookup)?;
        let merged = song.merged_over(&previous);

        self.repo
            .update_song(song_id, &merged)
            .await
            .map_err(SongError::Update)?;
        info!("Updated song {}", song_id);
        Ok(())
    }

    pub async fn delete_song(&self, song_id: i64) -> Result<(), SongError> {
        debug!("delete_song song_id={}", song_id);
        self.repo
            .delete_song(song_id)
            .await
            .map_err(SongError::Delete)?;
        Ok(())
    }
}
