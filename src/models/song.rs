use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Reads a JSON `null` string field as empty, the same as a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A stored song. Every text field may be empty except `group` and `song`
/// at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Song {
    #[sqlx(rename = "id")]
    pub sound_id: i64,
    #[serde(deserialize_with = "null_as_empty")]
    pub group: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub song: String,
    #[serde(rename = "releaseDate", deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub link: String,
}

impl Song {
    pub fn new(request: SongRequest, detail: SongDetail) -> Self {
        Song {
            sound_id: 0,
            group: request.group,
            song: request.song,
            release_date: detail.release_date,
            text: detail.text,
            link: detail.link,
        }
    }

    /// Fills every empty field from `previous`. An update can change a field
    /// but never blank it.
    pub fn merged_over(mut self, previous: &Song) -> Self {
        fn keep(field: &mut String, old: &str) {
            if field.is_empty() {
                *field = old.to_string();
            }
        }
        keep(&mut self.group, &previous.group);
        keep(&mut self.song, &previous.song);
        keep(&mut self.release_date, &previous.release_date);
        keep(&mut self.text, &previous.text);
        keep(&mut self.link, &previous.link);
        self.sound_id = previous.sound_id;
        self
    }
}

/// Body of `POST /songs`, also the key for the info lookup.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(default)]
pub struct SongRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub group: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub song: String,
}

impl SongRequest {
    pub fn is_complete(&self) -> bool {
        !self.group.is_empty() && !self.song.is_empty()
    }
}

/// Enrichment payload returned by the info service.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct SongDetail {
    #[serde(rename = "releaseDate", default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
}
