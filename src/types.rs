use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub country_code: String,
    pub user_id: u64,
    #[serde(default)]
    pub obtained_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub sub_status: i64,
    #[serde(default)]
    pub user_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioQuality {
    #[default]
    Lossless,
    HiRes,
}

impl AudioQuality {
    pub const ALL: [AudioQuality; 2] = [AudioQuality::Lossless, AudioQuality::HiRes];
}

impl Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AudioQuality::Lossless => "LOSSLESS",
            AudioQuality::HiRes => "HI_RES",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<Artist>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub number_of_tracks: u32,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub audio_quality: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub cover: Option<String>,
}

impl Album {
    pub fn artist_name(&self) -> &str {
        self.artist
            .as_ref()
            .or_else(|| self.artists.first())
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<Artist>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub album: Album,
    #[serde(default)]
    pub track_number: u32,
    #[serde(default)]
    pub volume_number: u32,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub audio_quality: Option<String>,
}

impl Track {
    pub fn artist_name(&self) -> Option<&str> {
        self.artist
            .as_ref()
            .or_else(|| self.artists.first())
            .map(|a| a.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total_number_of_items: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_number_of_items: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite<T> {
    #[serde(default)]
    pub created: Option<String>,
    pub item: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub albums: Page<Album>,
    #[serde(default)]
    pub artists: Page<Artist>,
    #[serde(default)]
    pub tracks: Page<Track>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUrlResponse {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub sound_quality: Option<String>,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub tracks: u32,
    pub released: String,
    pub quality: String,
}

impl From<&Album> for AlbumTableRow {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id,
            title: album.title.clone(),
            artist: album.artist_name().to_string(),
            tracks: album.number_of_tracks,
            released: album.release_date.clone().unwrap_or_default(),
            quality: album.audio_quality.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub id: u64,
    pub name: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub id: u64,
    pub number: u32,
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            number: track.track_number,
            title: track.title.clone(),
            artist: track.artist_name().unwrap_or_default().to_string(),
            album: track.album.title.clone(),
        }
    }
}

/// Album data the pipeline works with, cover art included once fetched.
///
/// Serialized as the album's `meta.json` sidecar; the art bytes are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumMetadata {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub number_of_tracks: u32,
    pub release_date: String,
    pub copyright: String,
    pub cover: String,
    /// Total play time in seconds; zero means the album is not streamable.
    pub duration: u64,
    #[serde(skip)]
    pub art: Option<Vec<u8>>,
}

impl AlbumMetadata {
    pub fn is_available(&self) -> bool {
        self.duration > 0
    }
}

impl From<&Album> for AlbumMetadata {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id.to_string(),
            title: album.title.clone(),
            artist: album.artist_name().to_string(),
            number_of_tracks: album.number_of_tracks,
            release_date: album.release_date.clone().unwrap_or_default(),
            copyright: album.copyright.clone().unwrap_or_default(),
            cover: album.cover.clone().unwrap_or_default(),
            duration: album.duration,
            art: None,
        }
    }
}

/// One track ready to be tagged. Borrows its album, which outlives it.
#[derive(Debug, Clone)]
pub struct TrackMetadata<'a> {
    pub id: String,
    pub title: String,
    pub track_number: u32,
    pub total_tracks: u32,
    pub artist: String,
    pub album_artist: String,
    pub copyright: String,
    pub album: &'a AlbumMetadata,
}

impl<'a> TrackMetadata<'a> {
    pub fn new(track: &Track, album: &'a AlbumMetadata) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.title.clone(),
            track_number: track.track_number,
            total_tracks: album.number_of_tracks,
            artist: track
                .artist_name()
                .map(str::to_string)
                .unwrap_or_else(|| album.artist.clone()),
            album_artist: album.artist.clone(),
            copyright: track
                .copyright
                .clone()
                .unwrap_or_else(|| album.copyright.clone()),
            album,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_deserializes_from_api_shape() {
        let json = r#"{
            "id": 77646168,
            "title": "First Light",
            "duration": 2400,
            "numberOfTracks": 10,
            "releaseDate": "2017-05-12",
            "copyright": "(P) 2017 Test Records",
            "cover": "0a1b2c3d-4e5f",
            "audioQuality": "LOSSLESS",
            "artist": {"id": 1, "name": "Test Artist", "type": "MAIN"},
            "artists": [{"id": 1, "name": "Test Artist", "type": "MAIN"}]
        }"#;
        let album: Album = serde_json::from_str(json).unwrap();

        assert_eq!(album.number_of_tracks, 10);
        assert_eq!(album.artist_name(), "Test Artist");
        assert_eq!(album.artist.unwrap().kind.as_deref(), Some("MAIN"));
    }

    #[test]
    fn test_favorites_page_unwraps_items() {
        let json = r#"{
            "limit": 500,
            "offset": 0,
            "totalNumberOfItems": 1,
            "items": [{"created": "2020-01-01T00:00:00.000+0000", "item": {"id": 5, "title": "Fav"}}]
        }"#;
        let page: Page<Favorite<Album>> = serde_json::from_str(json).unwrap();

        assert_eq!(page.total_number_of_items, Some(1));
        assert_eq!(page.items[0].item.title, "Fav");
        assert_eq!(page.items[0].item.artist_name(), "Unknown Artist");
    }

    #[test]
    fn test_error_response_defaults() {
        let err: ErrorResponse =
            serde_json::from_str(r#"{"status": 401, "subStatus": 6001, "userMessage": "Session expired"}"#)
                .unwrap();
        assert_eq!(err.status, 401);
        assert_eq!(err.sub_status, 6001);

        let empty: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.user_message.is_empty());
    }

    #[test]
    fn test_search_response_missing_sections() {
        let search: SearchResponse =
            serde_json::from_str(r#"{"artists": {"items": [{"id": 3, "name": "Someone"}]}}"#)
                .unwrap();

        assert!(search.albums.items.is_empty());
        assert_eq!(search.artists.items[0].name, "Someone");
    }

    #[test]
    fn test_track_metadata_takes_album_totals() {
        let album = AlbumMetadata {
            id: "1".to_string(),
            title: "Album".to_string(),
            artist: "Album Artist".to_string(),
            number_of_tracks: 7,
            release_date: String::new(),
            copyright: "(C) Label".to_string(),
            cover: String::new(),
            duration: 10,
            art: None,
        };
        let track = Track {
            id: 9,
            title: "Song".to_string(),
            track_number: 3,
            copyright: Some("(P) Track".to_string()),
            ..Default::default()
        };
        let metadata = TrackMetadata::new(&track, &album);

        assert_eq!(metadata.id, "9");
        assert_eq!(metadata.total_tracks, 7);
        assert_eq!(metadata.artist, "Album Artist");
        assert_eq!(metadata.copyright, "(P) Track");
    }
}
