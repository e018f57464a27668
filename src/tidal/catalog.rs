use std::path::Path;

use async_trait::async_trait;
use futures_util::{AsyncWriteExt, StreamExt};

use crate::{
    Res, TidlError,
    download::Catalog,
    tidal::{TidalClient, check_status},
    types::{
        Album, AlbumMetadata, Artist, AudioQuality, Favorite, Page, StreamUrlResponse, Track,
    },
    utils,
};

/// Favourites are fetched in one page of this size.
const FAVORITES_LIMIT: u32 = 500;

impl TidalClient {
    pub async fn get_album(&self, id: &str) -> Res<Album> {
        self.get(&format!("albums/{}", id), &[]).await
    }

    pub async fn get_album_tracks(&self, id: &str) -> Res<Vec<Track>> {
        let page: Page<Track> = self.get(&format!("albums/{}/tracks", id), &[]).await?;
        Ok(page.items)
    }

    pub async fn get_track(&self, id: &str) -> Res<Track> {
        self.get(&format!("tracks/{}", id), &[]).await
    }

    pub async fn get_playlist_tracks(&self, id: &str) -> Res<Vec<Track>> {
        let page: Page<Track> = self.get(&format!("playlists/{}/tracks", id), &[]).await?;
        Ok(page.items)
    }

    pub async fn get_artist(&self, id: &str) -> Res<Artist> {
        self.get(&format!("artists/{}", id), &[]).await
    }

    /// Albums of an artist. With `eps_and_singles` the catalog returns EPs
    /// and singles instead of full-length albums.
    pub async fn get_artist_albums(
        &self,
        id: &str,
        limit: Option<u32>,
        eps_and_singles: bool,
    ) -> Res<Vec<Album>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if eps_and_singles {
            query.push(("filter", "EPSANDSINGLES".to_string()));
        }

        let page: Page<Album> = self
            .get(&format!("artists/{}/albums", id), &query)
            .await?;
        Ok(page.items)
    }

    pub async fn get_favorite_albums(&self) -> Res<Vec<Album>> {
        let path = format!("users/{}/favorites/albums", self.session.user_id);
        let page: Page<Favorite<Album>> = self
            .get(&path, &[("limit", FAVORITES_LIMIT.to_string())])
            .await?;
        Ok(page.items.into_iter().map(|fav| fav.item).collect())
    }

    /// Stream location of a track; an empty string means the track cannot be streamed.
    pub async fn get_stream_url(&self, track_id: &str, quality: AudioQuality) -> Res<String> {
        let response: StreamUrlResponse = self
            .get(
                &format!("tracks/{}/streamUrl", track_id),
                &[("soundQuality", quality.to_string())],
            )
            .await?;
        Ok(response.url)
    }

    /// Front cover at 1280x1280 from the image resources host.
    pub async fn get_cover_art(&self, album: &AlbumMetadata) -> Res<Vec<u8>> {
        if album.cover.is_empty() {
            return Err(TidlError::Unavailable(format!(
                "album '{}' has no cover art",
                album.title
            )));
        }

        let url = utils::cover_url(&self.resources_url, &album.cover);
        let response = check_status(self.http.get(&url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Streams `url` into `dest`, returning the number of bytes written.
    pub async fn download_stream(&self, url: &str, dest: &Path) -> Res<u64> {
        let response = check_status(self.http.get(url).send().await?).await?;

        let mut file = async_fs::File::create(dest)
            .await
            .map_err(|e| TidlError::filesystem(dest, e))?;
        let mut written: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| TidlError::filesystem(dest, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| TidlError::filesystem(dest, e))?;

        Ok(written)
    }
}

#[async_trait]
impl Catalog for TidalClient {
    async fn album(&self, id: &str) -> Res<Album> {
        self.get_album(id).await
    }

    async fn album_tracks(&self, id: &str) -> Res<Vec<Track>> {
        self.get_album_tracks(id).await
    }

    async fn stream_url(&self, track_id: &str, quality: AudioQuality) -> Res<String> {
        self.get_stream_url(track_id, quality).await
    }

    async fn cover_art(&self, album: &AlbumMetadata) -> Res<Vec<u8>> {
        self.get_cover_art(album).await
    }

    async fn download(&self, url: &str, dest: &Path) -> Res<u64> {
        self.download_stream(url, dest).await
    }
}
