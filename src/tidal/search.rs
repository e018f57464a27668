use crate::{
    Res,
    tidal::TidalClient,
    types::{Album, Artist, SearchResponse, Track},
};

impl TidalClient {
    async fn search(&self, query: &str, types: &str, limit: Option<u32>) -> Res<SearchResponse> {
        let mut params = vec![("query", query.to_string()), ("types", types.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.get("search", &params).await
    }

    pub async fn search_albums(&self, query: &str, limit: Option<u32>) -> Res<Vec<Album>> {
        Ok(self.search(query, "ALBUMS", limit).await?.albums.items)
    }

    pub async fn search_artists(&self, query: &str, limit: Option<u32>) -> Res<Vec<Artist>> {
        Ok(self.search(query, "ARTISTS", limit).await?.artists.items)
    }

    pub async fn search_tracks(&self, query: &str, limit: Option<u32>) -> Res<Vec<Track>> {
        Ok(self.search(query, "TRACKS", limit).await?.tracks.items)
    }
}
