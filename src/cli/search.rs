use tabled::Table;

use crate::{
    cli::{authorized_client, login::spinner},
    error,
    types::{AlbumTableRow, ArtistTableRow, TrackTableRow},
    warning,
};

pub async fn search_albums(query: String, limit: Option<u32>) {
    let client = authorized_client().await;
    let pb = spinner(format!("Searching albums for '{}'...", query));
    let result = client.search_albums(&query, limit).await;
    pb.finish_and_clear();

    match result {
        Ok(albums) if albums.is_empty() => warning!("No albums found for '{}'", query),
        Ok(albums) => {
            let rows: Vec<AlbumTableRow> = albums.iter().map(AlbumTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Search failed. Err: {}", e),
    }
}

pub async fn search_artists(query: String, limit: Option<u32>) {
    let client = authorized_client().await;
    let pb = spinner(format!("Searching artists for '{}'...", query));
    let result = client.search_artists(&query, limit).await;
    pb.finish_and_clear();

    match result {
        Ok(artists) if artists.is_empty() => warning!("No artists found for '{}'", query),
        Ok(artists) => {
            let rows: Vec<ArtistTableRow> = artists
                .into_iter()
                .map(|a| ArtistTableRow {
                    id: a.id,
                    name: a.name,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Search failed. Err: {}", e),
    }
}

pub async fn search_tracks(query: String, limit: Option<u32>) {
    let client = authorized_client().await;
    let pb = spinner(format!("Searching tracks for '{}'...", query));
    let result = client.search_tracks(&query, limit).await;
    pb.finish_and_clear();

    match result {
        Ok(tracks) if tracks.is_empty() => warning!("No tracks found for '{}'", query),
        Ok(tracks) => {
            let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Search failed. Err: {}", e),
    }
}
