use tabled::Table;

use crate::{info, management::PlaylistStore, types::PlaylistTableRow, warning};

pub async fn history() {
    let store = match PlaylistStore::load().await {
        Ok(store) => store,
        Err(e) => {
            warning!("Failed to load playlist history. Err: {}", e);
            return;
        }
    };

    if store.count() == 0 {
        info!("No playlists generated yet. Try moodyfy generate --mood \"...\"");
        return;
    }

    let rows: Vec<PlaylistTableRow> = store
        .all()
        .iter()
        .enumerate()
        .map(|(i, record)| PlaylistTableRow {
            index: i + 1,
            created: record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            name: record.name.clone(),
            mood: record.mood.clone(),
            tracks: record.tracks.len(),
            saved: record.spotify_id.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
