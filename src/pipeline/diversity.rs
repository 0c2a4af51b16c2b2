use std::collections::HashMap;

use crate::{
    types::{GenerateParams, Track},
    utils::normalize_artist,
};

/// Artist-diversity and minimum-size policy shared by every catalog path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiversityPolicy {
    /// Cap per normalized artist in the first two passes.
    pub max_per_artist: usize,
    /// Size at which the fill passes stop.
    pub min_total: usize,
}

impl Default for DiversityPolicy {
    fn default() -> Self {
        Self {
            max_per_artist: 2,
            min_total: 15,
        }
    }
}

impl DiversityPolicy {
    pub fn for_params(params: &GenerateParams) -> Self {
        Self {
            max_per_artist: params.diversity.clamp(1, 5),
            min_total: params.length.max(1).min(15),
        }
    }

    /// Selects an artist-diverse subset of `tracks`.
    ///
    /// 1. One track per artist (the artist's first occurrence), artists with
    ///    fewer appearances in the input first. Ties keep input order.
    /// 2. While short of `min_total`, further tracks in input order up to
    ///    `max_per_artist` per artist.
    /// 3. While still short, any remaining track regardless of the cap.
    ///
    /// Passes 2 and 3 skip duplicates: same non-empty id, or same title and
    /// artist ignoring case.
    pub fn select(&self, tracks: &[Track]) -> Vec<Track> {
        let mut frequency: HashMap<String, usize> = HashMap::new();
        for track in tracks {
            *frequency
                .entry(normalize_artist(&track.artist))
                .or_default() += 1;
        }

        let mut firsts: Vec<(usize, &Track)> = Vec::new();
        let mut seen_artists: HashMap<String, usize> = HashMap::new();
        for (index, track) in tracks.iter().enumerate() {
            let artist = normalize_artist(&track.artist);
            if !seen_artists.contains_key(&artist) {
                seen_artists.insert(artist, 0);
                firsts.push((index, track));
            }
        }
        firsts.sort_by_key(|(_, t)| frequency[&normalize_artist(&t.artist)]);

        let mut picked_indices = Vec::with_capacity(tracks.len());
        let mut selected: Vec<Track> = Vec::with_capacity(tracks.len());
        let mut per_artist = seen_artists;
        for (index, track) in firsts {
            *per_artist
                .entry(normalize_artist(&track.artist))
                .or_default() += 1;
            picked_indices.push(index);
            selected.push(track.clone());
        }

        if selected.len() < self.min_total {
            for (index, track) in tracks.iter().enumerate() {
                if selected.len() >= self.min_total {
                    break;
                }
                let artist = normalize_artist(&track.artist);
                let count = per_artist.get(&artist).copied().unwrap_or_default();
                if count >= self.max_per_artist
                    || picked_indices.contains(&index)
                    || is_duplicate(&selected, track)
                {
                    continue;
                }
                per_artist.insert(artist, count + 1);
                picked_indices.push(index);
                selected.push(track.clone());
            }
        }

        if selected.len() < self.min_total {
            for (index, track) in tracks.iter().enumerate() {
                if selected.len() >= self.min_total {
                    break;
                }
                if picked_indices.contains(&index) || is_duplicate(&selected, track) {
                    continue;
                }
                picked_indices.push(index);
                selected.push(track.clone());
            }
        }

        selected
    }
}

fn is_duplicate(selected: &[Track], candidate: &Track) -> bool {
    selected.iter().any(|t| {
        (!t.id.is_empty() && t.id == candidate.id)
            || (t.title.to_lowercase() == candidate.title.to_lowercase()
                && t.artist.to_lowercase() == candidate.artist.to_lowercase())
    })
}
