use super::diversity::DiversityPolicy;
use crate::{
    error::PipelineError,
    info,
    spotify::{Catalog, RecommendationQuery},
    types::{MoodProfile, Track},
};

/// Genres the recommendations endpoint accepts as seeds.
pub const GENRE_VOCABULARY: [&str; 39] = [
    "acoustic",
    "afrobeat",
    "alt-rock",
    "alternative",
    "ambient",
    "blues",
    "classical",
    "country",
    "dance",
    "deep-house",
    "disco",
    "drum-and-bass",
    "dubstep",
    "edm",
    "electro",
    "electronic",
    "folk",
    "funk",
    "guitar",
    "happy",
    "hip-hop",
    "house",
    "indie",
    "indie-pop",
    "jazz",
    "k-pop",
    "latin",
    "metal",
    "piano",
    "pop",
    "r-n-b",
    "rap",
    "reggae",
    "reggaeton",
    "rock",
    "sad",
    "soul",
    "techno",
    "trance",
];

pub const MAX_SEED_GENRES: usize = 2;
pub const RECOMMENDATION_LIMIT: u32 = 20;

fn normalize_genre(genre: &str) -> String {
    genre
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Seed genres for an energy level when no profile genre maps.
pub fn energy_bucket(energy_level: u8) -> [&'static str; 2] {
    match energy_level {
        0..=3 => ["acoustic", "ambient"],
        4..=7 => ["pop", "indie-pop"],
        _ => ["dance", "electronic"],
    }
}

/// Maps free-form genres onto [`GENRE_VOCABULARY`], at most two seeds.
///
/// Exact matches win. Without any, the first vocabulary entries that contain
/// or are contained in a profile genre are used, and without those the
/// energy bucket.
pub fn map_genres(genres: &[String], energy_level: u8) -> Vec<String> {
    let normalized: Vec<String> = genres
        .iter()
        .map(|g| normalize_genre(g))
        .filter(|g| !g.is_empty())
        .collect();

    let mut seeds: Vec<String> = Vec::new();
    for genre in &normalized {
        if GENRE_VOCABULARY.contains(&genre.as_str()) && !seeds.contains(genre) {
            seeds.push(genre.clone());
        }
    }

    if seeds.is_empty() {
        'outer: for genre in &normalized {
            for known in GENRE_VOCABULARY {
                if (known.contains(genre.as_str()) || genre.contains(known))
                    && !seeds.iter().any(|s| s == known)
                {
                    seeds.push(known.to_string());
                    if seeds.len() >= MAX_SEED_GENRES {
                        break 'outer;
                    }
                }
            }
        }
    }

    if seeds.is_empty() {
        seeds = energy_bucket(energy_level)
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    seeds.truncate(MAX_SEED_GENRES);
    seeds
}

pub fn build_query(profile: &MoodProfile, min_popularity: u8) -> RecommendationQuery {
    let (min_tempo, max_tempo) = profile.tempo_preference.tempo_range();
    RecommendationQuery {
        seed_genres: map_genres(&profile.genres, profile.energy_level),
        limit: RECOMMENDATION_LIMIT,
        target_energy: f32::from(profile.energy_level) / 10.0,
        min_popularity: min_popularity.min(100),
        min_tempo,
        max_tempo,
    }
}

/// Catalog-native recommendations for `profile`, shaped by `policy`.
///
/// An empty list is returned as is; the caller decides what comes next.
pub async fn recommend(
    catalog: &dyn Catalog,
    token: &str,
    profile: &MoodProfile,
    min_popularity: u8,
    policy: &DiversityPolicy,
) -> Result<Vec<Track>, PipelineError> {
    let query = build_query(profile, min_popularity);
    info!(
        "Requesting recommendations for genres {} (energy {:.1}, tempo {}-{})",
        query.seed_genres.join(", "),
        query.target_energy,
        query.min_tempo,
        query.max_tempo
    );

    let tracks = catalog.recommendations(token, &query).await?;
    info!("Spotify recommended {} tracks", tracks.len());
    Ok(policy.select(&tracks))
}
