//! # Mood-to-playlist pipeline
//!
//! [`generate_playlist`] runs the stages in order and degrades through the
//! fallback tiers:
//!
//! 1. mood interpretation (fatal on failure)
//! 2. song suggestions from the language model
//! 3. catalog validation and [`DiversityPolicy::select`]
//! 4. catalog recommendations when fewer than
//!    [`PipelineOptions::min_validated_tracks`] tracks survive
//! 5. the built-in pool when recommendations fail or come back empty
//!
//! When no app token can be obtained, the suggestions are returned
//! unvalidated as search links instead.
//!
//! Stages run one after another on the calling task and share no state
//! with other invocations.

mod diversity;
mod fallback;
mod recommender;
mod validator;

use std::time::Duration;

use crate::{
    error::PipelineError,
    info,
    llm::LanguageModel,
    mood::{generate_candidates, interpret_mood},
    spotify::Catalog,
    types::{
        GenerateParams, MoodProfile, PlaylistResult, RecentTrack, Session, Track, TrackSource,
    },
    warning,
};

pub use diversity::DiversityPolicy;
pub use fallback::{MAX_FALLBACK_TRACKS, fallback_tracks};
pub use recommender::{
    GENRE_VOCABULARY, MAX_SEED_GENRES, RECOMMENDATION_LIMIT, build_query, energy_bucket,
    map_genres, recommend,
};
pub use validator::{search_link_tracks, validate_candidates};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Pause before every catalog search.
    pub validation_delay: Duration,
    /// Below this many selected tracks the recommender takes over.
    pub min_validated_tracks: usize,
    /// Recently played items requested when history is enabled.
    pub history_limit: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            validation_delay: Duration::from_millis(100),
            min_validated_tracks: 5,
            history_limit: 50,
        }
    }
}

/// Turns a mood description into a playlist.
///
/// `session` is only used for listening history and may be `None`.
///
/// # Errors
///
/// - [`PipelineError::InvalidInput`] for a blank mood
/// - [`PipelineError::MoodAnalysisFailed`] when the mood cannot be
///   interpreted; no catalog request is made in that case
///
/// Every other failure is absorbed by a fallback tier.
pub async fn generate_playlist(
    model: &dyn LanguageModel,
    catalog: &dyn Catalog,
    mood: &str,
    params: &GenerateParams,
    session: Option<&Session>,
    options: &PipelineOptions,
) -> Result<PlaylistResult, PipelineError> {
    if mood.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "mood description must not be empty".to_string(),
        ));
    }

    let recent = match (params.include_history, session) {
        (true, Some(session)) => listening_history(catalog, session, options.history_limit).await,
        (true, None) => {
            warning!("Listening history requested without a user session, ignoring it");
            Vec::new()
        }
        _ => Vec::new(),
    };

    let profile = interpret_mood(model, mood, &recent)
        .await
        .map_err(|e| match e {
            PipelineError::InvalidInput(_) => e,
            other => PipelineError::MoodAnalysisFailed(Box::new(other)),
        })?;
    info!(
        "Mood profile: {} (energy {}, tempo {})",
        profile.playlist_name, profile.energy_level, profile.tempo_preference
    );

    let policy = DiversityPolicy::for_params(params);
    let (mut tracks, source) =
        select_tracks(model, catalog, &profile, params, &policy, options).await;
    tracks.truncate(params.length);

    Ok(PlaylistResult {
        title: profile.playlist_name,
        description: profile.playlist_description,
        tracks,
        source,
    })
}

async fn select_tracks(
    model: &dyn LanguageModel,
    catalog: &dyn Catalog,
    profile: &MoodProfile,
    params: &GenerateParams,
    policy: &DiversityPolicy,
    options: &PipelineOptions,
) -> (Vec<Track>, TrackSource) {
    let suggestions = match generate_candidates(model, profile).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warning!("Song suggestions failed: {}", e);
            return recommend_or_fallback(catalog, None, profile, params, policy).await;
        }
    };

    let token = match catalog.app_token().await {
        Ok(token) => token,
        Err(e) => {
            warning!("Cannot validate suggestions: {}", e);
            let links = search_link_tracks(&suggestions);
            if links.is_empty() {
                return recommend_or_fallback(catalog, None, profile, params, policy).await;
            }
            warning!("Using unvalidated suggestions with search links");
            return (links, TrackSource::SearchLinks);
        }
    };

    let validated =
        validate_candidates(catalog, &token, &suggestions, options.validation_delay).await;
    let selected = policy.select(&validated);
    if selected.len() >= options.min_validated_tracks {
        return (selected, TrackSource::Validated);
    }

    warning!(
        "Only {} validated tracks, falling back to recommendations",
        selected.len()
    );
    recommend_or_fallback(catalog, Some(token), profile, params, policy).await
}

async fn recommend_or_fallback(
    catalog: &dyn Catalog,
    token: Option<String>,
    profile: &MoodProfile,
    params: &GenerateParams,
    policy: &DiversityPolicy,
) -> (Vec<Track>, TrackSource) {
    let token = match token {
        Some(token) => Ok(token),
        None => catalog.app_token().await,
    };

    let recommended = match token {
        Ok(token) => recommend(catalog, &token, profile, params.popularity, policy).await,
        Err(e) => Err(e),
    };

    match recommended {
        Ok(tracks) if !tracks.is_empty() => (tracks, TrackSource::Recommended),
        Ok(_) => {
            warning!("No recommendations returned, using built-in tracks");
            (fallback_tracks(profile.energy_level), TrackSource::Static)
        }
        Err(e) => {
            warning!("Recommendations failed ({}), using built-in tracks", e);
            (fallback_tracks(profile.energy_level), TrackSource::Static)
        }
    }
}

async fn listening_history(
    catalog: &dyn Catalog,
    session: &Session,
    limit: u32,
) -> Vec<RecentTrack> {
    match catalog.recently_played(&session.access_token, limit).await {
        Ok(items) => {
            info!("Using {} recently played tracks as context", items.len());
            items
        }
        Err(e) => {
            warning!("Could not fetch listening history: {}", e);
            Vec::new()
        }
    }
}
