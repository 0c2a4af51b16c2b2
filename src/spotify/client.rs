use async_trait::async_trait;
use reqwest::{Client, Response};

use super::{Catalog, CatalogConfig, RecommendationQuery, retry::send_with_retry};
use crate::{
    error::PipelineError,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, RecentTrack,
        RecentlyPlayedResponse, RecommendationsResponse, SearchResponse, Session, TokenResponse,
        Track, UserProfile,
    },
    utils,
};

/// HTTP implementation of [`Catalog`] for the Spotify Web API.
pub struct SpotifyClient {
    client: Client,
    config: CatalogConfig,
}

impl SpotifyClient {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn credentials(&self) -> Result<(&str, &str), PipelineError> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(PipelineError::CredentialMissing("SPOTIFY_CLIENT_ID"))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(PipelineError::CredentialMissing("SPOTIFY_CLIENT_SECRET"))?;
        Ok((client_id, client_secret))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Posts a grant to the token endpoint, authenticating the app with
    /// HTTP Basic auth. `429` responses are retried.
    async fn request_token(
        &self,
        form: &[(&str, &str)],
        context: &str,
    ) -> Result<TokenResponse, PipelineError> {
        let (client_id, client_secret) = self.credentials()?;

        let response = send_with_retry(&self.config.retry, context, || {
            self.client
                .post(&self.config.token_url)
                .basic_auth(client_id, Some(client_secret))
                .form(form)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.contains("invalid_grant") {
                return Err(PipelineError::Auth(format!(
                    "{} rejected: authorization code or refresh token is no longer valid",
                    context
                )));
            }
            return Err(PipelineError::catalog(status.as_u16(), context));
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    /// Exchanges an authorization code (PKCE) for a user session.
    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<Session, PipelineError> {
        let token = self
            .request_token(
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("code_verifier", verifier),
                    ("redirect_uri", redirect_uri),
                ],
                "authorization code exchange",
            )
            .await?;

        Ok(Session::from_token_response(
            token,
            None,
            utils::now_timestamp(),
        ))
    }

    /// Returns a new session for `session`'s refresh token.
    ///
    /// The given session is left untouched; callers replace it with the
    /// returned value.
    pub async fn refresh_session(&self, session: &Session) -> Result<Session, PipelineError> {
        if session.refresh_token.is_empty() {
            return Err(PipelineError::Auth(
                "session has no refresh token, run moodyfy auth".to_string(),
            ));
        }

        let token = self
            .request_token(
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", &session.refresh_token),
                ],
                "session refresh",
            )
            .await?;

        Ok(Session::from_token_response(
            token,
            Some(&session.refresh_token),
            utils::now_timestamp(),
        ))
    }
}

fn ensure_success(response: Response, context: &str) -> Result<Response, PipelineError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PipelineError::catalog(status.as_u16(), context))
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn app_token(&self) -> Result<String, PipelineError> {
        let token = self
            .request_token(
                &[("grant_type", "client_credentials")],
                "client credentials",
            )
            .await?;
        Ok(token.access_token)
    }

    async fn search_track(
        &self,
        token: &str,
        title: &str,
        artist: &str,
    ) -> Result<Option<Track>, PipelineError> {
        let query = format!("track:{} artist:{}", title, artist);
        let params = [("q", query.as_str()), ("type", "track"), ("limit", "1")];

        let response = send_with_retry(&self.config.retry, "track search", || {
            self.client
                .get(self.endpoint("/search"))
                .bearer_auth(token)
                .query(&params)
        })
        .await?;

        let search = ensure_success(response, "track search")?
            .json::<SearchResponse>()
            .await?;

        Ok(search
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(Track::from))
    }

    async fn recommendations(
        &self,
        token: &str,
        query: &RecommendationQuery,
    ) -> Result<Vec<Track>, PipelineError> {
        let response = self
            .client
            .get(self.endpoint("/recommendations"))
            .bearer_auth(token)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let recommendations = ensure_success(response, "recommendations")?
            .json::<RecommendationsResponse>()
            .await?;

        Ok(recommendations
            .tracks
            .into_iter()
            .map(Track::from)
            .collect())
    }

    async fn current_user(&self, user_token: &str) -> Result<UserProfile, PipelineError> {
        let response = self
            .client
            .get(self.endpoint("/me"))
            .bearer_auth(user_token)
            .send()
            .await?;

        Ok(ensure_success(response, "user profile")?
            .json::<UserProfile>()
            .await?)
    }

    async fn recently_played(
        &self,
        user_token: &str,
        limit: u32,
    ) -> Result<Vec<RecentTrack>, PipelineError> {
        let response = self
            .client
            .get(self.endpoint("/me/player/recently-played"))
            .bearer_auth(user_token)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;

        let history = ensure_success(response, "recently played")?
            .json::<RecentlyPlayedResponse>()
            .await?;

        Ok(history
            .items
            .into_iter()
            .filter_map(|item| {
                let artist = item.track.artists.first()?.name.clone();
                Some(RecentTrack {
                    artist,
                    track: item.track.name,
                    uri: item.track.uri,
                })
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        user_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatePlaylistResponse, PipelineError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
        };

        let response = self
            .client
            .post(self.endpoint(&format!("/users/{}/playlists", user_id)))
            .bearer_auth(user_token)
            .json(&body)
            .send()
            .await?;

        Ok(ensure_success(response, "create playlist")?
            .json::<CreatePlaylistResponse>()
            .await?)
    }

    async fn add_tracks(
        &self,
        user_token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), PipelineError> {
        let body = AddTracksRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .client
            .post(self.endpoint(&format!("/playlists/{}/tracks", playlist_id)))
            .bearer_auth(user_token)
            .json(&body)
            .send()
            .await?;

        ensure_success(response, "add tracks")?;
        Ok(())
    }
}
