use crate::error::{Result, SpotifyError};
use crate::model::{
    FullArtist, Paging, PlaylistItem, RelatedArtistsResponse, TokenResponse, Track,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1/";
pub const DEFAULT_ACCOUNTS_BASE: &str = "https://accounts.spotify.com/";

/// Client-credentials pair issued for a Spotify application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

pub struct SpotifyClient {
    client: Client,
    api_base: Url,
    accounts_base: Url,
    access_token: Option<String>,
}

impl SpotifyClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("artistmap/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            api_base: parse_base(DEFAULT_API_BASE)?,
            accounts_base: parse_base(DEFAULT_ACCOUNTS_BASE)?,
            access_token: None,
        })
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self> {
        self.api_base = parse_base(base)?;
        Ok(self)
    }

    pub fn with_accounts_base(mut self, base: &str) -> Result<Self> {
        self.accounts_base = parse_base(base)?;
        Ok(self)
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Exchanges the application credentials for a bearer token and keeps
    /// it for every later request.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<()> {
        let url = self
            .accounts_base
            .join("api/token")
            .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;

        info!("Requesting access token from {}", url);

        let response = self
            .client
            .post(url.clone())
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let token: TokenResponse = decode(&url, response).await?;
        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!(
                    "Got {} token, expires in {:?}s",
                    token.token_type.as_deref().unwrap_or("unknown"),
                    token.expires_in
                );
                self.access_token = Some(access_token);
                Ok(())
            }
            _ => Err(SpotifyError::AuthError(
                "token response did not contain an access token".to_string(),
            )),
        }
    }

    /// Every track of a playlist, in playlist order, with all pages
    /// followed. Items without a track (removed or local entries) are
    /// dropped.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let mut next = Some(self.endpoint(&["playlists", playlist_id, "tracks"])?);
        let mut tracks = Vec::new();
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let page: Paging<PlaylistItem> = self.get_json(url).await?;
            pages += 1;

            let before = tracks.len();
            let item_count = page.items.len();
            tracks.extend(page.items.into_iter().filter_map(|item| item.track));
            if tracks.len() - before < item_count {
                warn!(
                    "Skipped {} playlist item(s) without a track",
                    item_count - (tracks.len() - before)
                );
            }

            next = match page.next {
                Some(link) => Some(
                    Url::parse(&link)
                        .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", link, e)))?,
                ),
                None => None,
            };
        }

        info!(
            "Fetched {} tracks from playlist {} ({} page(s))",
            tracks.len(),
            playlist_id,
            pages
        );
        Ok(tracks)
    }

    pub async fn artist(&self, artist_id: &str) -> Result<FullArtist> {
        let url = self.endpoint(&["artists", artist_id])?;
        self.get_json(url).await
    }

    pub async fn related_artists(&self, artist_id: &str) -> Result<Vec<FullArtist>> {
        let url = self.endpoint(&["artists", artist_id, "related-artists"])?;
        let response: RelatedArtistsResponse = self.get_json(url).await?;
        Ok(response.artists)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SpotifyError::InvalidUrl(format!("{} cannot be a base", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(ref token) = self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        decode(&url, response).await
    }
}

fn parse_base(base: &str) -> Result<Url> {
    // Url::join drops the last path segment unless it ends with a slash
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Url::parse(&normalized).map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", base, e)))
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(SpotifyError::StatusError {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| SpotifyError::DecodeError {
        url: url.to_string(),
        source,
    })
}
