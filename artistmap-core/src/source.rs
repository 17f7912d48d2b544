//! The lookups the aggregation needs from a music catalog.

use crate::artist::{Artist, RelatedArtistRecord, Track};
use artistmap_spotify::{SpotifyClient, SpotifyError};
use tracing::warn;

/// Read-only access to a playlist and the artist graph around it.
///
/// Implementations return empty lists for absent data; an `Err` means the
/// lookup itself failed and aborts the aggregation.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every track of the playlist, flattened across pages, in playlist
    /// order.
    async fn playlist_tracks(&self) -> Result<Vec<Track>, Self::Error>;

    async fn artist_genres(&self, artist_id: &str) -> Result<Vec<String>, Self::Error>;

    async fn related_artists(
        &self,
        artist_id: &str,
    ) -> Result<Vec<RelatedArtistRecord>, Self::Error>;
}

/// A single Spotify playlist, read through an authenticated client.
pub struct SpotifyPlaylistSource {
    client: SpotifyClient,
    playlist_id: String,
}

impl SpotifyPlaylistSource {
    pub fn new(client: SpotifyClient, playlist_id: impl Into<String>) -> Self {
        Self {
            client,
            playlist_id: playlist_id.into(),
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }
}

impl CatalogSource for SpotifyPlaylistSource {
    type Error = SpotifyError;

    async fn playlist_tracks(&self) -> Result<Vec<Track>, Self::Error> {
        let tracks = self.client.playlist_tracks(&self.playlist_id).await?;
        Ok(tracks.into_iter().map(convert_track).collect())
    }

    async fn artist_genres(&self, artist_id: &str) -> Result<Vec<String>, Self::Error> {
        Ok(self.client.artist(artist_id).await?.genres)
    }

    async fn related_artists(
        &self,
        artist_id: &str,
    ) -> Result<Vec<RelatedArtistRecord>, Self::Error> {
        let related = self.client.related_artists(artist_id).await?;
        Ok(related
            .into_iter()
            .map(|artist| RelatedArtistRecord {
                followers: artist.follower_count(),
                id: artist.id,
                name: artist.name,
                genres: artist.genres,
            })
            .collect())
    }
}

fn convert_track(track: artistmap_spotify::Track) -> Track {
    let artists = track
        .artists
        .into_iter()
        .filter_map(|stub| match stub.id {
            Some(id) if !id.is_empty() => Some(Artist::new(id, stub.name)),
            _ => {
                warn!(
                    "Skipping artist '{}' on track '{}': no id",
                    stub.name, track.name
                );
                None
            }
        })
        .collect();

    Track {
        name: track.name,
        artists,
    }
}
