use crate::artist::{Artist, RelatedArtist, RelatedArtistRecord};
use crate::error::{ArtistMapError, Result};
use crate::pivot::{self, PivotTable};
use crate::registry::Registry;
use crate::relation::{Accumulator, OrderedSet};
use crate::source::CatalogSource;
use crate::tables::{ArtistTables, Table};
use std::sync::Arc;
use tracing::{debug, info};

pub const PLAYLIST_ARTISTS_TABLE: &str = "table0";
pub const RELATED_ARTISTS_TABLE: &str = "table1";
pub const ORIGINS_TABLE: &str = "table2";
pub const PLAYLIST_GENRES_TABLE: &str = "table3";
pub const RELATED_GENRES_TABLE: &str = "table4";

/// Options for configuring an aggregation run
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Fetch playlist-artist genres and produce their genre table.
    pub include_playlist_artist_genres: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            include_playlist_artist_genres: true,
        }
    }
}

/// Called once per playlist-artist credit with
/// `(credits processed, total credits, artist name)`.
pub type AggregateProgressCallback = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSummary {
    pub tracks: usize,
    pub playlist_artists: usize,
    pub related_artists: usize,
    pub genres: usize,
    pub origin_links: usize,
}

/// Walks a playlist's artists and their related artists, collecting the
/// registries and relations the output tables are built from.
pub struct Aggregator {
    options: AggregateOptions,
    playlist_artists: Registry<Artist>,
    related_artists: Registry<RelatedArtist>,
    origins: Accumulator,
    // playlist artists that produced at least one related artist
    origin_sources: OrderedSet,
    playlist_genres: Accumulator,
    related_genres: Accumulator,
    genres: OrderedSet,
    tracks: usize,
    progress_callback: Option<AggregateProgressCallback>,
}

impl Aggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            options,
            playlist_artists: Registry::new(),
            related_artists: Registry::new(),
            origins: Accumulator::new(),
            origin_sources: OrderedSet::new(),
            playlist_genres: Accumulator::new(),
            related_genres: Accumulator::new(),
            genres: OrderedSet::new(),
            tracks: 0,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: AggregateProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Fetches the playlist and visits every credited artist, one lookup
    /// at a time. The first failed lookup aborts the run.
    pub async fn run<S: CatalogSource>(&mut self, source: &S) -> Result<()> {
        let tracks = source
            .playlist_tracks()
            .await
            .map_err(ArtistMapError::source_error)?;
        self.tracks += tracks.len();

        let credits: Vec<Artist> = tracks.into_iter().flat_map(|t| t.artists).collect();
        info!(
            "Aggregating {} artist credit(s) from {} track(s)",
            credits.len(),
            self.tracks
        );

        let total = credits.len();
        for (idx, artist) in credits.into_iter().enumerate() {
            if let Some(ref callback) = self.progress_callback {
                callback(idx + 1, total, &artist.name);
            }
            self.visit(source, artist).await?;
        }

        let summary = self.summary();
        info!(
            "Aggregation complete: {} playlist artist(s), {} related artist(s), {} genre(s)",
            summary.playlist_artists, summary.related_artists, summary.genres
        );
        Ok(())
    }

    /// Processes one playlist-artist credit. Returns `false` without any
    /// lookup when the artist was already visited.
    pub async fn visit<S: CatalogSource>(&mut self, source: &S, artist: Artist) -> Result<bool> {
        let artist_id = artist.id.clone();
        if !self.playlist_artists.register(artist) {
            debug!("Playlist artist {} already visited", artist_id);
            return Ok(false);
        }

        if self.options.include_playlist_artist_genres {
            let genres = source
                .artist_genres(&artist_id)
                .await
                .map_err(ArtistMapError::source_error)?;
            self.record_playlist_genres(&artist_id, &genres);
        }

        let related = source
            .related_artists(&artist_id)
            .await
            .map_err(ArtistMapError::source_error)?;
        debug!(
            "Playlist artist {} has {} related artist(s)",
            artist_id,
            related.len()
        );
        for record in &related {
            self.record_related(&artist_id, record);
        }

        Ok(true)
    }

    pub fn record_playlist_genres(&mut self, artist_id: &str, genres: &[String]) {
        for genre in genres {
            self.playlist_genres.link(artist_id, genre, &mut self.genres);
        }
    }

    /// Registers a related artist found via `playlist_artist_id`.
    ///
    /// Name, followers and genres are only taken from the first sighting;
    /// the origin link is recorded on every sighting.
    pub fn record_related(&mut self, playlist_artist_id: &str, record: &RelatedArtistRecord) {
        if self.related_artists.register(record.to_related_artist()) {
            for genre in &record.genres {
                self.related_genres.link(&record.id, genre, &mut self.genres);
            }
        }
        self.origins
            .link(&record.id, playlist_artist_id, &mut self.origin_sources);
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    pub fn playlist_artists(&self) -> &Registry<Artist> {
        &self.playlist_artists
    }

    pub fn related_artists(&self) -> &Registry<RelatedArtist> {
        &self.related_artists
    }

    pub fn origins(&self) -> &Accumulator {
        &self.origins
    }

    pub fn playlist_genres(&self) -> &Accumulator {
        &self.playlist_genres
    }

    pub fn related_genres(&self) -> &Accumulator {
        &self.related_genres
    }

    /// Every genre seen so far, in discovery order.
    pub fn genres(&self) -> &[String] {
        self.genres.as_slice()
    }

    /// Columns of the origin pivot: every playlist artist, whether or not
    /// it produced related artists.
    pub fn origin_universe(&self) -> Vec<String> {
        self.playlist_artists.ids().map(String::from).collect()
    }

    pub fn origin_pivot(&self) -> PivotTable {
        pivot::build(&self.origins, &self.origin_universe())
    }

    pub fn related_genre_pivot(&self) -> PivotTable {
        pivot::build(&self.related_genres, self.genres())
    }

    pub fn playlist_genre_pivot(&self) -> Option<PivotTable> {
        self.options
            .include_playlist_artist_genres
            .then(|| pivot::build(&self.playlist_genres, self.genres()))
    }

    pub fn tables(&self) -> ArtistTables {
        ArtistTables {
            playlist_artists: Table::playlist_roster(
                PLAYLIST_ARTISTS_TABLE,
                &self.playlist_artists,
            ),
            related_artists: Table::related_roster(RELATED_ARTISTS_TABLE, &self.related_artists),
            origins: Table::from_pivot(ORIGINS_TABLE, &self.origin_pivot()),
            playlist_genres: self
                .playlist_genre_pivot()
                .map(|pivot| Table::from_pivot(PLAYLIST_GENRES_TABLE, &pivot)),
            related_genres: Table::from_pivot(RELATED_GENRES_TABLE, &self.related_genre_pivot()),
        }
    }

    pub fn summary(&self) -> AggregateSummary {
        AggregateSummary {
            tracks: self.tracks,
            playlist_artists: self.playlist_artists.len(),
            related_artists: self.related_artists.len(),
            genres: self.genres.len(),
            origin_links: self.origins.link_count(),
        }
    }

    /// Playlist artists that surfaced at least one related artist.
    pub fn productive_playlist_artists(&self) -> usize {
        self.origin_sources.len()
    }
}

/// Runs a full aggregation against `source` and materializes its tables.
pub async fn execute_aggregation<S: CatalogSource>(
    source: &S,
    options: AggregateOptions,
    progress_callback: Option<AggregateProgressCallback>,
) -> Result<(ArtistTables, AggregateSummary)> {
    let mut aggregator = Aggregator::new(options);
    if let Some(callback) = progress_callback {
        aggregator = aggregator.with_progress_callback(callback);
    }

    aggregator.run(source).await?;
    Ok((aggregator.tables(), aggregator.summary()))
}
