// Tests for the aggregation driver against an in-memory catalog

use artistmap_core::aggregate::{
    AggregateOptions, Aggregator, ORIGINS_TABLE, PLAYLIST_GENRES_TABLE, RELATED_GENRES_TABLE,
    execute_aggregation,
};
use artistmap_core::artist::{Artist, RelatedArtistRecord, Track};
use artistmap_core::source::CatalogSource;
use artistmap_core::tables::Cell;
use artistmap_core::ArtistMapError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct FakeError(String);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FakeError {}

#[derive(Default)]
struct FakeCatalog {
    tracks: Vec<Track>,
    genres: HashMap<String, Vec<String>>,
    related: HashMap<String, Vec<RelatedArtistRecord>>,
    failing_artist: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn track(mut self, name: &str, artists: &[(&str, &str)]) -> Self {
        self.tracks.push(Track::new(
            name,
            artists
                .iter()
                .map(|(id, name)| Artist::new(*id, *name))
                .collect(),
        ));
        self
    }

    fn genres(mut self, artist_id: &str, genres: &[&str]) -> Self {
        self.genres.insert(
            artist_id.to_string(),
            genres.iter().map(|g| g.to_string()).collect(),
        );
        self
    }

    fn related(mut self, artist_id: &str, related: Vec<RelatedArtistRecord>) -> Self {
        self.related.insert(artist_id.to_string(), related);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CatalogSource for FakeCatalog {
    type Error = FakeError;

    async fn playlist_tracks(&self) -> Result<Vec<Track>, Self::Error> {
        self.calls.lock().unwrap().push("tracks".to_string());
        Ok(self.tracks.clone())
    }

    async fn artist_genres(&self, artist_id: &str) -> Result<Vec<String>, Self::Error> {
        self.calls.lock().unwrap().push(format!("genres:{}", artist_id));
        Ok(self.genres.get(artist_id).cloned().unwrap_or_default())
    }

    async fn related_artists(
        &self,
        artist_id: &str,
    ) -> Result<Vec<RelatedArtistRecord>, Self::Error> {
        self.calls.lock().unwrap().push(format!("related:{}", artist_id));
        if self.failing_artist.as_deref() == Some(artist_id) {
            return Err(FakeError(format!("lookup of {} failed", artist_id)));
        }
        Ok(self.related.get(artist_id).cloned().unwrap_or_default())
    }
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

// ============================================================================
// Traversal Tests
// ============================================================================

#[tokio::test]
async fn test_repeated_playlist_artist_is_fetched_once() {
    let catalog = FakeCatalog::default()
        .track("One", &[("A", "Artist A")])
        .track("Two", &[("A", "Artist A (feat.)")])
        .genres("A", &["pop"]);

    let mut aggregator = Aggregator::new(AggregateOptions::default());
    aggregator.run(&catalog).await.unwrap();

    assert_eq!(
        catalog.calls(),
        vec!["tracks", "genres:A", "related:A"]
    );
    assert_eq!(aggregator.playlist_artists().len(), 1);
    assert_eq!(
        aggregator.playlist_artists().get("A").unwrap().name,
        "Artist A"
    );
}

#[tokio::test]
async fn test_genre_lookup_skipped_when_disabled() {
    let catalog = FakeCatalog::default()
        .track("One", &[("A", "Artist A")])
        .genres("A", &["pop"]);

    let options = AggregateOptions {
        include_playlist_artist_genres: false,
    };
    let mut aggregator = Aggregator::new(options);
    aggregator.run(&catalog).await.unwrap();

    assert_eq!(catalog.calls(), vec!["tracks", "related:A"]);
    assert!(aggregator.genres().is_empty());
    assert!(aggregator.playlist_genre_pivot().is_none());
    assert!(aggregator.tables().get(PLAYLIST_GENRES_TABLE).is_none());
}

#[tokio::test]
async fn test_related_artist_from_two_playlist_artists() {
    let catalog = FakeCatalog::default()
        .track("One", &[("P1", "First"), ("P2", "Second")])
        .track("Two", &[("P3", "Third")])
        .related("P1", vec![RelatedArtistRecord::new("R", "Shared", 5, &["rock"])])
        .related("P2", vec![RelatedArtistRecord::new("R", "Shared", 500, &["jazz"])]);

    let mut aggregator = Aggregator::new(AggregateOptions::default());
    aggregator.run(&catalog).await.unwrap();

    let origins = aggregator.origin_pivot();
    assert_eq!(origins.columns, vec!["P1", "P2", "P3"]);
    assert_eq!(origins.cell("R", "P1"), Some(true));
    assert_eq!(origins.cell("R", "P2"), Some(true));
    assert_eq!(origins.cell("R", "P3"), Some(false));
    assert_eq!(aggregator.productive_playlist_artists(), 2);

    // first sighting wins for followers and genres
    assert_eq!(aggregator.related_artists().get("R").unwrap().followers, 5);
    let genres = aggregator.related_genre_pivot();
    assert_eq!(genres.columns, vec!["rock"]);
    assert_eq!(genres.cell("R", "rock"), Some(true));
    assert!(!aggregator.related_genres().has_link("R", "jazz"));
}

#[tokio::test]
async fn test_origin_universe_includes_artists_without_related() {
    let catalog = FakeCatalog::default()
        .track("One", &[("P1", "First")])
        .track("Two", &[("P2", "Lonely")])
        .track("Three", &[("P1", "First")])
        .related("P1", vec![RelatedArtistRecord::new("R1", "R1", 1, &[])]);

    let mut aggregator = Aggregator::new(AggregateOptions::default());
    aggregator.run(&catalog).await.unwrap();

    let origins = aggregator.origin_pivot();
    assert_eq!(origins.header(), vec!["id", "P1", "P2"]);
    assert_eq!(origins.rows.len(), 1);
    assert_eq!(origins.rows[0].cells, vec![true, false]);
}

#[tokio::test]
async fn test_related_artist_without_genres_has_no_genre_row() {
    let catalog = FakeCatalog::default()
        .track("One", &[("P1", "First")])
        .related(
            "P1",
            vec![
                RelatedArtistRecord::new("R1", "Quiet", 0, &[]),
                RelatedArtistRecord::new("R2", "Loud", 3, &["metal"]),
            ],
        );

    let mut aggregator = Aggregator::new(AggregateOptions::default());
    aggregator.run(&catalog).await.unwrap();

    let genres = aggregator.related_genre_pivot();
    assert_eq!(genres.rows.len(), 1);
    assert_eq!(genres.rows[0].id, "R2");
    assert_eq!(aggregator.related_artists().len(), 2);
}

#[tokio::test]
async fn test_genre_universe_shared_between_tables() {
    let catalog = FakeCatalog::default()
        .track("One", &[("P1", "First")])
        .track("Two", &[("P2", "Second")])
        .genres("P1", &["pop"])
        .genres("P2", &["folk"])
        .related("P1", vec![RelatedArtistRecord::new("R1", "R1", 1, &["rock", "pop"])]);

    let mut aggregator = Aggregator::new(AggregateOptions::default());
    aggregator.run(&catalog).await.unwrap();

    assert_eq!(aggregator.genres(), &["pop", "rock", "folk"]);

    let tables = aggregator.tables();
    let playlist = tables.get(PLAYLIST_GENRES_TABLE).unwrap();
    let related = tables.get(RELATED_GENRES_TABLE).unwrap();
    assert_eq!(playlist.columns, related.columns);
    assert_eq!(
        playlist.rows,
        vec![
            vec![text("P1"), Cell::Bool(true), Cell::Bool(false), Cell::Bool(false)],
            vec![text("P2"), Cell::Bool(false), Cell::Bool(false), Cell::Bool(true)],
        ]
    );
    assert_eq!(
        related.rows,
        vec![vec![text("R1"), Cell::Bool(true), Cell::Bool(true), Cell::Bool(false)]]
    );
}

#[tokio::test]
async fn test_fetch_failure_aborts_run() {
    let mut catalog = FakeCatalog::default()
        .track("One", &[("P1", "First")])
        .track("Two", &[("P2", "Second")]);
    catalog.failing_artist = Some("P1".to_string());

    let result = execute_aggregation(&catalog, AggregateOptions::default(), None).await;

    match result {
        Err(ArtistMapError::SourceError(err)) => {
            assert!(err.to_string().contains("P1"));
        }
        other => panic!("expected a source error, got {:?}", other.map(|_| ())),
    }
    // nothing after the failing lookup is attempted
    assert!(!catalog.calls().iter().any(|c| c.ends_with("P2")));
}

#[tokio::test]
async fn test_progress_callback_sees_every_credit() {
    let catalog = FakeCatalog::default()
        .track("One", &[("A", "Alpha"), ("B", "Beta")])
        .track("Two", &[("A", "Alpha")]);

    let seen: Arc<Mutex<Vec<(usize, usize, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let callback = Arc::new(move |done: usize, total: usize, name: &str| {
        seen_clone
            .lock()
            .unwrap()
            .push((done, total, name.to_string()));
    });

    let (_, summary) = execute_aggregation(&catalog, AggregateOptions::default(), Some(callback))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], (1, 3, "Alpha".to_string()));
    assert_eq!(seen[2], (3, 3, "Alpha".to_string()));
    assert_eq!(summary.tracks, 2);
    assert_eq!(summary.playlist_artists, 2);
}

// ============================================================================
// End-to-end Table Tests
// ============================================================================

#[tokio::test]
async fn test_two_tracks_same_artist_scenario() {
    let catalog = FakeCatalog::default()
        .track("Song 1", &[("A", "Artist A")])
        .track("Song 2", &[("A", "Artist A")])
        .genres("A", &["pop"])
        .related("A", vec![RelatedArtistRecord::new("R1", "Related One", 77, &["pop", "rock"])]);

    let (tables, summary) = execute_aggregation(&catalog, AggregateOptions::default(), None)
        .await
        .unwrap();

    assert_eq!(tables.playlist_artists.columns, vec!["id", "name"]);
    assert_eq!(
        tables.playlist_artists.rows,
        vec![vec![text("A"), text("Artist A")]]
    );

    assert_eq!(tables.related_artists.columns, vec!["id", "name", "followers"]);
    assert_eq!(
        tables.related_artists.rows,
        vec![vec![text("R1"), text("Related One"), Cell::Number(77)]]
    );

    assert_eq!(tables.origins.name, ORIGINS_TABLE);
    assert_eq!(tables.origins.columns, vec!["id", "A"]);
    assert_eq!(tables.origins.rows, vec![vec![text("R1"), Cell::Bool(true)]]);

    assert_eq!(tables.related_genres.columns, vec!["id", "pop", "rock"]);
    assert_eq!(
        tables.related_genres.rows,
        vec![vec![text("R1"), Cell::Bool(true), Cell::Bool(true)]]
    );

    assert_eq!(summary.related_artists, 1);
    assert_eq!(summary.genres, 2);
    assert_eq!(summary.origin_links, 1);
}

#[tokio::test]
async fn test_table_file_order() {
    let catalog = FakeCatalog::default().track("One", &[("A", "Artist A")]);

    let (tables, _) = execute_aggregation(&catalog, AggregateOptions::default(), None)
        .await
        .unwrap();

    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["table0", "table1", "table2", "table3", "table4"]);
}

#[tokio::test]
async fn test_empty_playlist_produces_header_only_tables() {
    let catalog = FakeCatalog::default();

    let (tables, summary) = execute_aggregation(&catalog, AggregateOptions::default(), None)
        .await
        .unwrap();

    assert!(tables.iter().all(|t| t.is_empty()));
    assert_eq!(tables.origins.columns, vec!["id"]);
    assert_eq!(summary.playlist_artists, 0);
}
