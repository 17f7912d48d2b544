pub mod aggregate;
pub mod artist;
pub mod error;
pub mod export;
pub mod pivot;
pub mod registry;
pub mod relation;
pub mod source;
pub mod tables;

pub use aggregate::{
    AggregateOptions, AggregateProgressCallback, AggregateSummary, Aggregator,
    execute_aggregation,
};
pub use artist::{Artist, Entity, RelatedArtist, RelatedArtistRecord, Track};
pub use error::ArtistMapError;
pub use relation::{Accumulator, OrderedSet};
pub use source::{CatalogSource, SpotifyPlaylistSource};

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{} {}",
        "artistmap".bright_green().bold(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
    println!(
        "{}\n",
        "playlist -> related artists -> genre tables".bright_black()
    );
}
