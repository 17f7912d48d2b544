pub mod client;
pub mod error;
pub mod model;

pub use client::{Credentials, SpotifyClient};
pub use error::SpotifyError;
pub use model::{ArtistStub, FullArtist, Track};
