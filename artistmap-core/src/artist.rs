use serde::{Deserialize, Serialize};

/// Anything stored in a [`Registry`](crate::registry::Registry) is keyed by
/// its id.
pub trait Entity {
    fn id(&self) -> &str;
}

/// A performer credited on at least one playlist track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

impl Artist {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Entity for Artist {
    fn id(&self) -> &str {
        &self.id
    }
}

/// An artist surfaced by the related-artists lookup of some playlist
/// artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArtist {
    pub id: String,
    pub name: String,
    pub followers: u64,
}

impl Entity for RelatedArtist {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One entry of a related-artists response, genres included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArtistRecord {
    pub id: String,
    pub name: String,
    pub followers: u64,
    pub genres: Vec<String>,
}

impl RelatedArtistRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        followers: u64,
        genres: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            followers,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn to_related_artist(&self) -> RelatedArtist {
        RelatedArtist {
            id: self.id.clone(),
            name: self.name.clone(),
            followers: self.followers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<Artist>,
}

impl Track {
    pub fn new(name: impl Into<String>, artists: Vec<Artist>) -> Self {
        Self {
            name: name.into(),
            artists,
        }
    }
}
