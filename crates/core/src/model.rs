use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// The "currently playing" record as published by the profile page.
///
/// Serde names follow the keys of the page's own state blob, so the same
/// shape is used to read the `online` node and to write `<name>.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSnapshot {
    #[serde(rename = "SNG_ID")]
    pub song_id: String,
    #[serde(rename = "SNG_TITLE")]
    pub song_title: String,
    #[serde(rename = "ART_ID")]
    pub artist_id: String,
    #[serde(rename = "ART_NAME")]
    pub artist_name: String,
    #[serde(rename = "ALB_ID")]
    pub album_id: String,
    #[serde(rename = "ALB_TITLE")]
    pub album_title: String,
    #[serde(rename = "ALB_PICTURE")]
    pub album_artwork_ref: String,
    #[serde(skip)]
    pub album_artwork: Option<DynamicImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    profile_id: u64,
    is_online: bool,
    snapshot: TrackSnapshot,
}

impl ProfileState {
    pub fn new(profile_id: u64) -> Self {
        Self {
            profile_id,
            is_online: false,
            snapshot: TrackSnapshot::default(),
        }
    }

    pub fn profile_id(&self) -> u64 {
        self.profile_id
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    /// Raw snapshot; zeroed while offline.
    pub fn snapshot(&self) -> &TrackSnapshot {
        &self.snapshot
    }

    /// The snapshot, but only when it can be trusted.
    pub fn now_playing(&self) -> Option<&TrackSnapshot> {
        self.is_online.then_some(&self.snapshot)
    }

    pub fn set_online(&mut self, snapshot: TrackSnapshot) {
        self.is_online = true;
        self.snapshot = snapshot;
    }

    pub fn set_offline(&mut self) {
        self.is_online = false;
        self.snapshot = TrackSnapshot::default();
    }
}
