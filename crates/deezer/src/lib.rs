pub mod artwork;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod source;

pub use error::{Error, Result};
pub use normalize::Presence;
pub use source::{HttpSource, ProfileSource};

use deezer_overlay_core::ProfileState;
use tracing::debug;

/// Snapshot repository for one profile.
///
/// `fetch` either replaces `(is_online, snapshot)` as a pair or, for
/// transient failures, leaves the previous pair untouched.
pub struct Deezer<S> {
    source: S,
    state: ProfileState,
}

impl<S: ProfileSource> Deezer<S> {
    pub fn new(profile_id: u64, source: S) -> Self {
        Self {
            source,
            state: ProfileState::new(profile_id),
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn profile_id(&self) -> u64 {
        self.state.profile_id()
    }

    pub async fn fetch(&mut self) -> Result<()> {
        let html = self.source.profile_page(self.profile_id()).await?;
        let app_state = extract::app_state_json(&html)?;

        let presence = match normalize::presence(&app_state) {
            Ok(presence) => presence,
            Err(err) => {
                self.state.set_offline();
                return Err(err);
            }
        };

        match presence {
            Presence::Online(mut snapshot) => {
                snapshot.album_artwork =
                    artwork::fetch_artwork(&self.source, &snapshot.album_artwork_ref).await;
                debug!(
                    profile_id = self.profile_id(),
                    song_id = %snapshot.song_id,
                    artwork = snapshot.album_artwork.is_some(),
                    "profile online"
                );
                self.state.set_online(snapshot);
            }
            Presence::Offline => {
                debug!(profile_id = self.profile_id(), "profile offline");
                self.state.set_offline();
            }
        }
        Ok(())
    }
}
