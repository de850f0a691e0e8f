use deezer_overlay_core::ProfileState;
use deezer_overlay_deezer::{Deezer, Error, ProfileSource};
use std::fmt;
use tracing::trace;

const OFFLINE_SENTINEL: &str = "nol";
const SEPARATOR: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Changed,
    Nothing,
}

/// Identity of what is playing: album, song and artist ids, or a fixed
/// sentinel while offline. Plain string equality, not a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(state: &ProfileState) -> Self {
        match state.now_playing() {
            Some(s) => Self(format!(
                "{}{SEPARATOR}{}{SEPARATOR}{}",
                s.album_id, s.song_id, s.artist_id
            )),
            None => Self(OFFLINE_SENTINEL.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state's fingerprint; the first observation always counts as a change.
    pub fn tick(&mut self, state: &ProfileState) -> DiffKind {
        let current = Fingerprint::of(state);
        if self.last.as_ref() == Some(&current) {
            return DiffKind::Nothing;
        }
        trace!(from = ?self.last, to = %current, "fingerprint changed");
        self.last = Some(current);
        DiffKind::Changed
    }

    pub fn last(&self) -> Option<&Fingerprint> {
        self.last.as_ref()
    }
}

#[derive(Debug)]
pub struct PollOutput {
    pub diff: DiffKind,
    pub error: Option<Error>,
}

/// One fetch plus change detection per tick.
pub struct Poller<S> {
    deezer: Deezer<S>,
    detector: ChangeDetector,
}

impl<S: ProfileSource> Poller<S> {
    pub fn new(deezer: Deezer<S>) -> Self {
        Self {
            deezer,
            detector: ChangeDetector::new(),
        }
    }

    pub fn state(&self) -> &ProfileState {
        self.deezer.state()
    }

    /// Transient errors skip detection so the last fingerprint stays put;
    /// other errors have already moved the profile offline, which is detected.
    pub async fn tick(&mut self) -> PollOutput {
        match self.deezer.fetch().await {
            Ok(()) => PollOutput {
                diff: self.detector.tick(self.deezer.state()),
                error: None,
            },
            Err(err) if err.is_transient() => PollOutput {
                diff: DiffKind::Nothing,
                error: Some(err),
            },
            Err(err) => PollOutput {
                diff: self.detector.tick(self.deezer.state()),
                error: Some(err),
            },
        }
    }
}
