//! Source to destination orchestration.
//!
//! A run either looks up one playlist by name or walks every playlist of
//! the source. Each playlist goes through the same steps: fetch its songs,
//! create it on the destination, resolve the songs and submit the chain.
//!
//! Only a failed source listing ([`SyncError::Listing`]) and an unknown
//! playlist name stop a run. Anything that goes wrong inside a single
//! playlist is recorded in the [`SyncReport`] and the run moves on; at the
//! end [`SyncReport::into_error`] folds it all into one
//! [`SyncError::PartialBatch`].

use crate::{
    Res,
    builder::{self, MutationBatch},
    error::SyncError,
    info,
    resolver::Resolver,
    service::MusicService,
    success,
    types::{Credential, Playlist, PlaylistSummary, SyncTableRow},
    utils, warning,
};

/// Value of `--playlist` that selects every playlist of the source.
pub const ALL_PLAYLISTS: &str = "--all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Playlist(String),
    All,
}

impl SyncTarget {
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        if arg == ALL_PLAYLISTS {
            SyncTarget::All
        } else {
            SyncTarget::Playlist(arg.to_string())
        }
    }
}

/// Outcome of one transferred playlist.
#[derive(Debug)]
pub struct PlaylistReport {
    pub name: String,
    pub destination_id: String,
    pub songs: usize,
    pub added: usize,
    pub errors: Vec<SyncError>,
}

impl PlaylistReport {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// Folds the per-track failures into one error, if there were any.
    pub fn into_error(self) -> Option<SyncError> {
        if self.errors.is_empty() {
            return None;
        }
        Some(SyncError::PartialBatch {
            context: format!("transferring '{}'", self.name),
            errors: self.errors,
        })
    }
}

/// A playlist that could not be transferred at all.
#[derive(Debug)]
pub struct PlaylistFailure {
    pub name: String,
    pub error: SyncError,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub playlists: Vec<PlaylistReport>,
    pub failures: Vec<PlaylistFailure>,
}

impl SyncReport {
    /// Number of tracks that did not make it, over all playlists.
    pub fn track_failures(&self) -> usize {
        self.playlists.iter().map(PlaylistReport::failed).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.track_failures() == 0
    }

    /// Folds every failure of the run into one [`SyncError::PartialBatch`].
    ///
    /// Each playlist with track failures contributes its own nested
    /// `PartialBatch` (see [`PlaylistReport::into_error`]); each playlist
    /// that failed outright contributes one wrapping its error. Returns
    /// `None` for a clean run.
    pub fn into_error(self) -> Option<SyncError> {
        let mut errors: Vec<SyncError> = self
            .playlists
            .into_iter()
            .filter_map(PlaylistReport::into_error)
            .collect();

        errors.extend(self.failures.into_iter().map(|f| SyncError::PartialBatch {
            context: format!("transferring '{}'", f.name),
            errors: vec![f.error],
        }));

        if errors.is_empty() {
            return None;
        }
        Some(SyncError::PartialBatch {
            context: "syncing playlists".to_string(),
            errors,
        })
    }

    pub fn table_rows(&self) -> Vec<SyncTableRow> {
        let transferred = self.playlists.iter().map(|p| SyncTableRow {
            playlist: p.name.clone(),
            songs: p.songs,
            added: p.added,
            failed: p.failed(),
            status: if p.errors.is_empty() {
                "synced".to_string()
            } else {
                "partial".to_string()
            },
        });

        let failed = self.failures.iter().map(|f| SyncTableRow {
            playlist: f.name.clone(),
            songs: 0,
            added: 0,
            failed: 0,
            status: format!("failed: {}", f.error),
        });

        transferred.chain(failed).collect()
    }
}

pub struct Syncer {
    source: MusicService,
    source_credential: Credential,
    destination: MusicService,
    destination_credential: Credential,
    resolver: Resolver,
}

impl Syncer {
    pub fn new(
        source: MusicService,
        source_credential: Credential,
        destination: MusicService,
        destination_credential: Credential,
    ) -> Self {
        let resolver = Resolver::new(destination.clone(), destination_credential.clone());
        Syncer {
            source,
            source_credential,
            destination,
            destination_credential,
            resolver,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.resolver = self.resolver.with_workers(workers);
        self
    }

    pub fn with_suggestion_rounds(mut self, rounds: usize) -> Self {
        self.resolver = self.resolver.with_suggestion_rounds(rounds);
        self
    }

    /// Runs one sync for `target`.
    ///
    /// # Errors
    ///
    /// Only errors for which [`SyncError::is_fatal`] holds. Everything else
    /// ends up in the returned report.
    pub async fn run(&self, target: &SyncTarget) -> Res<SyncReport> {
        match target {
            SyncTarget::Playlist(name) => self.sync_playlist(name).await,
            SyncTarget::All => self.sync_all().await,
        }
    }

    /// Transfers the source playlist called `name`.
    ///
    /// Fails with [`SyncError::PlaylistNotFound`] before the destination is
    /// touched when no playlist of that name exists.
    pub async fn sync_playlist(&self, name: &str) -> Res<SyncReport> {
        let summary = self.find_playlist(name.trim()).await?;
        let mut report = SyncReport::default();
        self.record(&summary, &mut report).await;
        Ok(report)
    }

    /// Transfers every source playlist, one after the other.
    pub async fn sync_all(&self) -> Res<SyncReport> {
        let summaries = utils::fetch_all_pages(self.source.playlist_page_size(), |offset, limit| {
            self.source
                .list_playlists(&self.source_credential, offset, limit)
        })
        .await
        .map_err(|e| SyncError::listing(self.source.kind().label(), e))?;

        info!("Found {} playlists on {}", summaries.len(), self.source.kind().label());

        let mut report = SyncReport::default();
        for summary in &summaries {
            self.record(summary, &mut report).await;
        }
        Ok(report)
    }

    async fn find_playlist(&self, name: &str) -> Res<PlaylistSummary> {
        let limit = self.source.playlist_page_size();
        let mut offset = 0;

        loop {
            let page = self
                .source
                .list_playlists(&self.source_credential, offset, limit)
                .await
                .map_err(|e| SyncError::listing(self.source.kind().label(), e))?;
            let next = page.next_offset(offset, limit);

            if let Some(found) = page.items.into_iter().find(|p| p.name == name) {
                return Ok(found);
            }

            match next {
                Some(next) => offset = next,
                None => return Err(SyncError::PlaylistNotFound(name.to_string())),
            }
        }
    }

    async fn record(&self, summary: &PlaylistSummary, report: &mut SyncReport) {
        let result = match self
            .source
            .get_playlist(&self.source_credential, summary)
            .await
        {
            Ok(playlist) => self.transfer(&playlist).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(playlist_report) => report.playlists.push(playlist_report),
            Err(error) => {
                warning!("Skipping playlist '{}': {}", summary.name, error);
                report.failures.push(PlaylistFailure {
                    name: summary.name.clone(),
                    error,
                });
            }
        }
    }

    /// Creates `playlist` on the destination and fills it with every song
    /// that could be matched, in source order.
    pub async fn transfer(&self, playlist: &Playlist) -> Res<PlaylistReport> {
        info!(
            "Creating playlist '{}' on {}",
            playlist.name,
            self.destination.kind().label()
        );
        let playlist_id = self
            .destination
            .create_playlist(
                &self.destination_credential,
                &playlist.name,
                &playlist.description,
            )
            .await?;

        info!("Matching {} songs", playlist.songs.len());
        let resolved = self.resolver.resolve_all(&playlist.songs).await;
        for error in resolved.iter().filter_map(|r| r.as_ref().err()) {
            warning!("{}", error);
        }

        let batch = MutationBatch::build(&playlist_id, resolved);
        let outcome = builder::submit(&self.destination, &self.destination_credential, batch).await;

        if outcome.errors.is_empty() {
            success!("Playlist '{}' synced with {} tracks", playlist.name, outcome.added);
        } else {
            warning!(
                "Playlist '{}' synced with {} of {} tracks",
                playlist.name,
                outcome.added,
                playlist.songs.len()
            );
        }

        Ok(PlaylistReport {
            name: playlist.name.clone(),
            destination_id: playlist_id,
            songs: playlist.songs.len(),
            added: outcome.added,
            errors: outcome.errors,
        })
    }
}
