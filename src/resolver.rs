//! Destination catalog lookup for source songs.
//!
//! A song is searched as `"<first artist> - <name>"` (or just its name when
//! no artist is known). Suggested queries are followed up to a bound, and
//! the first candidate typed as a playable track wins. There is no
//! similarity scoring.

use std::{collections::HashSet, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::{
    Res, config,
    error::SyncError,
    service::MusicService,
    types::{Credential, ItemType, SearchCandidate, Song},
};

/// Search query for a song.
pub fn search_query(song: &Song) -> String {
    match song.artists.first() {
        Some(artist) => format!("{} - {}", artist.name, song.name),
        None => song.name.clone(),
    }
}

/// First candidate that is a playable track.
pub fn select_track(candidates: &[SearchCandidate]) -> Option<&SearchCandidate> {
    candidates
        .iter()
        .find(|c| c.item_type == ItemType::Track && !c.external_id.is_empty())
}

#[derive(Debug, Clone)]
pub struct Resolver {
    service: MusicService,
    credential: Credential,
    workers: usize,
    suggestion_rounds: usize,
}

impl Resolver {
    /// Resolver against `service` using the configured pool size and
    /// suggestion bound.
    pub fn new(service: MusicService, credential: Credential) -> Self {
        Resolver {
            service,
            credential,
            workers: config::resolve_workers(),
            suggestion_rounds: config::suggestion_rounds(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_suggestion_rounds(mut self, rounds: usize) -> Self {
        self.suggestion_rounds = rounds;
        self
    }

    /// Finds the destination track id for `song`.
    ///
    /// A response carrying a suggested query is discarded and the search is
    /// repeated with the suggestion. More than `suggestion_rounds` hops fail
    /// with [`SyncError::AmbiguousQuery`]; a suggestion that was already
    /// issued ends the hopping and the current candidates are used.
    pub async fn resolve(&self, song: &Song) -> Res<String> {
        let mut query = search_query(song);
        let mut issued: HashSet<String> = HashSet::new();
        let mut rounds = 0;

        loop {
            issued.insert(query.clone());
            let result = self.service.search_track(&self.credential, &query).await?;

            if let Some(suggestion) = result.suggested_query {
                if !issued.contains(&suggestion) {
                    if rounds >= self.suggestion_rounds {
                        return Err(SyncError::AmbiguousQuery {
                            song: song.clone(),
                            rounds,
                        });
                    }
                    rounds += 1;
                    query = suggestion;
                    continue;
                }
            }

            return select_track(&result.candidates)
                .map(|c| c.external_id.clone())
                .ok_or_else(|| SyncError::TrackNotFound { song: song.clone() });
        }
    }

    /// Resolves every song on a bounded pool of tasks.
    ///
    /// At most `workers` lookups are in flight at once. A progress bar
    /// ticks as lookups finish.
    ///
    /// # Arguments
    ///
    /// * `songs` - Source songs in playlist order
    ///
    /// # Returns
    ///
    /// One result per song, in song order, whatever order the lookups
    /// finish in. A failed lookup only fails its own slot.
    ///
    /// # Example
    ///
    /// ```
    /// let resolver = Resolver::new(destination, credential).with_workers(8);
    /// let resolved = resolver.resolve_all(&playlist.songs).await;
    /// assert_eq!(resolved.len(), playlist.songs.len());
    /// ```
    pub async fn resolve_all(&self, songs: &[Song]) -> Vec<Res<String>> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let pb = progress_bar(songs.len() as u64);

        let handles: Vec<_> = songs
            .iter()
            .cloned()
            .map(|song| {
                let resolver = self.clone();
                let sem = Arc::clone(&semaphore);
                tokio::spawn(async move {
                    let _permit = sem
                        .acquire_owned()
                        .await
                        .map_err(|e| SyncError::Task(e.to_string()))?;
                    resolver.resolve(&song).await
                })
            })
            .collect();

        let mut resolved = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(SyncError::Task(e.to_string())),
            };
            resolved.push(result);
            pb.inc(1);
        }

        pb.finish_and_clear();
        resolved
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner:.blue} Matching tracks {pos}/{len} {bar:30}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
