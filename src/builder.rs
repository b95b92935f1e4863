//! Turns resolved track ids into one ordered batch of playlist entries.
//!
//! The destination keeps playlist order as a doubly linked list: every
//! entry names the client id of the entry before and after it. Client ids
//! are generated here, so the whole chain can be sent in a single request.

use uuid::Uuid;

use crate::{
    Res,
    error::SyncError,
    service::MusicService,
    types::{ChainEntry, Credential, TrackSource},
};

/// Links `track_ids` into a chain for `playlist_id`, in the given order.
pub fn build_chain(playlist_id: &str, track_ids: &[String]) -> Vec<ChainEntry> {
    let client_ids: Vec<String> = track_ids
        .iter()
        .map(|_| Uuid::new_v4().to_string())
        .collect();

    track_ids
        .iter()
        .enumerate()
        .map(|(i, track_id)| ChainEntry {
            client_id: client_ids[i].clone(),
            previous_id: i.checked_sub(1).map(|p| client_ids[p].clone()),
            next_id: client_ids.get(i + 1).cloned(),
            track_id: track_id.clone(),
            playlist_id: playlist_id.to_string(),
            source: TrackSource::for_track(track_id),
        })
        .collect()
}

/// A chain ready for submission plus the resolutions that never made it in.
#[derive(Debug)]
pub struct MutationBatch {
    pub playlist_id: String,
    pub entries: Vec<ChainEntry>,
    pub skipped: Vec<SyncError>,
}

impl MutationBatch {
    /// Builds the batch from per-song resolution results in song order.
    /// Failed resolutions are kept aside; the chain only links successes.
    pub fn build(playlist_id: &str, resolved: Vec<Res<String>>) -> Self {
        let mut track_ids = Vec::with_capacity(resolved.len());
        let mut skipped = Vec::new();

        for result in resolved {
            match result {
                Ok(id) => track_ids.push(id),
                Err(e) => skipped.push(e),
            }
        }

        MutationBatch {
            playlist_id: playlist_id.to_string(),
            entries: build_chain(playlist_id, &track_ids),
            skipped,
        }
    }

    /// True when no resolution succeeded, so there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub added: usize,
    pub errors: Vec<SyncError>,
}

/// Sends the batch in one request and sorts the answer into successes and
/// per-track failures.
///
/// Entries are matched to statuses by position. An entry without a status
/// counts as rejected. A failed request is reported once for the whole
/// batch.
///
/// # Returns
///
/// A [`BatchOutcome`] whose `errors` start with the batch's skipped
/// resolutions, followed by the rejections or the request error. An empty
/// batch sends nothing.
pub async fn submit(
    service: &MusicService,
    credential: &Credential,
    batch: MutationBatch,
) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        added: 0,
        errors: batch.skipped,
    };

    if batch.entries.is_empty() {
        return outcome;
    }

    let statuses = match service
        .add_tracks(credential, &batch.playlist_id, &batch.entries)
        .await
    {
        Ok(statuses) => statuses,
        Err(e) => {
            outcome.errors.push(e);
            return outcome;
        }
    };

    for (i, entry) in batch.entries.iter().enumerate() {
        match statuses.get(i) {
            Some(status) if status.is_ok() => outcome.added += 1,
            Some(status) => outcome.errors.push(SyncError::Rejected {
                track_id: entry.track_id.clone(),
                code: status.code.clone(),
            }),
            None => outcome.errors.push(SyncError::Rejected {
                track_id: entry.track_id.clone(),
                code: "missing response".to_string(),
            }),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::types::Song;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chain_links_neighbours() {
        let chain = build_chain("PL", &ids(&["T1", "T2", "T3", "T4"]));

        assert_eq!(chain.len(), 4);
        assert_eq!(chain[0].previous_id, None);
        assert_eq!(chain[3].next_id, None);
        for i in 1..chain.len() {
            assert_eq!(chain[i].previous_id.as_ref(), Some(&chain[i - 1].client_id));
            assert_eq!(chain[i - 1].next_id.as_ref(), Some(&chain[i].client_id));
        }
        assert!(chain.iter().all(|e| e.playlist_id == "PL"));
    }

    #[test]
    fn chain_ids_are_unique_uuids() {
        let chain = build_chain("PL", &ids(&["a", "b", "c", "d", "e", "f"]));
        let unique: HashSet<_> = chain.iter().map(|e| e.client_id.as_str()).collect();

        assert_eq!(unique.len(), chain.len());
        for entry in &chain {
            let parsed = Uuid::parse_str(&entry.client_id).expect("uuid");
            assert_eq!(parsed.get_version_num(), 4);
        }
    }

    #[test]
    fn single_entry_has_no_neighbours() {
        let chain = build_chain("PL", &ids(&["T1"]));
        assert_eq!(chain.len(), 1);
        assert!(chain[0].previous_id.is_none());
        assert!(chain[0].next_id.is_none());
    }

    #[test]
    fn empty_chain() {
        assert!(build_chain("PL", &[]).is_empty());
    }

    #[test]
    fn source_follows_track_prefix() {
        let chain = build_chain("PL", &ids(&["Tabc", "1234-lib"]));
        assert_eq!(chain[0].source, TrackSource::Store);
        assert_eq!(chain[0].source.code(), 2);
        assert_eq!(chain[1].source, TrackSource::Library);
        assert_eq!(chain[1].source.code(), 1);
    }

    #[test]
    fn build_skips_failed_resolutions() {
        let song = Song::new("Missing", "Album", &["Nobody"]);
        let resolved = vec![
            Ok("T1".to_string()),
            Err(SyncError::TrackNotFound { song: song.clone() }),
            Ok("T3".to_string()),
            Err(SyncError::TrackNotFound { song }),
            Ok("T5".to_string()),
        ];

        let batch = MutationBatch::build("PL", resolved);
        let tracks: Vec<_> = batch.entries.iter().map(|e| e.track_id.as_str()).collect();

        assert_eq!(tracks, vec!["T1", "T3", "T5"]);
        assert_eq!(batch.skipped.len(), 2);
        assert_eq!(batch.entries[1].previous_id.as_ref(), Some(&batch.entries[0].client_id));
        assert_eq!(batch.entries[1].next_id.as_ref(), Some(&batch.entries[2].client_id));
        assert!(!batch.is_empty());
    }

    #[test]
    fn all_failed_resolutions_leave_an_empty_batch() {
        let song = Song::new("Missing", "Album", &["Nobody"]);
        let batch = MutationBatch::build("PL", vec![Err(SyncError::TrackNotFound { song })]);

        assert!(batch.is_empty());
        assert_eq!(batch.skipped.len(), 1);
    }
}
