use crate::{
    Res,
    error::SyncError,
    types::{
        ChainEntry, Credential, ENTRY_OK, EntryStatus, GPM_NEW_ENTITY_TIMESTAMP,
        GPM_PLAYLIST_SHARESTATE_PUBLIC, GPM_PLAYLIST_TYPE, GPM_UNMODIFIED_TIMESTAMP, GpmCreate,
        GpmMutateResponse, GpmMutations, GpmPlaylist, GpmSongEntry,
    },
};

use super::{GpmClient, PATH_ADD_SONGS_TO_PLAYLIST, PATH_CREATE_PLAYLIST};

impl GpmClient {
    /// Creates an empty public playlist and returns its server id.
    pub async fn create_playlist(
        &self,
        credential: &Credential,
        name: &str,
        description: &str,
    ) -> Res<String> {
        let request = GpmMutations {
            mutations: vec![GpmCreate {
                create: GpmPlaylist {
                    creation_timestamp: GPM_NEW_ENTITY_TIMESTAMP.to_string(),
                    deleted: false,
                    last_modified_timestamp: GPM_UNMODIFIED_TIMESTAMP.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    playlist_type: GPM_PLAYLIST_TYPE.to_string(),
                    share_state: GPM_PLAYLIST_SHARESTATE_PUBLIC.to_string(),
                },
            }],
        };

        let res: GpmMutateResponse = self.post(credential, PATH_CREATE_PLAYLIST, &request).await?;
        let created = res.mutate_response.into_iter().next().ok_or_else(|| {
            SyncError::parse(PATH_CREATE_PLAYLIST, "mutate_response is empty")
        })?;

        if created.response_code != ENTRY_OK || created.id.is_empty() {
            return Err(SyncError::Transport {
                path: PATH_CREATE_PLAYLIST.to_string(),
                status: None,
                message: format!("playlist '{}' rejected: {}", name, created.response_code),
            });
        }
        Ok(created.id)
    }

    /// Submits the whole chain as one `plentriesbatch` request.
    ///
    /// The service answers with one `{id, response_code}` per mutation in
    /// request order.
    pub async fn add_tracks(
        &self,
        credential: &Credential,
        entries: &[ChainEntry],
    ) -> Res<Vec<EntryStatus>> {
        let request = GpmMutations {
            mutations: entries
                .iter()
                .map(|entry| GpmCreate {
                    create: song_entry(entry),
                })
                .collect(),
        };

        let res: GpmMutateResponse = self
            .post(credential, PATH_ADD_SONGS_TO_PLAYLIST, &request)
            .await?;

        Ok(res
            .mutate_response
            .into_iter()
            .map(|r| EntryStatus {
                id: r.id,
                code: r.response_code,
            })
            .collect())
    }
}

fn song_entry(entry: &ChainEntry) -> GpmSongEntry {
    GpmSongEntry {
        creation_timestamp: GPM_NEW_ENTITY_TIMESTAMP.to_string(),
        deleted: false,
        last_modified_timestamp: GPM_UNMODIFIED_TIMESTAMP.to_string(),
        preceding_entry_id: entry.previous_id.clone(),
        following_entry_id: entry.next_id.clone(),
        client_id: entry.client_id.clone(),
        source: entry.source.code(),
        playlist_id: entry.playlist_id.clone(),
        track_id: entry.track_id.clone(),
    }
}
