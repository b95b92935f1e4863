use crate::{
    Res,
    types::{Credential, ItemType, SearchCandidate, SearchResult, SpotifySearchResponse},
};

use super::{SEARCH_LIMIT, SpotifyClient};

impl SpotifyClient {
    /// Searches the catalog for tracks matching `query`.
    ///
    /// Spotify never proposes a corrected query, and with `type=track`
    /// every candidate is playable. The candidate id is the track uri,
    /// which is what the add endpoint expects.
    pub async fn search_track(&self, credential: &Credential, query: &str) -> Res<SearchResult> {
        let res: SpotifySearchResponse = self
            .get(
                credential,
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", SEARCH_LIMIT.to_string()),
                ],
            )
            .await?;

        let candidates = res
            .tracks
            .items
            .into_iter()
            .filter_map(|track| {
                let uri = track.uri?;
                Some(SearchCandidate {
                    external_id: uri,
                    item_type: ItemType::Track,
                    artist: track
                        .artists
                        .first()
                        .map(|a| a.name.clone())
                        .unwrap_or_default(),
                    album: track.album.name,
                    name: track.name,
                })
            })
            .collect();

        Ok(SearchResult {
            suggested_query: None,
            candidates,
        })
    }
}
