use crate::{
    Res,
    types::{
        Credential, GPM_ITEM_TYPE_ALBUM, GPM_ITEM_TYPE_ARTIST, GPM_ITEM_TYPE_TRACK,
        GpmSearchEntry, GpmSearchResponse, ItemType, SearchCandidate, SearchResult,
    },
};

use super::{GpmClient, MAX_SEARCH_RESULTS, PATH_SEARCH};

impl GpmClient {
    /// Runs one store search. A non-empty `suggestedQuery` in the answer
    /// means the service wants the query corrected; the resolver decides
    /// whether to follow it.
    pub async fn search_track(&self, credential: &Credential, query: &str) -> Res<SearchResult> {
        let res: GpmSearchResponse = self
            .get(
                credential,
                PATH_SEARCH,
                &[("q", query), ("max-results", MAX_SEARCH_RESULTS), ("ct", "1")],
            )
            .await?;

        Ok(SearchResult {
            suggested_query: res.suggested_query.filter(|q| !q.trim().is_empty()),
            candidates: res.entries.into_iter().map(to_candidate).collect(),
        })
    }
}

fn to_candidate(entry: GpmSearchEntry) -> SearchCandidate {
    let item_type = match entry.item_type.as_str() {
        GPM_ITEM_TYPE_TRACK => ItemType::Track,
        GPM_ITEM_TYPE_ARTIST => ItemType::Artist,
        GPM_ITEM_TYPE_ALBUM => ItemType::Album,
        _ => ItemType::Other,
    };

    match entry.track {
        Some(track) => SearchCandidate {
            external_id: track.store_id.unwrap_or_default(),
            item_type,
            name: track.title,
            artist: track.artist,
            album: track.album,
        },
        None => SearchCandidate {
            external_id: String::new(),
            item_type,
            name: String::new(),
            artist: String::new(),
            album: String::new(),
        },
    }
}
