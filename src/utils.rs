use std::{
    future::Future,
    io::{self, BufRead, Write},
};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::{Res, types::Page};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Walks an offset paginated collection and merges every page in order.
///
/// `fetch` receives `(offset, limit)`. The walk stops once the offset
/// reaches the total reported by the most recent page.
///
/// # Arguments
///
/// * `page_size` - Limit passed to every call of `fetch`
/// * `fetch` - Loads the page starting at the given offset
///
/// # Returns
///
/// All items of all pages in service order. The first failing page aborts
/// the walk and its error is returned.
///
/// # Example
///
/// ```
/// let summaries = fetch_all_pages(50, |offset, limit| {
///     service.list_playlists(&credential, offset, limit)
/// })
/// .await?;
/// ```
pub async fn fetch_all_pages<T, F, Fut>(page_size: u32, mut fetch: F) -> Res<Vec<T>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Res<Page<T>>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset, page_size).await?;
        let next = page.next_offset(offset, page_size);
        items.extend(page.items);

        match next {
            Some(next) => offset = next,
            None => break,
        }
    }

    Ok(items)
}

/// Asks for a single line on stdin and returns it trimmed.
pub fn prompt(message: &str) -> Res<String> {
    print!("{} ", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
