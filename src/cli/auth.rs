use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{Res, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    spotify::auth::authorize(shared_state).await?;
    success!("Spotify token cached, sync runs will pick it up");
    Ok(())
}
