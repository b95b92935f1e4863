use tabled::Table;

use crate::{
    Res,
    error::SyncError,
    info,
    service::{MusicService, ServiceKind},
    success,
    sync::{SyncReport, SyncTarget, Syncer},
    warning,
};

/// Transfers `playlist` (a name or `--all`) from `source` to `destination`.
///
/// Both logins happen before anything is read, so a rejected credential
/// stops the run without side effects. Per-track and per-playlist failures
/// end up in the printed report; only fatal errors are returned as `Err`.
///
/// # Arguments
///
/// * `source` - Service the playlists are read from
/// * `destination` - Service the playlists are created on
/// * `playlist` - Playlist name, or `--all` for every playlist
/// * `workers` - Concurrent track lookups, `PLSYNC_RESOLVE_WORKERS` when `None`
///
/// # Errors
///
/// Returns an error for which [`SyncError::is_fatal`] holds: a rejected
/// login, an unknown playlist name or an unreadable source listing.
pub async fn sync(
    source: ServiceKind,
    destination: ServiceKind,
    playlist: &str,
    workers: Option<usize>,
) -> Res<()> {
    let target = SyncTarget::from_arg(playlist);

    info!("Logging in to {} (source)", source.label());
    let source_service = MusicService::new(source);
    let source_credential = source_service.authenticate().await?;

    info!("Logging in to {} (destination)", destination.label());
    let destination_service = MusicService::new(destination);
    let destination_credential = destination_service.authenticate().await?;

    let mut syncer = Syncer::new(
        source_service,
        source_credential,
        destination_service,
        destination_credential,
    );
    if let Some(workers) = workers {
        syncer = syncer.with_workers(workers);
    }

    let report = syncer.run(&target).await?;
    print_report(report);
    Ok(())
}

/// Prints the per-playlist table, then every failure of the run as one
/// nested [`SyncError::PartialBatch`].
///
/// # Arguments
///
/// * `report` - Finished run, consumed because its errors are moved into
///   the aggregate
///
/// # Example Output
///
/// ```text
/// [!] 2 failures while syncing playlists
/// [!]     2 failures while transferring 'Mix'
/// [!]         No matching track found for 'Two' by B
/// [!]         No matching track found for 'Four' by D
/// [!]     1 failures while transferring 'Two'
/// [!]         Request to playlistbatch failed with status 500: backend error
/// ```
pub fn print_report(report: SyncReport) {
    let rows = report.table_rows();
    if rows.is_empty() {
        info!("No playlists transferred");
        return;
    }

    let table = Table::new(rows);
    println!("{}", table);

    match report.into_error() {
        None => success!("All playlists synced"),
        Some(error) => print_error(&error, 0),
    }
}

fn print_error(error: &SyncError, indent: usize) {
    warning!("{:indent$}{}", "", error);
    if let SyncError::PartialBatch { errors, .. } = error {
        for nested in errors {
            print_error(nested, indent + 4);
        }
    }
}
