//! SQLite DSN helpers.

use std::path::{Path, PathBuf};

#[cfg(feature = "sqlite")]
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
#[cfg(feature = "sqlite")]
use std::str::FromStr;

/// True for `sqlite::memory:` style DSNs and `mode=memory` URIs.
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Split a SQLite DSN into its path part and optional query string.
fn split_dsn(dsn: &str) -> Option<(&str, Option<&str>)> {
    let rest = dsn
        .trim()
        .strip_prefix("sqlite://")
        .or_else(|| dsn.trim().strip_prefix("sqlite:"))?;
    Some(match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    })
}

/// File path of a file-backed SQLite DSN; `None` for memory DSNs and other engines.
pub fn file_path(dsn: &str) -> Option<PathBuf> {
    if is_memory_dsn(dsn) {
        return None;
    }
    let (path, _) = split_dsn(dsn)?;
    if path.is_empty() || path.starts_with("file:") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Rewrite a relative SQLite file DSN so it points under `base_dir`.
/// Absolute paths, memory DSNs and non-SQLite DSNs are returned unchanged.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> String {
    let Some(path) = file_path(dsn) else {
        return dsn.to_string();
    };
    if path.is_absolute() {
        return dsn.to_string();
    }
    let abs = base_dir.join(path).to_string_lossy().replace('\\', "/");
    let query = split_dsn(dsn).and_then(|(_, q)| q);
    match query {
        Some(q) => format!("sqlite://{abs}?{q}"),
        None => format!("sqlite://{abs}"),
    }
}

/// Typed connect options for a SQLite DSN. File databases get WAL and the
/// configured busy timeout; their parent directory is created when asked to.
#[cfg(feature = "sqlite")]
pub(crate) fn connect_options(
    dsn: &str,
    opts: &crate::ConnectOpts,
) -> crate::Result<SqliteConnectOptions> {
    let mut options = SqliteConnectOptions::from_str(dsn)?.foreign_keys(true);

    if is_memory_dsn(dsn) {
        return Ok(options.journal_mode(SqliteJournalMode::Memory));
    }

    if opts.create_sqlite_dirs {
        if let Some(parent) = file_path(dsn).as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    options = options
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(opts.sqlite_busy_timeout);
    Ok(options)
}
