//! Replays captured broadcast traffic through a [`SyncFacade`].
//!
//! A capture is a JSON-lines stream holding one wire message per line, in
//! the order the real-time channel delivered them. Blank lines and lines
//! starting with `#` are ignored. Lines that are not JSON are logged and
//! skipped; everything else goes through the facade's broadcast loop, so
//! malformed messages are classified exactly as they would be live.

use oreline_sync::{CollectionSnapshot, SyncConfig, SyncFacade};
use oreline_types::{EntityKind, UserId};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 256;

/// What to replay, and as whom.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Session user; broadcasts it originated are self-echoes.
    pub user: UserId,
    pub config: SyncConfig,
    /// Only forward messages of these kinds. Empty forwards everything.
    pub kinds: Vec<EntityKind>,
}

impl ReplayOptions {
    pub fn new(user: UserId) -> Self {
        Self {
            user,
            config: SyncConfig::default(),
            kinds: Vec::new(),
        }
    }
}

/// Line accounting for one replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Lines read, including blank and comment lines.
    pub lines: usize,
    /// Lines that were not JSON.
    pub skipped: usize,
    /// Messages left out by the kind filter.
    pub filtered: usize,
    /// Messages the broadcast loop reconciled.
    pub processed: usize,
}

/// Resulting state of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub user: UserId,
    pub stats: ReplayStats,
    /// Every collection holding entities or a non-zero total.
    pub collections: BTreeMap<EntityKind, CollectionSnapshot>,
}

/// Replays `reader` into a fresh facade and reports the final collections.
pub async fn replay<R>(reader: R, options: &ReplayOptions) -> io::Result<ReplayReport>
where
    R: AsyncBufRead + Unpin,
{
    let facade = SyncFacade::new(options.user.clone(), options.config.clone());
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    // `feed` owns the sender, so the loop ends once the input is exhausted.
    let (fed, processed) = tokio::join!(
        feed(reader, &options.kinds, tx),
        facade.run_broadcast_loop(rx)
    );
    let mut stats = fed?;
    stats.processed = processed;

    info!(
        "Replayed {} messages from {} lines ({} skipped, {} filtered)",
        stats.processed, stats.lines, stats.skipped, stats.filtered
    );
    Ok(ReplayReport {
        user: options.user.clone(),
        stats,
        collections: summarize(&facade).await,
    })
}

/// Reads JSON lines from `reader` and forwards the selected messages.
///
/// The returned stats leave `processed` at zero.
pub async fn feed<R>(
    reader: R,
    kinds: &[EntityKind],
    tx: mpsc::Sender<Value>,
) -> io::Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = ReplayStats::default();

    while let Some(line) = lines.next_line().await? {
        stats.lines += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping line {}: {}", stats.lines, e);
                stats.skipped += 1;
                continue;
            }
        };
        if !selected(&raw, kinds) {
            debug!("Filtered line {}", stats.lines);
            stats.filtered += 1;
            continue;
        }

        if tx.send(raw).await.is_err() {
            warn!("Broadcast loop closed before line {}", stats.lines);
            break;
        }
    }
    Ok(stats)
}

/// Returns true when `raw` passes the kind filter.
///
/// Messages without a readable kind only pass an empty filter.
pub fn selected(raw: &Value, kinds: &[EntityKind]) -> bool {
    if kinds.is_empty() {
        return true;
    }
    raw.get("kind")
        .and_then(Value::as_str)
        .and_then(|kind| kind.parse::<EntityKind>().ok())
        .is_some_and(|kind| kinds.contains(&kind))
}

/// Snapshots every non-empty collection of `facade`.
pub async fn summarize(facade: &SyncFacade) -> BTreeMap<EntityKind, CollectionSnapshot> {
    let mut collections = BTreeMap::new();
    for kind in EntityKind::ALL {
        let snapshot = facade.snapshot(kind).await;
        if !snapshot.items.is_empty() || snapshot.window.total > 0 {
            collections.insert(kind, snapshot);
        }
    }
    collections
}
