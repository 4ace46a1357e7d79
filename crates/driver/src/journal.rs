//! JSON-lines event journal.
//!
//! Records are serialized and appended by a dedicated task, so the game
//! loop never waits on the disk. Write failures end the writer quietly; the
//! game keeps running without a journal.

use anyhow::{anyhow, Result};
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::GameEvent;

/// One journal line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    /// Position in this session's journal, from 0
    pub seq: u64,
    /// Milliseconds since the session started
    pub t_ms: u64,
    pub episode_id: u32,
    #[serde(flatten)]
    pub event: GameEvent,
}

pub struct Journal {
    tx: mpsc::UnboundedSender<JournalRecord>,
    writer: JoinHandle<()>,
    next_seq: u64,
}

impl Journal {
    /// Open `path` for appending and start the writer task.
    pub async fn open(path: &str) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| anyhow!("journal: open {} failed: {}", path, e))?;

        let (tx, mut rx) = mpsc::unbounded_channel::<JournalRecord>();
        let writer = tokio::spawn(async move {
            let mut buf: Vec<u8> = Vec::with_capacity(256);
            while let Some(record) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &record).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }
            let _ = file.flush().await;
        });

        Ok(Self {
            tx,
            writer,
            next_seq: 0,
        })
    }

    /// Queue an event; never blocks.
    pub fn record(&mut self, t_ms: u64, episode_id: u32, event: GameEvent) {
        let record = JournalRecord {
            seq: self.next_seq,
            t_ms,
            episode_id,
            event,
        };
        self.next_seq += 1;
        let _ = self.tx.send(record);
    }

    pub fn recorded(&self) -> u64 {
        self.next_seq
    }

    /// Flush everything queued so far and stop the writer.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.writer.await;
    }
}
