//! File-backed fill ledger.
//!
//! Append-only JSON lines, one [`LedgerEntry`] per line, `fsync`ed before
//! `consume` returns. On open the file is replayed into memory. A trailing
//! line without its newline is a torn write from a crash mid-append: it is
//! dropped and the file truncated back to the last complete entry. Any other
//! unparseable line is corruption and refuses to open.
//!
//! A failed append is cut back to the last committed length before the
//! error is returned, so the file never holds bytes the index does not
//! know about. If that cut fails too, the journal stops accepting appends.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use itemswap_core::FillStatus;
use itemswap_types::{OrderHash, Result, SwapError};
use tracing::{debug, error, info, warn};

use crate::ledger::{FillLedger, InMemoryFillLedger, LedgerEntry};

/// Durable [`FillLedger`] over a JSON-lines journal.
#[derive(Debug)]
pub struct JournalFillLedger {
    path: PathBuf,
    file: File,
    index: InMemoryFillLedger,
    /// Set when a failed append could not be cut back.
    wedged: Option<String>,
}

impl JournalFillLedger {
    /// Open (creating if absent) and replay the journal at `path`.
    ///
    /// # Errors
    /// `Io` if the file cannot be opened or truncated; `CorruptJournal` if a
    /// complete line does not parse or repeats a hash.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;
        let (index, valid_len) = replay(&raw)?;

        if valid_len < raw.len() {
            warn!(
                path = %path.display(),
                dropped_bytes = raw.len() - valid_len,
                "Dropping torn trailing journal entry"
            );
            file.set_len(valid_len as u64)?;
            file.sync_all()?;
        }

        info!(
            path = %path.display(),
            entries = index.len(),
            "Fill journal opened"
        );
        Ok(Self {
            path,
            file,
            index,
            wedged: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append target of a journal.
trait JournalSink: Write {
    /// Current committed length in bytes.
    fn committed_len(&mut self) -> io::Result<u64>;

    /// Flush written data to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Cut the sink back to `len` bytes.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl JournalSink for File {
    fn committed_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.sync_data()
    }
}

/// Failure of [`append`].
#[derive(Debug)]
enum AppendError {
    /// Nothing from this append remains in the sink.
    Reverted(io::Error),
    /// The sink may hold a partial line.
    Dirty { append: io::Error, cut: io::Error },
}

/// Write and sync `line`; on failure cut the sink back to where it was.
fn append<S>(sink: &mut S, line: &[u8]) -> std::result::Result<(), AppendError>
where
    S: JournalSink + ?Sized,
{
    let len = sink.committed_len().map_err(AppendError::Reverted)?;
    let Err(append) = sink.write_all(line).and_then(|()| sink.sync()) else {
        return Ok(());
    };
    match sink.truncate(len) {
        Ok(()) => Err(AppendError::Reverted(append)),
        Err(cut) => Err(AppendError::Dirty { append, cut }),
    }
}

/// Parse `raw` into an index. Returns the index and the byte length of the
/// complete, valid prefix.
fn replay(raw: &[u8]) -> Result<(InMemoryFillLedger, usize)> {
    let mut index = InMemoryFillLedger::new();
    let mut offset = 0;
    let mut line_no = 0;

    while offset < raw.len() {
        line_no += 1;
        let rest = &raw[offset..];
        let Some(newline) = rest.iter().position(|b| *b == b'\n') else {
            // Torn tail: never acknowledged, safe to drop.
            return Ok((index, offset));
        };
        let line = &rest[..newline];
        offset += newline + 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let entry: LedgerEntry =
            serde_json::from_slice(line).map_err(|e| SwapError::CorruptJournal {
                line: line_no,
                reason: e.to_string(),
            })?;
        index.consume(entry).map_err(|_| SwapError::CorruptJournal {
            line: line_no,
            reason: format!("order {} consumed twice", entry.hash),
        })?;
    }

    Ok((index, offset))
}

impl FillStatus for JournalFillLedger {
    fn is_consumed(&self, hash: &OrderHash) -> bool {
        self.index.is_consumed(hash)
    }
}

impl FillLedger for JournalFillLedger {
    fn consume(&mut self, entry: LedgerEntry) -> Result<()> {
        if let Some(reason) = &self.wedged {
            return Err(SwapError::Ledger(format!("journal unusable: {reason}")));
        }
        if self.index.is_consumed(&entry.hash) {
            return Err(SwapError::Ledger(format!(
                "order {} already consumed",
                entry.hash
            )));
        }

        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        match append(&mut self.file, &line) {
            Ok(()) => {}
            Err(AppendError::Reverted(e)) => {
                warn!(order = %entry.hash.short(), error = %e, "Journal append failed");
                return Err(SwapError::Ledger(format!("journal append failed: {e}")));
            }
            Err(AppendError::Dirty { append, cut }) => {
                let reason = format!("append failed ({append}) and could not be cut back ({cut})");
                error!(path = %self.path.display(), %reason, "Journal wedged");
                self.wedged = Some(reason.clone());
                return Err(SwapError::Ledger(format!("journal {reason}")));
            }
        }

        self.index.consume(entry)?;
        debug!(order = %entry.hash.short(), kind = %entry.kind, "Journal entry committed");
        Ok(())
    }

    fn entry(&self, hash: &OrderHash) -> Option<LedgerEntry> {
        self.index.entry(hash)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn consumed_hashes(&self) -> Vec<OrderHash> {
        self.index.consumed_hashes()
    }
}
