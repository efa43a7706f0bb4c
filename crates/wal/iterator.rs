//! Reads WAL files back in block order, verifying chain continuity before
//! any operation of a block is handed to the consumer.

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::PathBuf,
    time::Duration,
};

use ethereum_types::H256;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    block_number_to_filename,
    error::WalError,
    record::{BlockInfo, Operation},
};

/// How long to wait before re-probing for the next block file in follow
/// mode.
pub const FOLLOW_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One verified WAL file: the block info plus a lazy reader over its
/// operation records.
pub struct WalBlock {
    info: BlockInfo,
    reader: BufReader<File>,
    line: String,
}

impl WalBlock {
    pub fn info(&self) -> &BlockInfo {
        &self.info
    }

    /// Next operation record, `None` at end of file.
    pub fn next_operation(&mut self) -> Result<Option<Operation>, WalError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(self.line.trim_end())?))
    }

    /// Drains the remaining operations into a vector.
    pub fn operations(&mut self) -> Result<Vec<Operation>, WalError> {
        let mut operations = Vec::new();
        while let Some(operation) = self.next_operation()? {
            operations.push(operation);
        }
        Ok(operations)
    }
}

/// Yields WAL blocks in strictly increasing block-number order, verifying
/// that every block's `parent_hash` links to the hash of the block before
/// it. With `follow` set, waits for the next file to appear instead of
/// terminating; cancellation ends the iteration cleanly from any wait.
pub struct WalIterator {
    dir: PathBuf,
    next_block_number: u64,
    prev_block_hash: H256,
    follow: bool,
    cancel: CancellationToken,
    poll_interval: Duration,
}

impl WalIterator {
    pub fn new(
        dir: impl Into<PathBuf>,
        next_block_number: u64,
        prev_block_hash: H256,
        follow: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            dir: dir.into(),
            next_block_number,
            prev_block_hash,
            follow,
            cancel,
            poll_interval: FOLLOW_POLL_INTERVAL,
        }
    }

    /// Next verified block, or `None` when the log is exhausted (follow off)
    /// or the iterator was cancelled.
    pub async fn next_block(&mut self) -> Result<Option<WalBlock>, WalError> {
        let file = loop {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }

            let path = self.dir.join(block_number_to_filename(self.next_block_number));
            match File::open(&path) {
                Ok(file) => break file,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    if !self.follow {
                        return Ok(None);
                    }
                    debug!(block = self.next_block_number, "waiting for wal file");
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Ok(None),
                        _ = tokio::time::sleep(self.poll_interval) => {}
                    }
                }
                Err(err) => return Err(err.into()),
            }
        };

        let mut reader = BufReader::new(file);
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(WalError::MissingBlockInfo(self.next_block_number));
        }
        let info: BlockInfo = serde_json::from_str(line.trim_end())?;

        if info.number != self.next_block_number {
            return Err(WalError::BlockNumberMismatch {
                expected: self.next_block_number,
                got: info.number,
            });
        }
        if info.parent_hash != self.prev_block_hash {
            return Err(WalError::ParentHashMismatch {
                block: info.number,
                expected: self.prev_block_hash,
                got: info.parent_hash,
            });
        }

        self.next_block_number = info.number + 1;
        self.prev_block_hash = info.hash;

        Ok(Some(WalBlock {
            info,
            reader,
            line: String::new(),
        }))
    }
}
