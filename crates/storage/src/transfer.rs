// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`FileTransferThread`]: a chunked read/write/copy transfer charged
//! against the engine's [`DiskCatalog`] one chunk at a time (spec §4.3,
//! §4.4).

use std::sync::Arc;
use wrench_core::{DataFile, FailureCause, HostId};
use wrench_engine::DiskCatalog;

/// What kind of transfer a [`FileTransferThread`] is performing, and which
/// host's disk bandwidth it should be charged against for each leg.
pub enum TransferKind {
    Read { host: HostId },
    Write { host: HostId },
    Copy { src_host: HostId, dst_host: HostId },
}

pub struct FileTransferThread {
    file: Arc<DataFile>,
    kind: TransferKind,
    buffer_size: u64,
    #[allow(dead_code)]
    answer_mailbox: String,
}

impl FileTransferThread {
    pub fn new(file: Arc<DataFile>, kind: TransferKind, buffer_size: u64, answer_mailbox: impl Into<String>) -> Self {
        Self { file, kind, buffer_size: buffer_size.max(1), answer_mailbox: answer_mailbox.into() }
    }

    /// Run the transfer to completion, charging `disks` chunk by chunk.
    /// Returns the total simulated duration in seconds.
    pub async fn run(&self, disks: &DiskCatalog) -> Result<f64, FailureCause> {
        let size = self.file.size_in_bytes();
        let mut remaining = size;
        let mut total_secs = 0.0;
        while remaining > 0 {
            let chunk = remaining.min(self.buffer_size);
            total_secs += self.charge_chunk(disks, chunk)?;
            remaining -= chunk;
        }
        Ok(total_secs)
    }

    fn charge_chunk(&self, disks: &DiskCatalog, bytes: u64) -> Result<f64, FailureCause> {
        match &self.kind {
            TransferKind::Read { host } => {
                let duration = disks.read_duration(*host, bytes).ok_or(FailureCause::HostError { host: *host })?;
                Ok(duration.as_secs_f64())
            }
            TransferKind::Write { host } => {
                let duration = disks.write_duration(*host, bytes).ok_or(FailureCause::HostError { host: *host })?;
                Ok(duration.as_secs_f64())
            }
            TransferKind::Copy { src_host, dst_host } => {
                let read = disks.read_duration(*src_host, bytes).ok_or(FailureCause::HostError { host: *src_host })?;
                let write = disks.write_duration(*dst_host, bytes).ok_or(FailureCause::HostError { host: *dst_host })?;
                Ok(read.as_secs_f64().max(write.as_secs_f64()))
            }
        }
    }

    pub fn answer_mailbox_if_read(&self) -> Option<&str> {
        matches!(self.kind, TransferKind::Read { .. }).then_some(self.answer_mailbox.as_str())
    }

    pub fn answer_mailbox_if_write(&self) -> Option<&str> {
        matches!(self.kind, TransferKind::Write { .. }).then_some(self.answer_mailbox.as_str())
    }

    pub fn answer_mailbox_if_copy(&self) -> Option<&str> {
        matches!(self.kind, TransferKind::Copy { .. }).then_some(self.answer_mailbox.as_str())
    }
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
