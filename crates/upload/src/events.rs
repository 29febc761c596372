//! Typed progress events pushed to the UI layer.

/// Progress event emitted during a transfer upload.
///
/// Byte-level [`UploadEvent::ChunkProgress`] events are emitted from
/// the request body stream and may be dropped under backpressure;
/// lifecycle events are delivered in order to a taken receiver. With
/// no receiver taken before the upload starts, all events are
/// discarded.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Human-readable status line.
    Status(String),

    /// File checksum computation progress, `0.0..=1.0`.
    ChecksumProgress {
        file_index: usize,
        file_name: String,
        fraction: f64,
    },

    /// A chunk upload attempt sequence has started.
    ChunkStarted {
        file_name: String,
        chunk_index: u32,
        total_chunks: u32,
        size: u64,
    },

    /// Bytes handed to the transport for the current attempt.
    ChunkProgress { bytes: u64 },

    /// A chunk was acknowledged by the server.
    ChunkCompleted {
        file_name: String,
        chunk_index: u32,
    },

    /// The transfer was sealed; the shared link is available.
    TransferFinalized { transfer_id: i64 },
}

/// Formats a byte count the way the service UI does (KB/MB/GB steps).
pub fn format_size(size: u64) -> String {
    const KB: f64 = 1024.0;
    let size = size as f64;
    if size < KB {
        format!("{size} Bytes")
    } else if size < KB * KB {
        format!("{:.2} KB", size / KB)
    } else if size < KB * KB * KB {
        format!("{:.2} MB", size / KB / KB)
    } else {
        format!("{:.2} GB", size / KB / KB / KB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_steps() {
        assert_eq!(format_size(512), "512 Bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn format_size_boundary() {
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1.00 KB");
    }
}
