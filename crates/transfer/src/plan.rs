use crate::TransferError;

/// Half-open byte range `[start, end)` of one chunk within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Fixed-size chunk layout of a single file.
///
/// Chunk indices are 1-based and dense: `1..=total_chunks`, the union of
/// all slices covers `[0, file_size)` exactly, and every chunk except the
/// last has exactly `chunk_size` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
    total_chunks: u32,
}

impl ChunkPlan {
    /// Plans the chunk layout for a file of `file_size` bytes.
    ///
    /// A zero-byte file yields exactly one empty chunk, so every file
    /// flows through the same upload pipeline and indices stay dense.
    pub fn new(file_size: u64, chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::ZeroChunkSize);
        }
        let total_chunks = if file_size == 0 {
            1
        } else {
            u32::try_from(file_size.div_ceil(chunk_size)).map_err(|_| {
                TransferError::TooManyChunks {
                    file_size,
                    chunk_size,
                }
            })?
        };
        Ok(Self {
            file_size,
            chunk_size,
            total_chunks,
        })
    }

    /// Total number of chunks, always at least 1.
    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Returns the byte range of the 1-based chunk `index`.
    pub fn slice(&self, index: u32) -> Result<ByteRange, TransferError> {
        if index == 0 || index > self.total_chunks {
            return Err(TransferError::ChunkIndexOutOfRange {
                index,
                total: self.total_chunks,
            });
        }
        let start = u64::from(index - 1) * self.chunk_size;
        let end = (start + self.chunk_size).min(self.file_size);
        Ok(ByteRange { start, end })
    }

    /// Iterates all chunk ranges in index order.
    pub fn slices(&self) -> impl Iterator<Item = ByteRange> + '_ {
        (1..=self.total_chunks).map(|i| self.slice(i).expect("index within planned range"))
    }
}
