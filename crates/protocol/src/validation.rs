use crate::limits::CHECKSUM_HEX_LEN;
use crate::messages::ChunkRequest;

/// Errors from client-side schema validation of outgoing requests.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("chunk index must be 1-based, got {0}")]
    ChunkIndexZero(u32),

    #[error("chunk checksum must be {expected} hex chars, got {actual}")]
    ChecksumLength { expected: usize, actual: usize },

    #[error("chunk checksum is not lowercase hex: {0}")]
    ChecksumNotHex(String),

    #[error("file id must be positive, got {0}")]
    FileId(i64),
}

/// Validates a [`ChunkRequest`] before it is put on the wire.
///
/// The server rejects malformed chunk metadata anyway; checking here
/// surfaces programming errors before any bytes are uploaded.
pub fn validate_chunk_request(req: &ChunkRequest) -> Result<(), ValidationError> {
    if req.file_id <= 0 {
        return Err(ValidationError::FileId(req.file_id));
    }
    if req.chunk_index == 0 {
        return Err(ValidationError::ChunkIndexZero(req.chunk_index));
    }
    if req.chunk_checksum.len() != CHECKSUM_HEX_LEN {
        return Err(ValidationError::ChecksumLength {
            expected: CHECKSUM_HEX_LEN,
            actual: req.chunk_checksum.len(),
        });
    }
    if !req
        .chunk_checksum
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err(ValidationError::ChecksumNotHex(req.chunk_checksum.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ChunkRequest {
        ChunkRequest {
            file_id: 1,
            chunk_index: 1,
            chunk_size: 250,
            chunk_checksum: "0f".repeat(32),
        }
    }

    #[test]
    fn accepts_valid_request() {
        assert!(validate_chunk_request(&valid_request()).is_ok());
    }

    #[test]
    fn rejects_zero_chunk_index() {
        let req = ChunkRequest {
            chunk_index: 0,
            ..valid_request()
        };
        assert!(matches!(
            validate_chunk_request(&req),
            Err(ValidationError::ChunkIndexZero(0))
        ));
    }

    #[test]
    fn rejects_short_checksum() {
        let req = ChunkRequest {
            chunk_checksum: "abc123".into(),
            ..valid_request()
        };
        assert!(matches!(
            validate_chunk_request(&req),
            Err(ValidationError::ChecksumLength { actual: 6, .. })
        ));
    }

    #[test]
    fn rejects_uppercase_checksum() {
        let req = ChunkRequest {
            chunk_checksum: "0F".repeat(32),
            ..valid_request()
        };
        assert!(matches!(
            validate_chunk_request(&req),
            Err(ValidationError::ChecksumNotHex(_))
        ));
    }

    #[test]
    fn rejects_non_positive_file_id() {
        let req = ChunkRequest {
            file_id: 0,
            ..valid_request()
        };
        assert!(matches!(
            validate_chunk_request(&req),
            Err(ValidationError::FileId(0))
        ));
    }

    #[test]
    fn empty_chunk_is_valid_metadata() {
        // Zero-byte files still produce one (empty) chunk.
        let req = ChunkRequest {
            chunk_size: 0,
            ..valid_request()
        };
        assert!(validate_chunk_request(&req).is_ok());
    }
}
