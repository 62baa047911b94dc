//! # Content Digest
//!
//! SHA-256 digests of chart archives, rendered as lowercase hex. The digest
//! is recorded in each index entry so clients can verify downloads.

use std::io::{self, Read};

use sha2::{Digest, Sha256};

use crate::error::DigestError;

/// Compute the lowercase hex SHA-256 digest of everything `reader` yields.
///
/// Fails only if the reader fails; in-memory readers never do.
pub fn digest(mut reader: impl Read) -> Result<String, DigestError> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(to_hex(&hasher.finalize()))
}

/// Digest an in-memory buffer.
pub fn digest_bytes(content: &[u8]) -> Result<String, DigestError> {
    digest(content)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn known_sha256_vector() {
        assert_eq!(
            digest_bytes(b"").unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_bytes(b"abc").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn stream_and_buffer_agree() {
        let content = vec![7u8; 20_000];
        let streamed = digest(std::io::Cursor::new(&content)).unwrap();
        assert_eq!(streamed, digest_bytes(&content).unwrap());
        assert_eq!(streamed.len(), 64);
    }

    #[test]
    fn reader_failure_is_digest_error() {
        let err = digest(FailingReader).unwrap_err();
        assert!(err.to_string().contains("gone"));
    }
}
