//! Content-addressed fingerprints for evidence files.

use crate::{error::MindseyeError, properties::ContentFingerprint};
use sha2::{Digest, Sha256};
use std::{
    fs::File,
    io::{ErrorKind, Read},
    path::Path,
};

/// Read size used when streaming a file through the digest.
pub const CHUNK_SIZE: usize = 4096;

/// SHA-256 fingerprint of an in-memory byte slice.
pub fn fingerprint_bytes(bytes: &[u8]) -> ContentFingerprint {
    ContentFingerprint::from_digest(&Sha256::digest(bytes))
}

/// Stream any reader through SHA-256 in [`CHUNK_SIZE`] chunks.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> Result<ContentFingerprint, MindseyeError> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..read]);
    }
    Ok(ContentFingerprint::from_digest(&hasher.finalize()))
}

/// Fingerprint a file on disk without loading it whole.
///
/// A file that cannot be opened or read is returned as an error; the caller reports it and leaves
/// the file unlogged so the next run retries it.
pub fn fingerprint_file<P: AsRef<Path>>(path: P) -> Result<ContentFingerprint, MindseyeError> {
    let file = File::open(path.as_ref())?;
    fingerprint_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;
    use test_log::test;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            fingerprint_bytes(b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            fingerprint_bytes(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot_across_chunk_boundaries() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let streamed = fingerprint_reader(Cursor::new(&data)).unwrap();
        assert_eq!(streamed, fingerprint_bytes(&data));
        assert_eq!(streamed.as_str().len(), ContentFingerprint::HEX_LEN);
    }

    #[test]
    fn test_file_fingerprint_is_deterministic() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "same bytes").unwrap();
        std::fs::write(&b, "same bytes").unwrap();

        let fa = fingerprint_file(&a).unwrap();
        assert_eq!(fa, fingerprint_file(&a).unwrap());
        assert_eq!(fa, fingerprint_file(&b).unwrap());

        std::fs::write(&b, "same bytez").unwrap();
        assert_ne!(fa, fingerprint_file(&b).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let res = fingerprint_file(dir.path().join("nope.txt"));
        assert!(matches!(res, Err(MindseyeError::NotFound(_))));
    }

    mod props {
        use super::super::{fingerprint_bytes, fingerprint_reader};
        use proptest::prelude::*;
        use std::io::Cursor;

        proptest! {
            #[test]
            fn single_byte_change_changes_fingerprint(
                data in proptest::collection::vec(any::<u8>(), 1..2048),
                idx in any::<prop::sample::Index>(),
                delta in 1u8..=255,
            ) {
                let mut changed = data.clone();
                let i = idx.index(changed.len());
                changed[i] = changed[i].wrapping_add(delta);
                prop_assert_ne!(fingerprint_bytes(&data), fingerprint_bytes(&changed));
                prop_assert_eq!(
                    fingerprint_reader(Cursor::new(&data)).unwrap(),
                    fingerprint_bytes(&data)
                );
            }
        }
    }
}
