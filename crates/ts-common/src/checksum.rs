//! MD5 digests for downloaded timetable files
//!
//! The upstream portal publishes no checksums, so the crawler compares the
//! digest of a fresh download against the stored copy to skip rewrites.
//! The server reuses the digest as the `ETag` of a stored file.

/// Hex-encoded MD5 digest of a byte slice
pub fn digest(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

/// Whether two payloads have the same digest
pub fn same_content(existing: &[u8], incoming: &[u8]) -> bool {
    digest(existing) == digest(incoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_value() {
        assert_eq!(digest(b"hello world"), "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(digest(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_same_content() {
        assert!(same_content(b"{\"TrainInfos\":[]}", b"{\"TrainInfos\":[]}"));
        assert!(!same_content(b"{\"TrainInfos\":[]}", b"{}"));
    }
}
