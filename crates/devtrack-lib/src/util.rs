//! Record ID generation.
//!
//! IDs look like `<prefix>-<hash>`: the prefix is the lowercased project key
//! for issues and `prj` for projects, the hash is base36 SHA-256 output
//! whose length grows with the collection size.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

pub const PROJECT_ID_PREFIX: &str = "prj";

const MIN_HASH_LENGTH: usize = 4;
const MAX_HASH_LENGTH: usize = 8;
const FALLBACK_HASH_LENGTH: usize = 12;

/// Generate a record ID that `exists` reports as free.
pub fn generate_id<F>(
    prefix: &str,
    title: &str,
    creator: &str,
    created_at: DateTime<Utc>,
    record_count: usize,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut length = optimal_hash_length(record_count);

    while length <= MAX_HASH_LENGTH {
        for nonce in 0..10 {
            let seed = id_seed(title, creator, created_at, nonce);
            let id = format!("{prefix}-{}", hash_base36(&seed, length));
            if !exists(&id) {
                return id;
            }
        }
        length += 1;
    }

    let mut nonce = 10u32;
    loop {
        let seed = id_seed(title, creator, created_at, nonce);
        let id = format!("{prefix}-{}", hash_base36(&seed, FALLBACK_HASH_LENGTH));
        if !exists(&id) {
            return id;
        }
        nonce += 1;
    }
}

/// Shortest hash length keeping the birthday collision odds under 25%.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn optimal_hash_length(record_count: usize) -> usize {
    let n = record_count as f64;
    for len in MIN_HASH_LENGTH..=MAX_HASH_LENGTH {
        let space = 36_f64.powi(len as i32);
        let prob = 1.0 - (-n * n / (2.0 * space)).exp();
        if prob < 0.25 {
            return len;
        }
    }
    MAX_HASH_LENGTH
}

fn id_seed(title: &str, creator: &str, created_at: DateTime<Utc>, nonce: u32) -> String {
    format!(
        "{}|{}|{}|{}",
        title,
        creator,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

fn hash_base36(input: &str, length: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());

    let mut num = 0u64;
    for &byte in digest.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let encoded = base36_encode(num);
    let padded = format!("{encoded:0>length$}");
    padded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("trk", "Crash on save", "olga", Utc::now(), 0, |_| false);
        assert!(id.starts_with("trk-"));
        assert_eq!(id.len(), "trk-".len() + MIN_HASH_LENGTH);
        assert!(id[4..].chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_id_avoids_taken_ids() {
        let now = Utc::now();
        let mut taken = HashSet::new();
        for _ in 0..25 {
            let id = generate_id("trk", "Same title", "olga", now, taken.len(), |id| {
                taken.contains(id)
            });
            assert!(taken.insert(id));
        }
    }

    #[test]
    fn test_hash_length_grows_with_count() {
        assert_eq!(optimal_hash_length(0), MIN_HASH_LENGTH);
        assert!(optimal_hash_length(100_000) > MIN_HASH_LENGTH);
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36_encode(0), "0");
        assert_eq!(base36_encode(35), "z");
        assert_eq!(base36_encode(36), "10");
    }
}
