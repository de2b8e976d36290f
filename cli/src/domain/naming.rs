//! Collision-free resource names for parallel runs.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of ids returned by [`unique_id`].
pub const UNIQUE_ID_LEN: usize = 6;

/// Short random lowercase base-36 id, e.g. `"k3x9qa"`.
///
/// Entropy sources: nanosecond timestamp and two independent `RandomState` hashes.
#[must_use]
pub fn unique_id() -> String {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.write_u64(RandomState::new().build_hasher().finish());

    let mut n = hasher.finish();
    let mut out = String::with_capacity(UNIQUE_ID_LEN);
    for _ in 0..UNIQUE_ID_LEN {
        out.push(char::from(BASE36[(n % 36) as usize]));
        n /= 36;
    }
    out
}

/// `"{prefix}-{unique_id}"`, e.g. `"test-cert-vault-k3x9qa"`.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", unique_id())
}
