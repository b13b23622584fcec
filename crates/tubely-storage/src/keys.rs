//! Object key generation.
//!
//! Key format: `{orientation}/{id}{extension}`, e.g. `landscape/Zk3...Q.mp4`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use tubely_core::constants::OBJECT_ID_BYTES;
use tubely_core::Orientation;

/// 32 random bytes from the thread-local CSPRNG, unpadded base64url.
pub fn random_object_id() -> String {
    let mut bytes = [0u8; OBJECT_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a fresh key for an object of the given orientation.
///
/// `extension` includes the leading dot.
pub fn generate_object_key(orientation: Orientation, extension: &str) -> String {
    format!("{}/{}{}", orientation.as_str(), random_object_id(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn object_id_is_unpadded_base64url() {
        let id = random_object_id();
        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(id.len(), 43);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn key_is_namespaced_by_orientation() {
        let key = generate_object_key(Orientation::Landscape, ".mp4");
        assert!(key.starts_with("landscape/"));
        assert!(key.ends_with(".mp4"));
        assert_eq!(key.len(), "landscape/".len() + 43 + ".mp4".len());

        assert!(generate_object_key(Orientation::Portrait, ".mp4").starts_with("portrait/"));
        assert!(generate_object_key(Orientation::Other, ".mp4").starts_with("other/"));
    }

    #[test]
    fn keys_do_not_repeat() {
        let keys: HashSet<String> = (0..1000)
            .map(|_| generate_object_key(Orientation::Other, ".mp4"))
            .collect();
        assert_eq!(keys.len(), 1000);
    }
}
