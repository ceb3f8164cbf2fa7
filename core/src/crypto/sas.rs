//! Short authentication string generation

use sha2::{Digest, Sha256};

use crate::crypto::SessionKey;

/// Word list for the SAS. Short, unambiguous nouns; must stay byte-identical
/// on both peers or matching strings become meaningless.
const SAS_WORDS: &[&str] = &[
    "apple", "bird", "book", "bow", "cat", "cloud", "coin", "cup", "dog", "door", "duck", "fan",
    "fish", "fox", "grape", "hat", "heart", "house", "ice", "jar", "key", "kite", "leaf", "lion",
    "moon", "mouse", "nest", "net", "orange", "pen", "pig", "pipe", "queen", "rain", "ring",
    "robot", "rock", "ship", "shoe", "star", "sun", "tree", "tulip", "van", "vest", "vine",
    "watch", "web", "wheel", "wolf", "yacht", "yarn", "zebra",
];

/// Map the session key to a hyphen-joined string of `word_count` words.
///
/// Both peers compute this independently and compare out of band; the
/// strings agree exactly when the derived session keys agree. An active
/// man-in-the-middle who terminated two separate handshakes would have to
/// guess the full key to make both sides match.
pub fn generate_sas(key: &SessionKey, word_count: usize) -> String {
    let digest = Sha256::digest(key.as_bytes());

    digest
        .iter()
        .take(word_count)
        .map(|byte| SAS_WORDS[*byte as usize % SAS_WORDS.len()])
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::{KEY_SIZE, SAS_WORD_COUNT};

    #[test]
    fn test_sas_deterministic() {
        let key = SessionKey::from_bytes([0x42; KEY_SIZE]);
        let a = generate_sas(&key, SAS_WORD_COUNT);
        let b = generate_sas(&key, SAS_WORD_COUNT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sas_shape() {
        let key = SessionKey::from_bytes([0x42; KEY_SIZE]);
        let sas = generate_sas(&key, SAS_WORD_COUNT);

        let words: Vec<&str> = sas.split('-').collect();
        assert_eq!(words.len(), SAS_WORD_COUNT);
        for word in words {
            assert!(SAS_WORDS.contains(&word));
        }
    }

    #[test]
    fn test_equal_keys_equal_sas() {
        let a = SessionKey::from_bytes([9u8; KEY_SIZE]);
        let b = SessionKey::from_bytes([9u8; KEY_SIZE]);
        assert_eq!(generate_sas(&a, 3), generate_sas(&b, 3));
    }

    #[test]
    fn test_word_count_respected() {
        let key = SessionKey::from_bytes([1u8; KEY_SIZE]);
        assert_eq!(generate_sas(&key, 1).split('-').count(), 1);
        assert_eq!(generate_sas(&key, 5).split('-').count(), 5);
    }
}
