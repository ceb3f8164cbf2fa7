//! Transfer code generation and validation

use rand::rngs::OsRng;
use rand::Rng;

use crate::{Error, Result};

/// Word list for transfer codes. Distinct from the SAS list; codes identify
/// a session on the LAN, they are not a secret.
const CODE_WORDS: &[&str] = &[
    "apple", "banana", "carrot", "dog", "elephant", "frog", "grape", "hat", "ice", "jungle",
    "kite", "lemon", "moon", "ninja", "orange", "pencil", "queen", "robot", "snake", "tiger",
    "unicorn", "violet", "whale", "xylophone", "yacht", "zebra",
];

/// Create a memorable, hyphen-joined multi-word code using the OS CSPRNG.
pub fn generate(word_count: usize) -> String {
    let mut rng = OsRng;
    (0..word_count)
        .map(|_| CODE_WORDS[rng.gen_range(0..CODE_WORDS.len())])
        .collect::<Vec<_>>()
        .join("-")
}

/// Check the shape of a user-supplied code before spending five seconds
/// browsing the network for it.
pub fn validate(code: &str) -> Result<()> {
    let well_formed = !code.is_empty()
        && code
            .split('-')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()));

    if !well_formed {
        return Err(Error::InvalidInput(format!(
            "malformed transfer code: {:?}",
            code
        )));
    }
    Ok(())
}
