//! Random identifiers

use rand::Rng;

const CHARACTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random string of `length` characters from `[a-z0-9]`.
pub fn generate_random(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(CHARACTERS[rng.gen_range(0..CHARACTERS.len())]))
        .collect()
}

/// Random (version 4) UUID in hyphenated lowercase form.
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
