use rand::Rng;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of every generated link and message id.
pub const ID_LENGTH: usize = 13;

/// Generate a short base-36 identifier from the thread-local PRNG.
///
/// Not collision-checked and not suitable as a secret.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
