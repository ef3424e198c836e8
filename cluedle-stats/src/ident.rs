//! Anonymous player identifier generation and format validation
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// Accepted identifier shape everywhere one crosses a boundary (storage,
/// query parameter, request body).
static PLAYER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z0-9-]{1,50}$").expect("player id pattern is valid"));

const SEGMENT_LEN: usize = 9;
const SEGMENT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh opaque player identifier: a base-36 millisecond
/// timestamp prefix plus two random alphanumeric segments.
///
/// The caller supplies the clock reading and the rng so generation stays
/// deterministic under test. The result always satisfies
/// [`is_valid_player_id`].
pub fn generate_player_id<R: Rng>(now_millis: u64, rng: &mut R) -> String {
    format!(
        "{}-{}-{}",
        to_base36(now_millis),
        random_segment(rng),
        random_segment(rng)
    )
}

/// Check an identifier against `^[A-Za-z0-9-]{1,50}$`. Violations are
/// rejected at the boundary before touching storage or the network.
#[must_use]
pub fn is_valid_player_id(value: &str) -> bool {
    PLAYER_ID_RE.is_match(value)
}

fn random_segment<R: Rng>(rng: &mut R) -> String {
    (0..SEGMENT_LEN)
        .map(|_| SEGMENT_ALPHABET[rng.gen_range(0..SEGMENT_ALPHABET.len())] as char)
        .collect()
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(SEGMENT_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
