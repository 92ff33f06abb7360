use nanoid::nanoid;

use crate::types::UserId;

/// Canonical alphabet for user identifiers (no ambiguous glyphs).
const USER_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
/// Default user id length.
const USER_ID_LENGTH: usize = 20;

/// Generates a fresh user identifier.
pub fn generate_user_id() -> UserId {
    UserId::new(nanoid!(USER_ID_LENGTH, USER_ID_ALPHABET))
}
