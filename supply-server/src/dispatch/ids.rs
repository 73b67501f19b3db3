//! Human-facing order and tracking numbers
//!
//! Collisions are possible; the store's unique constraints decide and the
//! workflow retries with fresh numbers.

use rand::Rng;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const ORDER_PREFIX: &str = "ORD-";
pub const TRACKING_PREFIX: &str = "TRK-";
const ORDER_SUFFIX_LEN: usize = 6;
const TRACKING_SUFFIX_LEN: usize = 8;

fn random_code<R: Rng + ?Sized>(rng: &mut R, prefix: &str, len: usize) -> String {
    let mut out = String::with_capacity(prefix.len() + len);
    out.push_str(prefix);
    for _ in 0..len {
        out.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    out
}

/// `ORD-` followed by 6 characters from `[A-Z0-9]`
pub fn generate_order_number() -> String {
    random_code(&mut rand::thread_rng(), ORDER_PREFIX, ORDER_SUFFIX_LEN)
}

/// `TRK-` followed by 8 characters from `[A-Z0-9]`
pub fn generate_tracking_number() -> String {
    random_code(&mut rand::thread_rng(), TRACKING_PREFIX, TRACKING_SUFFIX_LEN)
}

#[cfg(test)]
pub(crate) fn is_order_number(s: &str) -> bool {
    s.strip_prefix(ORDER_PREFIX)
        .is_some_and(|rest| rest.len() == ORDER_SUFFIX_LEN && rest.bytes().all(|b| ALPHABET.contains(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_order_number_format() {
        for _ in 0..200 {
            let n = generate_order_number();
            assert!(is_order_number(&n), "bad order number {n}");
        }
    }

    #[test]
    fn test_tracking_number_format() {
        let n = generate_tracking_number();
        assert_eq!(n.len(), 12);
        assert!(n.starts_with("TRK-"));
        assert!(n[4..].bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = random_code(&mut StdRng::seed_from_u64(7), ORDER_PREFIX, 6);
        let b = random_code(&mut StdRng::seed_from_u64(7), ORDER_PREFIX, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_lowercase() {
        assert!(!is_order_number("ORD-abc123"));
        assert!(!is_order_number("ORD-ABC12"));
    }
}
