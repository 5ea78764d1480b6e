//! Share-code alphabet, shape check and candidate generation.
//!
//! # Invariants
//! - Codes are exactly `SHARE_CODE_LEN` characters from `[A-Z0-9]`.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

pub const SHARE_CODE_LEN: usize = 6;
pub const SHARE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static SHARE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{6}$").expect("valid share code regex"));

/// Returns whether `value` has the exact shape of a share code.
pub fn is_well_formed(value: &str) -> bool {
    SHARE_CODE_RE.is_match(value)
}

/// Source of candidate share codes.
///
/// Candidates may collide with live codes; the issuer retries on conflict.
pub trait CodeGenerator {
    fn generate(&self) -> String;
}

/// Uniform sampler over the share-code alphabet backed by the thread RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..SHARE_CODE_LEN)
            .map(|_| char::from(SHARE_CODE_ALPHABET[rng.gen_range(0..SHARE_CODE_ALPHABET.len())]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_well_formed, CodeGenerator, RandomCodeGenerator};

    #[test]
    fn generated_codes_are_well_formed() {
        let generator = RandomCodeGenerator;
        for _ in 0..500 {
            let code = generator.generate();
            assert!(is_well_formed(&code), "unexpected code `{code}`");
        }
    }

    #[test]
    fn shape_check_rejects_lowercase_and_wrong_length() {
        assert!(is_well_formed("AB12CD"));
        assert!(!is_well_formed("ab12cd"));
        assert!(!is_well_formed("AB12C"));
        assert!(!is_well_formed("AB12CDE"));
        assert!(!is_well_formed("AB-2CD"));
        assert!(!is_well_formed(" AB12CD"));
    }
}
