use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::{LazyLock, Mutex, PoisonError};

/// Custom slugs are 3-8 ASCII letters or digits.
static CUSTOM_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{3,8}$").expect("custom slug pattern is valid"));

/// Check a caller-supplied slug against the custom slug rules.
pub fn is_valid_custom_slug(slug: &str) -> bool {
    CUSTOM_SLUG.is_match(slug)
}

/// Random short code generator.
///
/// Draws uniformly from the 62-symbol alphanumeric alphabet. Not suitable for
/// secrets; collisions are resolved by the allocator's retry loop.
pub struct SlugGenerator {
    rng: Mutex<StdRng>,
}

impl SlugGenerator {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic generator: equal seeds produce equal sequences.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Produce a code of exactly `length` alphanumeric characters.
    pub fn generate(&self, length: usize) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (&mut *rng)
            .sample_iter(Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }
}

impl Default for SlugGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_length_and_alphabet() {
        let generator = SlugGenerator::from_entropy();
        for length in [3, 6, 10] {
            let code = generator.generate(length);
            assert_eq!(code.len(), length);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = SlugGenerator::seeded(42);
        let b = SlugGenerator::seeded(42);
        for _ in 0..5 {
            assert_eq!(a.generate(6), b.generate(6));
        }
    }

    #[test]
    fn test_alphabet_coverage() {
        // 6200 draws over 62 symbols reaches every one with overwhelming probability.
        let generator = SlugGenerator::seeded(7);
        let seen: HashSet<char> = generator.generate(6200).chars().collect();
        assert_eq!(seen.len(), 62);
    }

    #[test]
    fn test_custom_slug_rules() {
        assert!(is_valid_custom_slug("abc"));
        assert!(is_valid_custom_slug("abc123"));
        assert!(is_valid_custom_slug("ABCdef12"));

        assert!(!is_valid_custom_slug("ab"));
        assert!(!is_valid_custom_slug("abcdefghi"));
        assert!(!is_valid_custom_slug("abc-12"));
        assert!(!is_valid_custom_slug("abc_12"));
        assert!(!is_valid_custom_slug("ünï"));
        assert!(!is_valid_custom_slug(""));
    }
}
