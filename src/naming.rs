//! Derivation of target-language identifiers from arbitrary strings.

const ADLER_MOD: u32 = 65521;

/// Adler-32 checksum, used as a short, stable disambiguation suffix.
pub fn adler32(bytes: &[u8]) -> u32 {
    let (mut a, mut b) = (1u32, 0u32);
    // 5552 is the largest chunk for which `b` cannot overflow before the modulo.
    for chunk in bytes.chunks(5552) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= ADLER_MOD;
        b %= ADLER_MOD;
    }
    (b << 16) | a
}

/// Replaces everything except ASCII letters, digits and underscores with
/// underscores, so the result can be used as an identifier.
///
/// A checksum suffix is appended whenever a replacement was made, or when the
/// input already ends like a checksum; otherwise `to_identifier(x)` and
/// `to_identifier(to_identifier(x))` could collide.
pub fn to_identifier(input: &str) -> String {
    let mut safe: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.starts_with(|c: char| c.is_ascii_digit()) {
        safe.insert(0, '_');
    }
    if safe == input && !ends_with_checksum(input) {
        return safe;
    }
    format!("{}_{}", safe, adler32(input.as_bytes()))
}

fn ends_with_checksum(s: &str) -> bool {
    let trimmed = s.trim_end_matches(|c: char| c.is_ascii_digit());
    trimmed.len() < s.len() && trimmed.ends_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adler32_matches_reference_values() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn clean_names_are_kept() {
        assert_eq!(to_identifier("scenario1"), "scenario1");
        assert_eq!(to_identifier("_private"), "_private");
    }

    #[test]
    fn unsafe_characters_are_replaced_and_suffixed() {
        let id = to_identifier("www.example.com");
        assert!(id.starts_with("www_example_com_"));
        assert_ne!(id, to_identifier("www_example_com"));
    }

    #[test]
    fn leading_digit_gets_prefixed() {
        assert!(to_identifier("1abc").starts_with("_1abc_"));
    }

    #[test]
    fn identifiers_do_not_collide_with_their_own_output() {
        let once = to_identifier("a-b");
        let twice = to_identifier(&once);
        assert_ne!(once, twice);
    }
}
