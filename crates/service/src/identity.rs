use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes behind each user id (rendered as twice as many hex chars).
pub const ID_BYTES: usize = 6;

/// Source of opaque user identifiers.
///
/// Implementations only promise statistical uniqueness; `UserStore` checks
/// each candidate against its collection and asks again on collision.
pub trait IdentifierGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws `ID_BYTES` from the OS CSPRNG and hex-encodes them.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomHexGenerator;

impl IdentifierGenerator for RandomHexGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_twelve_lowercase_hex_chars() {
        let id = RandomHexGenerator.generate();
        assert_eq!(id.len(), ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn consecutive_ids_differ() {
        let g = RandomHexGenerator;
        assert_ne!(g.generate(), g.generate());
    }
}
