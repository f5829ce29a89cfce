//! Lineage identifiers
//!
//! Founders get a short SHA-256 fingerprint of the founding instant and a
//! random nonce. Children concatenate the prefixes of both parents.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Characters kept from a founder fingerprint
pub const LINEAGE_ID_LEN: usize = 8;

/// Characters of each parent id kept in a child id
pub const PARENT_PREFIX_LEN: usize = 4;

/// Fresh lineage id for a founder genome
pub fn founder_lineage_id<R: Rng>(rng: &mut R) -> String {
    let mut hasher = Sha256::new();
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(rng.gen::<u64>().to_le_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(LINEAGE_ID_LEN);
    id
}

/// Lineage id of a child of two parents
pub fn child_lineage_id(parent_a: &str, parent_b: &str) -> String {
    format!("{}_{}", prefix(parent_a), prefix(parent_b))
}

fn prefix(id: &str) -> String {
    id.chars().take(PARENT_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_founder_id_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let id = founder_lineage_id(&mut rng);
        assert_eq!(id.len(), LINEAGE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_founder_ids_differ() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = founder_lineage_id(&mut rng);
        let b = founder_lineage_id(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_child_id() {
        assert_eq!(child_lineage_id("abcdef12", "98765432"), "abcd_9876");
        assert_eq!(child_lineage_id("ab", "çàé"), "ab_çàé");
    }
}
