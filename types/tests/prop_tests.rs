use proptest::prelude::*;

use snowfall_types::{BlockId, Status, Timestamp};

proptest! {
    /// BlockId roundtrip: new -> as_bytes produces the same bytes.
    #[test]
    fn block_id_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = BlockId::new(bytes);
        prop_assert_eq!(id.as_bytes(), &bytes);
    }

    /// BlockId::is_zero is true only for all-zero bytes.
    #[test]
    fn block_id_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let id = BlockId::new(bytes);
        prop_assert_eq!(id.is_zero(), bytes == [0u8; 32]);
    }

    /// Byte order and bit order agree: the first differing bit decides `<`.
    #[test]
    fn first_difference_matches_ordering(
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        let a = BlockId::new(a);
        let b = BlockId::new(b);
        match a.first_difference(0, BlockId::NUM_BITS, &b) {
            None => prop_assert_eq!(a, b),
            Some(i) => {
                prop_assert!(a.equal_subset(0, i, &b));
                prop_assert_eq!(a < b, a.bit(i) == 0);
            }
        }
    }

    /// BlockId bincode serialization roundtrip.
    #[test]
    fn block_id_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = BlockId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: BlockId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.elapsed_since(Timestamp::new(base + offset)), offset);
        prop_assert_eq!(Timestamp::new(base + offset + 1).elapsed_since(t), 0);
    }
}

#[test]
fn only_terminal_statuses_are_decided() {
    assert!(!Status::Processing.is_decided());
    assert!(Status::Accepted.is_decided());
    assert!(Status::Rejected.is_decided());
    assert_eq!(Status::default(), Status::Processing);
}
