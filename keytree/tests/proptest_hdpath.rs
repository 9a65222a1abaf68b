//! Property tests for derivation path parsing and curve helpers.

use keytree::curve::{add_mod_n, parse_scalar, CURVE_ORDER};
use keytree::{ChildIndex, DerivationPath};
use proptest::prelude::*;

fn child_index() -> impl Strategy<Value = ChildIndex> {
    prop_oneof![
        (0u32..0x8000_0000).prop_map(ChildIndex::Normal),
        (0u32..0x8000_0000).prop_map(ChildIndex::Hardened),
    ]
}

proptest! {
    #[test]
    fn display_parse_roundtrip(indices in prop::collection::vec(child_index(), 0..8)) {
        let path = DerivationPath::new(indices);
        let text = path.to_string();
        prop_assert_eq!(text.parse::<DerivationPath>().unwrap(), path.clone());

        // the h marker and a missing prefix parse to the same path
        let alt = text.replace('\'', "h");
        let alt = alt.strip_prefix("m/").unwrap_or(&alt);
        if !path.is_master() {
            prop_assert_eq!(alt.parse::<DerivationPath>().unwrap(), path);
        }
    }

    #[test]
    fn raw_index_roundtrip(raw in any::<u32>()) {
        let index = ChildIndex::from(raw);
        prop_assert_eq!(index.to_u32(), raw);
        prop_assert_eq!(index.is_hardened(), raw >= ChildIndex::HARDENED_OFFSET);
    }

    #[test]
    fn add_mod_n_stays_below_order(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let sum = add_mod_n(&a, &b);
        prop_assert!(sum < CURVE_ORDER);
        prop_assert!(parse_scalar(&sum).is_some());
        prop_assert_eq!(sum, add_mod_n(&b, &a));
    }
}
