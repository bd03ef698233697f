//! Property-based tests for synthesized builders
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use fauxbuild::demo::Example;
use fauxbuild::{BuilderError, Value};
use proptest::prelude::*;

// =============================================================================
// Slot store properties
// =============================================================================

proptest! {
    /// Property: a reader answers the last value written to its slot
    #[test]
    fn last_write_wins(writes in prop::collection::vec(any::<i32>(), 1..32)) {
        let mut builder = Example::builder("X").unwrap();
        for value in &writes {
            builder.write("optional1", *value).unwrap();
        }
        prop_assert_eq!(builder.get::<i32>("optional1").unwrap(), *writes.last().unwrap());
        prop_assert_eq!(builder.slots().len(), 1);
    }

    /// Property: interleaved writes to different slots do not interfere
    #[test]
    fn slots_are_independent(
        ints in prop::collection::vec(any::<i32>(), 0..16),
        chars in prop::collection::vec(any::<char>(), 0..16),
    ) {
        let mut builder = Example::builder("X").unwrap();
        for pair in ints.iter().zip(chars.iter()) {
            builder.write("optional1", *pair.0).unwrap().write("optional2", *pair.1).unwrap();
        }
        for value in ints.iter().skip(chars.len()) {
            builder.write("optional1", *value).unwrap();
        }
        for value in chars.iter().skip(ints.len()) {
            builder.write("optional2", *value).unwrap();
        }

        let example = builder.build().unwrap();
        prop_assert_eq!(example.optional1(), ints.last().copied().unwrap_or(0));
        prop_assert_eq!(example.optional2(), chars.last().copied().unwrap_or('\0'));
        prop_assert_eq!(example.mandatory(), "X");
    }

    /// Property: every writer call hands back the builder it was called on
    #[test]
    fn writers_chain_to_self(value in any::<i32>()) {
        let mut builder = Example::builder("X").unwrap();
        let before: *const _ = &builder;
        let chained = builder.write("optional1", value).unwrap();
        prop_assert!(std::ptr::eq(before, chained));
    }

    /// Property: builders with identical slots are still distinct
    #[test]
    fn identity_ignores_slots(value in any::<i32>()) {
        let mut a = Example::builder("X").unwrap();
        let mut b = Example::builder("X").unwrap();
        a.write("optional1", value).unwrap();
        b.write("optional1", value).unwrap();
        prop_assert_ne!(&a, &b);
        prop_assert_eq!(&a, &a);
    }
}

// =============================================================================
// Dispatch robustness
// =============================================================================

proptest! {
    /// Property: any operation name either dispatches or fails naming itself, never panics
    #[test]
    fn arbitrary_operations_fail_cleanly(name in "[a-z_0-9]{0,16}", arity in 0usize..3) {
        let mut builder = Example::builder("X").unwrap();
        match builder.dispatch(&name, vec![Value::Int(1); arity]) {
            Ok(_) => prop_assert!(name == "optional1" || name == "optional2" || name == "build"),
            Err(BuilderError::UnclassifiedOperation { operation, .. }) => prop_assert_eq!(operation, name),
            Err(BuilderError::ArgumentType { operation, .. }) => prop_assert_eq!(operation, "optional2"),
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }
}
