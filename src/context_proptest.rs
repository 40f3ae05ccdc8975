//! Property-based tests for the coordination context and the config chain.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::context::Context;
    use crate::include::{ensure_git_config_includes, included_paths, GIT_CONFIG_VAR};
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    // ============================================================================
    // Context::set property tests
    // ============================================================================

    proptest! {
        /// Property: setting the same value twice succeeds and changes nothing
        #[test]
        fn set_is_idempotent(name in "[A-Z_]{1,16}", value in ".*") {
            let mut context = Context::new();
            prop_assert!(context.set(&name, &value).is_ok());
            let before = context.env();
            prop_assert!(context.set(&name, &value).is_ok());
            prop_assert_eq!(context.env(), before);
        }

        /// Property: setting a different value fails and keeps the first
        #[test]
        fn set_conflict_keeps_first(name in "[A-Z_]{1,16}", v1 in ".*", v2 in ".*") {
            prop_assume!(v1 != v2);
            let mut context = Context::new();
            context.set(&name, &v1).unwrap();
            prop_assert!(context.set(&name, &v2).is_err());
            prop_assert_eq!(context.get(&name), Some(v1.as_str()));
        }

        /// Property: env output is sorted regardless of insertion order
        #[test]
        fn env_is_sorted(names in prop::collection::btree_set("[A-Z_]{1,8}", 0..10)) {
            let mut context = Context::new();
            for name in names.iter().rev() {
                context.set(name, "v").unwrap();
            }
            let env = context.env();
            let mut sorted = env.clone();
            sorted.sort();
            prop_assert_eq!(env.len(), names.len());
            prop_assert_eq!(env, sorted);
        }
    }

    // ============================================================================
    // ensure_git_config_includes property tests
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: every path is included exactly once, in first-seen order
        #[test]
        fn chain_includes_each_path_once(
            picks in prop::collection::vec(0usize..4, 1..12)
        ) {
            let candidates = ["/tmp/a", "/tmp/b", "/tmp/c d", "/tmp/e"];
            let scratch = TempDir::new().unwrap();
            let mut context = Context::with_scratch_dir(scratch.path());

            let mut expected: Vec<PathBuf> = Vec::new();
            for pick in &picks {
                let path = Path::new(candidates[*pick]);
                ensure_git_config_includes(path, &mut context).unwrap();
                if !expected.iter().any(|p| p == path) {
                    expected.push(path.to_path_buf());
                }
            }

            let chain = PathBuf::from(context.get(GIT_CONFIG_VAR).unwrap());
            prop_assert_eq!(included_paths(&chain).unwrap(), expected);
        }
    }
}
