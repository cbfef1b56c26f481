//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::platform::Platform;

    /// Generate a Go import path like `example.com/abc/cmd/tool`
    pub fn import_path() -> impl Strategy<Value = String> {
        ("[a-z]{2,8}", proptest::collection::vec("[a-z][a-z0-9_]{0,8}", 1..4))
            .prop_map(|(host, parts)| format!("{host}.com/{}", parts.join("/")))
    }

    /// Generate a platform from common GOOS/GOARCH values
    pub fn platform() -> impl Strategy<Value = Platform> {
        (
            prop_oneof![
                Just("linux"),
                Just("darwin"),
                Just("windows"),
                Just("freebsd"),
                Just("android"),
            ],
            prop_oneof![
                Just("amd64"),
                Just("arm64"),
                Just("386"),
                Just("arm"),
                Just("riscv64"),
            ],
        )
            .prop_map(|(os, arch)| Platform::new(os, arch))
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_import_path_generator(path in import_path()) {
            prop_assert!(path.contains(".com/"));
            prop_assert!(!path.ends_with('/'));
        }

        #[test]
        fn test_platform_generator_round_trips_text(platform in platform()) {
            let parsed: crate::core::platform::Platform = platform.to_string().parse().unwrap();
            prop_assert_eq!(parsed, platform);
        }
    }
}
