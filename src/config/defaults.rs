//! Default configuration values

/// Default output naming template
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "{{.Dir}}-{{.OS}}-{{.Arch}}";

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Package selector used when none is configured
pub const DEFAULT_PACKAGE: &str = ".";

/// Default number of concurrently executing builds
pub const DEFAULT_PARALLELISM: usize = 1;

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gocross.toml";

/// Width the platform column is right-aligned to
pub const PLATFORM_COLUMN_WIDTH: usize = 15;

/// Reason shown for jobs filtered by `skip_platforms`
pub const SKIP_LIST_REASON: &str = "included in skip_platforms";

/// Reason shown for jobs the toolchain cannot target
pub const UNSUPPORTED_PLATFORM_REASON: &str = "unsupported platform";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
