//! Build matrix configuration and expansion
//!
//! The matrix is the cartesian product of packages and platforms. Platforms
//! in `skip_platforms` stay in the matrix (so the full size can be reported)
//! but are split off before scheduling and never reach a worker.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::defaults;
use crate::core::artifact::{bool_or_name, ArchiveFormat, HashAlgorithm};
use crate::core::job::{JobIdentity, ResolvedJobSpec};
use crate::core::platform::Platform;
use crate::core::template::OutputTemplate;

/// The full build request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMatrixConfig {
    /// Package selectors (import paths, relative paths, `./...`)
    #[serde(default, deserialize_with = "one_or_many")]
    pub package: Vec<String>,

    /// Target operating systems
    #[serde(default, deserialize_with = "one_or_many")]
    pub os: Vec<String>,

    /// Target architectures
    #[serde(default, deserialize_with = "one_or_many")]
    pub arch: Vec<String>,

    /// Platforms to leave out of the build
    #[serde(default)]
    pub skip_platforms: Vec<Platform>,

    /// Artifact naming template
    #[serde(default)]
    pub output_template: Option<String>,

    /// Directory artifacts are written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Linker flags for every platform
    #[serde(default)]
    pub ldflags: Option<String>,

    /// Per-platform linker flags, replacing `ldflags`
    #[serde(default)]
    pub platform_ldflags: HashMap<Platform, String>,

    /// Compiler flags for every platform
    #[serde(default)]
    pub gcflags: Option<String>,

    /// Per-platform compiler flags, replacing `gcflags`
    #[serde(default)]
    pub platform_gcflags: HashMap<Platform, String>,

    /// Assembler flags for every platform
    #[serde(default)]
    pub asmflags: Option<String>,

    /// Per-platform assembler flags, replacing `asmflags`
    #[serde(default)]
    pub platform_asmflags: HashMap<Platform, String>,

    /// Build tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Module download mode
    #[serde(default, rename = "mod")]
    pub mod_mode: Option<String>,

    /// Force rebuilding of packages
    #[serde(default)]
    pub rebuild: bool,

    /// Enable the race detector
    #[serde(default)]
    pub race: bool,

    /// Build with cgo enabled
    #[serde(default)]
    pub cgo: bool,

    /// Maximum number of concurrently executing builds
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Write a `<artifact>.<algorithm>` checksum next to each artifact
    #[serde(default, deserialize_with = "bool_or_name")]
    pub shasum: Option<HashAlgorithm>,

    /// Write an archive of each artifact
    #[serde(default, deserialize_with = "bool_or_name")]
    pub archive: Option<ArchiveFormat>,
}

/// Accept either `"value"` or `["a", "b"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    match OneOrMany::deserialize(deserializer) {
        Ok(OneOrMany::One(value)) => Ok(vec![value]),
        Ok(OneOrMany::Many(values)) => Ok(values),
        Err(_) => Err(serde::de::Error::custom(
            "must be either a string or a list of strings",
        )),
    }
}

/// Jobs split by whether they will be dispatched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedMatrix {
    /// Every job before skip filtering, in scheduling order
    pub jobs: Vec<JobIdentity>,
    /// Jobs to hand to workers, in scheduling order
    pub scheduled: Vec<JobIdentity>,
    /// Jobs filtered out by the skip list, in scheduling order
    pub skipped: Vec<JobIdentity>,
}

impl ExpandedMatrix {
    /// Size of the matrix before skip filtering
    pub fn total(&self) -> usize {
        self.jobs.len()
    }
}

impl BuildMatrixConfig {
    /// Package selectors, defaulting to the current directory
    pub fn packages(&self) -> Vec<String> {
        if self.package.is_empty() {
            vec![defaults::DEFAULT_PACKAGE.to_string()]
        } else {
            unique(&self.package)
        }
    }

    /// Platforms in the matrix, including skipped ones
    ///
    /// An empty OS or arch list is replaced by the host's value before
    /// the product is taken.
    pub fn platforms(&self) -> Vec<Platform> {
        let host = Platform::host();
        let oses = if self.os.is_empty() {
            vec![host.os.clone()]
        } else {
            unique(&self.os)
        };
        let arches = if self.arch.is_empty() {
            vec![host.arch]
        } else {
            unique(&self.arch)
        };

        oses.iter()
            .flat_map(|os| arches.iter().map(move |arch| Platform::new(os, arch)))
            .collect()
    }

    /// Whether a platform is on the skip list
    pub fn is_skipped(&self, platform: &Platform) -> bool {
        self.skip_platforms.contains(platform)
    }

    /// Expand resolved packages against the configured platforms
    pub fn expand(&self, packages: &[String]) -> ExpandedMatrix {
        expand_matrix(packages, &self.platforms(), &self.skip_platforms)
    }

    /// Output naming template text, defaulting when unset
    pub fn output_template(&self) -> &str {
        self.output_template
            .as_deref()
            .unwrap_or(defaults::DEFAULT_OUTPUT_TEMPLATE)
    }

    /// Output directory, defaulting when unset
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_OUTPUT_DIR))
    }

    /// Effective parallelism for a number of dispatched jobs
    pub fn parallelism(&self, scheduled_jobs: usize) -> usize {
        let configured = match self.parallelism {
            Some(n) if n > 0 => n,
            _ => defaults::DEFAULT_PARALLELISM,
        };
        configured.min(scheduled_jobs)
    }

    /// Resolve the build invocation for one job
    pub fn resolve(
        &self,
        id: &JobIdentity,
        template: &OutputTemplate,
        output_dir: &Path,
    ) -> ResolvedJobSpec {
        let mut name = template.render(id.package_dir(), &id.platform);
        if id.platform.is_windows() {
            name.push_str(".exe");
        }

        ResolvedJobSpec {
            id: id.clone(),
            output: output_dir.join(name),
            ldflags: value_or_override(
                self.ldflags.as_deref(),
                &self.platform_ldflags,
                &id.platform,
            ),
            gcflags: value_or_override(
                self.gcflags.as_deref(),
                &self.platform_gcflags,
                &id.platform,
            ),
            asmflags: value_or_override(
                self.asmflags.as_deref(),
                &self.platform_asmflags,
                &id.platform,
            ),
            tags: self.tags.clone(),
            mod_mode: self.mod_mode.clone().filter(|m| !m.is_empty()),
            rebuild: self.rebuild,
            race: self.race,
            cgo: self.cgo,
        }
    }
}

fn value_or_override(
    value: Option<&str>,
    overrides: &HashMap<Platform, String>,
    platform: &Platform,
) -> Option<String> {
    overrides
        .get(platform)
        .map(String::as_str)
        .or(value)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Cartesian product of packages and platforms, split by the skip list
///
/// Order is package-major. Repeated packages or platforms collapse onto
/// their first occurrence, so every job identity appears once. The skip
/// list matches exact platforms and applies to every package alike.
pub fn expand_matrix(
    packages: &[String],
    platforms: &[Platform],
    skip: &[Platform],
) -> ExpandedMatrix {
    let platforms = unique(platforms);
    let mut matrix = ExpandedMatrix::default();
    for package in unique(packages) {
        for platform in &platforms {
            let id = JobIdentity::new(platform.clone(), package.clone());
            if skip.contains(platform) {
                matrix.skipped.push(id.clone());
            } else {
                matrix.scheduled.push(id.clone());
            }
            matrix.jobs.push(id);
        }
    }
    matrix
}

/// Values in first-seen order with repeats dropped
fn unique<T: Clone + Eq + Hash>(values: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect()
}
