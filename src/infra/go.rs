//! Go toolchain invocation
//!
//! Implements [`JobExecutor`] and [`PackageResolver`] on top of the `go`
//! binary found on `PATH`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::executor::{JobExecutor, PackageResolver};
use crate::core::job::ResolvedJobSpec;
use crate::error::{ConfigError, ExecError};

/// Go toolchain wrapper
#[derive(Debug, Clone)]
pub struct GoToolchain {
    /// Path to the go binary
    go_path: PathBuf,
    /// Directory of the Go module being built
    module_dir: PathBuf,
}

impl GoToolchain {
    /// Create a toolchain wrapper for an explicit go binary
    pub fn new(go_path: PathBuf, module_dir: PathBuf) -> Self {
        Self {
            go_path,
            module_dir,
        }
    }

    /// Locate `go` on `PATH`
    pub fn detect(module_dir: &Path) -> Result<Self, ConfigError> {
        let go_path = which::which("go").map_err(|e| ConfigError::ToolchainNotFound {
            error: e.to_string(),
        })?;
        tracing::debug!("Using go toolchain at {}", go_path.display());
        Ok(Self::new(go_path, module_dir.to_path_buf()))
    }

    /// The `go build` invocation for one job
    pub fn build_command(&self, spec: &ResolvedJobSpec) -> Command {
        let mut cmd = Command::new(&self.go_path);
        cmd.arg("build").arg("-o").arg(&spec.output);

        if spec.rebuild {
            cmd.arg("-a");
        }
        if let Some(ref mode) = spec.mod_mode {
            cmd.arg("-mod").arg(mode);
        }
        if spec.race {
            cmd.arg("-race");
        }
        if !spec.tags.is_empty() {
            cmd.arg("-tags").arg(spec.tags.join(","));
        }
        if let Some(ref flags) = spec.ldflags {
            cmd.arg("-ldflags").arg(flags);
        }
        if let Some(ref flags) = spec.gcflags {
            cmd.arg("-gcflags").arg(flags);
        }
        if let Some(ref flags) = spec.asmflags {
            cmd.arg("-asmflags").arg(flags);
        }
        cmd.arg(&spec.id.package);

        cmd.env("GOOS", &spec.id.platform.os)
            .env("GOARCH", &spec.id.platform.arch)
            .env("CGO_ENABLED", if spec.cgo { "1" } else { "0" })
            .current_dir(&self.module_dir);
        cmd
    }

    async fn run(&self, mut cmd: Command) -> Result<String, ExecError> {
        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExecError::Spawn {
                program: self.go_path.display().to_string(),
                error: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExecError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl JobExecutor for GoToolchain {
    async fn execute(&self, spec: &ResolvedJobSpec) -> Result<(), ExecError> {
        self.run(self.build_command(spec)).await.map(|_| ())
    }
}

#[async_trait]
impl PackageResolver for GoToolchain {
    async fn resolve_packages(&self, selectors: &[String]) -> Result<Vec<String>, ConfigError> {
        let mut cmd = Command::new(&self.go_path);
        cmd.args(["list", "-f", "{{.Name}}|{{.ImportPath}}"])
            .args(selectors)
            .current_dir(&self.module_dir);

        let stdout = self
            .run(cmd)
            .await
            .map_err(|e| ConfigError::PackageResolution {
                error: e.to_string(),
            })?;

        let packages = parse_package_list(&stdout);
        tracing::info!("Resolved {} main package(s)", packages.len());
        Ok(packages)
    }
}

/// Keep the import paths of `main` packages from `go list` output
///
/// Each line is `<name>|<import path>`; malformed lines are skipped.
pub fn parse_package_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.split_once('|') {
            Some((name, path)) => (name == "main").then(|| path.to_string()),
            None => {
                tracing::warn!("Bad line reading packages: {line}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::JobIdentity;
    use crate::core::platform::Platform;
    use std::collections::HashMap;
    use std::ffi::OsStr;

    fn spec() -> ResolvedJobSpec {
        ResolvedJobSpec {
            id: JobIdentity::new(Platform::new("linux", "arm64"), "example.com/cmd/tool"),
            output: PathBuf::from("/out/tool-linux-arm64"),
            ldflags: None,
            gcflags: None,
            asmflags: None,
            tags: Vec::new(),
            mod_mode: None,
            rebuild: false,
            race: false,
            cgo: false,
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    fn envs(cmd: &Command) -> HashMap<String, String> {
        cmd.as_std()
            .get_envs()
            .filter_map(|(k, v)| {
                v.map(|v| (k.to_string_lossy().to_string(), v.to_string_lossy().to_string()))
            })
            .collect()
    }

    #[test]
    fn test_minimal_build_command() {
        let go = GoToolchain::new(PathBuf::from("go"), PathBuf::from("/src"));
        let cmd = go.build_command(&spec());

        assert_eq!(cmd.as_std().get_program(), OsStr::new("go"));
        assert_eq!(
            args(&cmd),
            vec!["build", "-o", "/out/tool-linux-arm64", "example.com/cmd/tool"]
        );
        let env = envs(&cmd);
        assert_eq!(env["GOOS"], "linux");
        assert_eq!(env["GOARCH"], "arm64");
        assert_eq!(env["CGO_ENABLED"], "0");
        assert_eq!(cmd.as_std().get_current_dir(), Some(Path::new("/src")));
    }

    #[test]
    fn test_full_build_command() {
        let go = GoToolchain::new(PathBuf::from("go"), PathBuf::from("."));
        let mut spec = spec();
        spec.rebuild = true;
        spec.mod_mode = Some("vendor".into());
        spec.race = true;
        spec.tags = vec!["netgo".into(), "osusergo".into()];
        spec.ldflags = Some("-s -w".into());
        spec.gcflags = Some("all=-N -l".into());
        spec.asmflags = Some("-trimpath".into());
        spec.cgo = true;

        let cmd = go.build_command(&spec);
        assert_eq!(
            args(&cmd),
            vec![
                "build",
                "-o",
                "/out/tool-linux-arm64",
                "-a",
                "-mod",
                "vendor",
                "-race",
                "-tags",
                "netgo,osusergo",
                "-ldflags",
                "-s -w",
                "-gcflags",
                "all=-N -l",
                "-asmflags",
                "-trimpath",
                "example.com/cmd/tool",
            ]
        );
        assert_eq!(envs(&cmd)["CGO_ENABLED"], "1");
    }

    #[test]
    fn test_parse_package_list_keeps_main_only() {
        let output = "main|github.com/abc/def/foo\n\
                      other|github.com/abc/def/foo/other\n\
                      garbage line\n\
                      \n\
                      main|github.com/abc/def/bar\n";
        assert_eq!(
            parse_package_list(output),
            vec!["github.com/abc/def/foo", "github.com/abc/def/bar"]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let go = GoToolchain::new(
            PathBuf::from("/nonexistent/definitely-not-go"),
            PathBuf::from("."),
        );
        let err = go.execute(&spec()).await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }
}
