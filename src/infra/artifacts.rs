//! Post-build artifact handling
//!
//! Checksums and archives for binaries that built successfully.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::artifact::{ArchiveFormat, HashAlgorithm};
use crate::error::ArtifactError;

fn io_error(path: &Path, e: &io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `path` with `.<ext>` appended to the full file name
fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut out = path.as_os_str().to_owned();
    out.push(".");
    out.push(ext);
    PathBuf::from(out)
}

fn digest_file<D: Digest>(path: &Path) -> Result<String, ArtifactError> {
    let file = File::open(path).map_err(|e| io_error(path, &e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = D::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).map_err(|e| io_error(path, &e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hex digest of a file
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, ArtifactError> {
    match algorithm {
        HashAlgorithm::Sha1 => digest_file::<Sha1>(path),
        HashAlgorithm::Sha256 => digest_file::<Sha256>(path),
    }
}

/// Write `<artifact>.<algorithm>` in `sha1sum`/`sha256sum` format
pub fn write_checksum(artifact: &Path, algorithm: HashAlgorithm) -> Result<PathBuf, ArtifactError> {
    let sum = hash_file(artifact, algorithm)?;
    let out_path = with_suffix(artifact, algorithm.name());

    std::fs::write(&out_path, format!("{sum}  {}\n", file_name(artifact)))
        .map_err(|e| io_error(&out_path, &e))?;
    tracing::debug!("Wrote checksum {}", out_path.display());
    Ok(out_path)
}

/// Archive path for an artifact; a Windows `.exe` suffix is replaced
pub fn archive_path(artifact: &Path, format: ArchiveFormat) -> PathBuf {
    if artifact.extension().is_some_and(|ext| ext == "exe") {
        with_suffix(&artifact.with_extension(""), format.name())
    } else {
        with_suffix(artifact, format.name())
    }
}

/// Write an archive containing the artifact under its file name
pub fn write_archive(artifact: &Path, format: ArchiveFormat) -> Result<PathBuf, ArtifactError> {
    let out_path = archive_path(artifact, format);
    let archive_error = |e: &dyn std::fmt::Display| ArtifactError::Archive {
        path: out_path.clone(),
        error: e.to_string(),
    };

    let mut source = File::open(artifact).map_err(|e| io_error(artifact, &e))?;
    let target = File::create(&out_path).map_err(|e| io_error(&out_path, &e))?;

    match format {
        ArchiveFormat::Zip => {
            let mut zip = ZipWriter::new(target);
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(0o755);
            zip.start_file(file_name(artifact), options)
                .map_err(|e| archive_error(&e))?;
            io::copy(&mut source, &mut zip).map_err(|e| archive_error(&e))?;
            zip.finish().map_err(|e| archive_error(&e))?;
        }
        ArchiveFormat::TarGz => {
            let mut tar = tar::Builder::new(GzEncoder::new(target, Compression::default()));
            tar.append_file(file_name(artifact), &mut source)
                .map_err(|e| archive_error(&e))?;
            let gz = tar.into_inner().map_err(|e| archive_error(&e))?;
            gz.finish().map_err(|e| archive_error(&e))?;
        }
    }

    tracing::debug!("Wrote archive {}", out_path.display());
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    const HELLO_SHA1: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn artifact(temp: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = temp.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_hash_file() {
        let temp = TempDir::new().unwrap();
        let path = artifact(&temp, "tool-linux-amd64", b"hello world");

        assert_eq!(hash_file(&path, HashAlgorithm::Sha1).unwrap(), HELLO_SHA1);
        assert_eq!(hash_file(&path, HashAlgorithm::Sha256).unwrap(), HELLO_SHA256);
    }

    #[test]
    fn test_write_sha1_checksum() {
        let temp = TempDir::new().unwrap();
        let path = artifact(&temp, "tool-linux-amd64", b"hello world");

        let sum_path = write_checksum(&path, HashAlgorithm::Sha1).unwrap();
        assert_eq!(sum_path, temp.path().join("tool-linux-amd64.sha1"));
        assert_eq!(
            std::fs::read_to_string(sum_path).unwrap(),
            format!("{HELLO_SHA1}  tool-linux-amd64\n")
        );
    }

    #[test]
    fn test_write_sha256_checksum() {
        let temp = TempDir::new().unwrap();
        let path = artifact(&temp, "tool-linux-amd64", b"hello world");

        let sum_path = write_checksum(&path, HashAlgorithm::Sha256).unwrap();
        assert_eq!(sum_path, temp.path().join("tool-linux-amd64.sha256"));
        assert_eq!(
            std::fs::read_to_string(sum_path).unwrap(),
            format!("{HELLO_SHA256}  tool-linux-amd64\n")
        );
    }

    #[test]
    fn test_checksum_missing_file() {
        assert!(hash_file(Path::new("/nonexistent/file"), HashAlgorithm::Sha1).is_err());
    }

    #[test]
    fn test_archive_path_keeps_dotted_names() {
        let path = Path::new("/out/tool-v1.2-linux-amd64");
        assert_eq!(
            archive_path(path, ArchiveFormat::Zip),
            PathBuf::from("/out/tool-v1.2-linux-amd64.zip")
        );
        assert_eq!(
            archive_path(path, ArchiveFormat::TarGz),
            PathBuf::from("/out/tool-v1.2-linux-amd64.tar.gz")
        );
    }

    #[test]
    fn test_archive_path_strips_exe() {
        let path = Path::new("/out/tool-windows-amd64.exe");
        assert_eq!(
            archive_path(path, ArchiveFormat::TarGz),
            PathBuf::from("/out/tool-windows-amd64.tar.gz")
        );
    }

    #[test]
    fn test_write_zip_archive() {
        let temp = TempDir::new().unwrap();
        let path = artifact(&temp, "tool-windows-amd64.exe", b"MZ binary");

        let archive = write_archive(&path, ArchiveFormat::Zip).unwrap();
        assert_eq!(archive, temp.path().join("tool-windows-amd64.zip"));

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
        let mut entry = zip.by_index(0).unwrap();
        assert_eq!(entry.name(), "tool-windows-amd64.exe");
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "MZ binary");
    }

    #[test]
    fn test_write_tar_gz_archive() {
        let temp = TempDir::new().unwrap();
        let path = artifact(&temp, "tool-linux-arm64", b"ELF binary");

        let archive = write_archive(&path, ArchiveFormat::TarGz).unwrap();
        assert_eq!(archive, temp.path().join("tool-linux-arm64.tar.gz"));

        let mut tar = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
        let mut entries = tar.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();
        assert_eq!(entry.path().unwrap(), Path::new("tool-linux-arm64"));
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "ELF binary");
        drop(entry);
        assert!(entries.next().is_none());
    }
}
