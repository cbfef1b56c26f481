//! Post-build artifact options
//!
//! `shasum` and `archive` accept either a bool or a name in the matrix
//! file: `true` picks the default (`sha1`, `zip`), `false` turns the step
//! off, and a name selects it explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Checksum algorithm for `<artifact>.<algorithm>` files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Name used in config and as the checksum file extension
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(ConfigError::InvalidHashAlgorithm {
                value: s.to_string(),
            }),
        }
    }
}

/// Archive written next to each artifact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    #[default]
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Name used in config and as the archive extension
    pub fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zip" => Ok(Self::Zip),
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            _ => Err(ConfigError::InvalidArchiveFormat {
                value: s.to_string(),
            }),
        }
    }
}

macro_rules! named_option {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

named_option!(HashAlgorithm);
named_option!(ArchiveFormat);

/// Deserialize `true`/`false`/`"name"` into an optional setting
pub fn bool_or_name<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrName {
        Bool(bool),
        Name(String),
    }

    match BoolOrName::deserialize(deserializer) {
        Ok(BoolOrName::Bool(enabled)) => Ok(enabled.then(T::default)),
        Ok(BoolOrName::Name(name)) => name.parse().map(Some).map_err(serde::de::Error::custom),
        Err(_) => Err(serde::de::Error::custom("must be either a bool or a string")),
    }
}
