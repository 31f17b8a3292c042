//! Where the DE binary file comes from.
//!
//! A source is written as a short descriptor:
//!
//! * `"file:<path>"` – an explicit file on disk,
//! * `"de:<version>"` – a JPL solution (e.g. `DE430`) looked up in the user
//!   cache directory, under `ephem_forces/<linux filename>`.
//!
//! Nothing is downloaded: a version that is not present in the cache fails
//! when the file is opened.
use std::{fmt, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::ephem_errors::EphemError;

/// Name of the sub-directory of the user cache holding DE files.
pub const CACHE_SUBDIR: &str = "ephem_forces";

/// JPL DE solutions distributed with the Linux binary layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeVersion {
    DE430,
    DE431,
    DE440,
    DE441,
}

impl DeVersion {
    /// File name used by the JPL Linux distribution.
    pub fn filename(&self) -> &'static str {
        match self {
            DeVersion::DE430 => "linux_p1550p2650.430",
            DeVersion::DE431 => "lnxm13000p17000.431",
            DeVersion::DE440 => "linux_p1550p2650.440",
            DeVersion::DE441 => "linux_m13000p17000.441",
        }
    }
}

impl FromStr for DeVersion {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DE430" => Ok(DeVersion::DE430),
            "DE431" => Ok(DeVersion::DE431),
            "DE440" => Ok(DeVersion::DE440),
            "DE441" => Ok(DeVersion::DE441),
            _ => Err(EphemError::UnknownDeVersion(s.to_string())),
        }
    }
}

impl fmt::Display for DeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFileSource {
    File(Utf8PathBuf),
    Version(DeVersion),
}

impl TryFrom<&str> for EphemFileSource {
    type Error = EphemError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || EphemError::InvalidEphemFileSource(value.to_string());
        let (kind, rest) = value.split_once(':').ok_or_else(invalid)?;

        match kind {
            "file" if !rest.is_empty() => Ok(EphemFileSource::File(Utf8PathBuf::from(rest))),
            "de" => Ok(EphemFileSource::Version(rest.parse()?)),
            _ => Err(invalid()),
        }
    }
}

impl From<&Utf8Path> for EphemFileSource {
    fn from(path: &Utf8Path) -> Self {
        EphemFileSource::File(path.to_path_buf())
    }
}

impl EphemFileSource {
    /// Resolve the source to a path on disk.
    ///
    /// Return
    /// ------
    /// * The explicit path for `file:` sources, or the cache location of
    ///   the version file. [`EphemError::BaseDirUnavailable`] if no cache
    ///   directory can be determined.
    pub fn path(&self) -> Result<Utf8PathBuf, EphemError> {
        match self {
            EphemFileSource::File(path) => Ok(path.clone()),
            EphemFileSource::Version(version) => Ok(cache_dir()?.join(version.filename())),
        }
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::File(path) => write!(f, "file:{path}"),
            EphemFileSource::Version(version) => write!(f, "de:{version}"),
        }
    }
}

/// Directory searched for `de:` sources.
pub fn cache_dir() -> Result<Utf8PathBuf, EphemError> {
    let base_dir = BaseDirs::new()
        .ok_or_else(|| EphemError::BaseDirUnavailable("no home directory".into()))?;

    let cache_path = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
        EphemError::BaseDirUnavailable(format!(
            "cache directory is not valid UTF-8: {}",
            base_dir.cache_dir().display()
        ))
    })?;

    Ok(cache_path.join(CACHE_SUBDIR))
}
