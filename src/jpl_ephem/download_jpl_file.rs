//! Locating DE binary files on disk.
//!
//! A file is selected with a short source string:
//!
//! * `"horizon:DE405"` — a published solution, looked up in the user cache
//!   directory (`<cache>/dephem_cache/jpl_ephem/`). With the `jpl-download`
//!   feature a missing file is fetched from the JPL server first.
//! * `"path:/data/lnxp1600p2200.405"` — an explicit file.
//! * any other string — taken as a file path.
use std::{fmt, fs};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::ephem_errors::EphemError;

use super::horizon::horizon_version::JPLHorizonVersion;

#[cfg(feature = "jpl-download")]
const JPL_LINUX_BASE_URL: &str = "https://ssd.jpl.nasa.gov/ftp/eph/planets/Linux";

/// Where a DE file comes from, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFileSource {
    JPLHorizon(JPLHorizonVersion),
    Path(Utf8PathBuf),
}

impl TryFrom<&str> for EphemFileSource {
    type Error = EphemError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EphemError::InvalidJPLEphemFileSource(
                "empty ephemeris source".into(),
            ));
        }

        if let Some(label) = value.strip_prefix("horizon:") {
            let version = label
                .parse::<JPLHorizonVersion>()
                .map_err(EphemError::InvalidJPLEphemFileVersion)?;
            return Ok(EphemFileSource::JPLHorizon(version));
        }
        if let Some(path) = value.strip_prefix("path:") {
            if path.is_empty() {
                return Err(EphemError::InvalidJPLEphemFileSource(value.into()));
            }
            return Ok(EphemFileSource::Path(Utf8PathBuf::from(path)));
        }
        if value.starts_with("naif:") {
            return Err(EphemError::InvalidJPLEphemFileSource(format!(
                "{value}: SPK kernels are not DE binary files"
            )));
        }
        Ok(EphemFileSource::Path(Utf8PathBuf::from(value)))
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::JPLHorizon(version) => write!(f, "horizon:{version}"),
            EphemFileSource::Path(path) => write!(f, "path:{path}"),
        }
    }
}

/// A resolved, existing DE file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EphemFilePath {
    JPLHorizon(Utf8PathBuf, JPLHorizonVersion),
    Local(Utf8PathBuf),
}

impl fmt::Display for EphemFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl EphemFilePath {
    pub fn path(&self) -> &Utf8Path {
        match self {
            EphemFilePath::JPLHorizon(path, _) | EphemFilePath::Local(path) => path,
        }
    }

    /// Cache directory holding the published DE files, created if missing.
    ///
    /// Return
    /// ----------
    /// * `<user cache dir>/dephem_cache/jpl_ephem`
    pub fn cache_dir() -> Result<Utf8PathBuf, EphemError> {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            EphemError::UnableToCreateBaseDir("no home directory for the current user".into())
        })?;
        let cache = Utf8Path::from_path(base_dirs.cache_dir()).ok_or_else(|| {
            EphemError::Utf8PathError(format!(
                "cache directory is not UTF-8: {}",
                base_dirs.cache_dir().display()
            ))
        })?;
        let cache = cache.join("dephem_cache").join("jpl_ephem");
        fs::create_dir_all(&cache)
            .map_err(|err| EphemError::UnableToCreateBaseDir(format!("{cache}: {err}")))?;
        Ok(cache)
    }

    /// Resolve a source to an existing file.
    ///
    /// Errors
    /// ----------
    /// * [`EphemError::JPLFileNotFound`] — explicit path missing, or published
    ///   file absent from the cache without the `jpl-download` feature.
    /// * [`EphemError::UnableToCreateBaseDir`] / [`EphemError::Utf8PathError`] —
    ///   the cache directory cannot be used.
    pub fn get_ephemeris_file(source: &EphemFileSource) -> Result<Self, EphemError> {
        match source {
            EphemFileSource::Path(path) => {
                if path.is_file() {
                    Ok(EphemFilePath::Local(path.clone()))
                } else {
                    Err(EphemError::JPLFileNotFound(path.to_string()))
                }
            }
            EphemFileSource::JPLHorizon(version) => {
                let local_file = Self::cache_dir()?.join(version.file_name());
                if local_file.is_file() {
                    log::debug!("using cached {version} file {local_file}");
                    return Ok(EphemFilePath::JPLHorizon(local_file, *version));
                }
                fetch(version.get_filename(), &local_file)?;
                Ok(EphemFilePath::JPLHorizon(local_file, *version))
            }
        }
    }

    /// Resolve JPL's `testpo` validation file of `version`, cached like the
    /// binary files.
    pub fn get_test_points(version: JPLHorizonVersion) -> Result<Utf8PathBuf, EphemError> {
        let remote = version.test_points_filename();
        let name = remote.rsplit_once('/').map_or(remote.as_str(), |(_, name)| name);
        let local_file = Self::cache_dir()?.join(name);
        if !local_file.is_file() {
            fetch(&remote, &local_file)?;
        }
        Ok(local_file)
    }
}

#[cfg(feature = "jpl-download")]
fn fetch(remote: &str, local_file: &Utf8Path) -> Result<(), EphemError> {
    let url = format!("{JPL_LINUX_BASE_URL}/{remote}");
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(download_big_file(&url, local_file))
}

#[cfg(not(feature = "jpl-download"))]
fn fetch(remote: &str, local_file: &Utf8Path) -> Result<(), EphemError> {
    log::warn!("{remote} is not cached and the jpl-download feature is disabled");
    Err(EphemError::JPLFileNotFound(local_file.to_string()))
}

/// Stream a large file to disk chunk by chunk.
///
/// A partially written file is removed when the transfer fails, so a later
/// resolution does not pick up a truncated DE file.
#[cfg(feature = "jpl-download")]
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), EphemError> {
    use tokio::{fs::File, io::AsyncWriteExt};
    use tokio_stream::StreamExt;

    log::info!("downloading {url} to {path}");

    let transfer = async {
        let mut file = File::create(path).await?;
        let mut stream = reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok::<(), EphemError>(())
    };

    if let Err(err) = transfer.await {
        let _ = tokio::fs::remove_file(path).await;
        return Err(err);
    }

    log::info!("downloaded {url}");
    Ok(())
}
