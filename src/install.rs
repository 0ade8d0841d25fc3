//! Self-install: copy the package's executables into a directory on `PATH`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::descriptor::PackageDescriptor;
use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("invalid package descriptor: {0}")]
    Descriptor(#[from] ValidationError),

    #[error("script not found or unreadable: {}", .path.display())]
    MissingScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// The destination already held identical contents.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledScript {
    pub path: PathBuf,
    pub outcome: InstallOutcome,
}

/// Install every script the descriptor declares from `source_dir` into `bin_dir`.
pub fn install_scripts(
    descriptor: &PackageDescriptor,
    source_dir: &Path,
    bin_dir: &Path,
) -> Result<Vec<InstalledScript>, InstallError> {
    descriptor.validate()?;

    fs::create_dir_all(bin_dir).map_err(|source| InstallError::Io {
        path: bin_dir.to_path_buf(),
        source,
    })?;

    descriptor
        .executables()
        .iter()
        .map(|script| {
            let file_name = format!("{script}{}", std::env::consts::EXE_SUFFIX);
            install_one(&source_dir.join(&file_name), &bin_dir.join(&file_name))
        })
        .collect()
}

fn install_one(source: &Path, dest: &Path) -> Result<InstalledScript, InstallError> {
    let contents = fs::read(source).map_err(|err| InstallError::MissingScript {
        path: source.to_path_buf(),
        source: err,
    })?;

    if let Ok(existing) = fs::read(dest) {
        if existing == contents && is_executable(dest) {
            debug!(path = %dest.display(), "already installed");
            return Ok(InstalledScript {
                path: dest.to_path_buf(),
                outcome: InstallOutcome::Unchanged,
            });
        }
    }

    // The destination may be the binary that is running right now; stage and rename.
    let staging = dest.with_extension("partial");
    let staged = fs::write(&staging, &contents)
        .and_then(|()| make_executable(&staging))
        .and_then(|()| fs::rename(&staging, dest));
    if let Err(source) = staged {
        let _ = fs::remove_file(&staging);
        return Err(InstallError::Io {
            path: dest.to_path_buf(),
            source,
        });
    }

    info!(path = %dest.display(), "installed");
    Ok(InstalledScript {
        path: dest.to_path_buf(),
        outcome: InstallOutcome::Installed,
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
