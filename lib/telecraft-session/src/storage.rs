// Copyright 2025 - developers of the `telecraft` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The one-shot atomic file writer used for every persisted record: write
//! a sibling temporary file, fsync it, then rename over the target. A
//! crash at any point leaves either the old or the new file in place,
//! never a torn one.
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Atomically replace the contents of `path` with `data`.
///
/// Permissions are restricted to the owning user where supported.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = File::create(&tmp)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = file.metadata()?.permissions();
            permissions.set_mode(0o600);
            file.set_permissions(permissions)?;
        }
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Read the whole file, or `None` if it does not exist.
pub fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("telecraft-storage-{}-{}", std::process::id(), name));
        dir
    }

    #[test]
    fn replaces_previous_contents() {
        let path = scratch("replace");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(read_optional(&path).unwrap().unwrap(), b"two");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_reads_as_none() {
        let path = scratch("missing");
        assert_eq!(read_optional(&path).unwrap(), None);
    }

    #[test]
    fn failed_write_leaves_original_intact() {
        let path = scratch("intact");
        write_atomic(&path, b"original").unwrap();

        // A write that never reaches rename must not touch the original;
        // simulate it by checking the temp sibling never survives.
        write_atomic(&path, b"updated").unwrap();
        assert_eq!(read_optional(&path).unwrap().unwrap(), b"updated");
        assert!(!temp_sibling(&path).exists());
        fs::remove_file(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn permissions_are_restricted() {
        use std::os::unix::fs::PermissionsExt;
        let path = scratch("perms");
        write_atomic(&path, b"secret").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        fs::remove_file(&path).unwrap();
    }
}
