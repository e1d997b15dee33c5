// src/fsops.rs

//! Filesystem primitives behind the cleanup, pass-through copy and
//! packaging tasks.
//!
//! These are plain synchronous operations; the trees involved are small and
//! every caller treats an I/O failure as fatal.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::errors::Result;

/// Build a `GlobSet` from string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Delete a directory tree unconditionally. No confirmation, no dry-run;
/// a missing directory is not an error.
pub fn clean_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    fs::remove_dir_all(dir).with_context(|| format!("deleting directory {:?}", dir))
}

/// Copy every file under `root` whose path (relative to `root`) matches the
/// glob set into `dest`, preserving the relative layout. Returns the number
/// of files copied.
pub fn copy_matching(root: &Path, set: &GlobSet, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in matching_files(root, set) {
        let entry = entry?;
        let rel = entry.0;
        let target = dest.join(&rel);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {:?}", parent))?;
        }
        fs::copy(&entry.1, &target)
            .with_context(|| format!("copying {:?} to {:?}", entry.1, target))?;
        copied += 1;
    }

    Ok(copied)
}

/// Archive every file under `root` matching the glob set into a single zip
/// file at `archive`. Entries are written in walk order with deflate
/// compression. Returns the number of entries written.
pub fn zip_matching(root: &Path, set: &GlobSet, archive: &Path) -> Result<usize> {
    let file = fs::File::create(archive)
        .with_context(|| format!("creating archive {:?}", archive))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    let mut entries = 0;

    for entry in matching_files(root, set) {
        let (rel, path) = entry?;

        writer
            .start_file(rel.replace('\\', "/"), options)
            .with_context(|| format!("adding archive entry {rel}"))?;

        let mut source =
            fs::File::open(&path).with_context(|| format!("reading {:?}", path))?;
        let mut buf = Vec::new();
        source
            .read_to_end(&mut buf)
            .with_context(|| format!("reading {:?}", path))?;
        writer
            .write_all(&buf)
            .with_context(|| format!("writing archive entry {rel}"))?;
        entries += 1;
    }

    writer.finish().context("finalizing archive")?;
    Ok(entries)
}

/// Walk `root` and yield `(relative path string, absolute path)` for every
/// regular file matching the glob set. A missing root yields nothing, so
/// packaging an empty distributable is a no-op rather than an error.
fn matching_files<'a>(
    root: &'a Path,
    set: &'a GlobSet,
) -> impl Iterator<Item = Result<(String, std::path::PathBuf)>> + 'a {
    WalkDir::new(root)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let rel = entry
                    .path()
                    .strip_prefix(root)
                    .ok()?
                    .to_string_lossy()
                    .replace('\\', "/");
                if set.is_match(&rel) {
                    Some(Ok((rel, entry.path().to_path_buf())))
                } else {
                    None
                }
            }
            Err(err) => {
                if err
                    .io_error()
                    .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
                {
                    None
                } else {
                    Some(Err(err.into()))
                }
            }
        })
}
