//! Recursive tree copy used by the relocation fallback.
//!
//! - Walks the source in sorted pre-order so parents exist before children.
//! - Files are streamed through 1 MiB buffers into a created/truncated destination,
//!   then get the source's permission bits.
//! - Directory modes are applied after the walk, deepest first: a read-only source
//!   directory must not stop us from writing its children.
//! - Symlinks are recreated as symlinks (Unix); other special files are rejected.
//! - Aborts on the first error; a partial destination is left for the caller.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::errors::CopyError;
use crate::shutdown::CancelFlag;

use super::{metadata, space};

const BUF_SIZE: usize = 1024 * 1024;

/// Duplicates a directory tree. The seam the relocator's fallback goes through.
pub trait TreeCopier {
    fn copy_tree(&self, src: &Path, dst: &Path) -> Result<CopyStats, CopyError>;
}

/// Counters for a finished copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub symlinks: u64,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct Copier {
    preserve_times: bool,
    check_free_space: bool,
    cancel: Option<CancelFlag>,
}

impl Default for Copier {
    fn default() -> Self {
        Self {
            preserve_times: false,
            check_free_space: true,
            cancel: None,
        }
    }
}

impl Copier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also copy atime/mtime (best-effort).
    pub fn preserve_times(mut self, yes: bool) -> Self {
        self.preserve_times = yes;
        self
    }

    /// Compare the tree size with the destination's free space before writing.
    pub fn check_free_space(mut self, yes: bool) -> Self {
        self.check_free_space = yes;
        self
    }

    /// Stop before the next entry once `flag` is raised.
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn interrupted(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_requested)
    }
}

impl TreeCopier for Copier {
    fn copy_tree(&self, src: &Path, dst: &Path) -> Result<CopyStats, CopyError> {
        if self.check_free_space {
            let required = space::tree_size(src)?;
            space::ensure_space_for_copy(dst, required)?;
        }

        let mut stats = CopyStats::default();
        let mut dir_meta: Vec<(PathBuf, fs::Metadata)> = Vec::new();

        for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| CopyError::Walk {
                path: e.path().unwrap_or(src).to_path_buf(),
                source: e,
            })?;
            if self.interrupted() {
                return Err(CopyError::Interrupted {
                    path: entry.path().to_path_buf(),
                });
            }
            let Ok(rel) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dst.join(rel);
            let ftype = entry.file_type();

            if ftype.is_dir() {
                fs::create_dir_all(&target).map_err(CopyError::io("create directory", &target))?;
                let meta = entry.metadata().map_err(|e| CopyError::Walk {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?;
                dir_meta.push((target, meta));
                stats.dirs += 1;
            } else if ftype.is_file() {
                stats.bytes += copy_file(entry.path(), &target, self.preserve_times)?;
                stats.files += 1;
            } else if ftype.is_symlink() {
                copy_symlink(entry.path(), &target)?;
                stats.symlinks += 1;
            } else {
                return Err(CopyError::Unsupported {
                    path: entry.path().to_path_buf(),
                });
            }
        }

        for (dir, meta) in dir_meta.iter().rev() {
            metadata::apply_permissions(dir, meta)
                .map_err(CopyError::io("set directory permissions", dir))?;
            if self.preserve_times {
                metadata::preserve_times(dir, meta);
            }
        }

        debug!(
            src = %src.display(),
            dst = %dst.display(),
            files = stats.files,
            dirs = stats.dirs,
            symlinks = stats.symlinks,
            bytes = %space::format_bytes(stats.bytes),
            "tree copied"
        );
        Ok(stats)
    }
}

/// Stream one file, then mirror its permission bits. Returns bytes written.
fn copy_file(src: &Path, dst: &Path, preserve_times: bool) -> Result<u64, CopyError> {
    let src_f = File::open(src).map_err(CopyError::io("open source file", src))?;
    let meta = src_f.metadata().map_err(CopyError::io("stat source file", src))?;
    let dst_f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dst)
        .map_err(CopyError::io("create destination file", dst))?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes =
        io::copy(&mut reader, &mut writer).map_err(CopyError::io("copy file contents", dst))?;
    writer.flush().map_err(CopyError::io("flush destination file", dst))?;
    drop(writer);

    metadata::apply_permissions(dst, &meta).map_err(CopyError::io("set file permissions", dst))?;
    if preserve_times {
        metadata::preserve_times(dst, &meta);
    }
    trace!(src = %src.display(), dst = %dst.display(), bytes, "copied file");
    Ok(bytes)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), CopyError> {
    let link_target = fs::read_link(src).map_err(CopyError::io("read symlink", src))?;
    if fs::symlink_metadata(dst).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(dst).map_err(CopyError::io("replace existing symlink", dst))?;
    }
    std::os::unix::fs::symlink(&link_target, dst).map_err(CopyError::io("create symlink", dst))?;
    trace!(
        src = %src.display(),
        dst = %dst.display(),
        target = %link_target.display(),
        "recreated symlink"
    );
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dst: &Path) -> Result<(), CopyError> {
    Err(CopyError::Unsupported {
        path: src.to_path_buf(),
    })
}
