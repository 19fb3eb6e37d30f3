use crate::app::models::{Failure, LinkEntry, Mode, Replacement, RevertReport, RunConfig, TargetKind};
use filetime::FileTime;
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single link could not be reverted.
#[derive(Debug, Error)]
pub enum RevertError {
    #[error("target of {link} could not be resolved")]
    Unresolved { link: PathBuf },
    #[error("target {target} of {link} is neither a regular file nor a directory")]
    UnsupportedTarget { link: PathBuf, target: PathBuf },
    #[error("cannot move {target} into itself at {link}")]
    MoveIntoItself { link: PathBuf, target: PathBuf },
    #[error("failed to {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> RevertError + 'a {
    move |source| RevertError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

pub struct Reverter<'a> {
    config: &'a RunConfig,
}

impl<'a> Reverter<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Replaces every non-excluded link of the snapshot, in order.
    /// A failing link is recorded and the run moves on to the next one.
    pub fn revert(&self, links: &[LinkEntry]) -> RevertReport {
        let mut report = RevertReport {
            discovered: links.len(),
            ..RevertReport::default()
        };

        for link in links {
            if link.excluded {
                report.excluded += 1;
                continue;
            }
            match self.revert_one(link) {
                Ok(replacement) => report.replaced.push(replacement),
                Err(error) => {
                    log::warn!("Could not revert {}: {}", link.path.display(), error);
                    report.failures.push(Failure {
                        link: link.path.clone(),
                        error,
                    });
                }
            }
        }

        report
    }

    fn revert_one(&self, link: &LinkEntry) -> Result<Replacement, RevertError> {
        let target = link.target.as_ref().ok_or_else(|| RevertError::Unresolved {
            link: link.path.clone(),
        })?;
        let kind = classify(&link.path, target)?;
        let mode = self.config.mode;

        // Everything that can be refused is checked while the link still
        // exists, in a dry run as well.
        let tree = match (kind, mode) {
            (TargetKind::Dir, Mode::Copy) => Some(DirTree::list(target, &link.path)?),
            (_, Mode::Move) => {
                check_move(target, &link.path, kind)?;
                None
            }
            (TargetKind::File, Mode::Copy) => None,
        };

        if self.config.dry_run {
            log::info!("Copy/move {} to {}", target.display(), link.path.display());
            return Ok(Replacement {
                link: link.path.clone(),
                target: target.clone(),
                kind,
            });
        }

        remove_link(&link.path)?;
        match (mode, tree) {
            (Mode::Move, _) => move_path(target, &link.path, kind)?,
            (Mode::Copy, Some(tree)) => tree.copy_to(&link.path)?,
            (Mode::Copy, None) => copy_file(target, &link.path)?,
        }
        log::debug!(
            "{} {} to {}",
            mode.past_tense(),
            target.display(),
            link.path.display()
        );

        Ok(Replacement {
            link: link.path.clone(),
            target: target.clone(),
            kind,
        })
    }
}

/// Looked up right before the link is touched; a target that vanished since
/// the scan leaves the link where it is.
fn classify(link: &Path, target: &Path) -> Result<TargetKind, RevertError> {
    match fs::metadata(target) {
        Ok(meta) if meta.is_file() => Ok(TargetKind::File),
        Ok(meta) if meta.is_dir() => Ok(TargetKind::Dir),
        _ => Err(RevertError::UnsupportedTarget {
            link: link.to_path_buf(),
            target: target.to_path_buf(),
        }),
    }
}

/// Where `path` lives once its parent directories are canonical. The final
/// component is kept as is, so a link maps to its own location.
fn resolved_location(path: &Path) -> PathBuf {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::canonicalize(parent)
        .map(|p| p.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// `src` is canonical; a directory cannot be moved below itself.
fn check_move(src: &Path, dst: &Path, kind: TargetKind) -> Result<(), RevertError> {
    if kind == TargetKind::Dir && resolved_location(dst).starts_with(src) {
        return Err(RevertError::MoveIntoItself {
            link: dst.to_path_buf(),
            target: src.to_path_buf(),
        });
    }
    Ok(())
}

/// Removes the link entry itself, never what it points to.
fn remove_link(link: &Path) -> Result<(), RevertError> {
    #[cfg(windows)]
    {
        // Directory links on windows are directories as far as removal goes.
        if fs::remove_dir(link).is_ok() {
            return Ok(());
        }
    }
    fs::remove_file(link).map_err(io_err("remove link", link))
}

/// Copies content, permissions and access/modification times.
fn copy_file(src: &Path, dst: &Path) -> Result<(), RevertError> {
    fs::copy(src, dst).map_err(io_err("copy", src))?;
    let meta = fs::metadata(src).map_err(io_err("stat", src))?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(io_err("set times on", dst))
}

enum TreeEntry {
    Dir(PathBuf),
    File(PathBuf),
    Link { relative: PathBuf, text: PathBuf },
}

/// Contents of a directory, listed in full before anything is written, so a
/// destination below the source is never walked into.
struct DirTree {
    root: PathBuf,
    entries: Vec<TreeEntry>,
}

impl DirTree {
    /// `dst` is where the copy will go. It is left out of the listing, and
    /// any special file (fifo, socket, device) refuses the whole copy.
    fn list(src: &Path, dst: &Path) -> Result<Self, RevertError> {
        let skip = resolved_location(dst);
        let walker = WalkBuilder::new(src)
            .standard_filters(false)
            .follow_links(false)
            .build();
        let mut entries = Vec::new();

        for result in walker {
            let entry = result.map_err(|err| RevertError::Io {
                op: "walk",
                path: src.to_path_buf(),
                source: err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed")),
            })?;
            let path = entry.path();
            if path == skip {
                continue;
            }
            let relative = diff_paths(path, src).unwrap_or_default();

            if entry.path_is_symlink() {
                let text = fs::read_link(path).map_err(io_err("read link", path))?;
                entries.push(TreeEntry::Link { relative, text });
            } else {
                match entry.file_type() {
                    Some(t) if t.is_dir() => entries.push(TreeEntry::Dir(relative)),
                    Some(t) if t.is_file() => entries.push(TreeEntry::File(relative)),
                    _ => {
                        return Err(RevertError::UnsupportedTarget {
                            link: dst.to_path_buf(),
                            target: path.to_path_buf(),
                        })
                    }
                }
            }
        }

        Ok(Self {
            root: src.to_path_buf(),
            entries,
        })
    }

    /// Nested symbolic links are recreated with their original link text.
    fn copy_to(&self, dst: &Path) -> Result<(), RevertError> {
        let mut created_dirs = Vec::new();

        for entry in &self.entries {
            match entry {
                TreeEntry::Dir(relative) => {
                    let out = dst.join(relative);
                    fs::create_dir_all(&out).map_err(io_err("create directory", &out))?;
                    created_dirs.push((self.root.join(relative), out));
                }
                TreeEntry::File(relative) => {
                    copy_file(&self.root.join(relative), &dst.join(relative))?;
                }
                TreeEntry::Link { relative, text } => {
                    make_symlink(text, &self.root.join(relative), &dst.join(relative))?;
                }
            }
        }

        // Directory permissions last and deepest first, so a read-only
        // directory does not block the copy of its children.
        for (from, to) in created_dirs.iter().rev() {
            let meta = fs::metadata(from).map_err(io_err("stat", from))?;
            fs::set_permissions(to, meta.permissions())
                .map_err(io_err("set permissions on", to))?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn make_symlink(link_text: &Path, _original: &Path, at: &Path) -> Result<(), RevertError> {
    std::os::unix::fs::symlink(link_text, at).map_err(io_err("create link", at))
}

#[cfg(windows)]
fn make_symlink(link_text: &Path, original: &Path, at: &Path) -> Result<(), RevertError> {
    let result = if fs::metadata(original).is_ok_and(|m| m.is_dir()) {
        std::os::windows::fs::symlink_dir(link_text, at)
    } else {
        std::os::windows::fs::symlink_file(link_text, at)
    };
    result.map_err(io_err("create link", at))
}

/// Renames `src` to `dst`, falling back to copy-then-delete when a plain
/// rename is not possible (for example across filesystems).
fn move_path(src: &Path, dst: &Path, kind: TargetKind) -> Result<(), RevertError> {
    check_move(src, dst, kind)?;
    let err = match fs::rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };
    log::debug!("Rename of {} failed ({}), copying instead", src.display(), err);

    match kind {
        TargetKind::File => {
            copy_file(src, dst)?;
            fs::remove_file(src).map_err(io_err("remove", src))
        }
        TargetKind::Dir => {
            DirTree::list(src, dst)?.copy_to(dst)?;
            fs::remove_dir_all(src).map_err(io_err("remove", src))
        }
    }
}
