use crate::app::filter::ExclusionSet;
use crate::app::models::LinkEntry;
use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Scanner<'a> {
    root: PathBuf,
    excludes: &'a ExclusionSet,
}

impl<'a> Scanner<'a> {
    pub fn new(root: PathBuf, excludes: &'a ExclusionSet) -> Result<Self> {
        if !root.is_dir() {
            bail!("Directory does not exist: {}", root.display());
        }
        Ok(Self { root, excludes })
    }

    /// Snapshot of every symbolic link at or below the root, in walk order.
    /// Nothing is mutated here; callers revert the returned entries afterwards.
    pub fn scan(&self) -> Vec<LinkEntry> {
        let mut entries = Vec::new();

        // Every entry counts, so none of the gitignore/hidden filters apply.
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.path_is_symlink() {
                        entries.push(self.process_link(entry.path()));
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        entries
    }

    fn process_link(&self, path: &Path) -> LinkEntry {
        if self.excludes.matches(path) {
            return LinkEntry {
                path: path.to_path_buf(),
                target: None,
                excluded: true,
            };
        }

        let target = match fs::canonicalize(path) {
            Ok(target) => Some(target),
            Err(err) => {
                log::debug!("Cannot resolve {}: {}", path.display(), err);
                None
            }
        };

        LinkEntry {
            path: path.to_path_buf(),
            target,
            excluded: false,
        }
    }
}
