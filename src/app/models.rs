use crate::app::filter::ExclusionSet;
use std::path::PathBuf;

/// Whether a reverted link takes a copy of its target or takes the target itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Copy,
    Move,
}

impl Mode {
    pub fn verb(self) -> &'static str {
        match self {
            Mode::Copy => "copy",
            Mode::Move => "move",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Mode::Copy => "Copied",
            Mode::Move => "Moved",
        }
    }
}

/// Represents the final configuration after merging the config file and CLI args.
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub excludes: ExclusionSet,
    pub dry_run: bool,
    pub mode: Mode,
}

/// A symbolic link captured by the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Location of the link itself.
    pub path: PathBuf,
    /// Canonical target at scan time. `None` when the link did not resolve
    /// (broken link or permission denied). Excluded links are never resolved.
    pub target: Option<PathBuf>,
    pub excluded: bool,
}

/// What a resolved target turned out to be when the link was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Dir,
}

impl TargetKind {
    pub fn noun(self) -> &'static str {
        match self {
            TargetKind::File => "file",
            TargetKind::Dir => "directory",
        }
    }
}

/// A link that was (or in a dry run would be) replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub link: PathBuf,
    pub target: PathBuf,
    pub kind: TargetKind,
}

#[derive(Debug)]
pub struct Failure {
    pub link: PathBuf,
    pub error: crate::app::reverter::RevertError,
}

/// Outcome of one run over a snapshot.
#[derive(Debug, Default)]
pub struct RevertReport {
    /// Every link the scan found, excluded ones included.
    pub discovered: usize,
    pub excluded: usize,
    pub replaced: Vec<Replacement>,
    pub failures: Vec<Failure>,
}

impl RevertReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
