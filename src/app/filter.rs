use std::path::{Component, Path};

/// Names that stop a link from being reverted when any component of its path
/// equals one of them exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: Vec<String>,
}

impl ExclusionSet {
    /// Keeps the first occurrence of each name, in order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matches(&self, path: &Path) -> bool {
        is_excluded(path, self.names.as_slice())
    }
}

/// Returns true iff some component of `path` equals one of `excludes`.
///
/// The root marker (`/` on unix) is a component of its own. `.` components
/// are dropped, so `./a` and `a` decompose identically.
pub fn is_excluded<S: AsRef<str>>(path: &Path, excludes: &[S]) -> bool {
    for component in path.components() {
        if matches!(component, Component::CurDir) {
            continue;
        }
        let part = component.as_os_str();
        for exclude in excludes {
            let exclude: &str = exclude.as_ref();
            if part == exclude {
                log::debug!("Excluding {} due to {}", path.display(), exclude);
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_exact_matching() {
        let excludes = [".venv", ".git", "no"];
        let cases = [
            (".venv", true),
            ("/.venv", true),
            ("./noo", false),
            ("./.no.no..", false),
            ("./noo/oooo", false),
            ("./oo/nooo", false),
            ("./oo/venv/.gitter", false),
            ("./oo/venv/.git/bla/blub", true),
            ("./.venv/.git/bla/blub", true),
        ];
        for (path, expected) in cases {
            assert_eq!(
                is_excluded(Path::new(path), &excludes),
                expected,
                "path {path:?}"
            );
        }
    }

    #[test]
    fn default_exclusions() {
        let excludes = [".venv", ".git"];
        assert!(is_excluded(Path::new("/.venv/.git/bla/blub"), &excludes));
        assert!(!is_excluded(Path::new("./oo/venv/.gitter"), &excludes));
        assert!(!is_excluded(Path::new("/a/novenv/b"), &excludes));
    }

    #[test]
    fn empty_set_excludes_nothing() {
        let excludes: [&str; 0] = [];
        assert!(!is_excluded(Path::new("/.venv/.git"), &excludes));
        assert!(!ExclusionSet::default().matches(Path::new(".git")));
    }

    #[cfg(unix)]
    #[test]
    fn root_marker_is_a_component() {
        assert!(is_excluded(Path::new("/a/b"), &["/"]));
        assert!(!is_excluded(Path::new("a/b"), &["/"]));
    }

    #[test]
    fn order_of_excludes_does_not_matter() {
        let path = Path::new("x/.git/y/.venv");
        assert!(is_excluded(path, &[".venv", ".git"]));
        assert!(is_excluded(path, &[".git", ".venv"]));
    }

    #[test]
    fn set_dedupes_preserving_order() {
        let set = ExclusionSet::new([".git", ".venv", ".git", "node_modules"]);
        assert_eq!(set.names(), [".git", ".venv", "node_modules"]);
        assert!(set.matches(Path::new("a/node_modules/b")));
    }
}
