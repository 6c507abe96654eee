//! Locating Python modules on the search path.
//!
//! Lookup follows the import system: at each level a regular package
//! (`name/__init__.py`) wins over a module file (`name.py`) in the same
//! directory, and a bare directory only becomes a namespace package when no
//! search directory holds a regular package or module of that name.

use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Where an importable module lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
    /// Full dotted name.
    pub name: String,
    /// Source file; `None` for namespace packages.
    pub file: Option<PathBuf>,
    /// Directories holding the submodules; empty for plain modules.
    pub package_dirs: Vec<PathBuf>,
}

impl ModuleLocation {
    #[must_use]
    pub fn is_package(&self) -> bool {
        !self.package_dirs.is_empty()
    }
}

/// The `sys.path` of a run.
#[derive(Debug, Clone)]
pub struct ModuleFinder {
    search_paths: Vec<PathBuf>,
}

impl ModuleFinder {
    /// Build a finder over `paths`, made absolute against the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when the working directory cannot be read.
    pub fn new<I, P>(paths: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let search_paths = paths
            .into_iter()
            .map(|path| std::path::absolute(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { search_paths })
    }

    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Locate a dotted module name, package by package.
    #[must_use]
    pub fn find(&self, dotted: &str) -> Option<ModuleLocation> {
        let segments: Vec<&str> = dotted.split('.').collect();
        if !segments.iter().all(|segment| is_identifier(segment)) {
            return None;
        }
        let mut location = find_in(&self.search_paths, segments[0], segments[0])?;
        for index in 1..segments.len() {
            if !location.is_package() {
                return None;
            }
            let name = segments[..=index].join(".");
            location = find_in(&location.package_dirs, segments[index], &name)?;
        }
        Some(location)
    }

    /// Names of the direct submodules of a package, sorted.
    ///
    /// Module files and subdirectories with an `__init__.py` count; bare
    /// directories do not.
    #[must_use]
    pub fn submodules(&self, location: &ModuleLocation) -> Vec<String> {
        let mut names = Vec::new();
        for dir in &location.package_dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                tracing::debug!(dir = %dir.display(), "package directory is not readable");
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let name = if path.is_dir() {
                    if !path.join("__init__.py").is_file() {
                        continue;
                    }
                    path.file_name().and_then(|name| name.to_str())
                } else if path.extension().is_some_and(|extension| extension == "py") {
                    path.file_stem().and_then(|stem| stem.to_str())
                } else {
                    None
                };
                if let Some(name) = name
                    && name != "__init__"
                    && is_identifier(name)
                {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        names.dedup();
        names
    }
}

fn find_in(dirs: &[PathBuf], segment: &str, name: &str) -> Option<ModuleLocation> {
    let mut namespace_dirs = Vec::new();
    for dir in dirs {
        let package = dir.join(segment);
        let init = package.join("__init__.py");
        if init.is_file() {
            return Some(ModuleLocation {
                name: name.to_string(),
                file: Some(init),
                package_dirs: vec![package],
            });
        }
        let module = dir.join(format!("{segment}.py"));
        if module.is_file() {
            return Some(ModuleLocation {
                name: name.to_string(),
                file: Some(module),
                package_dirs: Vec::new(),
            });
        }
        if package.is_dir() {
            namespace_dirs.push(package);
        }
    }
    (!namespace_dirs.is_empty()).then(|| ModuleLocation {
        name: name.to_string(),
        file: None,
        package_dirs: namespace_dirs,
    })
}

/// Whether `name` is a plain Python identifier.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        for file in files {
            let path = root.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        root
    }

    #[test]
    fn packages_win_over_module_files() {
        let root = tree(&["pkg/__init__.py", "pkg.py"]);
        let finder = ModuleFinder::new([root.path()]).unwrap();
        let location = finder.find("pkg").unwrap();
        assert_eq!(location.file, Some(root.path().join("pkg/__init__.py")));
        assert!(location.is_package());
    }

    #[test]
    fn nested_modules_are_found_through_their_packages() {
        let root = tree(&["pkg/__init__.py", "pkg/sub/__init__.py", "pkg/sub/_impl.py"]);
        let finder = ModuleFinder::new([root.path()]).unwrap();
        let location = finder.find("pkg.sub._impl").unwrap();
        assert_eq!(location.name, "pkg.sub._impl");
        assert_eq!(location.file, Some(root.path().join("pkg/sub/_impl.py")));
        assert!(!location.is_package());
        assert!(finder.find("pkg.sub._impl.deeper").is_none());
        assert!(finder.find("pkg.missing").is_none());
    }

    #[test]
    fn bare_directories_are_namespace_packages() {
        let root = tree(&["ns/mod.py"]);
        let finder = ModuleFinder::new([root.path()]).unwrap();
        let location = finder.find("ns").unwrap();
        assert_eq!(location.file, None);
        assert_eq!(location.package_dirs, vec![root.path().join("ns")]);
        assert!(finder.find("ns.mod").is_some());
    }

    #[test]
    fn later_search_paths_are_consulted() {
        let first = tree(&[]);
        let second = tree(&["other.py"]);
        let finder = ModuleFinder::new([first.path(), second.path()]).unwrap();
        assert_eq!(finder.find("other").unwrap().file, Some(second.path().join("other.py")));
    }

    #[test]
    fn submodules_are_sorted_and_need_init_files() {
        let root = tree(&[
            "pkg/__init__.py",
            "pkg/zeta.py",
            "pkg/alpha.py",
            "pkg/sub/__init__.py",
            "pkg/loose/data.py",
            "pkg/notes.txt",
            "pkg/not-a-name.py",
        ]);
        let finder = ModuleFinder::new([root.path()]).unwrap();
        let location = finder.find("pkg").unwrap();
        assert_eq!(finder.submodules(&location), vec!["alpha", "sub", "zeta"]);
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("_private"));
        assert!(is_identifier("mod2"));
        assert!(!is_identifier("2mod"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
