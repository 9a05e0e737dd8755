use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Paths excluded from both the size and the change rankings.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    extensions: HashSet<String>,
    file_names: HashSet<String>,
    directories: Vec<Vec<String>>,
}

impl IgnoreRules {
    pub fn new<E, F, D>(extensions: E, file_names: F, directories: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            file_names: file_names
                .into_iter()
                .map(|f| f.as_ref().trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            directories: directories
                .into_iter()
                .map(|d| segments(d.as_ref()))
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    /// Excluded when any rule matches: base name, extension, or a
    /// directory prefix on whole path segments.
    pub fn excludes(&self, path: &str) -> bool {
        let p = Path::new(path);

        let by_name = p
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.file_names.contains(n));
        let by_extension = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(e));

        by_name || by_extension || self.is_under_ignored_dir(path)
    }

    fn is_under_ignored_dir(&self, path: &str) -> bool {
        let parts = segments(path);
        self.directories
            .iter()
            .any(|dir| parts.starts_with(dir))
    }

    pub fn filter_files<V: Clone>(&self, files: &HashMap<String, V>) -> HashMap<String, V> {
        files
            .iter()
            .filter(|(path, _)| !self.excludes(path))
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect()
    }
}

fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}
