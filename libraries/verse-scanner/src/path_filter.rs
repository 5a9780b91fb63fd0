//! Include/exclude rules for library folders
//!
//! Paths are relative to the library root, compared component-wise and
//! case-sensitively after separator normalization. The root itself is the
//! empty path.

use std::path::Path;
use verse_core::ScanSettings;

/// Normalize a relative folder path
///
/// Backslashes become `/`, repeated separators collapse, and leading or
/// trailing separators are dropped.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `path` equals `base` or lies below it (both normalized)
fn is_within(path: &str, base: &str) -> bool {
    if base.is_empty() {
        return true;
    }
    path == base || (path.starts_with(base) && path.as_bytes().get(base.len()) == Some(&b'/'))
}

/// Pre-normalized include/exclude lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl PathFilter {
    pub fn new<I, E>(includes: I, excludes: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        fn clean<T: AsRef<str>>(items: impl IntoIterator<Item = T>) -> Vec<String> {
            items
                .into_iter()
                .map(|item| normalize(item.as_ref()))
                .filter(|item| !item.is_empty())
                .collect()
        }

        Self {
            includes: clean(includes),
            excludes: clean(excludes),
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Self {
        Self::new(&settings.include_folders, &settings.exclude_folders)
    }

    /// Whether every folder is in scope
    pub fn is_unrestricted(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// Decide whether a relative folder is in scope
    ///
    /// With includes, a folder passes if it is an include, lies inside one,
    /// or is an ancestor of one (so the walk can reach it). Files sitting
    /// directly in such an ancestor are in scope too. Excludes then remove
    /// the folder and everything below it.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let path = normalize(relative_path);

        if !self.includes.is_empty()
            && !self
                .includes
                .iter()
                .any(|include| is_within(&path, include) || is_within(include, &path))
        {
            return false;
        }

        !self
            .excludes
            .iter()
            .any(|exclude| is_within(&path, exclude))
    }

    /// Check a directory given as an absolute path under `root`
    ///
    /// Directories outside `root` are never in scope.
    pub fn should_scan_dir(&self, root: &Path, dir: &Path) -> bool {
        match relative_dir(root, dir) {
            Some(relative) => self.should_scan(&relative),
            None => false,
        }
    }
}

/// Convenience wrapper around [`PathFilter::should_scan`]
pub fn should_scan<S: AsRef<str>>(relative_path: &str, includes: &[S], excludes: &[S]) -> bool {
    PathFilter::new(includes, excludes).should_scan(relative_path)
}

/// `/`-joined path of `dir` relative to `root`, or `None` if outside it
pub fn relative_dir(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    Some(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("A\\B//C/"), "A/B/C");
        assert_eq!(normalize("/A/"), "A");
        assert_eq!(normalize("///"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_empty_lists_accept_everything() {
        let filter = PathFilter::default();
        assert!(filter.is_unrestricted());
        assert!(filter.should_scan(""));
        assert!(filter.should_scan("Anything/At/All"));
    }

    #[test]
    fn test_include_accepts_ancestors_and_descendants() {
        let filter = PathFilter::new(["A/B"], Vec::<String>::new());

        assert!(filter.should_scan(""));
        assert!(filter.should_scan("A"));
        assert!(filter.should_scan("A/B"));
        assert!(filter.should_scan("A/B/C"));
        assert!(!filter.should_scan("A/X"));
        assert!(!filter.should_scan("Z"));
    }

    #[test]
    fn test_exclude_inside_include() {
        let filter = PathFilter::new(["A"], ["A/secret"]);

        assert!(!filter.should_scan("A/secret"));
        assert!(!filter.should_scan("A/secret/x"));
        assert!(filter.should_scan("A/ok"));
        assert!(filter.should_scan("A/secretive"));
    }

    #[test]
    fn test_matching_is_component_wise() {
        let filter = PathFilter::new(["A/B"], Vec::<String>::new());
        assert!(!filter.should_scan("A/Bc"));

        let filter = PathFilter::new(Vec::<String>::new(), ["Live"]);
        assert!(filter.should_scan("Live Albums"));
        assert!(!filter.should_scan("Live/1999"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let filter = PathFilter::new(Vec::<String>::new(), ["podcasts"]);
        assert!(filter.should_scan("Podcasts"));
        assert!(!filter.should_scan("podcasts"));
    }

    #[test]
    fn test_separators_are_normalized_on_both_sides() {
        let filter = PathFilter::new(["Rock\\Classic/"], ["//Rock/Classic/Bootlegs"]);

        assert!(filter.should_scan("Rock\\Classic\\Zeppelin"));
        assert!(filter.should_scan("/Rock"));
        assert!(!filter.should_scan("Rock/Classic/Bootlegs/1971"));
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let filter = PathFilter::new(["", "/"], [" "]);
        // " " is a real (odd) folder name, "" and "/" are dropped
        assert!(filter.should_scan("Jazz"));
        assert!(!filter.should_scan(" "));
    }

    #[test]
    fn test_free_function() {
        assert!(should_scan("A/ok", &["A"], &["A/secret"]));
        assert!(!should_scan("A/secret/x", &["A"], &["A/secret"]));
    }

    #[test]
    fn test_relative_dir() {
        let root = Path::new("/music");
        assert_eq!(relative_dir(root, Path::new("/music")), Some(String::new()));
        assert_eq!(
            relative_dir(root, Path::new("/music/Rock/Classic")),
            Some("Rock/Classic".to_string())
        );
        assert_eq!(relative_dir(root, Path::new("/elsewhere/Rock")), None);
    }
}
