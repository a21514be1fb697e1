use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::WalkDir;

/// Extensions of files that are parsed for documentation comments.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct ScanResult {
    /// Matching files in include order, sorted within each walked directory.
    /// The order decides which file wins on a shared id.
    pub files: Vec<String>,
    pub skipped_count: usize,
}

/// Collect the source files under `includes` (relative to `base_dir`).
///
/// Includes may be directories, single files or glob patterns. An empty list
/// scans `base_dir` itself. With an empty `base_dir` the returned paths are
/// relative to the working directory.
pub fn scan_files(base_dir: &str, includes: &[String], ignore_patterns: &[String]) -> ScanResult {
    let mut seen: HashSet<String> = HashSet::new();
    let mut files: Vec<String> = Vec::new();
    let mut skipped_count = 0;

    // Separate ignore patterns into literal paths and glob patterns
    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();

    for p in ignore_patterns {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => log::warn!("Invalid ignore pattern '{}': {}", p, e),
            }
        } else {
            literal_ignore_paths.push(Path::new(base_dir).join(p));
        }
    }

    let roots: Vec<PathBuf> = if includes.is_empty() {
        let base = if base_dir.is_empty() { "." } else { base_dir };
        vec![PathBuf::from(base)]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = Path::new(base_dir).join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten()),
                    Err(e) => log::warn!("Invalid glob pattern '{}': {}", inc, e),
                }
            } else {
                let path = Path::new(base_dir).join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    log::warn!("Include path does not exist: {}", path.display());
                }
            }
        }
        paths
    };

    for root in roots {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    log::warn!("Cannot access path: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let path_str = path.to_string_lossy();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }

            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_source_file(path) && seen.insert(path_str.to_string()) {
                files.push(path_str.into());
            }
        }
    }

    log::info!("found {} source files", files.len());
    ScanResult {
        files,
        skipped_count,
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_scan_source_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("app.js")).unwrap();
        File::create(dir_path.join("module.mjs")).unwrap();
        File::create(dir_path.join("view.jsx")).unwrap();
        File::create(dir_path.join("types.ts")).unwrap();
        File::create(dir_path.join("style.css")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[]);

        assert_eq!(result.files.len(), 3);
        assert!(!result.files.iter().any(|f| f.ends_with("types.ts")));
        assert!(!result.files.iter().any(|f| f.ends_with("style.css")));
    }

    #[test]
    fn test_scan_result_is_sorted() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        for name in ["c.js", "a.js", "b.js"] {
            File::create(dir_path.join(name)).unwrap();
        }

        let result = scan_files(dir_path.to_str().unwrap(), &[], &[]);
        let names: Vec<&str> = result
            .files
            .iter()
            .map(|f| f.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(names, vec!["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_scan_keeps_include_order() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("a.js")).unwrap();
        File::create(dir_path.join("b.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["b.js".to_owned(), "a.js".to_owned(), "b.js".to_owned()],
            &[],
        );
        let names: Vec<&str> = result
            .files
            .iter()
            .map(|f| f.rsplit('/').next().unwrap())
            .collect();
        assert_eq!(names, vec!["b.js", "a.js"]);
    }

    #[test]
    fn test_scan_ignores_patterns() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let node_modules = dir_path.join("node_modules");
        fs::create_dir(&node_modules).unwrap();
        File::create(node_modules.join("lib.js")).unwrap();
        File::create(dir_path.join("app.js")).unwrap();
        File::create(dir_path.join("app.min.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &[],
            &["**/node_modules/**".to_owned(), "**/*.min.js".to_owned()],
        );

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("app.js"));
    }

    #[test]
    fn test_scan_ignores_literal_path() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let vendor = dir_path.join("vendor");
        fs::create_dir(&vendor).unwrap();
        File::create(vendor.join("jquery.js")).unwrap();
        File::create(dir_path.join("app.js")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &[], &["vendor".to_owned()]);

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_with_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let src = dir_path.join("src");
        fs::create_dir(&src).unwrap();
        File::create(src.join("app.js")).unwrap();

        let lib = dir_path.join("lib");
        fs::create_dir(&lib).unwrap();
        File::create(lib.join("utils.js")).unwrap();
        File::create(dir_path.join("single.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["src".to_owned(), "single.js".to_owned(), "missing".to_owned()],
            &[],
        );

        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("src/app.js")));
        assert!(result.files.iter().any(|f| f.ends_with("single.js")));
    }

    #[test]
    fn test_scan_deduplicates_overlapping_includes() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let nested = dir_path.join("src").join("lib");
        fs::create_dir_all(&nested).unwrap();
        File::create(nested.join("util.js")).unwrap();

        let result = scan_files(
            dir_path.to_str().unwrap(),
            &["src".to_owned(), "src/lib".to_owned()],
            &[],
        );

        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let a = dir_path.join("packages").join("a");
        let b = dir_path.join("packages").join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        File::create(a.join("index.js")).unwrap();
        File::create(b.join("index.js")).unwrap();
        File::create(dir_path.join("root.js")).unwrap();

        let result = scan_files(dir_path.to_str().unwrap(), &["packages/*".to_owned()], &[]);

        assert_eq!(result.files.len(), 2);
        assert!(!result.files.iter().any(|f| f.ends_with("root.js")));
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("app.js")));
        assert!(is_source_file(Path::new("app.cjs")));
        assert!(is_source_file(Path::new("app.mjs")));
        assert!(is_source_file(Path::new("app.jsx")));
        assert!(!is_source_file(Path::new("app.ts")));
        assert!(!is_source_file(Path::new("README.md")));
    }
}
