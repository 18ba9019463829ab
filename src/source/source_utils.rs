use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Match a file name against a shell-style pattern.
///
/// `*` matches any run of characters, `?` exactly one. Case-sensitive.
/// A leading `.` in `name` only matches a literal leading `.` in `pattern`,
/// so hidden files stay out of wildcard matches.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    if name.starts_with('.') && !pattern.starts_with('.') {
        return false;
    }

    let name: Vec<char> = name.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut n, mut p) = (0, 0);
    // last `*` seen in the pattern, and the name position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                n += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star_p, star_n)) => {
                    backtrack = Some((star_p, star_n + 1));
                    p = star_p + 1;
                    n = star_n + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// List regular files directly inside `dir` whose name matches `pattern`,
/// in directory listing order.
pub fn collect_images_from_dir(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if pattern.is_empty() || pattern.contains(['/', '\\']) {
        return Err(AppError::Config(format!(
            "Source pattern must be a non-empty file name pattern: {:?}",
            pattern
        )));
    }

    let mut image_paths = vec![];
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matched = path
            .file_name()
            .is_some_and(|name| matches_pattern(&name.to_string_lossy(), pattern));
        if matched {
            image_paths.push(path);
        }
    }
    Ok(image_paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("graph.png", "*.png"));
        assert!(matches_pattern(".hidden.png", ".*.png"));
        assert!(matches_pattern("a.b.png", "*.png"));
        assert!(matches_pattern("g1.png", "g?.png"));
        assert!(matches_pattern("anything", "*"));
        assert!(matches_pattern("graph_1_final.png", "graph_*_*.png"));

        assert!(!matches_pattern(".png", "*.png"));
        assert!(!matches_pattern("._graph.png", "*.png"));
        assert!(!matches_pattern(".g.png", "?g.png"));
        assert!(!matches_pattern("graph.PNG", "*.png"));
        assert!(!matches_pattern("graph.png.bak", "*.png"));
        assert!(!matches_pattern("g10.png", "g?.png"));
        assert!(!matches_pattern("graph.png", "graph"));
    }
}
