use std::path::{Path, PathBuf};

/// Absolute form of `p` (relative paths resolve against the working directory).
/// Falls back to `p` itself when the working directory is unavailable.
pub fn absolutize(p: &Path) -> PathBuf {
    std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf())
}

/// `page.dart` → `page.dart.bak`.
pub fn backup_path(p: &Path) -> PathBuf {
    let ext = p
        .extension()
        .map(|e| format!("{}.bak", e.to_string_lossy()))
        .unwrap_or_else(|| "bak".to_string());
    p.with_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_keeps_original_extension() {
        assert_eq!(backup_path(Path::new("lib/a.dart")), PathBuf::from("lib/a.dart.bak"));
        assert_eq!(backup_path(Path::new("lib/README")), PathBuf::from("lib/README.bak"));
    }
}
