use crate::util::{absolutize, backup_path};
use crate::Result;
use std::path::{Path, PathBuf};
use tlkit_domain::{FileFailure, RewriteFilePlan, RewriteSummary};
use tlkit_rewrite::{RewriteRules, Rewriter};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Compute the summary without touching files.
    pub dry_run: bool,
    /// Copy each file to `<file>.bak` before overwriting it.
    pub backup: bool,
}

/// Source files under `root` with the designated extension, minus the lookup module itself.
pub fn collect_candidates(root: &Path, rules: &RewriteRules) -> Vec<PathBuf> {
    let module = absolutize(&rules.lookup_module);
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| rules.is_candidate(p))
        .filter(|p| absolutize(p) != module)
        .collect();
    files.sort();
    files
}

/// Rewrite every candidate file under `root`. A failing file is logged and recorded in
/// `failures`; the walk continues with the next one.
pub fn apply_tree(
    root: &Path,
    rules: &RewriteRules,
    opts: &ApplyOptions,
) -> Result<RewriteSummary> {
    // Imports are computed between absolute paths so that `root` and the module location
    // may be given in different forms.
    let rewriter = Rewriter::new(RewriteRules {
        lookup_module: absolutize(&rules.lookup_module),
        ..rules.clone()
    })?;
    let files = collect_candidates(root, rules);
    tracing::info!(
        event = "apply_start",
        root = %root.display(),
        candidates = files.len(),
        dry_run = opts.dry_run
    );

    let mut summary = RewriteSummary::new(opts.dry_run);
    for path in files {
        summary.processed += 1;
        match apply_file(&rewriter, &path, opts) {
            Ok(Some(plan)) => {
                tracing::info!(
                    event = "apply_file_changed",
                    path = %path.display(),
                    literals = plan.literals,
                    qualifiers = plan.qualifiers,
                    import_added = plan.import_added
                );
                summary.changed.push(plan.path.clone());
                summary.files.push(plan);
            }
            Ok(None) => tracing::debug!(event = "apply_file_unchanged", path = %path.display()),
            Err(e) => {
                tracing::error!(event = "apply_file_failed", path = %path.display(), error = %e);
                summary.failures.push(FileFailure {
                    path: path.display().to_string(),
                    error: format!("{e:#}"),
                });
            }
        }
    }
    Ok(summary)
}

fn apply_file(
    rewriter: &Rewriter,
    path: &Path,
    opts: &ApplyOptions,
) -> Result<Option<RewriteFilePlan>> {
    let src = std::fs::read_to_string(path)?;
    let processed = rewriter.process(&absolutize(path), &src);
    if !processed.changed {
        return Ok(None);
    }
    if !opts.dry_run {
        if opts.backup {
            std::fs::copy(path, backup_path(path))?;
        }
        std::fs::write(path, &processed.content)?;
    }
    Ok(Some(RewriteFilePlan {
        path: path.display().to_string(),
        literals: processed.literals,
        qualifiers: processed.qualifiers_stripped,
        import_added: processed.import_added,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn rules_for(root: &Path) -> RewriteRules {
        RewriteRules {
            lookup_module: root.join("lib/core/translate.dart"),
            ..RewriteRules::default()
        }
    }

    fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn rewrites_tree_and_skips_lookup_module() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        write(root, "lib/core/translate.dart", "String tl(String k) => Text('nope').data!;\n");
        let page = write(
            root,
            "lib/screens/home.dart",
            "import 'package:flutter/material.dart';\n\nfinal w = const Center(child: Text('Hi'));\n",
        );
        write(root, "lib/plain.dart", "final x = 1;\n");
        write(root, "lib/notes.txt", "Text('ignored')\n");

        let summary = apply_tree(&root.join("lib"), &rules_for(root), &ApplyOptions::default())?;
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.changed.len(), 1);
        assert!(summary.changed[0].ends_with("home.dart"));
        assert!(summary.failures.is_empty());

        let out = fs::read_to_string(&page)?;
        assert_eq!(
            out,
            "import 'package:flutter/material.dart';\nimport '../core/translate.dart';\n\nfinal w = Center(child: Text(tl('Hi')));\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("lib/core/translate.dart"))?,
            "String tl(String k) => Text('nope').data!;\n"
        );

        let again = apply_tree(&root.join("lib"), &rules_for(root), &ApplyOptions::default())?;
        assert!(again.changed.is_empty());
        Ok(())
    }

    #[test]
    fn dry_run_leaves_files_and_backup_copies_original() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        let page = write(root, "lib/a.dart", "final t = Text('A');\n");

        let dry = apply_tree(
            &root.join("lib"),
            &rules_for(root),
            &ApplyOptions { dry_run: true, backup: false },
        )?;
        assert!(dry.dry_run);
        assert_eq!(dry.changed.len(), 1);
        assert_eq!(dry.files[0].literals, 1);
        assert_eq!(fs::read_to_string(&page)?, "final t = Text('A');\n");

        apply_tree(
            &root.join("lib"),
            &rules_for(root),
            &ApplyOptions { dry_run: false, backup: true },
        )?;
        assert_eq!(fs::read_to_string(root.join("lib/a.dart.bak"))?, "final t = Text('A');\n");
        assert_eq!(
            fs::read_to_string(&page)?,
            "import 'core/translate.dart';\nfinal t = Text(tl('A'));\n"
        );
        Ok(())
    }

    #[test]
    fn unreadable_file_is_recorded_and_walk_continues() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        let bad = root.join("lib/bad.dart");
        fs::create_dir_all(bad.parent().unwrap())?;
        fs::write(&bad, [0xff, 0xfe, 0x00])?;
        write(root, "lib/good.dart", "final t = Text('Ok');\n");

        let summary = apply_tree(&root.join("lib"), &rules_for(root), &ApplyOptions::default())?;
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("bad.dart"));
        assert_eq!(summary.changed.len(), 1);
        assert!(summary.changed[0].ends_with("good.dart"));
        Ok(())
    }
}
