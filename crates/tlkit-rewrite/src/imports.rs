use once_cell::sync::OnceCell;
use regex::Regex;
use std::path::Path;

/// Any import directive; `path` is the imported URI.
fn import_re() -> Result<&'static Regex, regex::Error> {
    static IMPORT_RE: OnceCell<Regex> = OnceCell::new();
    IMPORT_RE.get_or_try_init(|| {
        Regex::new(r#"(?mR)^[ \t]*import\s+['"](?P<path>[^'"]+)['"][^;\n]*;[ \t]*$"#)
    })
}

/// Ensures a file that uses the lookup call imports the module defining it.
pub struct ImportFixer {
    import_re: &'static Regex,
    /// File name of the lookup module, e.g. `translate.dart`.
    module_file: String,
}

impl ImportFixer {
    pub fn new(lookup_module: &Path) -> Result<Self, regex::Error> {
        let module_file = lookup_module
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            import_re: import_re()?,
            module_file,
        })
    }

    /// True when some import already points at the lookup module, relative or absolute.
    pub fn has_import(&self, text: &str) -> bool {
        self.import_re.captures_iter(text).any(|caps| {
            let path = &caps["path"];
            path == self.module_file || path.ends_with(&format!("/{}", self.module_file))
        })
    }

    /// Insert `import '<rel>';` after the last import, or at the top when there is none.
    pub fn insert(&self, text: &str, rel: &str) -> String {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let line = format!("import '{rel}';{newline}");
        let Some(last) = self.import_re.find_iter(text).last() else {
            return format!("{line}{text}");
        };

        let rest = &text[last.end()..];
        let (insert_at, lead) = if rest.starts_with("\r\n") {
            (last.end() + 2, "")
        } else if rest.starts_with('\n') {
            (last.end() + 1, "")
        } else {
            // last import sits on the final line without a terminator
            (last.end(), newline)
        };
        format!("{}{lead}{line}{}", &text[..insert_at], &text[insert_at..])
    }
}

/// Relative import path from the directory of `file` to `module`, always with `/` separators.
pub fn relative_import(module: &Path, file: &Path) -> String {
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    let rel = pathdiff::diff_paths(module, base).unwrap_or_else(|| module.to_path_buf());
    rel.to_string_lossy().replace('\\', "/")
}
