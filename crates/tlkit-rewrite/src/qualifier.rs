use regex::Regex;

/// Removes the compile-time qualifier from designated parent constructs.
///
/// The check is textual: once the file contains a lookup call, every qualified parent from the
/// table loses its qualifier, whether or not the lookup call is actually nested inside it.
pub struct QualifierStripper {
    re: Option<Regex>,
}

impl QualifierStripper {
    pub fn new(const_keyword: &str, parents: &[String]) -> Result<Self, regex::Error> {
        if const_keyword.is_empty() || parents.is_empty() {
            return Ok(Self { re: None });
        }
        let names = parents
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(
            r"\b{}\s+(?P<parent>{names})\s*\(",
            regex::escape(const_keyword)
        );
        Ok(Self {
            re: Some(Regex::new(&pattern)?),
        })
    }

    /// Returns the rewritten text and how many qualifiers were removed.
    pub fn strip(&self, text: &str) -> (String, usize) {
        let Some(re) = &self.re else {
            return (text.to_string(), 0);
        };
        let mut count = 0;
        let out = re.replace_all(text, |caps: &regex::Captures| {
            count += 1;
            format!("{}(", &caps["parent"])
        });
        (out.into_owned(), count)
    }
}
