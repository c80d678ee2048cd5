use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::TemplateError;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$(?:(\$)|\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*)|)").expect("static regex")
    })
}

/// `$NAME` / `${NAME}` substitution; `$$` is a literal dollar sign.
#[derive(Clone, Debug)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Template { source: source.into() }
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path)
            .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;
        Ok(Template::new(source))
    }

    pub fn substitute(&self, vars: &HashMap<&str, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        let mut last = 0;
        for caps in placeholder_re().captures_iter(&self.source) {
            let whole = caps.get(0).expect("group 0 always matches");
            out.push_str(&self.source[last..whole.start()]);
            last = whole.end();
            if caps.get(1).is_some() {
                out.push('$');
                continue;
            }
            let Some(name) = caps.get(2).or_else(|| caps.get(3)) else {
                return Err(TemplateError::InvalidPlaceholder(whole.start()));
            };
            let value = vars
                .get(name.as_str())
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.as_str().to_string()))?;
            out.push_str(value);
        }
        out.push_str(&self.source[last..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn both_placeholder_forms() {
        let t = Template::new("<n>${NR4}</n><t>$TITLE</t> costs $$5");
        let got = t.substitute(&vars(&[("NR4", "0042"), ("TITLE", "Hi")])).unwrap();
        assert_eq!(got, "<n>0042</n><t>Hi</t> costs $5");
    }

    #[test]
    fn unknown_placeholder_fails() {
        let err = Template::new("${MISSING}").substitute(&vars(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(ref n) if n == "MISSING"));
    }

    #[test]
    fn dangling_dollar_fails() {
        let err = Template::new("price: $ 5").substitute(&vars(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPlaceholder(7)));
    }
}
