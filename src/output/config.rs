use std::env;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl OutputConfig {
    pub fn from_env() -> Self {
        Self::parse(
            env::var("SNARCHIVE_OUTPUT_FORMAT").ok().as_deref(),
            env::var("SNARCHIVE_OUTPUT_PRETTY").ok().as_deref(),
        )
    }

    fn parse(format: Option<&str>, pretty: Option<&str>) -> Self {
        let format = match format {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        };
        let pretty = match pretty {
            Some(v) if v.eq_ignore_ascii_case("1") || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") => true,
            _ => false,
        };
        OutputConfig { format, pretty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_unless_json_requested() {
        assert_eq!(OutputConfig::parse(None, None), OutputConfig { format: OutputFormat::Text, pretty: false });
        assert_eq!(OutputConfig::parse(Some("json"), Some("YES")), OutputConfig { format: OutputFormat::Json, pretty: true });
        assert_eq!(OutputConfig::parse(Some("xml"), Some("0")).format, OutputFormat::Text);
    }
}
