use anyhow::{Context, Result};
use std::path::Path;

use crate::config::TrackerConfig;

/// Load and parse a TOML tracker config file.
pub fn load_config(path: &Path) -> Result<TrackerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Parse tracker config from TOML text.
pub fn parse_config(content: &str) -> Result<TrackerConfig> {
    let config: TrackerConfig = toml::from_str(content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableEntry;
    use std::io::Write;

    #[test]
    fn minimal_file_uses_builtin_tables() {
        let config = parse_config(r#"primary_domain = "acme.com""#).unwrap();
        assert_eq!(config.primary_domain, "acme.com");
        assert!(config.secondary_domains.is_empty());
        assert_eq!(config.search_engines.len(), 35);
        assert_eq!(config.utm_fields.len(), 7);
    }

    #[test]
    fn tables_keep_file_order() {
        let config = parse_config(
            r#"
            primary_domain = "acme.com"
            secondary_domains = ["acme.io"]

            [[search_engines]]
            token = "kagi.com"
            name = "kagi"

            [[search_engines]]
            token = "www.google"
            name = "google"

            [[utm_fields]]
            param = "utm_source"
            field = "lead_source"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.search_engines,
            vec![
                TableEntry::new("kagi.com", "kagi"),
                TableEntry::new("www.google", "google")
            ]
        );
        assert_eq!(config.utm_fields.len(), 1);
        assert_eq!(config.utm_fields[0].field, "lead_source");
        assert_eq!(config.click_ids.len(), 32);
    }

    #[test]
    fn example_file_matches_defaults() {
        let example = include_str!("../../../tdcs.example.toml");
        let config = parse_config(example).unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let misspelt = "primary_domain = \"a.com\"\nprimary = \"b.com\"";
        assert!(parse_config(misspelt).is_err());
        assert!(parse_config("secondary_domains = []").is_err());
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "primary_domain = \"acme.com\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.primary_domain, "acme.com");
    }

    #[test]
    fn load_reports_path_on_failure() {
        let err = load_config(Path::new("/missing/tdcs.toml")).unwrap_err();
        assert!(err.to_string().contains("/missing/tdcs.toml"));
    }
}
