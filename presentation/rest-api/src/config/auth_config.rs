use std::env;

use anyhow::{Context, bail};

/// Load API key pairs from environment variables
///
/// Environment variables:
/// - API_KEYS: comma-separated `name:key` pairs, e.g.
///   "deploy:s3cr3t,ops:0th3r". The name becomes the caller principal and
///   the audit routing key for everything executed with that key.
///
/// The variable is required: the shell endpoints execute arbitrary commands
/// and must never run unauthenticated.
pub fn api_keys_from_env() -> anyhow::Result<Vec<(String, String)>> {
    let raw = env::var("API_KEYS").context("API_KEYS must be set (name:key pairs)")?;
    parse_api_keys(&raw)
}

/// Parses a comma-separated list of `name:key` pairs. Keys may themselves
/// contain colons; only the first one separates the name.
pub fn parse_api_keys(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((name, key)) = part.split_once(':') else {
            bail!("malformed API key entry, expected name:key");
        };
        let name = name.trim();
        let key = key.trim();
        if name.is_empty() || key.is_empty() {
            bail!("API key entry with an empty name or key");
        }
        pairs.push((name.to_string(), key.to_string()));
    }

    if pairs.is_empty() {
        bail!("API_KEYS contains no usable name:key pairs");
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_multiple_pairs() {
        let pairs = parse_api_keys("deploy:s3cr3t, ops:0th3r").unwrap();

        assert_eq!(
            pairs,
            vec![
                ("deploy".to_string(), "s3cr3t".to_string()),
                ("ops".to_string(), "0th3r".to_string()),
            ]
        );
    }

    #[test]
    fn should_keep_colons_inside_the_key() {
        let pairs = parse_api_keys("ci:token:with:colons").unwrap();

        assert_eq!(pairs[0].0, "ci");
        assert_eq!(pairs[0].1, "token:with:colons");
    }

    #[test]
    fn should_reject_entry_without_separator() {
        let result = parse_api_keys("justakey");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("expected name:key"));
    }

    #[test]
    fn should_reject_empty_name_or_key() {
        assert!(parse_api_keys(":key").is_err());
        assert!(parse_api_keys("name:").is_err());
    }

    #[test]
    fn should_reject_blank_list() {
        assert!(parse_api_keys("  , ,").is_err());
    }
}
