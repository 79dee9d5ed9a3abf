use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use poem::Request;
use poem_openapi::SecurityScheme;
use poem_openapi::auth::ApiKey;

/// Presented key -> key name. Installed once at startup, read by the
/// checker on every request.
static API_KEYRING: Lazy<RwLock<HashMap<String, String>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Installs the configured `(name, key)` pairs. Later entries win when the
/// same key appears twice.
pub fn install_api_keys(pairs: &[(String, String)]) {
    let mut keyring = match API_KEYRING.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    keyring.clear();
    for (name, key) in pairs {
        keyring.insert(key.clone(), name.clone());
    }
}

fn resolve_key_name(presented: &str) -> Result<String, String> {
    let keyring = API_KEYRING
        .read()
        .map_err(|e| format!("auth.keyring_read_failed: {e}"))?;

    if keyring.is_empty() {
        return Err("auth.no_keys_installed".to_string());
    }

    keyring
        .get(presented)
        .cloned()
        .ok_or_else(|| "auth.unknown_key".to_string())
}

/// X-Api-Key header authentication. The resolved value is the key's
/// configured name, which the shell endpoints use as the caller principal
/// and audit routing key.
#[derive(SecurityScheme)]
#[oai(
    ty = "api_key",
    key_name = "X-Api-Key",
    key_in = "header",
    checker = "api_key_checker"
)]
pub struct ApiKeyAuth(pub String);

async fn api_key_checker(_req: &Request, api_key: ApiKey) -> Option<String> {
    match resolve_key_name(&api_key.key) {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::warn!("API key rejected: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_resolve_installed_key_to_its_name() {
        install_api_keys(&[
            ("deploy".to_string(), "s3cr3t".to_string()),
            ("ops".to_string(), "0th3r".to_string()),
        ]);

        assert_eq!(resolve_key_name("s3cr3t").unwrap(), "deploy");
        assert_eq!(resolve_key_name("0th3r").unwrap(), "ops");
        assert!(resolve_key_name("wrong").is_err());
    }

    #[test]
    fn should_reject_key_that_was_never_installed() {
        let result = resolve_key_name("no-such-key-anywhere");

        assert!(result.is_err());
    }
}
