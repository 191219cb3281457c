use super::ConfigError;

/// Resolves the reference inside a `${...}` placeholder to its value.
pub trait SecretResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError>;
}

/// Default resolver: env vars and file references.
///
/// - `${VAR_NAME}` resolves from an environment variable
/// - `${env:VAR_NAME}` is the explicit spelling of the above
/// - `${file:/path/to/secret}` reads the file and trims it
pub struct DefaultSecretResolver;

impl SecretResolver for DefaultSecretResolver {
    fn resolve(&self, reference: &str) -> Result<String, ConfigError> {
        let reference = reference.trim();
        if let Some(path) = reference.strip_prefix("file:") {
            let path = path.trim();
            return std::fs::read_to_string(path)
                .map(|s| s.trim().to_string())
                .map_err(|e| ConfigError::Load(format!("Secret file '{path}': {e}")));
        }
        let var = reference.strip_prefix("env:").unwrap_or(reference).trim();
        std::env::var(var).map_err(|_| ConfigError::NotFound(format!("env:{var}")))
    }
}

/// Replace every `${...}` placeholder in `value` using `resolver`.
pub fn resolve_placeholders(
    value: &str,
    resolver: &dyn SecretResolver,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        let len = rest[start..]
            .find('}')
            .ok_or_else(|| ConfigError::Load(format!("Unclosed placeholder in: {value}")))?;
        out.push_str(&rest[..start]);
        out.push_str(&resolver.resolve(&rest[start + 2..start + len])?);
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_resolution() {
        std::env::set_var("TEST_AUTHVIEW_TENANT", "contoso");
        let result = resolve_placeholders(
            "https://login.microsoftonline.com/${TEST_AUTHVIEW_TENANT}",
            &DefaultSecretResolver,
        )
        .unwrap();
        assert_eq!(result, "https://login.microsoftonline.com/contoso");
        std::env::remove_var("TEST_AUTHVIEW_TENANT");
    }

    #[test]
    #[serial]
    fn test_explicit_env_resolution() {
        std::env::set_var("TEST_AUTHVIEW_CLIENT", "client-42");
        let result = resolve_placeholders("${env:TEST_AUTHVIEW_CLIENT}", &DefaultSecretResolver).unwrap();
        assert_eq!(result, "client-42");
        std::env::remove_var("TEST_AUTHVIEW_CLIENT");
    }

    #[test]
    fn test_missing_env_var() {
        let result = resolve_placeholders("${TEST_AUTHVIEW_NOT_SET_ANYWHERE}", &DefaultSecretResolver);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_no_placeholder() {
        let result = resolve_placeholders("api://app/.default", &DefaultSecretResolver).unwrap();
        assert_eq!(result, "api://app/.default");
    }

    #[test]
    fn test_unclosed_placeholder() {
        let result = resolve_placeholders("${UNCLOSED", &DefaultSecretResolver);
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_file_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let secret_file = dir.path().join("client_id.txt");
        std::fs::write(&secret_file, "675bdfbe-client\n").unwrap();

        let reference = format!("${{file:{}}}", secret_file.display());
        let result = resolve_placeholders(&reference, &DefaultSecretResolver).unwrap();
        assert_eq!(result, "675bdfbe-client");
    }
}
