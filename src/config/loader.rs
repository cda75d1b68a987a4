//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::{DefinitionError, Router, RouterBuilder};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    Definition(DefinitionError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Definition(e) => write!(f, "Route definition error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<DefinitionError> for ConfigError {
    fn from(e: DefinitionError) -> Self {
        ConfigError::Definition(e)
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Compile a validated config into a frozen router.
pub fn build_router(config: &RouterConfig) -> Result<Router, ConfigError> {
    Ok(RouterBuilder::from_config(config)?.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("routes = 5"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_definition_error_surfaces() {
        let config = parse_config(
            r#"
            [[routes]]
            template = "/{id}/{id}"
            action = "A@b"
            "#,
        )
        .unwrap();
        let err = build_router(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Definition(DefinitionError::DuplicateParameter { .. })
        ));
        assert!(err.to_string().starts_with("Route definition error"));
    }

    #[test]
    fn test_build_router() {
        let config = parse_config(
            r#"
            [[routes]]
            template = "/users/{id::i}"
            action = "UserController@show"
            methods = ["get"]
            name = "users.show"
            "#,
        )
        .unwrap();
        let router = build_router(&config).unwrap();
        assert_eq!(router.len(), 1);
        assert_eq!(router.route("users.show").unwrap().methods(), &[axum::http::Method::GET]);
    }
}
