//! Application configuration loader for Keepsake.
//!
//! Reads `config.toml` from the data directory (`~/.keepsake/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use keepsake_core::chat::persona::DEFAULT_PERSONA;
use keepsake_types::config::AppConfig;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Resolve a config path relative to the data directory.
pub fn resolve_path(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}

/// Load the persona prompt.
///
/// Uses the file named by `persona_path` when set and readable with
/// non-blank content; otherwise the built-in persona.
pub async fn load_persona(config: &AppConfig, data_dir: &Path) -> String {
    let Some(path) = config.persona_path.as_deref() else {
        return DEFAULT_PERSONA.to_string();
    };
    let path = resolve_path(data_dir, path);

    match tokio::fs::read_to_string(&path).await {
        Ok(content) if !content.trim().is_empty() => {
            tracing::info!(path = %path.display(), "Loaded persona file");
            content
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Persona file is empty, using built-in persona");
            DEFAULT_PERSONA.to_string()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "Failed to read persona file: {err}, using built-in persona");
            DEFAULT_PERSONA.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_types::config::MemoryBackend;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
model = "gpt-4o"
request_timeout_secs = 15

[memory]
backend = "sqlite"
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.memory.backend, MemoryBackend::Sqlite);
        assert_eq!(config.server.port, 3000);
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn load_persona_defaults_without_path() {
        let tmp = TempDir::new().unwrap();
        let persona = load_persona(&AppConfig::default(), tmp.path()).await;
        assert_eq!(persona, DEFAULT_PERSONA);
    }

    #[tokio::test]
    async fn load_persona_reads_relative_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("persona.txt"), "You are a stoic butler.")
            .await
            .unwrap();
        let config = AppConfig {
            persona_path: Some(PathBuf::from("persona.txt")),
            ..AppConfig::default()
        };

        let persona = load_persona(&config, tmp.path()).await;
        assert_eq!(persona, "You are a stoic butler.");
    }

    #[tokio::test]
    async fn load_persona_missing_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig {
            persona_path: Some(PathBuf::from("nope.txt")),
            ..AppConfig::default()
        };
        assert_eq!(load_persona(&config, tmp.path()).await, DEFAULT_PERSONA);
    }

    #[test]
    fn resolve_path_keeps_absolute() {
        let abs = PathBuf::from("/etc/keepsake/persona.txt");
        assert_eq!(resolve_path(Path::new("/data"), &abs), abs);
        assert_eq!(
            resolve_path(Path::new("/data"), Path::new("p.txt")),
            PathBuf::from("/data/p.txt")
        );
    }
}
