//! Application state wiring the chat service together.
//!
//! AppState holds the service instance used by both CLI and HTTP API. The
//! service is generic over persistence and provider; AppState pins it to the
//! boxed variants so the backend can be picked from config at runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use keepsake_core::chat::service::{ChatService, ChatSettings};
use keepsake_core::llm::box_provider::BoxLlmProvider;
use keepsake_core::memory::box_persistence::BoxMemoryPersistence;
use keepsake_core::memory::persistence::MemoryPersistence;
use keepsake_core::memory::store::MemoryStore;
use keepsake_infra::config::{load_app_config, load_persona, resolve_path};
use keepsake_infra::filesystem::memory::JsonFileMemoryPersistence;
use keepsake_infra::filesystem::resolve_data_dir;
use keepsake_infra::llm::openai_compat::OpenAiCompatibleProvider;
use keepsake_infra::llm::openai_compat::config::{OPENAI_BASE_URL, custom};
use keepsake_infra::sqlite::memory::SqliteMemoryPersistence;
use keepsake_infra::sqlite::pool::{DatabasePool, database_url};
use keepsake_types::config::{AppConfig, MemoryBackend};

/// Chat service pinned to runtime-selected backends.
pub type ConcreteChatService = ChatService<BoxMemoryPersistence, BoxLlmProvider>;

/// Shared application state.
///
/// Used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    /// Whether the configured API key variable was set.
    pub api_key_present: bool,
}

impl AppState {
    /// Initialize the application state: load config, open the memory
    /// backend, and build the completion provider.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        // Keys kept next to the data take effect after any project-local .env.
        let _ = dotenvy::from_path(data_dir.join(".env"));

        let config = load_app_config(&data_dir).await;
        let persona = load_persona(&config, &data_dir).await;

        let persistence = open_memory_backend(&config, &data_dir).await?;
        tracing::info!(
            backend = %config.memory.backend,
            location = %persistence.describe(),
            "Memory backend ready"
        );

        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.trim().is_empty());
        let api_key_present = api_key.is_some();
        if !api_key_present {
            tracing::warn!(env = %config.api_key_env, "API key not set");
        }
        let provider = build_provider(&config, SecretString::from(api_key.unwrap_or_default()));

        let settings = ChatSettings {
            persona,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        };

        let chat_service = ChatService::new(MemoryStore::new(persistence), provider, settings);

        Ok(Self::new(chat_service, config, data_dir, api_key_present))
    }

    /// Assemble state from already-built parts.
    pub fn new(
        chat_service: ConcreteChatService,
        config: AppConfig,
        data_dir: PathBuf,
        api_key_present: bool,
    ) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            api_key_present,
        }
    }

    /// Fail early when the public OpenAI endpoint is configured without a key.
    ///
    /// Self-hosted endpoints often accept any key, so they are not checked.
    pub fn require_api_key(&self) -> anyhow::Result<()> {
        let public = self.config.base_url.trim_end_matches('/') == OPENAI_BASE_URL;
        if public && !self.api_key_present {
            anyhow::bail!(
                "{} is not set. Export it or add it to {}",
                self.config.api_key_env,
                self.data_dir.join(".env").display()
            );
        }
        Ok(())
    }
}

/// Open the memory backend named in config.
pub async fn open_memory_backend(
    config: &AppConfig,
    data_dir: &Path,
) -> anyhow::Result<BoxMemoryPersistence> {
    match config.memory.backend {
        MemoryBackend::Json => {
            let path = resolve_path(data_dir, Path::new(&config.memory.file));
            Ok(BoxMemoryPersistence::new(JsonFileMemoryPersistence::new(path)))
        }
        MemoryBackend::Sqlite => {
            let url = database_url(data_dir);
            let pool = DatabasePool::new(&url)
                .await
                .with_context(|| format!("failed to open memory database at {url}"))?;
            Ok(BoxMemoryPersistence::new(SqliteMemoryPersistence::new(pool)))
        }
    }
}

/// Build the completion provider for the configured endpoint.
pub fn build_provider(config: &AppConfig, api_key: SecretString) -> BoxLlmProvider {
    BoxLlmProvider::new(OpenAiCompatibleProvider::new(custom(
        &config.base_url,
        api_key,
        &config.model,
    )))
}
