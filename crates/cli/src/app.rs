//! Per-invocation wiring: config, remote store, local storage and clock

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use quizgate_core::{
    Catalog, Clock, DeviceIdProvider, Entitlements, FileStorage, LocalStorage, MemoryStore,
    PremiumAdmin, QuizParser, QuizgateConfig, RemoteStore, RestStore, SystemClock,
};

use crate::Cli;

pub struct App {
    pub config: QuizgateConfig,
    pub store: Arc<dyn RemoteStore>,
    pub storage: Arc<dyn LocalStorage>,
    pub clock: Arc<dyn Clock>,
}

impl App {
    /// Loads config and opens the store selected on the command line.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = load_config(cli.config.as_deref())?;
        Self::from_config(config, cli.memory)
    }

    pub fn from_config(config: QuizgateConfig, memory: bool) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let store: Arc<dyn RemoteStore> = if memory {
            tracing::debug!("using in-memory store");
            Arc::new(MemoryStore::with_clock(clock.clone()))
        } else {
            let rest = RestStore::from_config(&config.backend).context(
                "Backend is not configured. Set [backend] url in quizgate.toml \
                 (or QUIZGATE_BACKEND_URL), or pass --memory",
            )?;
            Arc::new(rest)
        };

        let storage = open_storage(&config)?;
        Ok(Self {
            config,
            store,
            storage,
            clock,
        })
    }

    pub fn with_parts(
        config: QuizgateConfig,
        store: Arc<dyn RemoteStore>,
        storage: Arc<dyn LocalStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            storage,
            clock,
        }
    }

    pub fn entitlements(&self) -> Entitlements {
        let device = DeviceIdProvider::new(self.storage.clone(), self.clock.clone());
        Entitlements::new(self.store.clone(), device, self.clock.clone())
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.store.clone())
    }

    pub fn premium_admin(&self) -> PremiumAdmin {
        PremiumAdmin::new(self.store.clone(), self.clock.clone())
    }

    pub fn parser(&self) -> QuizParser {
        QuizParser::new(&self.config.quiz.image_base_url)
    }
}

/// Reads `path`, or searches upward from the working directory, then
/// applies environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<QuizgateConfig> {
    let mut config = match path {
        Some(p) => QuizgateConfig::from_file(p)
            .with_context(|| format!("failed to load {}", p.display()))?,
        None => {
            let cwd = std::env::current_dir().context("cannot determine working directory")?;
            QuizgateConfig::find_and_load(&cwd)?
        }
    };
    config.apply_env();
    Ok(config)
}

fn open_storage(config: &QuizgateConfig) -> Result<Arc<dyn LocalStorage>> {
    let storage = match &config.storage.path {
        Some(path) => FileStorage::new(path),
        None => FileStorage::default_location()
            .context("no config directory for local storage; set [storage] path")?,
    };
    tracing::debug!(path = %storage.path().display(), "local storage");
    Ok(Arc::new(storage))
}
