use crate::conf::{Loaded, Settings};
use crate::erx::ResultEX;
use crate::pagination::PaginationBar;
use crate::service::{RestNodeSourceService, SharedNodeSourceService};
use std::sync::Arc;

/// item type shown in the task list labels
pub const TASKS_ITEM_TYPE: &str = "tasks";

pub struct AppBuilder {
    settings: Arc<Settings>,
    warnings: Vec<String>,
    service: Option<SharedNodeSourceService>,
}

/// A configured portal, ready to serve.
pub struct App {
    settings: Arc<Settings>,
    router: axum::Router,
}

impl AppBuilder {
    /// settings from the config files and process environment
    pub fn new() -> Self {
        Self::from_loaded(Settings::load())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::from_loaded(Loaded { settings, warnings: Vec::new() })
    }

    /// keep the load warnings until logging can report them
    pub fn from_loaded(loaded: Loaded) -> Self {
        AppBuilder { settings: Arc::new(loaded.settings), warnings: loaded.warnings, service: None }
    }

    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Install logging, then report what was ignored while loading settings.
    pub fn use_logging(&mut self) -> ResultEX {
        crate::log::logging_initialize(&self.settings.name, &self.settings.log)?;
        self.replay_warnings();
        tracing::debug!(settings = ?self.settings, "settings loaded");
        Ok(())
    }

    fn replay_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("config: {}", warning);
        }
        if !crate::web::url::is_http_url(&self.settings.rm.url) {
            tracing::warn!("rm.url is not an http url: {}", self.settings.rm.url);
        }
    }

    /// replace the Resource Manager REST backend
    pub fn use_service(&mut self, service: SharedNodeSourceService) -> &mut Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> crate::erx::ResultE<App> {
        let service = match self.service {
            Some(service) => service,
            None => Arc::new(RestNodeSourceService::new(&self.settings.rm)?),
        };
        let router = crate::web::route::portal_router(service, &self.settings.web);
        Ok(App { settings: self.settings, router })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }

    /// pagination bar of the task list, sized by `scheduler.*`
    pub fn task_pagination(&self) -> PaginationBar {
        PaginationBar::from_settings(TASKS_ITEM_TYPE, &self.settings.scheduler)
    }

    /// serve until Ctrl-C
    pub async fn run(self) -> ResultEX {
        let bind = self.settings.web.bind_addr();
        crate::web::serve(&self.settings.name, &bind, self.router, crate::web::ctrl_c()).await
    }
}
