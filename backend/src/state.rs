use crate::config::{AdminCredentials, Config};
use crate::manager::Manager;
use actix_web::HttpRequest;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state handed to every handler as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Manager>,
    pub admin: AdminCredentials,
    /// Origin for scan URLs; `None` derives it from the incoming request.
    pub public_url: Option<String>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(manager: Manager, config: &Config) -> Self {
        AppState {
            manager: Arc::new(manager),
            admin: config.admin.clone(),
            public_url: config.public_url.clone(),
            upload_dir: config.upload_dir.clone(),
        }
    }

    /// Scheme and host that scan URLs should point at.
    pub fn base_url(&self, req: &HttpRequest) -> String {
        match &self.public_url {
            Some(url) => url.clone(),
            None => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }
}
