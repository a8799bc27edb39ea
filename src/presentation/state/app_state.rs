use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::CompletionService;
use crate::presentation::config::UploadSettings;

#[derive(Clone)]
pub struct AppState {
    pub completion_service: Arc<CompletionService>,
    pub upload: UploadSettings,
    /// Cancelled on shutdown; requests derive child tokens from it.
    pub shutdown: CancellationToken,
}
