//! Signed download URLs for stored media

use super::{LONG_TIMEOUT, ModerationApi, Outcome};
use crate::client::RequestDescriptor;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct DownloadUrl {
    #[serde(default)]
    url: Option<String>,
}

impl ModerationApi {
    /// Signed URL for an asset, or an empty string when none is available
    pub async fn download_url(&self, file_id: &str) -> String {
        if file_id.is_empty() {
            return String::new();
        }

        let descriptor =
            RequestDescriptor::get(format!("content/download/{file_id}")).with_timeout(LONG_TIMEOUT);

        let envelope = match self.run(descriptor).await {
            Ok(Outcome::Done(envelope)) => envelope,
            Ok(Outcome::SessionEnded) => return String::new(),
            Err(error) => {
                warn!(file_id, %error, "Failed to resolve download URL");
                return String::new();
            }
        };

        envelope
            .into_typed::<DownloadUrl>()
            .ok()
            .and_then(|download| download.url)
            .unwrap_or_default()
    }
}
