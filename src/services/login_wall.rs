use anyhow::anyhow;
use scraper::{Html, Selector};

use crate::configuration::LoginWallSettings;

/// Recognizes LinkedIn's authentication redirects. Runs after navigation and
/// before extraction; a wall is a reportable outcome, not an error.
pub struct LoginWallDetector {
    url_markers: Vec<String>,
    form_selector: Selector,
}

impl LoginWallDetector {
    pub fn new(settings: &LoginWallSettings) -> anyhow::Result<Self> {
        let form_selector = Selector::parse(&settings.form_selector)
            .map_err(|e| anyhow!("Invalid login form selector: {}", e))?;

        Ok(LoginWallDetector {
            url_markers: settings
                .url_markers
                .iter()
                .map(|marker| marker.to_lowercase())
                .collect(),
            form_selector,
        })
    }

    pub fn is_login_wall(&self, current_url: &str, document: &Html) -> bool {
        let url = current_url.to_lowercase();
        if self.url_markers.iter().any(|marker| url.contains(marker)) {
            return true;
        }

        document.select(&self.form_selector).next().is_some()
    }
}
