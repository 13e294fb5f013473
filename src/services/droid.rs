use std::time::Duration;

use anyhow::Context;
use fake_user_agent::get_chrome_rua;
use rand::seq::SliceRandom;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::configuration::WebdriverSettings;

// Evaluated before any page script runs, so LinkedIn's bot checks see a
// regular browser profile.
const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
window.chrome = window.chrome || { runtime: {} };
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
"#;

/// Process-wide browser handle. Built once at startup and shared by every
/// request; each scrape gets its own isolated WebDriver session from
/// `new_session`, so requests never share page state.
pub struct Droid {
    settings: WebdriverSettings,
}

impl Droid {
    pub fn new(settings: WebdriverSettings) -> Self {
        Droid { settings }
    }

    pub async fn new_session(&self) -> anyhow::Result<WebDriver> {
        let mut caps = DesiredCapabilities::chrome();
        if self.settings.headless {
            caps.add_arg("--headless=new")?;
        }
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            self.settings.window_width, self.settings.window_height
        ))?;
        caps.add_arg(&format!("--user-agent={}", self.pick_user_agent()))?;
        if let Some(binary) = &self.settings.browser_binary {
            caps.set_binary(binary)?;
        }

        let driver = WebDriver::new(&self.settings.server_url, caps)
            .await
            .with_context(|| {
                format!(
                    "Failed to open a browser session on {}",
                    self.settings.server_url
                )
            })?;

        driver
            .set_page_load_timeout(Duration::from_millis(self.settings.page_load_timeout_ms))
            .await?;
        driver
            .set_script_timeout(Duration::from_millis(self.settings.script_timeout_ms))
            .await?;

        let dev_tools = ChromeDevTools::new(driver.handle.clone());
        dev_tools
            .execute_cdp_with_params(
                "Page.addScriptToEvaluateOnNewDocument",
                serde_json::json!({ "source": STEALTH_SCRIPT }),
            )
            .await?;

        Ok(driver)
    }

    fn pick_user_agent(&self) -> String {
        match self.settings.user_agents.choose(&mut rand::thread_rng()) {
            Some(user_agent) => user_agent.clone(),
            None => get_chrome_rua().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Droid;
    use crate::configuration::WebdriverSettings;

    fn settings_with_agents(user_agents: Vec<String>) -> WebdriverSettings {
        WebdriverSettings {
            server_url: "http://localhost:9515".to_string(),
            headless: true,
            browser_binary: None,
            page_load_timeout_ms: 10_000,
            script_timeout_ms: 20_000,
            window_width: 1366,
            window_height: 768,
            user_agents,
        }
    }

    #[test]
    fn pick_user_agent_prefers_the_configured_list() {
        let droid = Droid::new(settings_with_agents(vec!["Mozilla/5.0 (test)".to_string()]));

        assert_eq!(droid.pick_user_agent(), "Mozilla/5.0 (test)");
    }

    #[test]
    fn pick_user_agent_falls_back_when_the_list_is_empty() {
        let droid = Droid::new(settings_with_agents(vec![]));

        assert!(!droid.pick_user_agent().is_empty());
    }
}
