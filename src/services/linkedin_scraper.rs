use scraper::Html;
use thirtyfour::WebDriver;
use url::Url;
use uuid::Uuid;

use crate::configuration::ScraperSettings;
use crate::domain::scrape::{ScrapeOutcome, ScrapeRequest, ScrapeResult};
use crate::services::{Droid, JobCountExtractor, LoginWallDetector, Navigator};

/// Runs one full scrape cycle: normalize the URL, open a session, navigate,
/// check for a login wall, extract the count, and fold every path into a
/// single `ScrapeResult`.
pub struct LinkedinScraper {
    jobs_path_suffix: String,
    navigator: Navigator,
    login_wall: LoginWallDetector,
    extractor: JobCountExtractor,
}

impl LinkedinScraper {
    pub fn new(settings: &ScraperSettings) -> anyhow::Result<Self> {
        Ok(LinkedinScraper {
            jobs_path_suffix: settings.jobs_path_suffix.clone(),
            navigator: Navigator::new(&settings.navigation),
            login_wall: LoginWallDetector::new(&settings.login_wall)?,
            extractor: JobCountExtractor::new(&settings.extraction)?,
        })
    }

    /// Only session acquisition can fail here; everything after it is folded
    /// into the outcome, and the session is closed exactly once per request.
    pub async fn scrape_company(
        &self,
        droid: &Droid,
        request: &ScrapeRequest,
    ) -> anyhow::Result<ScrapeResult> {
        let scrape_id = Uuid::new_v4();
        let jobs_url = build_jobs_url(&request.linkedin_url, &self.jobs_path_suffix);
        log::info!(
            "[{}] Scraping job count for {} at {}",
            scrape_id,
            request.company_name,
            jobs_url
        );

        let session = droid.new_session().await?;
        let outcome = self.run(&session, &jobs_url).await;
        if let Err(e) = session.quit().await {
            log::error!("[{}] Failed to close browser session: {:?}", scrape_id, e);
        }

        log::info!("[{}] Outcome: {:?}", scrape_id, outcome);
        Ok(ScrapeResult::from_outcome(&request.company_name, outcome))
    }

    // Never returns early past a live session; the caller owns teardown.
    async fn run(&self, driver: &WebDriver, jobs_url: &str) -> ScrapeOutcome {
        if let Err(e) = self.navigator.navigate(driver, jobs_url).await {
            return ScrapeOutcome::NavigationFailed {
                url: jobs_url.to_string(),
                reason: format!("{:#}", e),
            };
        }

        let current_url = match driver.current_url().await {
            Ok(url) => url.to_string(),
            Err(e) => {
                return ScrapeOutcome::NavigationFailed {
                    url: jobs_url.to_string(),
                    reason: e.to_string(),
                }
            }
        };
        let page_source = match driver.source().await {
            Ok(source) => source,
            Err(e) => {
                return ScrapeOutcome::NavigationFailed {
                    url: current_url,
                    reason: e.to_string(),
                }
            }
        };

        self.assess_page(&current_url, &page_source)
    }

    /// Pure post-navigation pipeline over a page snapshot. The login wall
    /// check always runs before extraction.
    fn assess_page(&self, current_url: &str, page_source: &str) -> ScrapeOutcome {
        let document = Html::parse_document(page_source);

        if self.login_wall.is_login_wall(current_url, &document) {
            return ScrapeOutcome::LoginWall {
                url: current_url.to_string(),
            };
        }

        match self.extractor.extract(&document) {
            Some(found) => ScrapeOutcome::Count {
                count: found.count,
                source: found.source,
                url: current_url.to_string(),
            },
            None => ScrapeOutcome::CountNotFound {
                url: current_url.to_string(),
            },
        }
    }
}

pub fn build_jobs_url(linkedin_url: &str, suffix: &str) -> String {
    // Query strings and fragments would otherwise end up inside the jobs path.
    let base = match Url::parse(linkedin_url.trim()) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => linkedin_url.trim().to_string(),
    };

    let trimmed = base.trim_end_matches('/');
    match trimmed.ends_with("/jobs") {
        true => format!("{}/", trimmed),
        false => format!("{}{}", trimmed, suffix),
    }
}
