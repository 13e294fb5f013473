use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::configuration::ApplicationSettings;
use crate::domain::scrape::ScrapeRequest;
use crate::services::{Droid, LinkedinScraper};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeBody {
    linkedin_url: Option<String>,
    company_name: Option<String>,
}

#[post("/scrape")]
async fn scrape(
    body: web::Json<ScrapeBody>,
    droid: web::Data<Droid>,
    scraper: web::Data<LinkedinScraper>,
    settings: web::Data<ApplicationSettings>,
) -> HttpResponse {
    let body = body.into_inner();
    let request = match (body.linkedin_url, body.company_name) {
        (Some(linkedin_url), Some(company_name)) => ScrapeRequest {
            linkedin_url,
            company_name,
        },
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing required parameters",
                "required": ["linkedinUrl", "companyName"],
            }))
        }
    };

    match scraper.scrape_company(&droid, &request).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            log::error!(
                "Scrape for {} failed outside the orchestrator: {:?}",
                request.company_name,
                e
            );
            let mut payload = serde_json::json!({ "error": e.to_string() });
            if settings.include_error_stack {
                payload["stack"] = serde_json::Value::String(format!("{:?}", e));
            }
            HttpResponse::InternalServerError().json(payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};

    use crate::configuration::{
        ApplicationSettings, ExtractionSettings, LoginWallSettings, NavigationSettings,
        ScraperSettings, WebdriverSettings,
    };
    use crate::services::{Droid, LinkedinScraper};

    fn test_app_data() -> (
        web::Data<Droid>,
        web::Data<LinkedinScraper>,
        web::Data<ApplicationSettings>,
    ) {
        let droid = Droid::new(WebdriverSettings {
            server_url: "http://localhost:9515".to_string(),
            headless: true,
            browser_binary: None,
            page_load_timeout_ms: 10_000,
            script_timeout_ms: 20_000,
            window_width: 1366,
            window_height: 768,
            user_agents: vec![],
        });
        let scraper = LinkedinScraper::new(&ScraperSettings {
            jobs_path_suffix: "/jobs/".to_string(),
            navigation: NavigationSettings {
                max_attempts: 3,
                retry_delay_ms: 1,
                retry_jitter_ms: 0,
                settle_timeout_ms: 1000,
            },
            login_wall: LoginWallSettings {
                url_markers: vec!["checkpoint".to_string(), "login".to_string()],
                form_selector: "form[action*='login']".to_string(),
            },
            extraction: ExtractionSettings {
                count_header_selector: ".results-context-header__job-count".to_string(),
                count_attribute_selector: "[data-results-count]".to_string(),
                count_attribute: "data-results-count".to_string(),
                text_patterns: vec![r"(\d[\d,]*)\s+jobs?\b".to_string()],
                job_card_selectors: vec![".job-card-container".to_string()],
            },
        })
        .unwrap();
        let settings = ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
            include_error_stack: true,
        };

        (
            web::Data::new(droid),
            web::Data::new(scraper),
            web::Data::new(settings),
        )
    }

    #[actix_web::test]
    async fn missing_fields_are_rejected_with_the_required_list() {
        let (droid, scraper, settings) = test_app_data();
        let app = test::init_service(
            App::new()
                .service(super::scrape)
                .app_data(droid)
                .app_data(scraper)
                .app_data(settings),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/scrape")
            .set_json(serde_json::json!({ "companyName": "Acme" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 400);

        let payload: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(payload["error"], "Missing required parameters");
        assert_eq!(
            payload["required"],
            serde_json::json!(["linkedinUrl", "companyName"])
        );
    }

    #[actix_web::test]
    async fn an_empty_body_is_rejected_the_same_way() {
        let (droid, scraper, settings) = test_app_data();
        let app = test::init_service(
            App::new()
                .service(super::scrape)
                .app_data(droid)
                .app_data(scraper)
                .app_data(settings),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/scrape")
            .set_json(serde_json::json!({}))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 400);
    }
}
