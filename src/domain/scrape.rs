use serde::{Serialize, Serializer};

pub struct ScrapeRequest {
    pub linkedin_url: String,
    pub company_name: String,
}

/// Every scrape ends in exactly one of these.
#[derive(Debug, PartialEq)]
pub enum ScrapeOutcome {
    Count {
        count: u64,
        source: &'static str,
        url: String,
    },
    LoginWall {
        url: String,
    },
    CountNotFound {
        url: String,
    },
    NavigationFailed {
        url: String,
        reason: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum OpeningsCount {
    Count(u64),
    NotAvailable,
}

impl Serialize for OpeningsCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OpeningsCount::Count(count) => serializer.serialize_u64(*count),
            OpeningsCount::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// The one response shape every code path produces.
#[derive(Debug, Serialize)]
pub struct ScrapeResult {
    pub company_name: String,
    pub openings_count: OpeningsCount,
    pub source: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScrapeResult {
    pub fn from_outcome(company_name: &str, outcome: ScrapeOutcome) -> Self {
        match outcome {
            ScrapeOutcome::Count { count, source, url } => ScrapeResult {
                company_name: company_name.to_string(),
                openings_count: OpeningsCount::Count(count),
                source: source.to_string(),
                url,
                reason: None,
            },
            ScrapeOutcome::LoginWall { url } => ScrapeResult {
                company_name: company_name.to_string(),
                openings_count: OpeningsCount::NotAvailable,
                source: "login-wall".to_string(),
                url,
                reason: Some("LinkedIn requires authentication".to_string()),
            },
            ScrapeOutcome::CountNotFound { url } => ScrapeResult {
                company_name: company_name.to_string(),
                openings_count: OpeningsCount::NotAvailable,
                source: "none".to_string(),
                url,
                reason: Some("Job count not found on page".to_string()),
            },
            ScrapeOutcome::NavigationFailed { url, reason } => ScrapeResult {
                company_name: company_name.to_string(),
                openings_count: OpeningsCount::NotAvailable,
                source: "none".to_string(),
                url,
                reason: Some(reason),
            },
        }
    }
}
