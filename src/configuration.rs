use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webdriver: WebdriverSettings,
    pub scraper: ScraperSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub include_error_stack: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct WebdriverSettings {
    pub server_url: String,
    pub headless: bool,
    pub browser_binary: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_load_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub script_timeout_ms: u64,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agents: Vec<String>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ScraperSettings {
    pub jobs_path_suffix: String,
    pub navigation: NavigationSettings,
    pub login_wall: LoginWallSettings,
    pub extraction: ExtractionSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct NavigationSettings {
    pub max_attempts: u8,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub retry_delay_ms: u64,
    // Read by the retry loop's configuration only; the loop itself sleeps a
    // fixed delay. TODO: feed retry_jitter_ms into the inter-attempt sleep.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub retry_jitter_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_timeout_ms: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct LoginWallSettings {
    pub url_markers: Vec<String>,
    pub form_selector: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct ExtractionSettings {
    pub count_header_selector: String,
    pub count_attribute_selector: String,
    pub count_attribute: String,
    pub text_patterns: Vec<String>,
    pub job_card_selectors: Vec<String>,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
