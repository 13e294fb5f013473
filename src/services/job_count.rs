use anyhow::{anyhow, Context};
use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};

use crate::configuration::ExtractionSettings;

#[derive(Debug, PartialEq)]
pub struct JobCountMatch {
    pub count: u64,
    pub source: &'static str,
}

type Strategy = fn(&JobCountExtractor, &Html) -> Option<u64>;

// LinkedIn's markup shifts by account, locale and session, so each stage is a
// weaker but more general heuristic than the one before it. First match wins.
const STRATEGIES: [(&str, Strategy); 5] = [
    ("count-header", JobCountExtractor::from_count_header),
    ("count-attribute", JobCountExtractor::from_count_attribute),
    ("text-pattern", JobCountExtractor::from_text_patterns),
    ("element-scan", JobCountExtractor::from_element_scan),
    ("job-cards", JobCountExtractor::from_job_cards),
];

pub struct JobCountExtractor {
    count_header: Selector,
    count_attribute_selector: Selector,
    count_attribute: String,
    text_patterns: Vec<Regex>,
    job_cards: Vec<Selector>,
    any_element: Selector,
}

impl JobCountExtractor {
    pub fn new(settings: &ExtractionSettings) -> anyhow::Result<Self> {
        let text_patterns = settings
            .text_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Invalid job count pattern: {}", pattern))
            })
            .collect::<anyhow::Result<Vec<Regex>>>()?;
        let job_cards = settings
            .job_card_selectors
            .iter()
            .map(|selector| parse_selector(selector))
            .collect::<anyhow::Result<Vec<Selector>>>()?;

        Ok(JobCountExtractor {
            count_header: parse_selector(&settings.count_header_selector)?,
            count_attribute_selector: parse_selector(&settings.count_attribute_selector)?,
            count_attribute: settings.count_attribute.clone(),
            text_patterns,
            job_cards,
            any_element: parse_selector("*")?,
        })
    }

    pub fn extract(&self, document: &Html) -> Option<JobCountMatch> {
        STRATEGIES.iter().find_map(|(source, strategy)| {
            strategy(self, document).map(|count| JobCountMatch {
                count,
                source: *source,
            })
        })
    }

    fn from_count_header(&self, document: &Html) -> Option<u64> {
        let element = document.select(&self.count_header).next()?;
        let text = element.text().collect::<Vec<_>>().join(" ");

        leading_count(&text)
    }

    fn from_count_attribute(&self, document: &Html) -> Option<u64> {
        let element = document.select(&self.count_attribute_selector).next()?;
        let value = element.value().attr(&self.count_attribute)?;

        value.trim().replace(',', "").parse().ok()
    }

    fn from_text_patterns(&self, document: &Html) -> Option<u64> {
        let page_text = document.root_element().text().collect::<Vec<_>>().join(" ");

        self.text_patterns.iter().find_map(|pattern| {
            pattern
                .captures(&page_text)
                .and_then(|captures| captures.get(1))
                .and_then(|group| parse_count(group.as_str()))
        })
    }

    fn from_element_scan(&self, document: &Html) -> Option<u64> {
        document.select(&self.any_element).find_map(|element| {
            let text = element.text().collect::<String>();
            match text.to_lowercase().contains("job") {
                true => first_count(&text),
                false => None,
            }
        })
    }

    fn from_job_cards(&self, document: &Html) -> Option<u64> {
        self.job_cards.iter().find_map(|selector| {
            let cards = document.select(selector).count() as u64;
            match cards > 0 {
                true => Some(cards),
                false => None,
            }
        })
    }
}

fn parse_selector(selector: &str) -> anyhow::Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector `{}`: {}", selector, e))
}

fn parse_count(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

// "1,204 jobs" -> 1204. The count has to lead the text.
fn leading_count(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    parse_count(&digits)
}

// First digit run anywhere in the text, thousands separators included.
fn first_count(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    parse_count(&digits)
}
