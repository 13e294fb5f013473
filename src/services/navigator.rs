use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use thirtyfour::WebDriver;

use crate::configuration::NavigationSettings;

// Resolves true once document.readyState is complete and the resource count
// has been stable for a full second, false when the budget runs out.
const SETTLE_SCRIPT: &str = r#"
var timeoutMs = arguments[0];
var done = arguments[arguments.length - 1];
var intervalMs = 250;
var requiredStableMs = 1000;
var start = Date.now();
var stableMs = 0;
var lastCount = performance.getEntriesByType('resource').length;

var timer = setInterval(function () {
    var count = performance.getEntriesByType('resource').length;
    if (document.readyState === 'complete' && count === lastCount) {
        stableMs += intervalMs;
        if (stableMs >= requiredStableMs) {
            clearInterval(timer);
            done(true);
            return;
        }
    } else {
        stableMs = 0;
    }
    lastCount = count;
    if (Date.now() - start >= timeoutMs) {
        clearInterval(timer);
        done(false);
    }
}, intervalMs);
"#;

/// Drives a page to its jobs URL and waits for the document to settle,
/// retrying failed attempts on a fixed delay.
pub struct Navigator {
    max_attempts: u8,
    retry_delay: Duration,
    settle_timeout_ms: u64,
}

impl Navigator {
    pub fn new(settings: &NavigationSettings) -> Self {
        Navigator {
            max_attempts: settings.max_attempts,
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
            settle_timeout_ms: settings.settle_timeout_ms,
        }
    }

    pub async fn navigate(&self, driver: &WebDriver, url: &str) -> anyhow::Result<()> {
        retry_with_fixed_delay(self.max_attempts, self.retry_delay, || async move {
            driver
                .goto(url)
                .await
                .with_context(|| format!("Failed to open {}", url))?;
            self.wait_until_settled(driver).await
        })
        .await
    }

    async fn wait_until_settled(&self, driver: &WebDriver) -> anyhow::Result<()> {
        let ret = driver
            .execute_async(
                SETTLE_SCRIPT,
                vec![serde_json::json!(self.settle_timeout_ms)],
            )
            .await
            .context("Network idle wait script failed")?;
        let settled: bool = ret
            .convert()
            .context("Network idle wait script returned a non-boolean")?;

        match settled {
            true => Ok(()),
            false => anyhow::bail!(
                "Page did not reach network idle within {}ms",
                self.settle_timeout_ms
            ),
        }
    }
}

/// Runs `operation` up to `max_attempts` times with a fixed sleep between
/// attempts. Every failure before the last is logged and swallowed; the last
/// attempt's error is returned verbatim.
pub async fn retry_with_fixed_delay<T, F, Fut>(
    max_attempts: u8,
    delay: Duration,
    mut operation: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    for attempt in 1..max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("Attempt {}/{} failed: {:#}", attempt, max_attempts, e);
                tokio::time::sleep(delay).await;
            }
        }
    }

    operation().await
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::retry_with_fixed_delay;

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds_within_budget() {
        let calls = Cell::new(0u8);
        let calls = &calls;

        let result = retry_with_fixed_delay(3, Duration::from_millis(1), || async move {
            calls.set(calls.get() + 1);
            match calls.get() < 3 {
                true => anyhow::bail!("connection reset"),
                false => Ok("loaded"),
            }
        })
        .await;

        assert_eq!(result.unwrap(), "loaded");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn returns_the_last_error_after_exactly_max_attempts() {
        let calls = Cell::new(0u8);
        let calls = &calls;

        let result: anyhow::Result<()> =
            retry_with_fixed_delay(3, Duration::from_millis(1), || async move {
                calls.set(calls.get() + 1);
                anyhow::bail!("attempt {} timed out", calls.get())
            })
            .await;

        assert_eq!(calls.get(), 3);
        assert_eq!(result.unwrap_err().to_string(), "attempt 3 timed out");
    }

    #[tokio::test]
    async fn a_single_attempt_budget_never_sleeps_or_retries() {
        let calls = Cell::new(0u8);
        let calls = &calls;

        let result: anyhow::Result<()> =
            retry_with_fixed_delay(1, Duration::from_secs(3600), || async move {
                calls.set(calls.get() + 1);
                anyhow::bail!("no route to host")
            })
            .await;

        assert_eq!(calls.get(), 1);
        assert!(result.is_err());
    }
}
