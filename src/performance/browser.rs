//! Headless Chrome renderer
//!
//! Every render launches its own browser with a throwaway profile directory,
//! navigates once and closes the browser again before returning. Request and
//! failure counts come from CDP network events observed while the page loads.

use crate::config::Config;
use crate::performance::collector::{PageRenderer, RenderedPage};
use crate::performance::record::ImageProbe;
use crate::SeoError;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::{Browser, BrowserConfig as ChromeConfig, Page};
use futures::StreamExt;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::{sleep_until, Instant};

/// Requests allowed to stay open while the network counts as idle
const IDLE_CONNECTION_LIMIT: usize = 2;

/// Collects paint timing, DOM size, images and JSON-LD blocks in one round trip
const DOM_PROBE: &str = r#"(() => {
    const paint = performance
        .getEntriesByType('paint')
        .find((entry) => entry.name === 'first-contentful-paint');
    return {
        fcp: paint ? paint.startTime : null,
        domSize: document.documentElement.outerHTML.length,
        images: Array.from(document.querySelectorAll('img')).map((img) => ({
            src: img.src || '',
            hasAlt: img.hasAttribute('alt'),
            altText: img.getAttribute('alt') || '',
        })),
        jsonLd: Array.from(
            document.querySelectorAll('script[type="application/ld+json"]')
        ).map((script) => script.textContent || ''),
    };
})()"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomProbe {
    fcp: Option<f64>,
    dom_size: usize,
    images: Vec<ImageProbe>,
    json_ld: Vec<String>,
}

/// Network bookkeeping for one navigation
///
/// The page settles once navigation has committed, no more than
/// `IDLE_CONNECTION_LIMIT` requests are open and no network event arrived
/// for the idle window.
#[derive(Debug)]
struct NetworkWatch {
    started: Instant,
    deadline: Instant,
    idle: Duration,
    last_event: Instant,
    navigated: bool,
    in_flight: HashSet<String>,
    total_requests: usize,
    failed_requests: usize,
}

impl NetworkWatch {
    fn new(started: Instant, timeout: Duration, idle: Duration) -> Self {
        Self {
            started,
            deadline: started + timeout,
            idle,
            last_event: started,
            navigated: false,
            in_flight: HashSet::new(),
            total_requests: 0,
            failed_requests: 0,
        }
    }

    fn navigated(&mut self, now: Instant) {
        self.navigated = true;
        self.last_event = now;
    }

    /// Redirect hops reuse their request id and count once per hop
    fn request_sent(&mut self, request_id: &str, now: Instant) {
        self.total_requests += 1;
        self.in_flight.insert(request_id.to_string());
        self.last_event = now;
    }

    fn request_finished(&mut self, request_id: &str, now: Instant) {
        self.in_flight.remove(request_id);
        self.last_event = now;
    }

    fn request_failed(&mut self, request_id: &str, now: Instant) {
        self.failed_requests += 1;
        self.in_flight.remove(request_id);
        self.last_event = now;
    }

    /// Instant at which the page counts as settled, if nothing else happens
    fn idle_at(&self) -> Option<Instant> {
        (self.navigated && self.in_flight.len() <= IDLE_CONNECTION_LIMIT)
            .then(|| self.last_event + self.idle)
    }

    fn is_idle(&self, now: Instant) -> bool {
        self.idle_at().is_some_and(|at| now >= at)
    }

    fn timed_out(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time from the start of navigation to the last network event
    fn load_time(&self) -> Duration {
        self.last_event.duration_since(self.started)
    }
}

/// `PageRenderer` driving a local Chrome/Chromium over CDP
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    executable: Option<String>,
    no_sandbox: bool,
    timeout: Duration,
    network_idle: Duration,
}

impl ChromeRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            executable: config.browser.executable.clone(),
            no_sandbox: config.browser.no_sandbox,
            timeout: Duration::from_secs(config.analysis.browser_timeout_secs),
            network_idle: Duration::from_millis(config.analysis.network_idle_ms),
        }
    }

    fn launch_config(&self, url: &str, profile: &Path) -> Result<ChromeConfig, SeoError> {
        let mut builder = ChromeConfig::builder()
            .request_timeout(self.timeout)
            .user_data_dir(profile)
            .arg("--disable-dev-shm-usage");

        if self.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(|e| browser_error(url, e))
    }

    /// Navigates and waits for the network to go idle, then probes the DOM
    async fn observe(&self, browser: &Browser, url: &str) -> Result<RenderedPage, SeoError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| browser_error(url, e))?;

        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|e| browser_error(url, e))?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(|e| browser_error(url, e))?;
        let mut failures = page
            .event_listener::<EventLoadingFailed>()
            .await
            .map_err(|e| browser_error(url, e))?;

        let mut watch = NetworkWatch::new(Instant::now(), self.timeout, self.network_idle);

        {
            let mut navigation = Box::pin(page.goto(url));

            loop {
                let idle_at = watch.idle_at();
                let settle_at = idle_at.unwrap_or(watch.deadline);

                tokio::select! {
                    result = &mut navigation, if !watch.navigated => {
                        result.map_err(|e| browser_error(url, e))?;
                        watch.navigated(Instant::now());
                    }
                    Some(event) = requests.next() => {
                        watch.request_sent(event.request_id.inner(), Instant::now());
                    }
                    Some(event) = finished.next() => {
                        watch.request_finished(event.request_id.inner(), Instant::now());
                    }
                    Some(event) = failures.next() => {
                        watch.request_failed(event.request_id.inner(), Instant::now());
                    }
                    _ = sleep_until(settle_at), if idle_at.is_some() => {}
                    _ = sleep_until(watch.deadline) => {}
                }

                let now = Instant::now();
                if watch.is_idle(now) {
                    break;
                }
                if watch.timed_out(now) {
                    return Err(SeoError::BrowserTimeout {
                        url: url.to_string(),
                        seconds: self.timeout.as_secs(),
                    });
                }
            }
        }

        let load_time = watch.load_time();
        let probe = probe_dom(&page, url).await?;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }

        Ok(RenderedPage {
            load_time,
            first_contentful_paint_ms: probe.fcp,
            dom_size: probe.dom_size,
            images: probe.images,
            json_ld_blocks: probe.json_ld,
            total_requests: watch.total_requests,
            failed_requests: watch.failed_requests,
        })
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, SeoError> {
        let profile = new_profile(url)?;
        let config = self.launch_config(url, profile.path())?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| browser_error(url, e))?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = self.observe(&browser, url).await;

        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser after {}: {}", url, e);
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("Browser process did not exit cleanly after {}: {}", url, e);
        }
        handle.abort();

        // Only removed once the browser process is gone
        if let Err(e) = profile.close() {
            tracing::debug!("Failed to remove browser profile for {}: {}", url, e);
        }

        result
    }
}

/// Fresh profile directory so no cookies, cache or workers outlive one render
fn new_profile(url: &str) -> Result<TempDir, SeoError> {
    tempfile::Builder::new()
        .prefix("seo-crawler-chrome-")
        .tempdir()
        .map_err(|e| browser_error(url, e))
}

async fn probe_dom(page: &Page, url: &str) -> Result<DomProbe, SeoError> {
    page.evaluate(DOM_PROBE)
        .await
        .map_err(|e| browser_error(url, e))?
        .into_value::<DomProbe>()
        .map_err(|e| browser_error(url, e))
}

fn browser_error(url: &str, error: impl Display) -> SeoError {
    SeoError::Browser {
        url: url.to_string(),
        message: error.to_string(),
    }
}
