//! chromiumoxide-backed [`SessionFactory`]
//!
//! Every `open()` launches a new Chrome process with its own profile
//! directory. Nothing is pooled or reused.

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide_cdp::cdp::js_protocol::runtime::{CallArgument, CallFunctionOnParams};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::browser::{BrowserError, BrowserResult, BrowserWrapper, create_blank_page, launch_browser};
use crate::config::Config;
use crate::driver::{NavigationResponse, PageDriver, PageSession, SessionFactory, WaitStrategy};
use crate::page_extractor::js_scripts::READY_STATE_JS;
use crate::utils::{navigation_timeout, wait_for_element};

const VISIBILITY_FN: &str = r#"(selector) => {
    const el = document.querySelector(selector);
    if (!el) return false;
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden' || style.opacity === '0') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}"#;

pub struct ChromiumSessionFactory {
    headless: bool,
    window: crate::config::WindowConfig,
    request_timeout: Duration,
}

impl ChromiumSessionFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            window: config.window.clone(),
            request_timeout: navigation_timeout(config.navigation_timeout_ms),
        }
    }
}

#[async_trait]
impl SessionFactory for ChromiumSessionFactory {
    type Session = ChromiumSession;

    async fn open(&self) -> BrowserResult<ChromiumSession> {
        let user_data_dir =
            std::env::temp_dir().join(format!("profile_scraper_{}", uuid::Uuid::new_v4()));

        let (browser, handler) = launch_browser(
            self.headless,
            &self.window,
            self.request_timeout,
            user_data_dir.clone(),
        )
        .await
        .map_err(|e| BrowserError::LaunchFailed(format!("{e:#}")))?;

        let mut wrapper = BrowserWrapper::new(browser, handler, user_data_dir);
        let page = match create_blank_page(&wrapper).await {
            Ok(page) => page,
            Err(e) => {
                wrapper.shutdown().await;
                return Err(BrowserError::PageCreationFailed(format!("{e:#}")));
            }
        };

        info!("Browser session opened");
        Ok(ChromiumSession { wrapper, page })
    }
}

pub struct ChromiumSession {
    wrapper: BrowserWrapper,
    page: Page,
}

impl ChromiumSession {
    async fn wait_for_dom_ready(&self) -> BrowserResult<()> {
        let mut interval = Duration::from_millis(50);
        loop {
            let state = self.evaluate(READY_STATE_JS).await?;
            if state.as_str().is_some_and(|s| s != "loading") {
                return Ok(());
            }
            tokio::time::sleep(interval).await;
            interval = (interval * 2).min(Duration::from_millis(500));
        }
    }
}

async fn bounded<T, F>(what: &str, timeout: Duration, fut: F) -> BrowserResult<T>
where
    F: std::future::Future<Output = BrowserResult<T>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| BrowserError::Timeout(format!("{} after {}ms", what, timeout.as_millis())))?
}

#[async_trait]
impl PageDriver for ChromiumSession {
    async fn navigate(
        &self,
        url: &str,
        wait: WaitStrategy,
        timeout: Duration,
    ) -> BrowserResult<Option<NavigationResponse>> {
        bounded("navigation", timeout, async {
            self.page
                .goto(url)
                .await
                .map_err(|e| BrowserError::NavigationFailed(format!("{url}: {e}")))?;

            match wait {
                WaitStrategy::Load => {
                    self.page
                        .wait_for_navigation()
                        .await
                        .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
                }
                WaitStrategy::DomContentLoaded => self.wait_for_dom_ready().await?,
            }

            let request = self
                .page
                .wait_for_navigation_response()
                .await
                .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;

            let Some(request) = request else {
                return Ok(None);
            };
            let status = request
                .response
                .as_ref()
                .and_then(|r| u16::try_from(r.status).ok());
            let final_url = self.current_url().await.unwrap_or_else(|_| url.to_string());

            Ok(Some(NavigationResponse {
                status,
                url: final_url,
            }))
        })
        .await
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<Value> {
        let value: Value = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?;
        Ok(value)
    }

    async fn evaluate_function(&self, declaration: &str, args: Vec<Value>) -> BrowserResult<Value> {
        let mut builder = CallFunctionOnParams::builder().function_declaration(declaration);
        for arg in args {
            builder = builder.argument(CallArgument::builder().value(arg).build());
        }
        let call = builder
            .build()
            .map_err(|e| BrowserError::Evaluation(format!("Failed to build call params: {e}")))?;

        let value: Value = self
            .page
            .evaluate_function(call)
            .await?
            .into_value()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?;
        Ok(value)
    }

    async fn count(&self, selector: &str, timeout: Duration) -> BrowserResult<usize> {
        bounded("count", timeout, async {
            // chromiumoxide reports "no node" as an error on some selectors
            Ok(self
                .page
                .find_elements(selector)
                .await
                .map(|els| els.len())
                .unwrap_or(0))
        })
        .await
    }

    async fn is_visible(&self, selector: &str, timeout: Duration) -> BrowserResult<bool> {
        bounded("visibility check", timeout, async {
            let value = self
                .evaluate_function(VISIBILITY_FN, vec![Value::String(selector.to_string())])
                .await?;
            Ok(value.as_bool().unwrap_or(false))
        })
        .await
    }

    async fn click(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let element = wait_for_element(&self.page, selector, timeout).await?;
        bounded("click", timeout, async {
            element
                .click()
                .await
                .map_err(|e| BrowserError::Interaction(format!("click '{selector}': {e}")))?;
            Ok(())
        })
        .await
    }

    async fn press_key(&self, key: &str) -> BrowserResult<()> {
        let body = self
            .page
            .find_element("body")
            .await
            .map_err(|e| BrowserError::Interaction(format!("no body to send '{key}' to: {e}")))?;
        body.press_key(key)
            .await
            .map_err(|e| BrowserError::Interaction(format!("press '{key}': {e}")))?;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn title(&self) -> BrowserResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn full_markup(&self) -> BrowserResult<String> {
        Ok(self.page.content().await?)
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn close(self) {
        let ChromiumSession { mut wrapper, page } = self;
        if let Err(e) = page.close().await {
            debug!("Page close failed (browser shutdown follows): {}", e);
        }
        wrapper.shutdown().await;
        info!("Browser session closed");
    }
}
