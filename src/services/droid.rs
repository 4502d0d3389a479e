use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use thirtyfour::{
    prelude::*, CapabilitiesHelper, ChromiumLikeCapabilities, DesiredCapabilities, Proxy,
};

use crate::{
    configuration::WebDriverSettings,
    domain::selector::Selector,
    services::page::{Element, Page, Session},
};

/// WebDriver key code for Enter.
const ENTER_KEY: &str = "\u{e007}";

/// Scrolls the nearest scrollable ancestor of the element under the viewport
/// centre, falling back to the document. Mirrors a mouse wheel at that point.
const WHEEL_SCRIPT: &str = r#"
const [dx, dy] = arguments;
let el = document.elementFromPoint(window.innerWidth / 2, window.innerHeight / 2);
while (el && el !== document.body) {
    const style = window.getComputedStyle(el);
    if (/(auto|scroll)/.test(style.overflowY) && el.scrollHeight > el.clientHeight) {
        el.scrollBy(dx, dy);
        return;
    }
    el = el.parentElement;
}
(document.scrollingElement || document.documentElement).scrollBy(dx, dy);
"#;

pub struct Droid {
    pub driver: WebDriver,
}

fn by(selector: &Selector) -> By {
    match selector {
        Selector::Css(query) => By::Css(query.as_str()),
        Selector::XPath(query) => By::XPath(query.as_str()),
    }
}

impl Droid {
    pub async fn launch(settings: &WebDriverSettings) -> anyhow::Result<Self> {
        let mut caps = DesiredCapabilities::chrome();

        if settings.headless {
            caps.set_headless()?;
        }
        for arg in settings.extra_args.iter() {
            caps.add_arg(arg)?;
        }
        caps.add_arg(&format!(
            "--window-size={},{}",
            settings.window_width, settings.window_height
        ))?;

        let user_agent = match (&settings.user_agent, settings.random_user_agent) {
            (Some(agent), false) => agent.to_string(),
            _ => fake_user_agent::get_rua().to_string(),
        };
        caps.add_arg(&format!("--user-agent={}", user_agent))?;

        if let Some(proxy_url) = &settings.proxy {
            let proxy = Proxy::Manual {
                ftp_proxy: None,
                http_proxy: Some(proxy_url.clone()),
                ssl_proxy: Some(proxy_url.clone()),
                socks_proxy: None,
                socks_version: None,
                socks_username: None,
                socks_password: None,
                no_proxy: None,
            };
            caps.set_proxy(proxy)?;
        }

        log::info!("Connecting to webdriver at {}", settings.url);
        let driver = WebDriver::new(&settings.url, caps)
            .await
            .with_context(|| format!("Failed to start a browser session at {}", settings.url))?;

        Ok(Droid { driver })
    }
}

#[async_trait]
impl Page for Droid {
    type Element = WebElement;

    async fn goto(&self, url: &str, timeout: Duration) -> anyhow::Result<()> {
        tokio::time::timeout(timeout, self.driver.goto(url))
            .await
            .with_context(|| format!("Navigation to {} timed out", url))??;
        Ok(())
    }

    async fn find_all(&self, selector: &Selector) -> anyhow::Result<Vec<WebElement>> {
        Ok(self.driver.find_all(by(selector)).await?)
    }

    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> anyhow::Result<()> {
        self.driver
            .query(by(selector))
            .wait(timeout, Duration::from_millis(250))
            .first()
            .await
            .with_context(|| format!("Timed out waiting for {}", selector))?;
        Ok(())
    }

    async fn scroll_by(&self, dx: i64, dy: i64) -> anyhow::Result<()> {
        self.driver
            .execute(WHEEL_SCRIPT, vec![json!(dx), json!(dy)])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Session for Droid {
    async fn close(self) -> anyhow::Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

#[async_trait]
impl Element for WebElement {
    async fn find_all(&self, selector: &Selector) -> anyhow::Result<Vec<WebElement>> {
        Ok(WebElement::find_all(self, by(selector)).await?)
    }

    async fn text(&self) -> anyhow::Result<String> {
        Ok(WebElement::text(self).await?)
    }

    async fn attr(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(WebElement::attr(self, name).await?)
    }

    async fn click(&self) -> anyhow::Result<()> {
        Ok(WebElement::click(self).await?)
    }

    async fn fill(&self, text: &str) -> anyhow::Result<()> {
        self.clear().await?;
        Ok(self.send_keys(text).await?)
    }

    async fn submit(&self) -> anyhow::Result<()> {
        Ok(self.send_keys(ENTER_KEY).await?)
    }

    async fn scroll_into_view(&self) -> anyhow::Result<()> {
        Ok(WebElement::scroll_into_view(self).await?)
    }
}
