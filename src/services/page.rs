use std::time::Duration;

use async_trait::async_trait;

use crate::domain::selector::Selector;

/// A lookup that produced nothing usable. Callers map it to a zero-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no selector candidate matched")]
pub struct NotFound;

/// The browser capabilities the scraper needs from a live page.
#[async_trait]
pub trait Page: Send + Sync {
    type Element: Element;

    async fn goto(&self, url: &str, timeout: Duration) -> anyhow::Result<()>;

    async fn find_all(&self, selector: &Selector) -> anyhow::Result<Vec<Self::Element>>;

    /// Fails if nothing matches `selector` within `timeout`.
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> anyhow::Result<()>;

    /// Wheel-style scroll of whatever is under the viewport centre.
    async fn scroll_by(&self, dx: i64, dy: i64) -> anyhow::Result<()>;

    async fn count(&self, selector: &Selector) -> anyhow::Result<usize> {
        Ok(self.find_all(selector).await?.len())
    }

    async fn first(&self, selector: &Selector) -> anyhow::Result<Option<Self::Element>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }
}

#[async_trait]
pub trait Element: Send + Sync + Sized {
    async fn find_all(&self, selector: &Selector) -> anyhow::Result<Vec<Self>>;

    async fn text(&self) -> anyhow::Result<String>;

    async fn attr(&self, name: &str) -> anyhow::Result<Option<String>>;

    async fn click(&self) -> anyhow::Result<()>;

    async fn fill(&self, text: &str) -> anyhow::Result<()>;

    async fn submit(&self) -> anyhow::Result<()>;

    async fn scroll_into_view(&self) -> anyhow::Result<()>;

    async fn first(&self, selector: &Selector) -> anyhow::Result<Option<Self>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }
}

/// A page that owns a browser session which must be shut down.
#[async_trait]
pub trait Session: Page + Sized {
    async fn close(self) -> anyhow::Result<()>;
}

/// Anything selectors can be resolved against: the whole page or one element.
#[async_trait]
pub trait Scope: Send + Sync {
    type Element: Element;

    async fn locate(&self, selector: &Selector) -> anyhow::Result<Vec<Self::Element>>;
}

pub struct PageScope<'a, P>(pub &'a P);

#[async_trait]
impl<'a, P: Page> Scope for PageScope<'a, P> {
    type Element = P::Element;

    async fn locate(&self, selector: &Selector) -> anyhow::Result<Vec<P::Element>> {
        self.0.find_all(selector).await
    }
}

#[async_trait]
impl<E: Element> Scope for E {
    type Element = E;

    async fn locate(&self, selector: &Selector) -> anyhow::Result<Vec<E>> {
        self.find_all(selector).await
    }
}
