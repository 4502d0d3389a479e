//! Scripted in-memory page for exercising the scraper without a browser.
//! Selectors are matched by exact equality against a lookup table.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use anyhow::bail;
use async_trait::async_trait;

use crate::{
    domain::selector::{Selector, SelectorConfig},
    services::page::{Element, Page, Session},
};

pub type Entries = Vec<(Selector, Vec<FakeNode>)>;

#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    text: Option<String>,
    attrs: Vec<(String, String)>,
    children: Entries,
    opens: Option<usize>,
    fail_click: bool,
}

impl FakeNode {
    pub fn text(text: &str) -> Self {
        FakeNode {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    /// A node whose every read fails.
    pub fn broken() -> Self {
        FakeNode::default()
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, selector: Selector, nodes: Vec<FakeNode>) -> Self {
        self.children.push((selector, nodes));
        self
    }

    pub fn opening(mut self, detail: usize) -> Self {
        self.opens = Some(detail);
        self
    }
}

struct Stored {
    text: Option<String>,
    attrs: Vec<(String, String)>,
    children: Vec<(Selector, Vec<usize>)>,
    opens: Option<usize>,
    fail_click: bool,
}

#[derive(Default)]
struct State {
    nodes: Vec<Stored>,
    listing: Option<Selector>,
    listings: Vec<usize>,
    per_scroll: usize,
    scrolls: usize,
    fixed: Vec<(Selector, Vec<usize>)>,
    details: Vec<Vec<(Selector, Vec<usize>)>>,
    current: Option<usize>,
    fail_goto: bool,
    fail_close: bool,
    visited: Vec<String>,
    typed: Vec<String>,
    submits: usize,
    clicks: usize,
    closed: bool,
}

impl State {
    fn store(&mut self, node: FakeNode) -> usize {
        let children = node
            .children
            .into_iter()
            .map(|(selector, nodes)| (selector, self.store_all(nodes)))
            .collect();

        self.nodes.push(Stored {
            text: node.text,
            attrs: node.attrs,
            children,
            opens: node.opens,
            fail_click: node.fail_click,
        });
        self.nodes.len() - 1
    }

    fn store_all(&mut self, nodes: Vec<FakeNode>) -> Vec<usize> {
        nodes.into_iter().map(|n| self.store(n)).collect()
    }

    fn store_entries(&mut self, entries: Entries) -> Vec<(Selector, Vec<usize>)> {
        entries
            .into_iter()
            .map(|(selector, nodes)| (selector, self.store_all(nodes)))
            .collect()
    }

    fn visible_listings(&self) -> usize {
        self.listings
            .len()
            .min(self.per_scroll.saturating_mul(1 + self.scrolls))
    }

    fn lookup(&self, selector: &Selector) -> Vec<usize> {
        if self.listing.as_ref() == Some(selector) {
            return self.listings[..self.visible_listings()].to_vec();
        }

        let detail = self.current.and_then(|i| self.details.get(i));
        self.fixed
            .iter()
            .chain(detail.into_iter().flatten())
            .filter(|(s, _)| s == selector)
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
}

impl FakePage {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// A results panel holding `available` listings, revealing `per_scroll`
    /// more on each scroll.
    pub fn with_listings(available: usize, per_scroll: usize) -> Self {
        let page = FakePage::default();
        {
            let mut state = page.lock();
            state.listing = Some(SelectorConfig::default().listing);
            state.per_scroll = per_scroll;
            let listings: Vec<usize> = (0..available)
                .map(|_| state_store_anchor(&mut state, None))
                .collect();
            state.listings = listings;
        }
        page
    }

    /// An already opened detail view.
    pub fn detail(entries: Entries) -> Self {
        let page = FakePage::default();
        {
            let mut state = page.lock();
            let detail = state.store_entries(entries);
            state.details.push(detail);
            state.current = Some(0);
        }
        page
    }

    /// A full search: a search box, one listing per detail view, each listing
    /// opening its detail view when clicked.
    pub fn search(details: Vec<Entries>) -> Self {
        let page = FakePage::default();
        {
            let mut state = page.lock();
            let selectors = SelectorConfig::default();
            let search_box = state.store(FakeNode::text(""));
            state.fixed.push((selectors.search_box, vec![search_box]));
            state.listing = Some(selectors.listing);
            state.per_scroll = details.len().max(1);

            for (i, entries) in details.into_iter().enumerate() {
                let anchor = state_store_anchor(&mut state, Some(i));
                state.listings.push(anchor);
                let detail = state.store_entries(entries);
                state.details.push(detail);
            }
        }
        page
    }

    /// Makes the listing at `index` fail when clicked.
    pub fn break_listing(self, index: usize) -> Self {
        {
            let mut state = self.lock();
            let anchor = state.listings[index];
            state.nodes[anchor].fail_click = true;
            let parents: Vec<usize> = state.nodes[anchor]
                .children
                .iter()
                .flat_map(|(_, ids)| ids.clone())
                .collect();
            for parent in parents {
                state.nodes[parent].fail_click = true;
            }
        }
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.lock().fail_goto = true;
        self
    }

    pub fn failing_close(self) -> Self {
        self.lock().fail_close = true;
        self
    }

    pub fn scrolls(&self) -> usize {
        self.lock().scrolls
    }

    pub fn clicks(&self) -> usize {
        self.lock().clicks
    }

    pub fn typed(&self) -> Vec<String> {
        self.lock().typed.clone()
    }

    pub fn submits(&self) -> usize {
        self.lock().submits
    }

    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// Listing anchors carry their clickable parent under the `..` selector.
fn state_store_anchor(state: &mut State, opens: Option<usize>) -> usize {
    let mut parent = FakeNode::text("");
    let mut anchor = FakeNode::text("").with_attr("href", "https://www.google.com/maps/place/x");
    if let Some(detail) = opens {
        parent = parent.opening(detail);
        anchor = anchor.opening(detail);
    }
    state.store(anchor.with_child(Selector::xpath(".."), vec![parent]))
}

pub struct FakeElement {
    state: Arc<Mutex<State>>,
    id: usize,
}

impl FakeElement {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Page for FakePage {
    type Element = FakeElement;

    async fn goto(&self, url: &str, _timeout: Duration) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_goto {
            bail!("navigation to {} timed out", url);
        }
        state.visited.push(url.to_string());
        Ok(())
    }

    async fn find_all(&self, selector: &Selector) -> anyhow::Result<Vec<FakeElement>> {
        let ids = self.lock().lookup(selector);
        Ok(ids
            .into_iter()
            .map(|id| FakeElement {
                state: self.state.clone(),
                id,
            })
            .collect())
    }

    async fn wait_for(&self, selector: &Selector, _timeout: Duration) -> anyhow::Result<()> {
        match self.lock().lookup(selector).is_empty() {
            true => bail!("timed out waiting for {}", selector),
            false => Ok(()),
        }
    }

    async fn scroll_by(&self, _dx: i64, _dy: i64) -> anyhow::Result<()> {
        self.lock().scrolls += 1;
        Ok(())
    }
}

#[async_trait]
impl Session for FakePage {
    async fn close(self) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_close {
            bail!("browser already gone");
        }
        state.closed = true;
        Ok(())
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn find_all(&self, selector: &Selector) -> anyhow::Result<Vec<FakeElement>> {
        let ids: Vec<usize> = self.lock().nodes[self.id]
            .children
            .iter()
            .filter(|(s, _)| s == selector)
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();

        Ok(ids
            .into_iter()
            .map(|id| FakeElement {
                state: self.state.clone(),
                id,
            })
            .collect())
    }

    async fn text(&self) -> anyhow::Result<String> {
        match &self.lock().nodes[self.id].text {
            Some(text) => Ok(text.clone()),
            None => bail!("stale element"),
        }
    }

    async fn attr(&self, name: &str) -> anyhow::Result<Option<String>> {
        let state = self.lock();
        let node = &state.nodes[self.id];
        if node.text.is_none() {
            bail!("stale element");
        }
        Ok(node
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    async fn click(&self) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.nodes[self.id].fail_click {
            bail!("element click intercepted");
        }
        state.clicks += 1;
        if let Some(detail) = state.nodes[self.id].opens {
            state.current = Some(detail);
        }
        Ok(())
    }

    async fn fill(&self, text: &str) -> anyhow::Result<()> {
        self.lock().typed.push(text.to_string());
        Ok(())
    }

    async fn submit(&self) -> anyhow::Result<()> {
        self.lock().submits += 1;
        Ok(())
    }

    async fn scroll_into_view(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
