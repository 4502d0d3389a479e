use std::time::Duration;

use crate::{
    configuration::{millis, ScrapeSettings},
    domain::selector::Selector,
    services::{page::Page, pacer::Pacer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// No listing appeared before the results timeout.
    NoResults,
    /// At least the requested number of listings is visible.
    Reached,
    /// The list stopped growing.
    Stalled,
    /// Gave up after the maximum number of scrolls.
    Capped,
}

pub struct Discovery<E> {
    pub listings: Vec<E>,
    pub outcome: DiscoveryOutcome,
    /// Listing count seen after each scroll, in order.
    pub counts: Vec<usize>,
}

pub struct DiscoveryLimits {
    pub results_timeout: Duration,
    pub max_attempts: usize,
    pub stall_limit: usize,
    pub settle: Duration,
    pub scroll_delta: i64,
}

impl From<&ScrapeSettings> for DiscoveryLimits {
    fn from(settings: &ScrapeSettings) -> Self {
        DiscoveryLimits {
            results_timeout: millis(settings.results_timeout_ms),
            max_attempts: settings.max_scroll_attempts,
            stall_limit: settings.stall_limit,
            settle: millis(settings.scroll_settle_ms),
            scroll_delta: settings.scroll_delta,
        }
    }
}

/// Scrolls the results panel until `target` listings are visible or it stops
/// growing, then returns at most `target` listing handles.
pub async fn discover_listings<P: Page>(
    page: &P,
    listing: &Selector,
    target: usize,
    limits: &DiscoveryLimits,
    pacer: &dyn Pacer,
) -> anyhow::Result<Discovery<P::Element>> {
    if page.wait_for(listing, limits.results_timeout).await.is_err() {
        log::warn!("No listings appeared for {}", listing);
        return Ok(Discovery {
            listings: vec![],
            outcome: DiscoveryOutcome::NoResults,
            counts: vec![],
        });
    }

    let mut counts = vec![];
    let mut previous = 0;
    let mut unchanged = 0;
    let mut outcome = DiscoveryOutcome::Capped;

    for _ in 0..limits.max_attempts {
        page.scroll_by(0, limits.scroll_delta).await?;
        pacer.settle(limits.settle).await;

        let found = page.count(listing).await?;
        log::info!("Found {} places during scrolling", found);
        counts.push(found);

        if found >= target {
            outcome = DiscoveryOutcome::Reached;
            break;
        }

        match found == previous {
            true => {
                unchanged += 1;
                if unchanged >= limits.stall_limit {
                    outcome = DiscoveryOutcome::Stalled;
                    break;
                }
            }
            false => unchanged = 0,
        }
        previous = found;
    }

    let listings: Vec<P::Element> = page
        .find_all(listing)
        .await?
        .into_iter()
        .take(target)
        .collect();

    log::info!(
        "Discovery finished ({:?}) with {} listings",
        outcome,
        listings.len()
    );

    Ok(Discovery {
        listings,
        outcome,
        counts,
    })
}
