use anyhow::anyhow;

use crate::{
    configuration::{millis, ScrapeSettings},
    domain::{place::Place, selector::SelectorConfig},
    services::{
        field_extractor::FieldExtractor,
        listing_discovery::{discover_listings, DiscoveryLimits, DiscoveryOutcome},
        page::{Element, Page, Session},
        pacer::Pacer,
        review_extractor::ReviewExtractor,
    },
};

pub struct MapsScraper<'a> {
    selectors: &'a SelectorConfig,
    settings: &'a ScrapeSettings,
    pacer: &'a dyn Pacer,
}

impl<'a> MapsScraper<'a> {
    pub fn new(
        selectors: &'a SelectorConfig,
        settings: &'a ScrapeSettings,
        pacer: &'a dyn Pacer,
    ) -> Self {
        MapsScraper {
            selectors,
            settings,
            pacer,
        }
    }

    /// Runs a scrape on `session` and shuts the session down afterwards,
    /// whatever happened during the scrape.
    pub async fn scrape_session<S: Session>(
        &self,
        session: S,
        query: &str,
        total: usize,
    ) -> Vec<Place> {
        let places = self.scrape(&session, query, total).await;

        match session.close().await {
            Ok(()) => log::info!("Browser session closed"),
            Err(e) => log::warn!("Failed to close browser session: {:?}", e),
        }

        places
    }

    /// Searches for `query` and collects up to `total` places. Never fails:
    /// a run-level failure ends the run with whatever was gathered so far.
    pub async fn scrape<P: Page>(&self, page: &P, query: &str, total: usize) -> Vec<Place> {
        let mut places = vec![];

        if let Err(e) = self.run(page, query, total, &mut places).await {
            log::error!("Scrape for {:?} aborted: {:?}", query, e);
        }

        log::info!("Collected {} places for {:?}", places.len(), query);
        places
    }

    async fn run<P: Page>(
        &self,
        page: &P,
        query: &str,
        total: usize,
        places: &mut Vec<Place>,
    ) -> anyhow::Result<()> {
        log::info!("Navigating to {}", self.settings.base_url);
        page.goto(
            &self.settings.base_url,
            millis(self.settings.navigation_timeout_ms),
        )
        .await?;
        self.pacer
            .settle(millis(self.settings.initial_settle_ms))
            .await;

        log::info!("Searching for: {}", query);
        let search_box = page
            .first(&self.selectors.search_box)
            .await?
            .ok_or_else(|| anyhow!("search box {} not found", self.selectors.search_box))?;
        search_box.fill(query).await?;
        search_box.submit().await?;

        let discovery = discover_listings(
            page,
            &self.selectors.listing,
            total,
            &DiscoveryLimits::from(self.settings),
            self.pacer,
        )
        .await?;

        if discovery.outcome == DiscoveryOutcome::NoResults {
            log::error!("No results found for {:?}", query);
            return Ok(());
        }

        let found = discovery.listings.len();
        for (idx, listing) in discovery.listings.iter().enumerate() {
            log::info!("Processing place {}/{}", idx + 1, found);

            match self.scrape_listing(page, listing).await {
                Ok(Some(place)) => {
                    log::info!("Added place: {}", place.name);
                    places.push(place);
                }
                Ok(None) => log::warn!("Skipping place {} with invalid name", idx + 1),
                Err(e) => log::error!("Error processing place {}: {:?}", idx + 1, e),
            }
        }

        Ok(())
    }

    /// Opens one listing and reads it. `None` means the name was unusable.
    async fn scrape_listing<P: Page>(
        &self,
        page: &P,
        listing: &P::Element,
    ) -> anyhow::Result<Option<Place>> {
        let target = match &self.selectors.listing_target {
            Some(selector) => listing.first(selector).await.ok().flatten(),
            None => None,
        };
        match &target {
            Some(target) => target.click().await?,
            None => listing.click().await?,
        }
        self.pacer
            .settle(millis(self.settings.detail_settle_ms))
            .await;

        let mut place = FieldExtractor::new(self.selectors, self.settings, self.pacer)
            .extract_place(page)
            .await;
        if !place.has_valid_name() {
            return Ok(None);
        }

        place.reviews = ReviewExtractor::new(self.selectors, self.settings, self.pacer)
            .extract_reviews(page)
            .await;

        Ok(Some(place))
    }
}
