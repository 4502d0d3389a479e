use crate::{
    configuration::{millis, ScrapeSettings},
    domain::{
        parsing::{looks_like_rating_label, looks_like_review_content, looks_like_review_date},
        review::{Review, ReviewDraft},
        selector::SelectorConfig,
    },
    services::{
        field_extractor::first_match,
        page::{Element, Page},
        pacer::Pacer,
    },
};

pub struct ReviewExtractor<'a> {
    selectors: &'a SelectorConfig,
    settings: &'a ScrapeSettings,
    pacer: &'a dyn Pacer,
}

impl<'a> ReviewExtractor<'a> {
    pub fn new(
        selectors: &'a SelectorConfig,
        settings: &'a ScrapeSettings,
        pacer: &'a dyn Pacer,
    ) -> Self {
        ReviewExtractor {
            selectors,
            settings,
            pacer,
        }
    }

    /// Returns up to `max_reviews` reviews from the open detail view.
    pub async fn extract_reviews<P: Page>(&self, page: &P) -> Vec<Review> {
        self.open_reviews_tab(page).await;
        self.focus_reviews(page).await;
        self.load_reviews(page).await;

        let Some(elements) = self.review_elements(page).await else {
            log::warn!("No review elements found with any selector");
            return vec![];
        };

        let mut reviews = vec![];
        for (idx, element) in elements
            .iter()
            .take(self.settings.max_reviews)
            .enumerate()
        {
            match self.read_review(element).await.finish() {
                Some(review) => {
                    log::info!("Extracted review {}: {}", idx + 1, review.author);
                    reviews.push(review);
                }
                None => log::debug!("Discarded review {}: no author or content", idx + 1),
            }
        }

        log::info!("Successfully extracted {} reviews", reviews.len());
        reviews
    }

    async fn open_reviews_tab<P: Page>(&self, page: &P) {
        match page.first(&self.selectors.reviews_tab).await {
            Ok(Some(tab)) => match tab.click().await {
                Ok(()) => {
                    self.pacer
                        .settle(millis(self.settings.review_tab_settle_ms))
                        .await
                }
                Err(e) => log::debug!("Could not open reviews tab: {:?}", e),
            },
            Ok(None) => log::debug!("No reviews tab on this place"),
            Err(e) => log::debug!("Reviews tab lookup failed: {:?}", e),
        }
    }

    async fn focus_reviews<P: Page>(&self, page: &P) {
        if let Ok(Some(first)) = page.first(&self.selectors.review_probe).await {
            match first.scroll_into_view().await {
                Ok(()) => {
                    self.pacer
                        .settle(millis(self.settings.review_focus_settle_ms))
                        .await
                }
                Err(e) => log::debug!("Could not scroll reviews into view: {:?}", e),
            }
        }
    }

    /// Scrolls until at least one review is present or attempts run out.
    async fn load_reviews<P: Page>(&self, page: &P) {
        log::info!("Scrolling to load reviews...");

        for attempt in 1..=self.settings.review_scroll_attempts {
            if let Err(e) = page.scroll_by(0, self.settings.review_scroll_delta).await {
                log::warn!("Scroll attempt {} failed: {:?}", attempt, e);
                continue;
            }
            self.pacer
                .settle(millis(self.settings.review_scroll_settle_ms))
                .await;

            match page.count(&self.selectors.review_probe).await {
                Ok(found) => {
                    log::info!("Found {} reviews after scroll {}", found, attempt);
                    if found > 0 {
                        break;
                    }
                }
                Err(e) => log::warn!("Scroll attempt {} failed: {:?}", attempt, e),
            }
        }
    }

    /// Elements of the first review selector that matches anything.
    async fn review_elements<P: Page>(&self, page: &P) -> Option<Vec<P::Element>> {
        for selector in self.selectors.review_items.iter() {
            match page.find_all(selector).await {
                Ok(elements) if !elements.is_empty() => {
                    log::info!(
                        "Found {} reviews using selector: {}",
                        elements.len(),
                        selector
                    );
                    return Some(elements);
                }
                Ok(_) => log::trace!("No reviews for {}", selector),
                Err(e) => log::trace!("Selector {} failed: {:?}", selector, e),
            }
        }
        None
    }

    async fn read_review<E: Element>(&self, element: &E) -> ReviewDraft {
        ReviewDraft {
            author: first_match(element, &self.selectors.review_author, |raw| {
                Some(raw.to_string())
            })
            .await
            .ok(),
            rating: first_match(element, &self.selectors.review_rating, |raw| {
                looks_like_rating_label(raw).then(|| raw.to_string())
            })
            .await
            .ok(),
            date: first_match(element, &self.selectors.review_date, |raw| {
                looks_like_review_date(raw).then(|| raw.to_string())
            })
            .await
            .ok(),
            content: first_match(element, &self.selectors.review_content, |raw| {
                looks_like_review_content(raw).then(|| raw.to_string())
            })
            .await
            .ok(),
        }
    }
}
