use crate::{
    configuration::{millis, ScrapeSettings},
    domain::{
        parsing::{
            extract_background_url, is_valid_image_url, is_valid_website, parse_rating,
            parse_review_count,
        },
        place::Place,
        selector::{FieldQuery, SelectorConfig},
    },
    services::{
        page::{Element, NotFound, Page, PageScope, Scope},
        pacer::Pacer,
    },
};

/// How many matches of one image selector are inspected.
const IMAGE_CANDIDATES_PER_SELECTOR: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Address,
    Phone,
    Website,
    Rating,
    ReviewCount,
    ImageUrl,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Rating(Option<f64>),
    Count(u64),
}

/// Tries `candidates` in order and returns the first value `parse` accepts.
/// A candidate that errors is treated the same as one that matched nothing.
pub async fn first_match<S, T, F>(
    scope: &S,
    candidates: &[FieldQuery],
    parse: F,
) -> Result<T, NotFound>
where
    S: Scope,
    F: Fn(&str) -> Option<T>,
{
    for candidate in candidates {
        match read_candidate(scope, candidate).await {
            Ok(Some(raw)) => match parse(&raw) {
                Some(value) => return Ok(value),
                None => log::debug!("Rejected {:?} from {}", raw, candidate.selector),
            },
            Ok(None) => log::trace!("No match for {}", candidate.selector),
            Err(e) => log::trace!("Selector {} failed: {:?}", candidate.selector, e),
        }
    }

    Err(NotFound)
}

async fn read_candidate<S: Scope>(
    scope: &S,
    candidate: &FieldQuery,
) -> anyhow::Result<Option<String>> {
    let Some(element) = scope.locate(&candidate.selector).await?.into_iter().next() else {
        return Ok(None);
    };

    let raw = match &candidate.attr {
        Some(name) => element.attr(name).await?,
        None => Some(element.text().await?),
    };

    Ok(raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()))
}

fn any_text(raw: &str) -> Option<String> {
    Some(raw.to_string())
}

pub struct FieldExtractor<'a> {
    selectors: &'a SelectorConfig,
    settings: &'a ScrapeSettings,
    pacer: &'a dyn Pacer,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(
        selectors: &'a SelectorConfig,
        settings: &'a ScrapeSettings,
        pacer: &'a dyn Pacer,
    ) -> Self {
        FieldExtractor {
            selectors,
            settings,
            pacer,
        }
    }

    /// Reads every field off the open detail view. Never fails; fields that
    /// cannot be found keep their zero-value.
    pub async fn extract_place<P: Page>(&self, page: &P) -> Place {
        if page
            .wait_for(
                &self.selectors.place_title,
                millis(self.settings.title_timeout_ms),
            )
            .await
            .is_err()
        {
            log::warn!("Place title selector not found, continuing anyway...");
        }

        let mut place = Place::default();

        if let FieldValue::Text(name) = self.extract_field(page, Field::Name).await {
            place.name = name;
        }
        if let FieldValue::Text(address) = self.extract_field(page, Field::Address).await {
            place.address = address;
        }
        if let FieldValue::Text(website) = self.extract_field(page, Field::Website).await {
            place.website = website;
        }
        if let FieldValue::Text(phone) = self.extract_field(page, Field::Phone).await {
            place.phone = phone;
        }
        if let FieldValue::Count(count) = self.extract_field(page, Field::ReviewCount).await {
            place.review_count = count;
        }
        if let FieldValue::Rating(rating) = self.extract_field(page, Field::Rating).await {
            place.rating = rating;
        }

        self.pacer
            .settle(millis(self.settings.image_settle_ms))
            .await;
        if let FieldValue::Text(image_url) = self.extract_field(page, Field::ImageUrl).await {
            place.image_url = image_url;
        }

        place.describe();
        log::info!(
            "Extracted place: {:?} | Rating: {:?} | Reviews: {}",
            place.name,
            place.rating,
            place.review_count
        );

        place
    }

    /// Extracts one field, substituting its zero-value when nothing matched.
    pub async fn extract_field<P: Page>(&self, page: &P, field: Field) -> FieldValue {
        let scope = PageScope(page);

        match field {
            Field::Name => FieldValue::Text(self.text(&scope, &self.selectors.name).await),
            Field::Address => FieldValue::Text(self.text(&scope, &self.selectors.address).await),
            Field::Phone => FieldValue::Text(self.text(&scope, &self.selectors.phone).await),
            Field::Website => FieldValue::Text(
                first_match(&scope, &self.selectors.website, |raw| {
                    is_valid_website(raw).then(|| raw.to_string())
                })
                .await
                .unwrap_or_default(),
            ),
            Field::Rating => FieldValue::Rating(
                first_match(&scope, &self.selectors.rating, parse_rating)
                    .await
                    .ok(),
            ),
            Field::ReviewCount => FieldValue::Count(
                first_match(&scope, &self.selectors.review_count, parse_review_count)
                    .await
                    .unwrap_or_default(),
            ),
            Field::ImageUrl => FieldValue::Text(self.image_url(page).await.unwrap_or_else(|_| {
                log::warn!("No valid image URL found");
                String::new()
            })),
        }
    }

    async fn text<S: Scope>(&self, scope: &S, candidates: &[FieldQuery]) -> String {
        first_match(scope, candidates, any_text)
            .await
            .unwrap_or_default()
    }

    /// Checks `<img src>` candidates first, then inline background images.
    pub async fn image_url<P: Page>(&self, page: &P) -> Result<String, NotFound> {
        let denylist = &self.selectors.image_denylist;

        for selector in self.selectors.image.iter() {
            let images = match page.find_all(selector).await {
                Ok(images) => images,
                Err(e) => {
                    log::trace!("Selector {} failed: {:?}", selector, e);
                    continue;
                }
            };

            for image in images.iter().take(IMAGE_CANDIDATES_PER_SELECTOR) {
                if let Ok(Some(src)) = image.attr("src").await {
                    if is_valid_image_url(&src, denylist) {
                        log::info!("Found image URL: {}", src);
                        return Ok(src);
                    }
                }
            }
        }

        let backgrounds = page
            .find_all(&self.selectors.background_image)
            .await
            .unwrap_or_default();

        for element in backgrounds.iter().take(IMAGE_CANDIDATES_PER_SELECTOR) {
            let Ok(Some(style)) = element.attr("style").await else {
                continue;
            };
            if let Some(url) = extract_background_url(&style) {
                if is_valid_image_url(&url, denylist) {
                    return Ok(url);
                }
            }
        }

        Err(NotFound)
    }
}
