use std::path::{Path, PathBuf};

use crate::{
    configuration::Settings,
    domain::place::Place,
    services::{save_all_reviews, save_places, Droid, JitteredPacer, MapsScraper, Pacer, Session},
};

/// One invocation: what to search for and where the places go.
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub search: String,
    pub total: usize,
    pub output: PathBuf,
    pub append: bool,
}

pub async fn run(settings: Settings, job: ScrapeJob) -> anyhow::Result<Vec<Place>> {
    let droid = Droid::launch(&settings.webdriver).await?;
    let pacer = JitteredPacer::new(
        settings.scrape.jitter_min_ms,
        settings.scrape.jitter_max_ms,
    );

    scrape_and_save(droid, &settings, &job, &pacer).await
}

/// Scrapes on `session`, closes it, then writes the places file and one
/// reviews file per place.
pub async fn scrape_and_save<S: Session>(
    session: S,
    settings: &Settings,
    job: &ScrapeJob,
    pacer: &dyn Pacer,
) -> anyhow::Result<Vec<Place>> {
    log::info!(
        "Starting scrape for {:?} with a target of {} places",
        job.search,
        job.total
    );

    let scraper = MapsScraper::new(&settings.selectors, &settings.scrape, pacer);
    let places = scraper.scrape_session(session, &job.search, job.total).await;

    save_places(&places, &job.output, job.append)?;
    save_all_reviews(Path::new(&settings.output.reviews_dir), &places);

    log::info!("Scraping completed with {} places", places.len());
    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::{scrape_and_save, ScrapeJob};
    use crate::{
        configuration::Settings,
        domain::{place::PlaceRow, selector::Selector},
        services::{
            fake_page::{FakeNode, FakePage},
            reviews_path, Immediate,
        },
    };

    fn settings(reviews_dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.output.reviews_dir = reviews_dir.display().to_string();
        settings
    }

    fn gym(name: &str, authors: &[&str]) -> Vec<(Selector, Vec<FakeNode>)> {
        vec![
            (
                Selector::xpath(r#"//h1[contains(@class, "DUwDvf")]"#),
                vec![FakeNode::text(name)],
            ),
            (
                Selector::xpath(r#"//span[contains(@class, "ceNzKf")]"#),
                vec![FakeNode::text("4,6")],
            ),
            (
                Selector::css("div[data-review-id]"),
                authors
                    .iter()
                    .map(|author| {
                        FakeNode::text("").with_child(
                            Selector::css(".d4r55"),
                            vec![FakeNode::text(author)],
                        )
                    })
                    .collect(),
            ),
        ]
    }

    #[tokio::test]
    async fn single_place_run_writes_place_and_reviews_files() {
        let dir = tempfile::tempdir().unwrap();
        let reviews_dir = dir.path().join("scraped_data");
        let settings = settings(&reviews_dir);
        let job = ScrapeJob {
            search: "Gyms in Lahore".to_string(),
            total: 1,
            output: dir.path().join("result.csv"),
            append: false,
        };
        let page = FakePage::search(vec![
            gym("Shapes: Fitness/Spa", &["Ayesha", "Bilal"]),
            gym("Iron Den", &["Omar"]),
        ]);

        let places = scrape_and_save(page.clone(), &settings, &job, &Immediate)
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
        assert!(page.is_closed());

        let rows: Vec<PlaceRow> = csv::Reader::from_path(&job.output)
            .unwrap()
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Shapes: Fitness/Spa");
        assert_eq!(rows[0].rating, Some(4.6));

        let reviews = reviews_path(&reviews_dir, "Shapes: Fitness/Spa");
        assert_eq!(reviews, reviews_dir.join("Shapes FitnessSpa_reviews.csv"));
        assert!(reviews.exists());
        assert!(!reviews_path(&reviews_dir, "Iron Den").exists());
    }

    #[tokio::test]
    async fn invalid_single_place_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(&dir.path().join("scraped_data"));
        let job = ScrapeJob {
            search: "Gyms in Lahore".to_string(),
            total: 1,
            output: dir.path().join("result.csv"),
            append: false,
        };
        let page = FakePage::search(vec![gym("Unknown", &["Ayesha"])]);

        let places = scrape_and_save(page.clone(), &settings, &job, &Immediate)
            .await
            .unwrap();

        assert!(places.is_empty());
        assert!(page.is_closed());
        assert!(!job.output.exists());
    }
}
