use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::domain::{
    parsing::safe_file_name,
    place::{Place, PlaceRow},
    review::Review,
};

/// Writes one row per place. In append mode the header is only written when
/// the file is missing or empty.
pub fn save_places(places: &[Place], path: &Path, append: bool) -> anyhow::Result<()> {
    if places.is_empty() {
        log::warn!("No places to save");
        return Ok(());
    }

    let existing = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let file = match append {
        true => OpenOptions::new().create(true).append(true).open(path),
        false => OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path),
    }
    .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!append || existing == 0)
        .from_writer(file);

    for place in places {
        writer.serialize(PlaceRow::from(place))?;
    }
    writer.flush()?;

    let with_images = places.iter().filter(|p| !p.image_url.is_empty()).count();
    log::info!("Saved {} places to {}", places.len(), path.display());
    log::info!("Places with images: {}/{}", with_images, places.len());

    Ok(())
}

pub fn reviews_path(dir: &Path, place_name: &str) -> PathBuf {
    dir.join(format!("{}_reviews.csv", safe_file_name(place_name)))
}

/// Always overwrites: two names that sanitize alike leave the later reviews.
pub fn save_reviews(dir: &Path, place_name: &str, reviews: &[Review]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = reviews_path(dir, place_name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    for review in reviews {
        writer.serialize(review)?;
    }
    writer.flush()?;

    log::info!("Saved {} reviews to {}", reviews.len(), path.display());
    Ok(path)
}

/// Writes a reviews file for every place that has reviews. A file that
/// cannot be written is logged and skipped.
pub fn save_all_reviews(dir: &Path, places: &[Place]) {
    for place in places {
        if place.reviews.is_empty() {
            log::warn!("No reviews to save for {}", place.name);
            continue;
        }
        if let Err(e) = save_reviews(dir, &place.name, &place.reviews) {
            log::error!("Error saving reviews for {}: {:?}", place.name, e);
        }
    }
}
