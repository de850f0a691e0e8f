use crate::{Error, ProfileSource, Result};
use image::DynamicImage;
use tracing::warn;

/// Best-effort cover download; every failure collapses to `None`.
pub async fn fetch_artwork<S: ProfileSource + ?Sized>(
    source: &S,
    artwork_ref: &str,
) -> Option<DynamicImage> {
    match try_fetch(source, artwork_ref).await {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(error = %err, artwork_ref, "album artwork unavailable");
            None
        }
    }
}

async fn try_fetch<S: ProfileSource + ?Sized>(source: &S, artwork_ref: &str) -> Result<DynamicImage> {
    if artwork_ref.trim().is_empty() {
        return Err(Error::Artwork("empty artwork reference".to_string()));
    }
    let bytes = source.artwork(artwork_ref).await?;
    image::load_from_memory(&bytes).map_err(|e| Error::Artwork(format!("undecodable image: {e}")))
}
