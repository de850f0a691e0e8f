use crate::{Error, Result};
use scraper::{Html, Selector};

pub const APP_STATE_MARKER: &str = "window.__DZR_APP_STATE__ = ";

/// Returns the JSON text assigned to the page's application state, verbatim.
pub fn app_state_json(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let scripts = Selector::parse("script").map_err(|e| Error::Extraction(e.to_string()))?;

    document
        .select(&scripts)
        .map(|el| el.text().collect::<String>())
        .find_map(|text| {
            text.trim_start()
                .strip_prefix(APP_STATE_MARKER)
                .map(str::to_string)
        })
        .filter(|payload| !payload.is_empty())
        .ok_or_else(|| Error::Extraction("application state script not found".to_string()))
}
