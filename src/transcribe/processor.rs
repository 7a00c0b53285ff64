use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use super::TranscriptEntry;

/// Decode a timed-text caption document into entries, in document order.
///
/// Every `<text start="S" dur="D">` element becomes one entry with its offsets converted
/// from decimal seconds to rounded milliseconds.
pub fn decode_timed_text(xml: &str) -> Vec<TranscriptEntry> {
    let document = Html::parse_document(xml);

    let entries: Vec<TranscriptEntry> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "text")
        .map(|element| TranscriptEntry {
            text: element.text().collect(),
            offset: attribute_millis(&element, "start"),
            duration: attribute_millis(&element, "dur"),
        })
        .collect();

    debug!("Decoded {} timed-text entries", entries.len());
    entries
}

fn attribute_millis(element: &ElementRef<'_>, name: &str) -> u64 {
    let raw = element.value().attr(name);
    match raw.map(|value| value.trim().parse::<f64>()) {
        Some(Ok(seconds)) => seconds_to_millis(seconds),
        Some(Err(_)) => {
            warn!("Timed-text attribute {}={:?} is not a number, using 0", name, raw);
            0
        }
        None => {
            warn!("Timed-text element is missing the `{}` attribute, using 0", name);
            0
        }
    }
}

/// Convert decimal seconds to milliseconds, rounding to the nearest integer
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}
