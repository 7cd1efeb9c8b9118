// Output cleaning — keep only the HTML document the model was asked for.
//
// Models often wrap the page in chatter or markdown fences. Everything
// outside `<!DOCTYPE html>` ... `</html>` is dropped.

use tracing::warn;

use crate::output::truncate_chars;

pub const START_MARKER: &str = "<!DOCTYPE html>";
pub const END_MARKER: &str = "</html>";

/// Locate the HTML document inside raw model output.
///
/// Uses the first START marker and the first END marker that begins after
/// it. An END that only appears before START doesn't count. Returns the
/// untrimmed span, or `None` if either marker is missing.
pub fn extract_html(raw: &str) -> Option<&str> {
    let start = raw.find(START_MARKER)?;
    let body_from = start + START_MARKER.len();
    let end = body_from + raw[body_from..].find(END_MARKER)? + END_MARKER.len();
    Some(&raw[start..end])
}

/// Clean raw model output.
///
/// With both markers present, returns the trimmed document span. Otherwise
/// logs a warning and returns `raw` exactly as given.
pub fn clean(raw: &str) -> String {
    match extract_html(raw) {
        Some(html) => html.trim().to_string(),
        None => {
            warn!(
                kind = "marker_not_found",
                has_start = raw.contains(START_MARKER),
                has_end = raw.contains(END_MARKER),
                preview = %truncate_chars(raw.trim(), 60),
                "HTML markers not found, keeping raw output"
            );
            raw.to_string()
        }
    }
}
