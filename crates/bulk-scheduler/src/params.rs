//! Parsing of raw `key=value&key=value` parameter strings.

use bulk_core::parameters::UserParams;
use tracing::debug;

pub struct ParamProcessor;

impl ParamProcessor {
    /// Parse a raw parameter string.
    ///
    /// Malformed pairs are dropped one by one; the rest of the input is kept.
    /// Values are taken literally, without URL-decoding.
    pub fn parse(raw: Option<&str>) -> UserParams {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return UserParams::new();
        };

        raw.split('&')
            .filter_map(|pair| {
                let parsed = parse_pair(pair);
                if parsed.is_none() && !pair.is_empty() {
                    debug!(pair, "Dropping malformed parameter pair");
                }
                parsed
            })
            .collect()
    }
}

fn parse_pair(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.split_once('=')?;
    if key.is_empty() || value.contains('=') {
        return None;
    }
    Some((key, value))
}
