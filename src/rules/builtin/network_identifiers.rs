use once_cell::sync::Lazy;

use crate::rules::{Detector, PatternCategory, NETWORK_IDENTIFIERS};

/// Free-text endpoints: scheme URLs and IPv4-shaped literals. No
/// suppression applies.
static DETECTORS: Lazy<Vec<Detector>> = Lazy::new(|| {
    vec![
        Detector::new(NETWORK_IDENTIFIERS, r#"((?:https?|ftp)://[^\s'"]+)"#, "").unwrap(),
        Detector::new(NETWORK_IDENTIFIERS, r"((?:\d{1,3}\.){3}\d{1,3})", "").unwrap(),
    ]
});

pub(super) fn category() -> PatternCategory {
    PatternCategory {
        name: NETWORK_IDENTIFIERS.into(),
        detectors: DETECTORS.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_stops_at_quote() {
        let cat = category();
        let m = cat.detectors[0].find(r#"getHTTP("https://example.com/a/b", cb)"#);
        assert_eq!(m.unwrap().as_str(), "https://example.com/a/b");
    }

    #[test]
    fn ipv4_literal() {
        let cat = category();
        let m = cat.detectors[1].find("connect('10.0.0.12', 23)");
        assert_eq!(m.unwrap().as_str(), "10.0.0.12");
    }
}
