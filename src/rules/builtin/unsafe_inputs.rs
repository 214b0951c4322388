use once_cell::sync::Lazy;

use crate::rules::{Detector, PatternCategory};

const NAME: &str = "Unsafe Inputs";

/// Dynamic code loading.
static DETECTORS: Lazy<Vec<Detector>> = Lazy::new(|| {
    vec![
        Detector::new(NAME, r"\bloadstring\s*\(", "loadstring").unwrap(),
        Detector::new(NAME, r"\bdofile\s*\(", "dofile").unwrap(),
        Detector::new(NAME, r"\bloadfile\s*\(", "loadfile").unwrap(),
        Detector::new(NAME, r"\bload\s*\(", "load").unwrap(),
    ]
});

pub(super) fn category() -> PatternCategory {
    PatternCategory {
        name: NAME.into(),
        detectors: DETECTORS.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_is_distinct_from_loadstring() {
        let cat = category();
        assert!(cat.detectors[3].find("loadstring(code)()").is_none());
        assert!(cat.detectors[3].find("load(chunk)").is_some());
        assert!(cat.detectors[0].find("loadstring(code)()").is_some());
    }
}
