use once_cell::sync::Lazy;

use crate::rules::{Detector, PatternCategory};

const NAME: &str = "Package Management";

/// Calls that install, remove or unpack other packages at runtime.
static DETECTORS: Lazy<Vec<Detector>> = Lazy::new(|| {
    vec![
        Detector::new(NAME, r"\binstallPackage\s*\(", "installPackage").unwrap(),
        Detector::new(NAME, r"\buninstallPackage\s*\(", "uninstallPackage").unwrap(),
        Detector::new(NAME, r"\bunzipAsync\s*\(", "unzipAsync").unwrap(),
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
    fn install_does_not_match_inside_uninstall() {
        let cat = category();
        assert!(cat.detectors[0].find("uninstallPackage('x')").is_none());
        assert!(cat.detectors[1].find("uninstallPackage('x')").is_some());
    }
}
