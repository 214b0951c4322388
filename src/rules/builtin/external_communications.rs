use once_cell::sync::Lazy;

use crate::rules::{Detector, PatternCategory};

const NAME: &str = "External Communications";

/// Outbound HTTP: LuaSocket plus the host application's HTTP and browser
/// helpers.
static DETECTORS: Lazy<Vec<Detector>> = Lazy::new(|| {
    vec![
        Detector::new(NAME, r#"require\s*\(?['"]socket\.http['"]\)?"#, "require").unwrap(),
        Detector::new(NAME, r"\bsocket\.http\s*[\.:]", "socket.http").unwrap(),
        Detector::new(NAME, r"\bopenUrl\s*\(", "openUrl").unwrap(),
        Detector::new(NAME, r"\bdownloadFile\s*\(", "downloadFile").unwrap(),
        Detector::new(NAME, r"\bgetHTTP\s*\(", "getHTTP").unwrap(),
        Detector::new(NAME, r"\bpostHTTP\s*\(", "postHTTP").unwrap(),
        Detector::new(NAME, r"\bputHTTP\s*\(", "putHTTP").unwrap(),
        Detector::new(NAME, r"\bdeleteHTTP\s*\(", "deleteHTTP").unwrap(),
        Detector::new(NAME, r"\bcustomHTTP\s*\(", "customHTTP").unwrap(),
        Detector::new(NAME, r"\bopenWebPage\s*\(", "openWebPage").unwrap(),
    ]
});

pub(super) fn category() -> PatternCategory {
    PatternCategory {
        name: NAME.into(),
        detectors: DETECTORS.clone(),
    }
}
