use once_cell::sync::Lazy;

use crate::rules::{Detector, PatternCategory};

const NAME: &str = "Process Spawning";

/// Shell-out and child process calls.
static DETECTORS: Lazy<Vec<Detector>> = Lazy::new(|| {
    vec![
        Detector::new(NAME, r"\bos\.execute\s*\(", "os.execute").unwrap(),
        Detector::new(NAME, r"\bio\.popen\s*\(", "io.popen").unwrap(),
        Detector::new(NAME, r"\bspawn\s*\(", "spawn").unwrap(),
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
    fn flags_os_execute_and_popen() {
        let cat = category();
        assert!(cat.detectors[0].find(r#"os.execute("rm -rf /")"#).is_some());
        assert!(cat.detectors[1].find("local f = io.popen ('ls')").is_some());
    }

    #[test]
    fn spawn_needs_word_boundary() {
        let cat = category();
        assert!(cat.detectors[2].find("respawn(3)").is_none());
        assert!(cat.detectors[2].find("spawn(\"telnet\")").is_some());
    }
}
