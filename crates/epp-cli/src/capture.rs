//! In-memory wire capture for `--dump-xml`.

use std::fmt::Write as _;
use std::sync::{LazyLock, Mutex};

use epp_client::{Direction, WireObserver};
use regex::Regex;

static SECRETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(pw|newPW)>.*?</(pw|newPW)>").expect("static pattern is valid")
});

/// Replace the contents of `<pw>` and `<newPW>` with asterisks.
#[must_use]
pub fn redact(xml: &str) -> String {
    SECRETS
        .replace_all(xml, |caps: &regex::Captures<'_>| {
            format!("<{}>********</{}>", &caps[1], &caps[2])
        })
        .into_owned()
}

/// Records every frame with secrets redacted.
#[derive(Debug, Default)]
pub struct Capture {
    frames: Mutex<Vec<(Direction, String)>>,
}

impl Capture {
    /// All captured frames, oldest first, as a printable transcript.
    #[must_use]
    pub fn transcript(&self) -> String {
        let frames = self.frames.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut out = String::new();
        for (direction, xml) in frames.iter() {
            let arrow = match direction {
                Direction::Sent => ">>>",
                Direction::Received => "<<<",
            };
            let _ = writeln!(out, "{arrow} {direction}\n{}\n", xml.trim_end());
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames
            .lock()
            .map(|f| f.is_empty())
            .unwrap_or(true)
    }
}

impl WireObserver for Capture {
    fn frame(&self, direction: Direction, payload: &[u8]) {
        let xml = redact(&String::from_utf8_lossy(payload));
        if let Ok(mut frames) = self.frames.lock() {
            frames.push((direction, xml));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_passwords() {
        let xml = "<login><clID>ClientX</clID><pw>foo-BAR2</pw><newPW>bar-FOO2</newPW></login>";
        assert_eq!(
            redact(xml),
            "<login><clID>ClientX</clID><pw>********</pw><newPW>********</newPW></login>"
        );
    }

    #[test]
    fn test_redact_auth_info_pw() {
        let xml = "<domain:authInfo><domain:pw>2fooBAR</domain:pw></domain:authInfo>";
        // Only the bare login elements are secrets
        assert_eq!(redact(xml), xml);
    }

    #[test]
    fn test_capture_transcript() {
        let capture = Capture::default();
        assert!(capture.is_empty());
        capture.frame(Direction::Sent, b"<epp><pw>secret</pw></epp>");
        capture.frame(Direction::Received, b"<epp/>");

        let transcript = capture.transcript();
        assert!(transcript.contains(">>> sent\n<epp><pw>********</pw></epp>"));
        assert!(transcript.contains("<<< received\n<epp/>"));
        assert!(!transcript.contains("secret"));
    }
}
