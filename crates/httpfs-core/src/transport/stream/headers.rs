//! Collects raw header lines delivered by libcurl's header callback.

/// Status and headers of the most recent response seen on a handle.
///
/// libcurl reports every response of a redirect chain through the same
/// callback; each status line starts a fresh response, so only the final one
/// survives.
#[derive(Debug, Default)]
pub(super) struct HeaderCollector {
    status: Option<u32>,
    headers: Vec<(String, String)>,
}

impl HeaderCollector {
    pub(super) fn push(&mut self, data: &[u8]) {
        let raw = String::from_utf8_lossy(data);
        let line = raw.trim_end_matches(&['\r', '\n'][..]);

        if line.starts_with("HTTP/") {
            self.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse().ok());
            self.headers.clear();
            return;
        }
        if line.trim().is_empty() {
            return;
        }
        // obs-fold continuation of the previous header value
        if line.starts_with(&[' ', '\t'][..]) {
            if let Some((_, value)) = self.headers.last_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    pub(super) fn status(&self) -> Option<u32> {
        self.status
    }

    pub(super) fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub(super) fn into_headers(self) -> Vec<(String, String)> {
        self.headers
    }
}
