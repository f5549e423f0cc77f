//! Topics derived from the identity alone.

use super::TopicExtractor;
use crate::trusty::artifact_code;
use crate::types::Nanopub;

/// Topic is the identity itself, so nothing is ever linked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTopicExtractor;

impl TopicExtractor for NoTopicExtractor {
    fn name(&self) -> &'static str {
        "none"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        Some(nanopub.uri().to_string())
    }
}

/// The identity without artifact code, fragment, or trailing `.` or `/`.
pub fn uri_base(uri: &str) -> &str {
    let mut s = match artifact_code(uri) {
        Some(code) => &uri[..uri.len() - code.len()],
        None => uri,
    };
    if let Some(i) = s.find('#') {
        s = &s[..i];
    }
    s.strip_suffix(['.', '/']).unwrap_or(s)
}

/// Topic is [`uri_base`] of the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriBaseTopicExtractor;

impl TopicExtractor for UriBaseTopicExtractor {
    fn name(&self) -> &'static str {
        "uri-base"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        Some(uri_base(nanopub.uri()).to_string())
    }
}

/// Topic is the last path segment of [`uri_base`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UriTailTopicExtractor;

impl TopicExtractor for UriTailTopicExtractor {
    fn name(&self) -> &'static str {
        "uri-tail"
    }

    fn topic(&self, nanopub: &Nanopub) -> Option<String> {
        let base = uri_base(nanopub.uri());
        let tail = base.rsplit_once('/').map_or(base, |(_, tail)| tail);
        Some(tail.to_string())
    }
}
