//! Fixture selection for the active protocol.

use prototest_core::{AppliesTo, Config, TestCase};

/// True iff the fixture targets the active protocol.
pub fn accepts<C: TestCase + ?Sized>(fixture: &C, active_protocol: &str) -> bool {
    fixture.protocol() == active_protocol
}

/// Outcome of selecting one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Render,
    /// Belongs to another protocol; dropped without a trace
    OtherProtocol,
    /// Matches the protocol but is left out
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `appliesTo: server`
    ServerOnly,
    /// Listed in the config `skip` list
    Configured,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServerOnly => write!(f, "server-only fixture"),
            Self::Configured => write!(f, "listed in skip"),
        }
    }
}

/// Protocol match first, then the client-side and configured exclusions.
pub fn select<C: TestCase + ?Sized>(fixture: &C, active_protocol: &str, config: &Config) -> Selection {
    if !accepts(fixture, active_protocol) {
        return Selection::OtherProtocol;
    }
    if fixture.applies_to() == Some(AppliesTo::Server) {
        return Selection::Skipped(SkipReason::ServerOnly);
    }
    if config.skips(fixture.id()) {
        return Selection::Skipped(SkipReason::Configured);
    }
    Selection::Render
}

#[cfg(test)]
mod tests {
    use super::*;
    use prototest_core::HttpRequestTestCase;

    fn case(id: &str, protocol: &str, applies_to: Option<AppliesTo>) -> HttpRequestTestCase {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "protocol": protocol,
            "appliesTo": applies_to,
        }))
        .unwrap()
    }

    #[test]
    fn accepts_exact_protocol_only() {
        let c = case("A", "aws.protocols#restJson1", None);
        assert!(accepts(&c, "aws.protocols#restJson1"));
        assert!(!accepts(&c, "aws.protocols#restjson1"));
        assert!(!accepts(&c, "aws.protocols#restXml"));
    }

    #[test]
    fn selection_order() {
        let config = Config {
            skip: vec!["Flaky".into()],
            ..Config::default()
        };
        let p = "p#json";
        assert_eq!(select(&case("A", "p#xml", None), p, &config), Selection::OtherProtocol);
        assert_eq!(
            select(&case("A", p, Some(AppliesTo::Server)), p, &config),
            Selection::Skipped(SkipReason::ServerOnly)
        );
        assert_eq!(
            select(&case("Flaky", p, Some(AppliesTo::Client)), p, &config),
            Selection::Skipped(SkipReason::Configured)
        );
        assert_eq!(select(&case("A", p, None), p, &config), Selection::Render);
        // A skipped id under another protocol is still just another protocol
        assert_eq!(
            select(&case("Flaky", "p#xml", None), p, &config),
            Selection::OtherProtocol
        );
    }
}
