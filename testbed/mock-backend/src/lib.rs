//! Scripted stand-in for the Quartz chat backend.
//!
//! Serves the three endpoints the widget talks to with deterministic answers:
//! numeric session ids, a fixed sequence of follow-up questions and a
//! `CONVERSATION SUMMARY:` reply once they run out, so the widget's whole
//! lifecycle can be exercised locally and in tests.

pub mod fixtures;
pub mod handlers;
pub mod server;

pub use fixtures::{AgentFixture, BackendFixture};
pub use server::MockServer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_lookup_ignores_case() {
        let fixture = BackendFixture::create_test_fixture();
        let agent = fixture.get_agent("nabeel ahmad");

        assert!(agent.is_some());
        assert_eq!(agent.unwrap().name, "Nabeel Ahmad");
        assert!(fixture.get_agent("Nobody").is_none());
    }

    #[test]
    fn test_opening_question() {
        let fixture = BackendFixture::create_test_fixture();
        let agent = fixture.get_agent("Nabeel Ahmad").unwrap();

        assert_eq!(
            BackendFixture::opening_question(agent),
            "Why did you edit your start time from 9:00 AM to 8:00 AM?"
        );
    }

    #[test]
    fn test_summary_lists_answers() {
        let summary = BackendFixture::summary(
            "Nabeel Ahmad",
            &["I arrived early".to_string(), "Yes".to_string()],
        );

        assert!(summary.starts_with("CONVERSATION SUMMARY:\n"));
        assert!(summary.contains("1. I arrived early\n2. Yes\n"));
        assert!(summary.ends_with("Information recorded for review."));
    }

    #[test]
    fn test_empty_fixture() {
        let fixture = BackendFixture::new();
        assert!(fixture.get_agent("Nabeel Ahmad").is_none());
    }
}
