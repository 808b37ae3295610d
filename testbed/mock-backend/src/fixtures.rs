use serde::Deserialize;
use serde::Serialize;

/// An agent whose time entry is being reviewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFixture {
    pub name: String,
    pub scheduled_start: String,
    pub edited_start: String,
}

/// Questions asked after the opening one, in order. The conversation is
/// summarized once they run out.
pub const FOLLOW_UP_QUESTIONS: [&str; 4] = [
    "What specific activities were you engaged in before your scheduled start time?",
    "Were these activities work-related or personal?",
    "Is there anyone who can verify your early arrival time?",
    "How do you typically track your work hours when you arrive early?",
];

#[derive(Debug, Clone)]
pub struct BackendFixture {
    pub agents: Vec<AgentFixture>,
}

impl BackendFixture {
    pub fn new() -> Self {
        Self { agents: vec![] }
    }

    pub fn create_test_fixture() -> Self {
        Self {
            agents: vec![
                AgentFixture {
                    name: "Nabeel Ahmad".to_string(),
                    scheduled_start: "9:00 AM".to_string(),
                    edited_start: "8:00 AM".to_string(),
                },
                AgentFixture {
                    name: "Jane Doe".to_string(),
                    scheduled_start: "7:30 AM".to_string(),
                    edited_start: "7:00 AM".to_string(),
                },
            ],
        }
    }

    pub fn get_agent(&self, name: &str) -> Option<&AgentFixture> {
        self.agents
            .iter()
            .find(|agent| agent.name.eq_ignore_ascii_case(name))
    }

    pub fn opening_question(agent: &AgentFixture) -> String {
        format!(
            "Why did you edit your start time from {} to {}?",
            agent.scheduled_start, agent.edited_start
        )
    }

    /// Summary of the user's answers, closing the conversation.
    pub fn summary(agent_name: &str, answers: &[String]) -> String {
        let mut summary = format!("CONVERSATION SUMMARY:\nAgent: {agent_name}\n");
        for (index, answer) in answers.iter().enumerate() {
            summary.push_str(&format!("{}. {}\n", index + 1, answer));
        }
        summary.push_str("Information recorded for review.");
        summary
    }
}

impl Default for BackendFixture {
    fn default() -> Self {
        Self::create_test_fixture()
    }
}
