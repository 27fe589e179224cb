//! Scripted agent that narrates its reasoning while answering a question.

use std::time::Duration;

use terno_shared::{Message, NotificationStatus};

pub const GREETING: &str = "Connected to LLM Agent WebSocket";

const STEPS: [&str; 5] = [
    "Thought: I need to fetch the schema...",
    "Action: Calling DBSchemaTool...",
    "Thought: Now I need to generate SQL...",
    "Action: Executing SQL query...",
    "Result: 250 sales last month",
];

#[derive(Debug, Clone)]
pub struct Agent {
    step_delay: Duration,
}

impl Agent {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn greeting(&self) -> Message {
        Message::notification(NotificationStatus::Info, GREETING)
    }

    /// Messages streamed back for one user question, in order.
    pub fn steps(&self, question: &str) -> Vec<Message> {
        tracing::debug!("Planning answer for {:?}", question);
        STEPS.iter().map(|step| Message::chat(*step)).collect()
    }
}
