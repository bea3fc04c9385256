//! Placeholder research: canned snippets derived from the topic.
//! Swap for a real retrieval backend behind the same result shape.

use super::{Snippet, ToolStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub status: ToolStatus,
    pub topic: String,
    pub snippets: Vec<Snippet>,
}

pub fn research(topic: &str) -> ResearchResult {
    let snippets = vec![
        Snippet::new(
            format!("{topic} - Paper A"),
            format!("Idea A about {topic}."),
        ),
        Snippet::new(
            format!("{topic} - Paper B"),
            format!("Experiment results on {topic}."),
        ),
        Snippet::new(
            format!("{topic} - Review C"),
            format!("Summary and implications of {topic}."),
        ),
    ];

    ResearchResult {
        status: ToolStatus::Success,
        topic: topic.to_string(),
        snippets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_snippets_mention_topic() {
        for topic in ["Cats", "quantum error correction", "", "ünïcødé"] {
            let result = research(topic);
            assert_eq!(result.status, ToolStatus::Success);
            assert_eq!(result.topic, topic);
            assert_eq!(result.snippets.len(), 3);
            for s in &result.snippets {
                assert!(s.title.contains(topic));
                assert!(s.snippet.contains(topic));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(research("Rust"), research("Rust"));
        let result = research("Rust");
        assert_eq!(result.snippets[0].title, "Rust - Paper A");
        assert_eq!(result.snippets[1].snippet, "Experiment results on Rust.");
        assert_eq!(result.snippets[2].title, "Rust - Review C");
    }
}
