use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ids::{ChallengeId, ResourceId, TopicId};

/// Kind of learning material a resource points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Article,
    Video,
    Exercise,
    Other,
}

/// External learning material. The URL must be absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub kind: ResourceKind,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub xp_reward: u32,
}

/// A topic suggested to learners, with a short reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub topic_id: TopicId,
    pub title: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_rejects_relative_url() {
        let doc = r#"{"id":"r1","title":"Book","kind":"article","url":"/book"}"#;
        assert!(serde_json::from_str::<Resource>(doc).is_err());

        let doc = r#"{"id":"r1","title":"Book","kind":"video","url":"https://example.com/v"}"#;
        let resource: Resource = serde_json::from_str(doc).unwrap();
        assert_eq!(resource.kind, ResourceKind::Video);
    }
}
