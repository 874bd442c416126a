use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Body of a successful client-credentials exchange
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Cached bearer token
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: SystemTime,
}

/// One page of `GET /routing/queues/{id}/members`
#[derive(Debug, Clone, Deserialize)]
pub struct MembersPage {
    #[serde(default)]
    pub entities: Vec<QueueMemberEntity>,
    #[serde(rename = "nextUri", default)]
    pub next_uri: Option<String>,
}

impl MembersPage {
    pub fn has_next(&self) -> bool {
        self.next_uri.as_deref().is_some_and(|uri| !uri.is_empty())
    }
}

/// Queue member entity as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct QueueMemberEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl QueueMemberEntity {
    /// Resolve identity, preferring the nested user over the flat entity fields
    pub fn into_member(self) -> Member {
        let (user_id, user_name) = match self.user {
            Some(user) => (non_empty(user.id), non_empty(user.name)),
            None => (None, None),
        };

        let id = user_id.or_else(|| non_empty(self.id));
        let name = user_name
            .or_else(|| non_empty(self.name))
            .or_else(|| id.clone())
            .unwrap_or_else(|| UNKNOWN_MEMBER_NAME.to_string());

        Member { id, name }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub const UNKNOWN_MEMBER_NAME: &str = "(unknown)";

/// Agent identity in listing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<String>,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }
}

/// Per-channel settings; only `maximumCapacity` is used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUtilization {
    #[serde(rename = "maximumCapacity", default, skip_serializing_if = "Option::is_none")]
    pub maximum_capacity: Option<u32>,
}

/// Channel name to utilization settings for one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtilizationRecord(BTreeMap<String, ChannelUtilization>);

impl UtilizationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_capacities<I, S>(capacities: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self(
            capacities
                .into_iter()
                .map(|(channel, cap)| {
                    (
                        channel.into(),
                        ChannelUtilization {
                            maximum_capacity: Some(cap),
                        },
                    )
                })
                .collect(),
        )
    }

    pub fn insert(&mut self, channel: impl Into<String>, utilization: ChannelUtilization) {
        self.0.insert(channel.into(), utilization);
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn maximum_capacity(&self, channel: &str) -> Option<u32> {
        self.0.get(channel).and_then(|c| c.maximum_capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Body of `GET /routing/users/{id}/utilization`
#[derive(Debug, Clone, Deserialize)]
pub struct UtilizationResponse {
    #[serde(default)]
    pub utilization: Option<UtilizationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_prefers_nested_user() {
        let entity: QueueMemberEntity = serde_json::from_value(json!({
            "id": "member-1",
            "name": "Flat Name",
            "user": { "id": "user-1", "name": "Ada Lovelace" }
        }))
        .unwrap();

        assert_eq!(entity.into_member(), Member::new("user-1", "Ada Lovelace"));
    }

    #[test]
    fn test_member_falls_back_to_flat_identity() {
        let entity: QueueMemberEntity = serde_json::from_value(json!({
            "id": "member-2",
            "name": "Grace Hopper",
            "user": null
        }))
        .unwrap();

        assert_eq!(entity.into_member(), Member::new("member-2", "Grace Hopper"));
    }

    #[test]
    fn test_member_with_empty_user_fields_falls_back() {
        let entity: QueueMemberEntity = serde_json::from_value(json!({
            "id": "member-3",
            "user": { "id": "", "name": "" }
        }))
        .unwrap();

        let member = entity.into_member();
        assert_eq!(member.id.as_deref(), Some("member-3"));
        assert_eq!(member.name, "member-3");
    }

    #[test]
    fn test_member_without_any_identity() {
        let entity: QueueMemberEntity = serde_json::from_value(json!({})).unwrap();
        let member = entity.into_member();

        assert_eq!(member.id, None);
        assert_eq!(member.name, UNKNOWN_MEMBER_NAME);
    }

    #[test]
    fn test_members_page_next_marker() {
        let page: MembersPage =
            serde_json::from_value(json!({ "entities": [], "nextUri": "/api/v2/...&pageNumber=2" }))
                .unwrap();
        assert!(page.has_next());

        let page: MembersPage = serde_json::from_value(json!({ "entities": [], "nextUri": "" })).unwrap();
        assert!(!page.has_next());

        let page: MembersPage = serde_json::from_value(json!({ "pageNumber": 3 })).unwrap();
        assert!(!page.has_next());
        assert!(page.entities.is_empty());
    }

    #[test]
    fn test_utilization_response_ignores_other_fields() {
        let response: UtilizationResponse = serde_json::from_value(json!({
            "utilization": {
                "call": { "maximumCapacity": 1, "interruptableMediaTypes": ["email"], "includeNonAcd": false },
                "email": { "includeNonAcd": true }
            },
            "level": "Agent"
        }))
        .unwrap();

        let record = response.utilization.unwrap();
        assert_eq!(record.maximum_capacity("call"), Some(1));
        assert_eq!(record.maximum_capacity("email"), None);
        assert_eq!(record.channels().collect::<Vec<_>>(), vec!["call", "email"]);
    }
}
