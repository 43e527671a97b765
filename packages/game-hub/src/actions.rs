use serde::{Deserialize, Serialize};

/// Inbound client actions. The `action` tag matches the wire messages the
/// transport layer decodes, e.g. `{"action": "playMove", ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClientAction {
    JoinQueue,
    LeaveQueue,
    #[serde(rename_all = "camelCase")]
    SubscribeToSession { session_id: String },
    #[serde(rename_all = "camelCase")]
    UnsubscribeFromSession { session_id: String },
    #[serde(rename_all = "camelCase")]
    PlayMove {
        session_id: String,
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        promotion: Option<String>,
    },
    ListSessions,
    GetQueueCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_play_move() {
        let action: ClientAction = serde_json::from_str(
            r#"{"action": "playMove", "sessionId": "s1", "from": "e2", "to": "e4"}"#,
        )
        .unwrap();

        assert_eq!(
            action,
            ClientAction::PlayMove {
                session_id: "s1".to_string(),
                from: "e2".to_string(),
                to: "e4".to_string(),
                promotion: None,
            }
        );
    }

    #[test]
    fn test_deserialize_unit_actions() {
        let action: ClientAction = serde_json::from_str(r#"{"action": "joinQueue"}"#).unwrap();
        assert_eq!(action, ClientAction::JoinQueue);

        let action: ClientAction = serde_json::from_str(r#"{"action": "getQueueCount"}"#).unwrap();
        assert_eq!(action, ClientAction::GetQueueCount);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_str::<ClientAction>(r#"{"action": "selfDestruct"}"#);

        assert!(result.is_err());
    }
}
