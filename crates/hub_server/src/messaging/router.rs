//! Routing policy for inbound envelopes.
//!
//! This module decides, per payload type, what the hub should deliver. It never
//! touches the member set itself: the hub applies the returned [`Route`] to
//! whichever members are current when the event is processed.

use super::{
    codec::{decode_envelope, decode_payload, encode_frame},
    types::{LocationInfo, Payload, ServerFrame},
};
use crate::{config::UpdateIdPolicy, error::CodecError};
use tracing::{info, trace};

/// What the hub should do with one inbound envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Nothing is delivered.
    Ignore,
    /// The same serialized frame goes to every member.
    Everyone(String),
    /// A position report that must be re-labelled with each recipient's id
    /// before it is serialized.
    PerRecipient(LocationInfo),
}

/// Decodes a raw envelope and turns its payload into a [`Route`].
///
/// # Routing Rules
///
/// * `login` - logged only
/// * `message` - id re-stamped to the envelope sender, one frame for everyone
/// * `update` - position fields from the sender's report, id chosen by `policy`
/// * anything else - ignored
pub fn plan_route(raw: &[u8], policy: UpdateIdPolicy) -> Result<Route, CodecError> {
    let envelope = decode_envelope(raw)?;
    let payload = decode_payload(&envelope.content)?;

    let route = match payload {
        Payload::Login => {
            info!("🔑 Session {} logged in", envelope.sender);
            Route::Ignore
        }
        Payload::Message(mut chat) => {
            chat.id = envelope.sender;
            Route::Everyone(encode_frame(&ServerFrame::Message(chat))?)
        }
        Payload::Update(report) => {
            let location = report.with_id(&envelope.sender);
            match policy {
                UpdateIdPolicy::Sender => {
                    Route::Everyone(encode_frame(&ServerFrame::Update(location))?)
                }
                UpdateIdPolicy::Recipient => Route::PerRecipient(location),
            }
        }
        Payload::Unrecognized(kind) => {
            trace!("Dropping payload of unrecognized type '{}'", kind);
            Route::Ignore
        }
    };
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{codec::encode_envelope, types::Envelope};

    fn envelope(sender: &str, content: &str) -> Vec<u8> {
        encode_envelope(&Envelope {
            sender: sender.to_string(),
            content: content.to_string(),
        })
        .expect("envelope encodes")
    }

    #[test]
    fn test_login_is_ignored() {
        let route = plan_route(&envelope("a", r#"{"type":"login"}"#), UpdateIdPolicy::Sender)
            .expect("routes");
        assert_eq!(route, Route::Ignore);
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let route = plan_route(&envelope("a", r#"{"type":"jump"}"#), UpdateIdPolicy::Sender)
            .expect("routes");
        assert_eq!(route, Route::Ignore);
    }

    #[test]
    fn test_chat_is_restamped_with_sender() {
        let route = plan_route(
            &envelope("alice", r#"{"type":"message","id":"mallory","message":"hi"}"#),
            UpdateIdPolicy::Recipient,
        )
        .expect("routes");
        assert_eq!(
            route,
            Route::Everyone(r#"{"type":"message","id":"alice","message":"hi"}"#.to_string())
        );
    }

    #[test]
    fn test_update_under_sender_policy_is_one_frame() {
        let route = plan_route(
            &envelope("alice", r#"{"type":"update","id":"x","x":"10","y":"20"}"#),
            UpdateIdPolicy::Sender,
        )
        .expect("routes");
        assert_eq!(
            route,
            Route::Everyone(
                r#"{"type":"update","id":"alice","momentum":"","angle":"","x":"10","y":"20","name":"","sex":"","icon":""}"#
                    .to_string()
            )
        );
    }

    #[test]
    fn test_update_under_recipient_policy_defers_the_id() {
        let route = plan_route(
            &envelope("alice", r#"{"type":"update","x":"10","y":"20","sex":"1"}"#),
            UpdateIdPolicy::Recipient,
        )
        .expect("routes");
        match route {
            Route::PerRecipient(location) => {
                assert_eq!(location.x, "10");
                assert_eq!(location.y, "20");
                assert_eq!(location.sex, "1");
            }
            other => panic!("expected per-recipient route, got {other:?}"),
        }
    }

    #[test]
    fn test_each_stage_reports_its_own_failure() {
        let err = plan_route(b"{", UpdateIdPolicy::Sender).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));

        let err = plan_route(&envelope("a", "not json"), UpdateIdPolicy::Sender).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }
}
