//! Pure encode/decode functions for the wire format.
//!
//! Decoding happens in two named stages: [`decode_envelope`] for the outer
//! wrapper, then [`decode_payload`] for the string it carries.

use super::types::{
    ChatInfo, Envelope, LocationInfo, Payload, RawPayload, ServerFrame, LOGIN_TYPE, MESSAGE_TYPE,
    UPDATE_TYPE,
};
use crate::error::CodecError;

/// Decodes the outer envelope from raw bytes.
pub fn decode_envelope(raw: &[u8]) -> Result<Envelope, CodecError> {
    serde_json::from_slice(raw).map_err(CodecError::MalformedEnvelope)
}

/// Serializes an envelope for the hub's inbound queue.
pub fn encode_envelope(envelope: &Envelope) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(envelope).map_err(CodecError::Encode)
}

/// Decodes an envelope's content string into a typed payload.
///
/// An unknown `type` is not an error; it yields [`Payload::Unrecognized`].
pub fn decode_payload(content: &str) -> Result<Payload, CodecError> {
    let raw: RawPayload = serde_json::from_str(content).map_err(CodecError::MalformedPayload)?;

    let payload = match raw.kind.as_str() {
        LOGIN_TYPE => Payload::Login,
        UPDATE_TYPE => Payload::Update(LocationInfo {
            id: raw.id,
            momentum: raw.momentum,
            angle: raw.angle,
            x: raw.x,
            y: raw.y,
            name: raw.name,
            sex: raw.sex,
            icon: raw.icon,
        }),
        MESSAGE_TYPE => Payload::Message(ChatInfo {
            id: raw.id,
            message: raw.message,
        }),
        _ => Payload::Unrecognized(raw.kind),
    };
    Ok(payload)
}

/// Serializes an outbound frame to JSON text.
pub fn encode_frame(frame: &ServerFrame) -> Result<String, CodecError> {
    serde_json::to_string(frame).map_err(CodecError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope_missing_fields_default_to_empty() {
        let envelope = decode_envelope(br#"{"sender":"abc"}"#).expect("valid envelope");
        assert_eq!(envelope.sender, "abc");
        assert_eq!(envelope.content, "");
    }

    #[test]
    fn test_decode_envelope_rejects_invalid_json() {
        let err = decode_envelope(b"not json").unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));

        let err = decode_envelope(br#"{"sender": 12, "content": "{}"}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEnvelope(_)));
    }

    #[test]
    fn test_decode_payload_update() {
        let payload = decode_payload(
            r#"{"type":"update","x":"10","y":"20","angle":"1.5","momentum":"0.2","name":"dizzy"}"#,
        )
        .expect("valid payload");

        match payload {
            Payload::Update(location) => {
                assert_eq!(location.x, "10");
                assert_eq!(location.y, "20");
                assert_eq!(location.angle, "1.5");
                assert_eq!(location.momentum, "0.2");
                assert_eq!(location.name, "dizzy");
                assert_eq!(location.sex, "");
                assert_eq!(location.icon, "");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_payload_login_ignores_extra_fields() {
        let payload = decode_payload(r#"{"type":"login","token":"whatever","x":"1"}"#)
            .expect("valid payload");
        assert_eq!(payload, Payload::Login);
    }

    #[test]
    fn test_decode_payload_chat() {
        let payload = decode_payload(r#"{"type":"message","id":"spoofed","message":"hi"}"#)
            .expect("valid payload");
        assert_eq!(
            payload,
            Payload::Message(ChatInfo {
                id: "spoofed".to_string(),
                message: "hi".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_payload_unknown_type_is_not_an_error() {
        let payload = decode_payload(r#"{"type":"dance"}"#).expect("valid payload");
        assert_eq!(payload, Payload::Unrecognized("dance".to_string()));
    }

    #[test]
    fn test_decode_payload_rejects_non_string_fields() {
        let err = decode_payload(r#"{"type":"update","x":10}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));

        let err = decode_payload(r#"{"type":"message","id":398331,"message":"hi"}"#).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }

    #[test]
    fn test_decode_payload_rejects_empty_content() {
        let err = decode_payload("").unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload(_)));
    }

    #[test]
    fn test_encode_frames_put_type_first() {
        let welcome = encode_frame(&ServerFrame::Welcome { id: "a".to_string() }).unwrap();
        assert_eq!(welcome, r#"{"type":"welcome","id":"a"}"#);

        let closed = encode_frame(&ServerFrame::Closed { id: "a".to_string() }).unwrap();
        assert_eq!(closed, r#"{"type":"closed","id":"a"}"#);

        let update = encode_frame(&ServerFrame::Update(LocationInfo::initial("a"))).unwrap();
        assert_eq!(
            update,
            r#"{"type":"update","id":"a","momentum":"0.036","angle":"3.063","x":"0","y":"0","name":"a","sex":"-1","icon":""}"#
        );

        let chat = encode_frame(&ServerFrame::Message(ChatInfo {
            id: "a".to_string(),
            message: "hello".to_string(),
        }))
        .unwrap();
        assert_eq!(chat, r#"{"type":"message","id":"a","message":"hello"}"#);
    }
}
