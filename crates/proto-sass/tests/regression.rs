use prost::Message;
use proto_sass::embedded_protocol::{
    inbound_message, outbound_message, value, InboundMessage, OutboundMessage, ProtocolError,
    Value,
};

// These encodings are load-bearing: the compiler on the other end of the pipe
// decodes them with its own copy of embedded_sass.proto, so field tags must
// never drift.
#[test]
fn inbound_version_request_encoding() {
    let msg = InboundMessage {
        message: Some(inbound_message::Message::VersionRequest(
            inbound_message::VersionRequest { id: 1 },
        )),
    };
    assert_eq!(msg.encode_to_vec(), vec![0x3a, 0x02, 0x08, 0x01]);
    assert_eq!(InboundMessage::decode(&[0x3a, 0x02, 0x08, 0x01][..]).unwrap(), msg);
}

#[test]
fn outbound_protocol_error_encoding() {
    let msg = OutboundMessage {
        message: Some(outbound_message::Message::Error(ProtocolError {
            r#type: 0,
            id: 0,
            message: "hi".to_string(),
        })),
    };
    assert_eq!(
        msg.encode_to_vec(),
        vec![0x0a, 0x04, 0x1a, 0x02, b'h', b'i'],
    );
}

#[test]
fn value_round_trip() {
    let fixture = Value {
        value: Some(value::Value::List(value::List {
            separator: proto_sass::embedded_protocol::ListSeparator::Slash as i32,
            has_brackets: true,
            contents: vec![
                Value {
                    value: Some(value::Value::Number(value::Number {
                        value: 1.5,
                        numerators: vec!["px".to_string()],
                        denominators: vec![],
                    })),
                },
                Value {
                    value: Some(value::Value::Singleton(value::Singleton::Null as i32)),
                },
            ],
        })),
    };

    let bytes = fixture.encode_to_vec();
    assert_eq!(Value::decode(bytes.as_slice()).unwrap(), fixture);
}
