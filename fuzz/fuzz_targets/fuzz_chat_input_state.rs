#![no_main]
use arbitrary::Arbitrary;
use cloudchat_oplog::codec::Coding;
use cloudchat_oplog::{ChatInputStatePayload, CodecOptions, MessageId, OptionalIdEncoding, PeerId};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    reply_to: Option<(i64, i32, i32)>,
    text: String,
    timestamp: i32,
    tagged: bool,
}

fuzz_target!(|input: Input| {
    let state = ChatInputStatePayload {
        reply_to_message_id: input
            .reply_to
            .map(|(peer, namespace, id)| MessageId::new(PeerId::from_i64(peer), namespace, id)),
        text: input.text,
        timestamp: input.timestamp,
    };
    let mode = if input.tagged {
        OptionalIdEncoding::Tagged
    } else {
        OptionalIdEncoding::SplitFields
    };
    let options = CodecOptions::new(mode);

    let encoded = state.to_bytes(options);
    let decoded = ChatInputStatePayload::from_bytes(&encoded, options)
        .expect("Encoded state must decode");
    assert_eq!(decoded, state, "Chat input state round-trip mismatch");
});
