#![no_main]
use cloudchat_oplog::{CodecOptions, OperationPayload, OptionalIdEncoding};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte = payload kind, rest = contents
    let kind = data[0];
    let contents = &data[1..];

    for mode in [OptionalIdEncoding::SplitFields, OptionalIdEncoding::Tagged] {
        let options = CodecOptions::new(mode);

        // Arbitrary contents must never panic
        if let Ok(payload) = OperationPayload::decode_raw(kind, contents, options) {
            // Whatever decoded must survive a re-encode under the same mode
            let encoded = payload.encode(options);
            let decoded = OperationPayload::decode(payload.kind(), &encoded, options)
                .expect("Re-encoded payload must decode");
            assert_eq!(decoded, payload, "Payload re-encode mismatch");
        }
    }
});
