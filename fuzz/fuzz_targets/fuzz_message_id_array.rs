#![no_main]
use cloudchat_oplog::MessageId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary buffers must decode or fail cleanly
    if let Ok(ids) = MessageId::decode_array(data) {
        // A buffer that decodes is exactly the canonical encoding
        assert_eq!(MessageId::encode_array(&ids), data, "MessageId array not canonical");
    }
});
