#![no_main]

use libfuzzer_sys::fuzz_target;
use lasframe::records::{ExtraFieldsRegistry, MetadataRecord, RecordPayload};

fuzz_target!(|data: &[u8]| {
    // Decoding must fail gracefully, never panic
    let Ok(registry) = ExtraFieldsRegistry::decode(data) else {
        return;
    };

    // Whatever decodes must encode to a payload of the declared size
    if let Ok(bytes) = registry.encode() {
        assert_eq!(bytes.len() as u64, registry.payload_size());
        let _ = ExtraFieldsRegistry::decode(&bytes);
    }

    // Same path the dataset takes for opaque extra-bytes records
    let mut record = MetadataRecord::new(
        "LASF_Spec",
        4,
        "Extra Bytes",
        RecordPayload::Opaque(data.to_vec()),
    );
    let _ = record.decode_known_payload();
});
