#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decode must never panic, whatever the input
    let _ = tinyimg::decode_bmp(data, enough::Unstoppable);
    let _ = tinyimg::ImageInfo::from_bytes(data);
});
