#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    jt_fuzz::fuzz_resolve(data);
});
