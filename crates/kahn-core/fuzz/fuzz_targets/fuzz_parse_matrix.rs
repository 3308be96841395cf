#![no_main]
use kahn_core::matrix;
use kahn_core::topo::detect;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Counts above 9999 vertices only exercise the allocator.
    let count_digits = data
        .iter()
        .skip_while(|b| b.is_ascii_whitespace() || **b == b'+')
        .take_while(|b| b.is_ascii_digit())
        .count();
    if count_digits > 4 {
        return;
    }

    // Must not panic -- returning Err is fine.
    if let Ok(graph) = matrix::parse_bytes(data) {
        let _ = detect(&graph).to_string();
    }
});
