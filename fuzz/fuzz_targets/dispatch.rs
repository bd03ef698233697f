#![no_main]

use fauxbuild::Value;
use fauxbuild::demo::Example;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the arity, the rest is the operation name (ignore invalid UTF-8)
    let Some((&arity, name)) = data.split_first() else {
        return;
    };
    if let Ok(name) = std::str::from_utf8(name) {
        if let Ok(mut builder) = Example::builder("X") {
            let args = (0..arity % 3).map(|i| Value::Int(i32::from(i))).collect();
            let _ = builder.dispatch(name, args);
            let _ = builder.to_string();
        }
    }
});
