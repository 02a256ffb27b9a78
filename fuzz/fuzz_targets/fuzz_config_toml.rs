#![no_main]

use libfuzzer_sys::fuzz_target;

use dirwatcher::WatchOptions;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing, validation and option building should never panic
        if let Ok(config) = toml::from_str::<dirwatcher::Config>(content) {
            if config.validate().is_ok() {
                let _ = WatchOptions::from_config("watched".into(), "FOO", &config);
            }
        }
    }
});
