#![no_main]

use libfuzzer_sys::fuzz_target;
use tailcfg::config::loader::{ConfigLoader, ConfigSource, SourceFormat};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let loader = ConfigLoader::with_defaults();

        // Any outcome is fine as long as nothing panics.
        let _ = loader.load_str("fuzz.yaml", text);
        let _ = loader.load(&ConfigSource::Text {
            name: "fuzz.json".to_string(),
            contents: text.to_string(),
            format: SourceFormat::Json,
        });
    }
});
