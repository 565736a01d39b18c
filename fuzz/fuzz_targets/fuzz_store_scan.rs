#![no_main]

use facturador::store::{CsvRecordStore, MalformedRowPolicy, RecordStore};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::TempDir::new() else {
        return;
    };
    let path = dir.path().join("facturas.csv");
    if std::fs::write(&path, data).is_err() {
        return;
    }

    // Errors are fine; panics are bugs.
    let lenient = CsvRecordStore::new(&path).with_cache(false);
    let strict = CsvRecordStore::new(&path)
        .with_cache(false)
        .with_policy(MalformedRowPolicy::Strict);
    let skipped = lenient.max_number();
    if let Ok(max) = strict.max_number() {
        // A clean strict scan sees exactly what the lenient one sees.
        assert_eq!(skipped.ok(), Some(max));
    }
});
