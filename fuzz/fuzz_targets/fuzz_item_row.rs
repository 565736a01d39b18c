#![no_main]

use facturador::session::ItemRow;
use facturador::validate_line_items;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut cells = s.splitn(3, '|');
        let row = ItemRow::new(
            cells.next().unwrap_or_default(),
            cells.next().unwrap_or_default(),
            cells.next().unwrap_or_default(),
        );
        // Errors are fine; panics are bugs.
        if let Ok(item) = row.parse(1) {
            let _ = validate_line_items(&[item]);
        }
    }
});
