#![no_main]
use libfuzzer_sys::fuzz_target;

use nbtstream::stream::{Reader, Writer};

// Feed every token read straight into a writer. Whatever reads cleanly must
// write back to the same bytes.
fuzz_target!(|data: &[u8]| {
    let mut reader = Reader::new(data);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.next_token() {
            Ok(Some(token)) => {
                // List items are written by position, their names are ignored.
                let name = token.name.as_key().unwrap_or_default();
                writer.emit_token(name, token.payload).unwrap();
            }
            Ok(None) => break,
            Err(_) => return,
        }
    }

    let consumed = data.len() - reader.get_ref().len();
    assert_eq!(writer.finish().unwrap(), &data[..consumed]);
});
