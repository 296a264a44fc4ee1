use wtfcodec::{
    utf16_to_utf8_alloc, wtf16_to_wtf8_alloc, wtf8_as_utf8, wtf8_to_utf8_lossy_alloc,
    wtf8_to_wtf16_alloc, Rust, Wtf8View,
};

// "garçon", with a lone high surrogate where the "ç" should be, as a careless
// UTF-16 producer might leave it.
const WORD: &'static [u16] = &[0x67, 0x61, 0x72, 0xD800, 0x6F, 0x6E];

fn main() {
    println!("wtf16: {:X?}", WORD);

    match utf16_to_utf8_alloc::<Rust>(WORD) {
        Ok(utf8) => println!("via utf16->utf8: {:?}", utf8),
        Err(err) => println!("couldn't convert as UTF-16: {}", err),
    }

    let wtf8 = match wtf16_to_wtf8_alloc::<Rust>(WORD) {
        Ok(wtf8) => wtf8,
        Err(err) => {
            println!("couldn't allocate: {}", err);
            return;
        }
    };
    println!("wtf8 bytes: {:X?}", &*wtf8);

    let view = match Wtf8View::new(&wtf8) {
        Ok(view) => view,
        Err(err) => {
            println!("wtf16->wtf8 produced malformed WTF-8: {}", err);
            return;
        }
    };
    println!("wtf8: {:?}", view);

    match wtf8_as_utf8(view) {
        Ok(utf8) => println!("as utf8: {}", utf8),
        Err(err) => println!("couldn't view as UTF-8: {}", err),
    }

    match wtf8_to_utf8_lossy_alloc::<Rust>(&wtf8) {
        Ok(lossy) => println!("lossy: {}", String::from_utf8_lossy(&lossy)),
        Err(err) => println!("couldn't convert lossily: {}", err),
    }

    match wtf8_to_wtf16_alloc::<Rust>(&wtf8) {
        Ok(back) => println!("round trip: {:X?} (same: {})", &*back, &*back == WORD),
        Err(err) => println!("couldn't convert back: {}", err),
    }
}
