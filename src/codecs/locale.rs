//! Two-letter locale codes packed into a `u16`, first letter in the low
//! byte. 0 is the error sentinel.

/// 2-letter locale → u16; 0 for anything else
pub fn locale_to_code(locale: &str) -> u16 {
    let bytes = locale.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_lowercase) {
        return 0;
    }
    u16::from(bytes[0]) | u16::from(bytes[1]) << 8
}

/// u16 → 2-letter locale; "" for the 0 sentinel
pub fn code_to_locale(code: u16) -> String {
    if code == 0 {
        return String::new();
    }
    let bytes = [(code & 0xff) as u8, (code >> 8) as u8];
    String::from_utf8_lossy(&bytes).into_owned()
}
