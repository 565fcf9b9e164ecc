//! Unicode utilities for PDF text rendering
//!
//! Provides conversion from Unicode (UTF-8) to WinAnsiEncoding for the
//! built-in base fonts. Letters WinAnsi lacks (most Czech carons, the ring
//! on ů) are printed as their base Latin letter rather than dropped.

/// WinAnsiEncoding byte for `ch`, if the encoding has a printable glyph for it.
pub fn winansi_byte(ch: char) -> Option<u8> {
    if ch.is_control() {
        return None;
    }
    let code = ch as u32;
    if code <= 0x7F || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91, // Left single quotation mark
        '\u{2019}' => 0x92, // Right single quotation mark
        '\u{201C}' => 0x93, // Left double quotation mark
        '\u{201D}' => 0x94, // Right double quotation mark
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Base Latin letter of an accented letter; other characters are returned as is.
pub fn base_letter(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ą' | 'ă' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ą' | 'Ă' => 'A',
        'č' | 'ć' | 'ç' => 'c',
        'Č' | 'Ć' | 'Ç' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'é' | 'è' | 'ê' | 'ë' | 'ě' | 'ę' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' | 'Ě' | 'Ę' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ľ' | 'ĺ' | 'ł' => 'l',
        'Ľ' | 'Ĺ' | 'Ł' => 'L',
        'ň' | 'ń' | 'ñ' => 'n',
        'Ň' | 'Ń' | 'Ñ' => 'N',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ő' | 'ø' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ő' | 'Ø' => 'O',
        'ř' | 'ŕ' => 'r',
        'Ř' | 'Ŕ' => 'R',
        'š' | 'ś' => 's',
        'Š' | 'Ś' => 'S',
        'ť' => 't',
        'Ť' => 'T',
        'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'ű' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ů' | 'Ű' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        'ž' | 'ź' | 'ż' => 'z',
        'Ž' | 'Ź' | 'Ż' => 'Z',
        _ => ch,
    }
}

/// Check if text can be shown by a WinAnsi font without substitution
pub fn is_winansi(text: &str) -> bool {
    text.chars().all(|ch| winansi_byte(ch).is_some())
}

/// Convert Unicode string to WinAnsiEncoding bytes for PDF text rendering
///
/// Characters missing from WinAnsiEncoding are replaced by their base
/// letter when they have one, and by '?' otherwise. Control characters
/// become a space when they are whitespace (tab, newline) and '?' otherwise.
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| {
            if ch.is_control() {
                return if ch.is_whitespace() { b' ' } else { b'?' };
            }
            winansi_byte(ch)
                .or_else(|| winansi_byte(base_letter(ch)))
                .unwrap_or(b'?')
        })
        .collect()
}
