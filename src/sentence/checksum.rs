//! NMEA checksum

/// NMEA 0183 Checksum Calculator: XOR of every byte
/// comprised between the `$` and `*` delimiters.
pub struct Checksum;

impl Checksum {
    /// Calculates the checksum of given sentence body,
    /// which must not include the delimiters.
    /// ```
    /// use nmea_satview::prelude::Checksum;
    /// assert_eq!(Checksum::calc_from_bytes(b"GPGSV,1,1,0"), 0x49);
    /// ```
    pub fn calc_from_bytes(raw: &[u8]) -> u8 {
        raw.iter().fold(0, |crc, b| crc ^ b)
    }
    /// Parses the two hex digits following the `*` delimiter
    pub fn parse(hex: &str) -> Option<u8> {
        let hex = hex.trim();
        if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u8::from_str_radix(hex, 16).ok()
    }
    /// Verifies that `body` matches the `hex` checksum
    pub fn crc_ok(body: &str, hex: &str) -> bool {
        Self::parse(hex) == Some(Self::calc_from_bytes(body.as_bytes()))
    }
}
