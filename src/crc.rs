/// Calculate the CRC8 for the given bytes.
///
/// The three bytes passed should be two data bytes with the following CRC
/// byte, as read from the sensor. The result of the function will be 0
/// if the CRC byte is correct for the preceding two data bytes.
///
/// # Example usage
///
/// ```rust,ignore
/// // Example taken from the SHT2x CRC application note.
/// assert_eq!(crc8([0x68, 0x3A, 0x7C]), 0);
/// ```
///
/// # CRC details
///
/// The SHT2x uses the generator polynomial x^8 + x^5 + x^4 + 1 (0x31) with
/// an initial value of 0x00, no reflection and no final XOR. Note the initial
/// value differs from the later Sensirion parts, which start from 0xFF.
#[must_use]
fn crc8(bytes: [u8; 3]) -> u8 {
    const fn top_bit_set(b: u8) -> bool {
        b & 0x80 == 0x80
    }

    const POLYNOMIAL: u8 = 0x31;
    const INITIAL: u8 = 0x00;

    let mut crc: u8 = INITIAL;
    for byte in bytes {
        crc ^= byte;
        for _ in 0..8 {
            if top_bit_set(crc) {
                // The x^8 term is implicit, so test the top bit before
                // shifting it out and applying the polynomial.
                crc <<= 1;
                crc ^= POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// A wrapper around [`crc8`] that relieves the caller of having
/// to compare the CRC result to 0.
pub(crate) fn validate_crc(bytes: [u8; 3]) -> Result<(), u8> {
    match crc8(bytes) {
        0 => Ok(()),
        x => Err(x),
    }
}
