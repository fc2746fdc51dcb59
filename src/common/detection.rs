//! Signature checks for incoming document bytes.

/// Local file header signature every ZIP archive starts with.
pub const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Whether `bytes` start like a ZIP archive.
#[inline]
pub fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_zip() {
        assert!(is_zip(b"PK\x03\x04rest"));
        assert!(!is_zip(b"XLSY;v10;0;"));
        assert!(!is_zip(b"PK"));
    }
}
