//! Byte classes used by the parsers.

/// Generate a `const fn(u8) -> bool` backed by a 256 entry lookup table.
///
/// The expression is evaluated once per byte at compile time.
macro_rules! byte_map {
    {
        $(#[$meta:meta])*
        $vis:vis const fn $fn_id:ident($byte:ident) { $e:expr }
    } => {
        $(#[$meta])*
        #[inline(always)]
        $vis const fn $fn_id($byte: u8) -> bool {
            const TABLE: [bool; 256] = {
                let mut table = [false; 256];
                let mut $byte = 0u8;
                loop {
                    table[$byte as usize] = $e;
                    if $byte == 255 {
                        break;
                    }
                    $byte += 1;
                }
                table
            };
            TABLE[$byte as usize]
        }
    };
}

byte_map! {
    /// Returns `true` if `byte` is a `tchar`.
    ///
    /// token   = 1*tchar
    /// tchar   = "!" / "#" / "$" / "%" / "&" / "'" / "*"
    ///         / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
    ///         / DIGIT / ALPHA
    pub const fn is_token(byte) {
        matches!(
            byte,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
            | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
            | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
        )
    }
}

byte_map! {
    /// Returns `true` if `byte` may appear in a header value.
    ///
    /// Control characters other than horizontal tab are rejected, which keeps a stray `\r` or
    /// `\n` from splitting a field when it is written back out.
    pub const fn is_field_value(byte) {
        matches!(byte, b'\t' | b' '..=b'~' | 0x80..=0xFF)
    }
}

/// Returns the index of the first `\r\n` in `bytes`.
pub fn find_crlf(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|pair| pair == b"\r\n")
}
