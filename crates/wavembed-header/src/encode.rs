//! Byte array rendering.
//!
//! Output layout:
//!
//! ```text
//! const uint8_t cast_away_fire[] = {
//!    0x52, 0x49, 0x46, 0x46, 0x24, 0x77, 0x01, 0x00, 0x57, 0x41, 0x56, 0x45,
//!    0x66, 0x6D, 0x74, 0x20,
//! };
//! const uint32_t cast_away_fire_len = 16;
//! ```
//!
//! Every entry is followed by `, `, including the last one on a line.
//! Lines are joined with `\n` and there is no trailing newline, so the
//! bytes match headers already checked into firmware trees.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use crate::HeaderError;
use crate::naming::ArrayNames;

const INDENT: &str = "   ";

/// Render `bytes` as a C array literal plus length constant
pub fn encode_c_array(
    bytes: &[u8],
    names: &ArrayNames,
    bytes_per_line: usize,
) -> Result<String, HeaderError> {
    if bytes_per_line == 0 {
        return Err(HeaderError::ZeroBytesPerLine);
    }
    let len = u32::try_from(bytes.len()).map_err(|_| HeaderError::TooLarge(bytes.len()))?;

    // "0xHH, " per byte plus indentation and newline per line
    let mut output = String::with_capacity(
        bytes.len() * 6 + bytes.len().div_ceil(bytes_per_line) * 4 + 128,
    );

    write!(output, "const uint8_t {}[] = {{", names.array)?;
    for line in bytes.chunks(bytes_per_line) {
        output.push('\n');
        output.push_str(INDENT);
        for byte in line {
            write!(output, "0x{byte:02X}, ")?;
        }
    }
    output.push_str("\n};\n");
    write!(output, "const uint32_t {} = {len};", names.len)?;

    Ok(output)
}

/// Atomically write rendered header text
pub fn write_header(path: impl AsRef<Path>, text: &str) -> Result<(), HeaderError> {
    wavembed_core::fs::write_atomic(path, text.as_bytes())?;
    Ok(())
}

/// Read `input`, render it, and write the header to `output`
///
/// Returns the number of bytes embedded.
pub fn encode_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    names: &ArrayNames,
    bytes_per_line: usize,
) -> Result<usize, HeaderError> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let bytes = wavembed_core::fs::read(input)?;
    let text = encode_c_array(&bytes, names, bytes_per_line)?;
    write_header(output, &text)?;

    tracing::info!(
        "Encoded {} ({} bytes) as {} in {}",
        input.display(),
        bytes.len(),
        names.array,
        output.display()
    );
    Ok(bytes.len())
}
