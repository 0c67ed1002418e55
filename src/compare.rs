/// Bytes shown either side of a disc image mismatch.
const EXCERPT_LEN: usize = 16;

/// The offset of the first byte where `gold` and `output` differ,
/// or the length of the shorter one if it is a prefix of the other.
pub fn first_difference(gold: &[u8], output: &[u8]) -> Option<usize> {
    gold.iter()
        .zip(output)
        .position(|(g, o)| g != o)
        .or_else(|| (gold.len() != output.len()).then_some(gold.len().min(output.len())))
}

/// Hex dump of the bytes of `bytes` starting at `offset`.
pub fn excerpt(bytes: &[u8], offset: usize) -> String {
    let start = offset.min(bytes.len());
    let end = (start + EXCERPT_LEN).min(bytes.len());
    if start == end {
        "<end of file>".to_string()
    } else {
        hex::encode(&bytes[start..end])
    }
}

/// Whether the captured transcript contains the gold text.
/// Trailing whitespace of the gold text is insignificant, as are line ending styles.
pub fn contains_gold(capture: &str, gold: &str) -> bool {
    let capture = capture.replace("\r\n", "\n");
    let gold = gold.replace("\r\n", "\n");

    capture.contains(gold.trim_end())
}
