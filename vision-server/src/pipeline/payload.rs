//! Base64 payload extraction.

/// Strip data-URL framing from an image payload.
///
/// Anything up to and including the first comma is dropped; a string with
/// no comma is returned whole. The scheme before the comma is not checked.
pub fn extract_base64(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, payload)) => payload,
        None => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("aGVsbG8=", "aGVsbG8=")]
    #[case("data:image/png;base64,aGVsbG8=", "aGVsbG8=")]
    #[case("anything,aGVsbG8=", "aGVsbG8=")]
    #[case("a,b,c", "b,c")]
    #[case(",", "")]
    #[case("", "")]
    fn test_extract_base64(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(extract_base64(input), expected);
    }
}
