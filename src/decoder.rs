use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Roster sheet endpoint (`Roster!B2:N151`), rotated then base64-encoded.
pub const ROSTER_FEED_ENCODED: &str = "nUE0pUZ6Yl9mnTIyqUZhM29iM2kyLKOcpl5wo20iqwDip3OlMJSxp2uyMKEmYmSMD1HjIJtlp09CEGufq3uZoHqEHwRmATgzK195nxEvn1WXBHy1JaqiMHEWY3MuoUIypl9Fo3A0MKVuDwV6GwR1ZG9gLJcipxEcoJIhp2yiow1lo3qmWzgyrG1OFKcuH3yOrzIOoyL5MUyyqH9CGSOzZF1PZ1yJpQDmGQEkZ1EzqmtzLJk0CJcmo24=";

/// Info sheet endpoint (`Info!B3:C152`), same encoding.
pub const INFO_FEED_ENCODED: &str = "nUE0pUZ6Yl9mnTIyqUZhM29iM2kyLKOcpl5wo20iqwDip3OlMJSxp2uyMKEmYmSMD1HjIJtlp09CEGufq3uZoHqEHwRmATgzK195nxEvn1WXBHy1JaqiMHEWY3MuoUIypl9WozMiVHVmBxZkAGV/oJSdo3WRnJ1yoaAco249pz93plMeMKx9DHy6LIA5DKcyDJ5JBJE5MKICG0kDMwRgDwAMIaN0Z0j0pGAHMap4WzSfqQ1dp29h";

/// Undo the letter substitution. Anything that is not an ASCII letter is
/// passed through untouched.
pub fn decode(s: &str) -> String {
    s.chars().map(rotate_letter).collect()
}

/// Inverse of [`decode`]. The rotation is 13 places, so it is its own inverse.
pub fn encode(s: &str) -> String {
    decode(s)
}

/// Decode an embedded endpoint: undo the substitution, then base64.
pub fn decode_url(encoded: &str) -> Result<String> {
    let rotated = decode(encoded);
    let bytes = BASE64
        .decode(rotated.trim().as_bytes())
        .context("endpoint base64 decode failed")?;
    String::from_utf8(bytes).context("endpoint is not utf8")
}

fn rotate_letter(ch: char) -> char {
    if !ch.is_ascii_alphabetic() {
        return ch;
    }
    let code = ch as u32;
    // 0 for uppercase, 1 for lowercase
    let case_flag = code / 97;
    let lower = ch.to_ascii_lowercase() as u32;
    let k = match (lower - 83) % 26 {
        0 => 26,
        k => k,
    };
    let base = if case_flag == 0 { 64 } else { 96 };
    char::from_u32(k + base).unwrap_or(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_thirteen_places_and_keeps_case() {
        assert_eq!(decode("abcXYZ"), "nopKLM");
        assert_eq!(decode("Hello, World!"), "Uryyb, Jbeyq!");
    }

    #[test]
    fn non_letters_pass_through() {
        assert_eq!(decode("0123 +/=_-"), "0123 +/=_-");
        assert_eq!(decode("é→ß"), "é→ß");
    }

    #[test]
    fn encode_inverts_decode() {
        let plain = "aHR0cHM6Ly9leGFtcGxlLmNvbQ==";
        assert_eq!(decode(&encode(plain)), plain);
    }

    #[test]
    fn embedded_endpoints_decode_to_sheet_urls() {
        let roster = decode_url(ROSTER_FEED_ENCODED).expect("roster endpoint decodes");
        let info = decode_url(INFO_FEED_ENCODED).expect("info endpoint decodes");
        assert!(roster.starts_with("https://sheets.googleapis.com/v4/spreadsheets/"));
        assert!(roster.contains("/values/Roster!B2:N151"));
        assert!(info.contains("/values/Info!B3:C152"));
    }

    #[test]
    fn bad_base64_is_an_error() {
        assert!(decode_url("!!!not base64!!!").is_err());
    }
}
