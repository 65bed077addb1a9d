//! Subtitle format handling for the video subtitle proxy.
//!
//! Browsers only accept WebVTT in `<track>` elements, so SRT subtitles
//! stored alongside a video are converted on the way out. VTT input is
//! passed through untouched.

use regex::Regex;

/// SRT cue timing line: `00:00:01,000 --> 00:00:04,000` (milliseconds
/// separated by a comma instead of VTT's dot).
fn srt_timing_pattern() -> Regex {
    Regex::new(r"(?m)^(\d{2}:\d{2}:\d{2}),(\d{3})(\s*-->\s*)(\d{2}:\d{2}:\d{2}),(\d{3})")
        .unwrap()
}

/// Whether the content already is a WebVTT document
pub fn is_vtt(content: &str) -> bool {
    content.trim_start_matches('\u{feff}').trim_start().starts_with("WEBVTT")
}

/// Convert an SRT document to WebVTT.
///
/// Cue numbers are kept (valid VTT cue identifiers), timing separators are
/// rewritten from comma to dot, and the mandatory `WEBVTT` header is
/// prepended. Already-VTT input is returned unchanged.
pub fn srt_to_vtt(content: &str) -> String {
    if is_vtt(content) {
        return content.to_string();
    }

    let normalized = content
        .trim_start_matches('\u{feff}')
        .replace("\r\n", "\n");

    let converted = srt_timing_pattern().replace_all(&normalized, "$1.$2$3$4.$5");

    format!("WEBVTT\n\n{}", converted.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_timing_separators() {
        let srt = "1\n00:00:01,000 --> 00:00:04,200\nHello there\n\n2\n00:00:05,500 --> 00:00:07,000\nSecond cue\n";
        let vtt = srt_to_vtt(srt);

        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("00:00:01.000 --> 00:00:04.200"));
        assert!(vtt.contains("00:00:05.500 --> 00:00:07.000"));
        assert!(!vtt.contains(','));
    }

    #[test]
    fn test_keeps_cue_text_intact() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\nA line, with a comma\n";
        let vtt = srt_to_vtt(srt);

        // Commas inside cue text are not timing separators
        assert!(vtt.contains("A line, with a comma"));
    }

    #[test]
    fn test_passes_through_existing_vtt() {
        let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:04.000\nAlready converted\n";
        assert_eq!(srt_to_vtt(vtt), vtt);
    }

    #[test]
    fn test_handles_crlf_input() {
        let srt = "1\r\n00:00:01,000 --> 00:00:04,000\r\nWindows line endings\r\n";
        let vtt = srt_to_vtt(srt);

        assert!(vtt.contains("00:00:01.000 --> 00:00:04.000"));
        assert!(!vtt.contains('\r'));
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let srt = "\u{feff}1\n00:00:01,000 --> 00:00:02,000\nBom\n";
        let vtt = srt_to_vtt(srt);
        assert!(vtt.starts_with("WEBVTT"));
    }

    #[test]
    fn test_detects_vtt_with_bom() {
        assert!(is_vtt("\u{feff}WEBVTT\n"));
        assert!(is_vtt("WEBVTT - title\n"));
        assert!(!is_vtt("1\n00:00:01,000 --> 00:00:02,000\n"));
    }
}
