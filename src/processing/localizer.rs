use lazy_static::lazy_static;
use regex::Regex;

/// TD3 passports carry two 44-character MRZ lines.
const TD3_LINE_LENGTH: usize = 44;

lazy_static! {
    // Fallback patterns scanned in declaration order over the transcript
    // with line breaks removed. Digit positions accept the letters
    // Tesseract commonly confuses with digits in the OCR-B font
    // (I, L, D, S, O, G).
    static ref MRZ_FALLBACK_PATTERNS: Vec<Regex> = vec![
        // Full TD3 second-line shape: document number, check digit,
        // nationality, birth date, check digit, sex, expiry date, check digit
        Regex::new(r"[A-Z0-9<]{9}[0-9ILDSOG][A-Z<]{3}[0-9ILDSOG]{6}[0-9ILDSOG][FM<][0-9ILDSOG]{6}[0-9ILDSOG]").unwrap(),
        // Document-type and issuing-country fragment of a merged first line
        Regex::new(r"IP[A-Z]{3}[A-Z0-9]{9}[0-9]").unwrap(),
        // Birth date, sex and expiry date fragment with trailing nationality
        Regex::new(r"[0-9]{6}[0-9ILDSOG][FM<][0-9]{6}[0-9ILDSOG][A-Z]{3}").unwrap(),
    ];
}

/// MrzLocalizer finds a plausible MRZ block inside a raw OCR transcript.
pub struct MrzLocalizer;

impl MrzLocalizer {
    /// Locate an MRZ candidate in raw recognized text.
    ///
    /// The high-confidence path is a pair of adjacent 44-character lines,
    /// the exact TD3 layout; the first qualifying pair wins. When OCR
    /// merged or split lines, the fallback patterns are tried against the
    /// concatenated transcript and the first match of the first matching
    /// pattern is returned.
    pub fn locate(raw_text: &str) -> Option<String> {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        for pair in lines.windows(2) {
            if pair[0].chars().count() == TD3_LINE_LENGTH
                && pair[1].chars().count() == TD3_LINE_LENGTH
            {
                return Some(format!("{}\n{}", pair[0], pair[1]));
            }
        }

        let joined: String = lines.concat();
        for pattern in MRZ_FALLBACK_PATTERNS.iter() {
            if let Some(found) = pattern.find(&joined) {
                return Some(found.as_str().to_string());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mrz_line_1() -> String {
        let prefix = "P<UTOERIKSSON<<ANNA<MARIA";
        format!("{}{}", prefix, "<".repeat(TD3_LINE_LENGTH - prefix.len()))
    }

    fn mrz_line_2() -> String {
        let line = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";
        assert_eq!(line.len(), TD3_LINE_LENGTH);
        line.to_string()
    }

    #[test]
    fn test_locate_adjacent_44_char_pair() {
        let raw = format!(
            "REPUBLIC OF UTOPIA\nPASSPORT\n{}\n{}\ntrailing noise",
            mrz_line_1(),
            mrz_line_2()
        );
        let located = MrzLocalizer::locate(&raw).unwrap();
        assert_eq!(located, format!("{}\n{}", mrz_line_1(), mrz_line_2()));
    }

    #[test]
    fn test_locate_trims_and_skips_blank_lines() {
        let raw = format!("  {}  \n\n   \n  {}  ", mrz_line_1(), mrz_line_2());
        // Blank lines between the pair are dropped, so the pair is adjacent.
        let located = MrzLocalizer::locate(&raw).unwrap();
        assert_eq!(located, format!("{}\n{}", mrz_line_1(), mrz_line_2()));
    }

    #[test]
    fn test_locate_first_qualifying_pair_wins() {
        let other_1 = format!("A{}", "<".repeat(TD3_LINE_LENGTH - 1));
        let other_2 = format!("B{}", "<".repeat(TD3_LINE_LENGTH - 1));
        let raw = format!("{}\n{}\n{}\n{}", other_1, other_2, mrz_line_1(), mrz_line_2());
        let located = MrzLocalizer::locate(&raw).unwrap();
        assert_eq!(located, format!("{}\n{}", other_1, other_2));
    }

    #[test]
    fn test_locate_falls_back_to_full_line_pattern() {
        // Line lengths are off, so the pair heuristic fails; the full TD3
        // shape is still present in the merged transcript.
        let raw = "GARBAGEHEADER\nL898902C36UTO74\n08122F1204159TAIL";
        let located = MrzLocalizer::locate(raw).unwrap();
        assert_eq!(located, "L898902C36UTO7408122F1204159");
    }

    #[test]
    fn test_locate_full_pattern_accepts_confused_digits() {
        // I and O in digit positions of the dates still match.
        let raw = "XXL898902C36UTO74O8I22F12O4IS9YY";
        let located = MrzLocalizer::locate(raw).unwrap();
        assert_eq!(located, "L898902C36UTO74O8I22F12O4IS9");
    }

    #[test]
    fn test_locate_document_type_fragment() {
        let raw = "noise\nIPUTOL898902C31\nmore noise";
        assert_eq!(MrzLocalizer::locate(raw).unwrap(), "IPUTOL898902C31");
    }

    #[test]
    fn test_locate_date_fragment() {
        let raw = "scrambled 7408122F1204159UTO leftovers";
        assert_eq!(MrzLocalizer::locate(raw).unwrap(), "7408122F1204159UTO");
    }

    #[test]
    fn test_locate_none_for_plain_text() {
        assert!(MrzLocalizer::locate("just an ordinary paragraph\nwith two lines").is_none());
    }

    #[test]
    fn test_locate_none_for_empty_input() {
        assert!(MrzLocalizer::locate("").is_none());
    }
}
