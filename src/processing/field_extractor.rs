use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{MrzFieldSet, RecognitionResult};

/// A TD3 data line is usable once it reaches through the expiry field.
const DATA_LINE_MIN_LENGTH: usize = 27;

lazy_static! {
    // TD3 second-line shape with capture groups for the scored fields.
    // The date captures are digit-only so they never need confusion
    // cleanup; the check-digit positions stay tolerant so a misread check
    // digit does not reject the whole line.
    static ref TD3_CAPTURE_PATTERN: Regex = Regex::new(
        r"(?P<doc_number>[A-Z0-9<]{9})[0-9ILDSOG][A-Z<]{3}(?P<birth_date>[0-9]{6})[0-9ILDSOG][FM<](?P<expiry_date>[0-9]{6})[0-9ILDSOG]"
    )
    .unwrap();
}

/// FieldExtractor parses located MRZ text into the scored fields.
pub struct FieldExtractor;

impl FieldExtractor {
    /// Parse a (possibly multi-line) MRZ string using fixed TD3 positions.
    ///
    /// With two or more lines the second is the data line; a single line
    /// long enough to reach the expiry field is treated as a data line on
    /// its own. The date fields get confusion cleanup; the document number
    /// is kept verbatim since it legitimately mixes letters and digits.
    pub fn extract_from_lines(mrz: &str) -> MrzFieldSet {
        let lines: Vec<&str> = mrz
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let data_line = if lines.len() >= 2 && lines[1].chars().count() >= DATA_LINE_MIN_LENGTH {
            lines[1]
        } else if lines.len() == 1 && lines[0].chars().count() >= DATA_LINE_MIN_LENGTH {
            lines[0]
        } else {
            return MrzFieldSet::default();
        };

        let slice = |from: usize, to: usize| -> String {
            data_line.chars().skip(from).take(to - from).collect()
        };

        MrzFieldSet {
            document_number: Some(slice(0, 9)),
            date_of_birth: Some(Self::clean_mrz_field(&slice(13, 19))),
            expiration_date: Some(Self::clean_mrz_field(&slice(21, 27))),
        }
    }

    /// Parse a flattened transcript with the TD3 capture pattern. The
    /// input is expected upper-cased and whitespace-stripped (see
    /// [`FieldExtractor::join_blocks`]). No match yields an all-null set.
    pub fn extract_from_joined(joined: &str) -> MrzFieldSet {
        match TD3_CAPTURE_PATTERN.captures(joined) {
            Some(captures) => MrzFieldSet {
                document_number: captures.name("doc_number").map(|m| m.as_str().to_string()),
                date_of_birth: captures.name("birth_date").map(|m| m.as_str().to_string()),
                expiration_date: captures.name("expiry_date").map(|m| m.as_str().to_string()),
            },
            None => MrzFieldSet::default(),
        }
    }

    /// The full TD3-shaped substring of a flattened transcript, recorded
    /// as what was recognized when the joined strategy is active.
    pub fn joined_candidate(joined: &str) -> Option<String> {
        TD3_CAPTURE_PATTERN
            .find(joined)
            .map(|found| found.as_str().to_string())
    }

    /// Flatten recognizer output for the joined extraction path: every
    /// line of every block concatenated, upper-cased, with spaces, tabs
    /// and line breaks stripped.
    pub fn join_blocks(result: &RecognitionResult) -> String {
        let mut joined = String::new();
        for block in &result.blocks {
            for line in &block.lines {
                joined.push_str(&line.text);
            }
        }
        joined
            .to_uppercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '\r' | '\n' | '\t'))
            .collect()
    }

    /// Fix digit positions the OCR engine commonly renders as letters.
    /// The substitution classes are disjoint from their outputs, so the
    /// function is idempotent.
    pub fn clean_mrz_field(field: &str) -> String {
        field
            .chars()
            .map(|c| match c {
                'O' | 'D' => '0',
                'I' | 'L' => '1',
                'S' => '5',
                'G' => '6',
                other => other,
            })
            .collect()
    }
}
