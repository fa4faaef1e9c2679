//! Line-oriented ingestion of attraction and customer records.
//!
//! Every line is parsed on its own. A bad line produces a [`Diagnostic`]
//! and the next line is read; only an I/O failure stops a load.

use crate::attraction::{ActiveRules, Attraction, AttractionKind};
use crate::customer::{Customer, DiscountCategory};
use crate::error::{EngineError, Result};
use crate::money::Pence;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::warn;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Field separator of attraction records.
pub const ATTRACTION_DELIMITER: u8 = b'@';

/// Field separator of customer records.
pub const CUSTOMER_DELIMITER: u8 = b'#';

/// Field separator of transaction commands.
pub const COMMAND_DELIMITER: u8 = b',';

/// A line that could not be loaded or applied.
#[derive(Debug)]
pub struct Diagnostic {
    /// 1-based line number in the input.
    pub line: u64,

    /// The raw line, fields re-joined with the input delimiter.
    pub content: String,

    pub error: EngineError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} [{}]", self.line, self.error, self.content)
    }
}

/// Builds a headerless, flexible, unquoted reader for one input format.
pub fn line_reader<R: Read>(reader: R, delimiter: u8) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Feeds each record to `apply`, collecting a diagnostic for every failure.
///
/// Whitespace-only lines are skipped. Errors other than I/O, including
/// lines that are not valid UTF-8, are reported against the offending line
/// as [`EngineError::MalformedRecord`].
pub fn for_each_line<R, F>(reader: R, delimiter: u8, mut apply: F) -> Result<Vec<Diagnostic>>
where
    R: Read,
    F: FnMut(&StringRecord) -> Result<()>,
{
    let mut csv_reader = line_reader(reader, delimiter);
    let mut diagnostics = Vec::new();
    let separator = char::from(delimiter).to_string();

    for (idx, result) in csv_reader.byte_records().enumerate() {
        let fallback_line = idx as u64 + 1;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                let error = malformed(format!("unreadable line: {}", e));
                warn!("Line {}: {}", line, error);
                diagnostics.push(Diagnostic {
                    line,
                    content: String::new(),
                    error,
                });
                continue;
            }
        };
        if raw.iter().all(<[u8]>::is_empty) {
            continue;
        }
        let line = raw.position().map_or(fallback_line, |p| p.line());

        let (content, outcome) = match StringRecord::from_byte_record(raw) {
            Ok(record) => (
                record.iter().collect::<Vec<_>>().join(separator.as_str()),
                apply(&record),
            ),
            Err(e) => {
                let error = malformed(format!("line is not valid UTF-8 ({})", e.utf8_error()));
                let content = e
                    .into_byte_record()
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>()
                    .join(separator.as_str());
                (content, Err(error))
            }
        };

        if let Err(error) = outcome {
            warn!("Line {}: {}", line, error);
            diagnostics.push(Diagnostic {
                line,
                content,
                error,
            });
        }
    }

    Ok(diagnostics)
}

/// Parses `id@"name"@type@basePrice@extra[@extra2]`.
///
/// `type` is one of `cabinet`, `active` or `virtualreality`, ignoring case.
pub fn parse_attraction(record: &StringRecord) -> Result<Attraction> {
    if record.len() < 5 {
        return Err(malformed(format!(
            "expected at least 5 fields, found {}",
            record.len()
        )));
    }

    let id = &record[0];
    let name = strip_quotes(&record[1]);
    let kind_token = record[2].to_lowercase();
    let base_price: Pence = parse_number(&record[3], "base price")?;
    if base_price.is_negative() {
        return Err(malformed(format!("negative base price {}", base_price)));
    }

    let kind = match kind_token.as_str() {
        "cabinet" => AttractionKind::Standard {
            pays_reward: record[4].eq_ignore_ascii_case("yes"),
        },
        "active" => AttractionKind::Active(ActiveRules {
            minimum_age: parse_number(&record[4], "minimum age")?,
        }),
        "virtualreality" => {
            if record.len() < 6 {
                return Err(malformed(
                    "virtual reality records need an equipment field".to_string(),
                ));
            }
            AttractionKind::ImmersiveVr {
                active: ActiveRules {
                    minimum_age: parse_number(&record[4], "minimum age")?,
                },
                equipment: record[5].parse()?,
            }
        }
        other => return Err(malformed(format!("unknown attraction type {:?}", other))),
    };

    Attraction::new(id, name, base_price, kind)
}

/// Parses `id#name#balance#age[#discountType]`.
pub fn parse_customer(record: &StringRecord) -> Result<Customer> {
    if !(4..=5).contains(&record.len()) {
        return Err(malformed(format!(
            "expected 4 or 5 fields, found {}",
            record.len()
        )));
    }

    let balance: Pence = parse_number(&record[2], "balance")?;
    let age: u32 = parse_number(&record[3], "age")?;
    let discount = match record.get(4) {
        Some(token) => token.parse()?,
        None => DiscountCategory::None,
    };

    Ok(Customer::new(&record[0], &record[1], age, discount, balance))
}

/// Parses a numeric field, naming it in the error.
pub(crate) fn parse_number<T: FromStr>(field: &str, what: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| malformed(format!("{} {:?} is not a valid integer", what, field)))
}

fn malformed(message: String) -> EngineError {
    EngineError::MalformedRecord(message)
}

/// Removes at most one leading and one trailing double quote.
fn strip_quotes(name: &str) -> &str {
    let name = name.strip_prefix('"').unwrap_or(name);
    name.strip_suffix('"').unwrap_or(name).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attraction::{AttractionCategory, EquipmentTier};
    use std::io::Cursor;

    fn record(line: &str, delimiter: char) -> StringRecord {
        line.split(delimiter).map(str::trim).collect()
    }

    #[test]
    fn test_parse_cabinet() {
        let game = parse_attraction(&record(r#"C123456789@"Darts"@cabinet@300@yes"#, '@')).unwrap();
        assert_eq!(game.id(), "C123456789");
        assert_eq!(game.name(), "Darts");
        assert_eq!(game.base_price(), Pence::new(300));
        assert_eq!(game.kind(), &AttractionKind::Standard { pays_reward: true });
    }

    #[test]
    fn test_parse_cabinet_reward_flag_other_token() {
        let game = parse_attraction(&record("C123456789@Pac-Man@Cabinet@300@no", '@')).unwrap();
        assert_eq!(game.kind(), &AttractionKind::Standard { pays_reward: false });
    }

    #[test]
    fn test_parse_active_and_vr() {
        let active = parse_attraction(&record("A123456789@Pool@ACTIVE@247@12", '@')).unwrap();
        assert_eq!(active.category(), AttractionCategory::Active);
        assert_eq!(active.minimum_age(), Some(12));

        let vr = parse_attraction(&record(
            "AV12345678@VR Racing@virtualReality@800@18@HeadsetAndController",
            '@',
        ))
        .unwrap();
        assert_eq!(
            vr.kind(),
            &AttractionKind::ImmersiveVr {
                active: ActiveRules { minimum_age: 18 },
                equipment: EquipmentTier::Standard,
            }
        );
    }

    #[test]
    fn test_parse_attraction_rejections() {
        let cases = [
            "C123456789@Darts@cabinet@300",
            "C123456789@Darts@cabinet@3.00@yes",
            "C123456789@Darts@cabinet@-1@yes",
            "A123456789@Pool@active@200@twelve",
            "AV12345678@VR@virtualreality@800@18",
            "AV12345678@VR@virtualreality@800@18@gloves",
            "Z123456789@Bowling@bowling@800@18",
        ];
        for line in cases {
            assert!(
                matches!(
                    parse_attraction(&record(line, '@')),
                    Err(EngineError::MalformedRecord(_))
                ),
                "expected malformed for {}",
                line
            );
        }
    }

    #[test]
    fn test_parse_attraction_bad_id() {
        assert!(matches!(
            parse_attraction(&record("A123456789@Darts@cabinet@300@yes", '@')),
            Err(EngineError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_parse_customer() {
        let c = parse_customer(&record("AB1234#Sam#1000#20", '#')).unwrap();
        assert_eq!(c.id(), "AB1234");
        assert_eq!(c.name(), "Sam");
        assert_eq!(c.balance(), Pence::new(1000));
        assert_eq!(c.age(), 20);
        assert_eq!(c.discount(), DiscountCategory::None);

        let staff = parse_customer(&record("CM1234#Natalie#1000#10#staff", '#')).unwrap();
        assert_eq!(staff.discount(), DiscountCategory::Staff);
    }

    #[test]
    fn test_parse_customer_rejections() {
        for line in [
            "AB1234#Sam#1000",
            "AB1234#Sam#1000#20#STAFF#extra",
            "AB1234#Sam#ten#20",
            "AB1234#Sam#1000#-4",
            "AB1234#Sam#1000#20#VIP",
            "AB1234#Sam#1000#20#NONE",
        ] {
            assert!(
                matches!(
                    parse_customer(&record(line, '#')),
                    Err(EngineError::MalformedRecord(_))
                ),
                "expected malformed for {}",
                line
            );
        }
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""Darts""#), "Darts");
        assert_eq!(strip_quotes(r#""Half"#), "Half");
        assert_eq!(strip_quotes("Plain"), "Plain");
        assert_eq!(strip_quotes(r#"""Twice"""#), r#""Twice""#);
    }

    #[test]
    fn test_for_each_line_reports_and_continues() {
        let input = "good\n\nbad\n   \ngood\n";
        let mut seen = Vec::new();

        let diagnostics = for_each_line(Cursor::new(input), b'#', |record| {
            seen.push(record[0].to_string());
            if &record[0] == "bad" {
                Err(malformed("bad line".to_string()))
            } else {
                Ok(())
            }
        })
        .unwrap();

        assert_eq!(seen, vec!["good", "bad", "good"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(diagnostics[0].content, "bad");
        assert!(diagnostics[0].to_string().starts_with("line 3:"));
    }

    #[test]
    fn test_parse_customer_empty_discount_is_none() {
        let c = parse_customer(&record("AB1234#Sam#1000#20#", '#')).unwrap();
        assert_eq!(c.discount(), DiscountCategory::None);
    }

    #[test]
    fn test_invalid_utf8_line_is_malformed() {
        let input = b"C123456789@Darts@cabinet@300@yes\nC000000001@\xff\xfe@cabinet@100@no\nC987654321@Fine@cabinet@200@no\n".to_vec();
        let mut ids = Vec::new();

        let diagnostics = for_each_line(Cursor::new(input), ATTRACTION_DELIMITER, |record| {
            ids.push(parse_attraction(record)?.id().to_string());
            Ok(())
        })
        .unwrap();

        assert_eq!(ids, vec!["C123456789", "C987654321"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert!(matches!(diagnostics[0].error, EngineError::MalformedRecord(_)));
        assert!(diagnostics[0].content.starts_with("C000000001@"));
    }

    #[test]
    fn test_unbalanced_quote_does_not_swallow_lines() {
        let input = "C123456789@\"Broken@cabinet@300@yes\nC987654321@Fine@cabinet@200@no\n";
        let mut ids = Vec::new();

        let diagnostics = for_each_line(Cursor::new(input), ATTRACTION_DELIMITER, |record| {
            ids.push(parse_attraction(record)?.id().to_string());
            Ok(())
        })
        .unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(ids, vec!["C123456789", "C987654321"]);
    }
}
