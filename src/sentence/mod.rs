//! NMEA sentence validation and field splitting
use thiserror::Error;

use crate::system::GnssSystem;

mod checksum;
mod gsa;
mod gsv;

pub use checksum::Checksum;
pub use gsa::Gsa;
pub use gsv::Gsv;

/// Reasons for discarding a line. Discarded lines have
/// no effect whatsoever: that is expected noise on real transports.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Discard {
    #[error("missing $ start delimiter")]
    MissingStart,
    #[error("missing * checksum delimiter")]
    MissingChecksum,
    #[error("checksum is not two hex digits")]
    ChecksumFormat,
    #[error("checksum mismatch: expected {expected:02X}, got {found:02X}")]
    ChecksumMismatch { expected: u8, found: u8 },
    #[error("sentence header too short")]
    HeaderTooShort,
    #[error("not applicable: {0}")]
    NotApplicable(String),
    #[error("{kind} sentence needs {expected} fields, got {found}")]
    MissingFields {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid field #{index}: \"{content}\"")]
    FieldParsing { index: usize, content: String },
    #[error("inconsistent part numbering {number}/{total}")]
    PartNumbering { number: u8, total: u8 },
}

/// Sentence content we know how to exploit
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Satellites in view
    Gsv(Gsv),
    /// Satellites in use
    Gsa(Gsa),
}

/// [Sentence] is a validated NMEA sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Two letter talker id
    pub talker: String,
    /// [GnssSystem] resolved from the talker id
    pub system: GnssSystem,
    /// Sentence content
    pub body: Body,
}

/// [SentenceParser] turns one line into one [Sentence].
/// Implement this to support device specific sentence variants;
/// [Nmea0183] is the standard grammar.
pub trait SentenceParser {
    /// Parses one complete line, terminator excluded.
    fn parse(&self, line: &str) -> Result<Sentence, Discard>;
}

impl<F> SentenceParser for F
where
    F: Fn(&str) -> Result<Sentence, Discard>,
{
    fn parse(&self, line: &str) -> Result<Sentence, Discard> {
        self(line)
    }
}

/// Standard NMEA 0183 GSV/GSA grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct Nmea0183;

impl Nmea0183 {
    /// Verifies the checksum and returns the fields
    /// comprised between the `$` and `*` delimiters.
    pub fn split(line: &str) -> Result<Vec<&str>, Discard> {
        let line = line.trim();
        let line = line.strip_prefix('$').ok_or(Discard::MissingStart)?;
        let (body, hex) = line.split_once('*').ok_or(Discard::MissingChecksum)?;
        let found = Checksum::parse(hex).ok_or(Discard::ChecksumFormat)?;
        let expected = Checksum::calc_from_bytes(body.as_bytes());
        if found != expected {
            return Err(Discard::ChecksumMismatch { expected, found });
        }
        Ok(body.split(',').collect())
    }
}

impl SentenceParser for Nmea0183 {
    fn parse(&self, line: &str) -> Result<Sentence, Discard> {
        let fields = Self::split(line)?;
        let header = fields[0];
        if header.len() < 3 || !header.is_char_boundary(2) {
            return Err(Discard::HeaderTooShort);
        }
        let (talker, kind) = header.split_at(2);
        let body = match kind {
            "GSV" => Body::Gsv(Gsv::from_fields(&fields)?),
            "GSA" => Body::Gsa(Gsa::from_fields(&fields)?),
            _ => return Err(Discard::NotApplicable(kind.to_string())),
        };
        Ok(Sentence {
            talker: talker.to_string(),
            system: GnssSystem::from_talker(talker),
            body,
        })
    }
}

/*
 * Parses an optional numerical field: empty means absent.
 */
pub(crate) fn optional_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
) -> Result<Option<T>, Discard> {
    match fields.get(index).map(|f| f.trim()) {
        None | Some("") => Ok(None),
        Some(content) => content
            .parse::<T>()
            .map(Some)
            .map_err(|_| Discard::FieldParsing {
                index,
                content: content.to_string(),
            }),
    }
}

/*
 * Parses a mandatory numerical field.
 */
pub(crate) fn field<T: std::str::FromStr>(fields: &[&str], index: usize) -> Result<T, Discard> {
    optional_field(fields, index)?.ok_or_else(|| Discard::FieldParsing {
        index,
        content: String::new(),
    })
}
