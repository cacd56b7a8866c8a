use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::WorldOffset;
use crate::parse_util;
use crate::parse_util::ConvertError;
use crate::parse_util::ParseError;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Metadata of an RLE pattern. The cells themselves are handed to the callback of [`read_rle`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RleFile<'a> {
    pub name: Option<&'a [u8]>,
    pub author: Option<&'a [u8]>,

    /// Where the top-left corner of the pattern goes, from `#P` or `#R` lines
    pub offset: Option<(WorldOffset, WorldOffset)>,

    /// Width and height of the pattern, from the header line
    pub size: Option<(WorldOffset, WorldOffset)>,

    /// Rule from the header line, or from a `#r` line
    pub set: Option<RuleSet>,
}

impl RleFile<'_> {
    /// The rule this pattern is meant to be played with
    pub fn rules(&self) -> RuleSet {
        self.set.unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum RleError {
    #[error("Comment line error: {0}")]
    CommentLine(#[from] RleCommentLineError),

    #[error("Header line error: {0}")]
    HeaderLine(#[from] RleHeaderLineError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// Parse the RLE file format. Assumes the bytes are valid Ascii.
///
/// `f` is called with the world coordinates of every live cell. Rows grow downwards, matching
/// screen coordinates.
///
/// See: https://conwaylife.com/wiki/Run_Length_Encoded
pub fn read_rle<F>(mut bytes: &'_ [u8], f: F) -> Result<RleFile<'_>, RleError>
where
    F: FnMut(WorldOffset, WorldOffset),
{
    let mut file = RleFile::default();

    // Parse as many comment lines as possible
    loop {
        let (Some(line), rest) = read_line_comment(parse_util::take_ws(bytes))? else {
            break;
        };

        match line {
            RleCommentLine::Comment => {}
            RleCommentLine::Name { name } => {
                if file.name.is_some() {
                    warn!("RLE file name already defined. Using latest");
                }

                file.name = Some(name);
            }
            RleCommentLine::Author { author } => {
                if file.author.is_some() {
                    warn!("RLE author already defined. Using latest");
                }

                file.author = Some(author);
            }
            RleCommentLine::Offset { x, y } => {
                if file.offset.is_some() {
                    warn!("RLE offset already defined. Using latest");
                }

                file.offset = Some((x, y))
            }
            RleCommentLine::RuleSet { set } => {
                file.set = Some(set);
            }
        }

        bytes = rest;
    }

    // Parse header line, if it's present
    bytes = parse_util::take_ws(bytes);
    if let (Some(header), rest) = read_line_header(bytes)? {
        let RleHeaderLine { x, y, set } = header;

        file.size = Some((x, y));
        if let Some(set) = set {
            if file.set.is_some() {
                warn!("RLE rule already defined. Using latest");
            }

            file.set = Some(set);
        }

        bytes = rest;
    }

    let (dx, dy) = file.offset.unwrap_or_default();

    // Parse encoding
    let live = read_encoding(bytes, dx, dy, f)?;

    debug!(
        name = ?file.name.map(String::from_utf8_lossy),
        live,
        rules = %file.rules(),
        "read RLE pattern"
    );

    Ok(file)
}

enum RleCommentLine<'a> {
    Comment,
    Name { name: &'a [u8] },
    Author { author: &'a [u8] },
    Offset { x: WorldOffset, y: WorldOffset },
    RuleSet { set: RuleSet },
}

#[derive(Debug, Error)]
pub enum RleCommentLineError {
    #[error("No comment type")]
    NoType,

    #[error("Empty name line")]
    EmptyName,

    #[error("Empty author line")]
    EmptyAuthor,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Invalid offset: expected two integers, got \"{got}\"")]
    InvalidOffset { got: String },

    #[error("Invalid comment type, found '{got}'")]
    InvalidType { got: char },
}

/// Attempt to parse a comment line, otherwise leaves `bytes` as-is.
fn read_line_comment(
    bytes: &'_ [u8],
) -> Result<(Option<RleCommentLine<'_>>, &'_ [u8]), RleCommentLineError> {
    let Ok(rest) = parse_util::expect(b'#', bytes) else {
        return Ok((None, bytes));
    };

    let (Some(b), rest) = parse_util::take_1(rest) else {
        return Err(RleCommentLineError::NoType);
    };

    let (line, rest) = parse_util::take_line(rest);
    let line = line.trim_ascii();

    let comment = match b {
        // Comment line
        b'C' | b'c' => RleCommentLine::Comment,

        // Pattern name
        b'N' => {
            if line.is_empty() {
                return Err(RleCommentLineError::EmptyName);
            }

            RleCommentLine::Name { name: line }
        }

        // Pattern author
        b'O' => {
            if line.is_empty() {
                return Err(RleCommentLineError::EmptyAuthor);
            }

            RleCommentLine::Author { author: line }
        }

        // Pattern offset, as two whitespace separated integers
        b'P' | b'R' => {
            let invalid = || RleCommentLineError::InvalidOffset {
                got: String::from_utf8_lossy(line).to_string(),
            };

            let mut coords = line
                .split(|b| b.is_ascii_whitespace())
                .filter(|s| !s.is_empty())
                .map(parse_util::convert::<WorldOffset>);

            let (Some(Ok(x)), Some(Ok(y)), None) = (coords.next(), coords.next(), coords.next())
            else {
                return Err(invalid());
            };

            RleCommentLine::Offset { x, y }
        }

        // Pattern rules, in the `23/3` notation
        b'r' => {
            let Ok(rule) = std::str::from_utf8(line) else {
                return Err(RuleError::Empty.into());
            };

            RleCommentLine::RuleSet {
                set: RuleSet::from_nameless(rule)?,
            }
        }

        b => return Err(RleCommentLineError::InvalidType { got: b as char }),
    };

    Ok((Some(comment), rest))
}

struct RleHeaderLine {
    x: WorldOffset,
    y: WorldOffset,
    set: Option<RuleSet>,
}

#[derive(Debug, Error)]
pub enum RleHeaderLineError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoord(#[from] RleCoordError),

    #[error("Invalid token: expected ',' or '\\n', found '{got}'")]
    InvalidToken { got: char },

    #[error("Expected rule, found end of line")]
    NoRule,

    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),
}

/// Attempt to parse a header line, otherwise leaves `bytes` as-is.
fn read_line_header(bytes: &[u8]) -> Result<(Option<RleHeaderLine>, &[u8]), RleHeaderLineError> {
    if parse_util::peek_1(bytes) != Some(b'x') {
        return Ok((None, bytes));
    }

    let ((x, y), rest) = read_coordinates(bytes)?;
    let rest = parse_util::take_blanks(rest);

    let (b, rest) = parse_util::take_1(rest);
    match b {
        Some(b',') => {
            let rest = parse_util::take_ws(rest);
            let rest = parse_util::expect_slice(b"rule", rest)?;
            let rest = parse_util::take_blanks(rest);
            let rest = parse_util::expect(b'=', rest)?;
            let rest = parse_util::take_blanks(rest);

            let (Some(rule), rest) = parse_util::take_until_ws(rest) else {
                return Err(RleHeaderLineError::NoRule);
            };

            let Ok(rule) = std::str::from_utf8(rule) else {
                return Err(RuleError::Empty.into());
            };

            let (_, rest) = parse_util::take_line(rest);
            let line = RleHeaderLine {
                x,
                y,
                set: Some(rule.parse()?),
            };

            Ok((Some(line), rest))
        }
        Some(b'\n') | None => Ok((Some(RleHeaderLine { x, y, set: None }), rest)),
        Some(b'\r') => {
            let (_, rest) = parse_util::take_line(rest);

            Ok((Some(RleHeaderLine { x, y, set: None }), rest))
        }
        Some(b) => Err(RleHeaderLineError::InvalidToken { got: b as char }),
    }
}

#[derive(Debug, Error)]
pub enum RleEncodingError {
    #[error("Unexpected end of input, expected '!'")]
    UnexpectedEof,

    #[error("Failed to convert run length: {0}")]
    RunLength(#[from] ConvertError),

    #[error("Pattern extends past the edge of the plane")]
    OutOfBounds,

    #[error("Run of {got} live cells is longer than the limit of {}", MAX_LIVE_RUN)]
    RunTooLong { got: WorldOffset },

    #[error("Unrecognized byte: 0x{got:0X}")]
    UnrecognizedByte { got: u8 },
}

/// Longest run of live cells accepted in a pattern body.
pub const MAX_LIVE_RUN: WorldOffset = 1 << 16;

/// Parse the pattern body, calling `f` on every live cell. Returns the number of live cells.
fn read_encoding<F>(
    mut bytes: &[u8],
    dx: WorldOffset,
    dy: WorldOffset,
    mut f: F,
) -> Result<u64, RleEncodingError>
where
    F: FnMut(WorldOffset, WorldOffset),
{
    let mut rep: WorldOffset = 1;
    let mut live = 0;

    let (mut x, mut y): (WorldOffset, WorldOffset) = (0, 0);

    // position of the cell `n` steps right of the cursor
    let at = |x: WorldOffset, y: WorldOffset, n: WorldOffset| {
        dx.checked_add(x)
            .and_then(|cx| cx.checked_add(n))
            .zip(dy.checked_add(y))
    };

    loop {
        let Some(b) = parse_util::peek_1(bytes) else {
            return Err(RleEncodingError::UnexpectedEof);
        };

        match b {
            w if w.is_ascii_whitespace() => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;
            }

            // End of input
            b'!' => break,

            // Dead cell
            b'b' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                x = x.checked_add(rep).ok_or(RleEncodingError::OutOfBounds)?;
                rep = 1;
            }

            // Live cell
            b'o' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                if rep > MAX_LIVE_RUN {
                    return Err(RleEncodingError::RunTooLong { got: rep });
                }

                for i in 0..rep {
                    let (cx, cy) = at(x, y, i).ok_or(RleEncodingError::OutOfBounds)?;
                    f(cx, cy);
                    live += 1;
                }

                x = x.checked_add(rep).ok_or(RleEncodingError::OutOfBounds)?;
                rep = 1;
            }

            // End of line
            b'$' => {
                let (_, rest) = parse_util::take_1(bytes);
                bytes = rest;

                y = y.checked_add(rep).ok_or(RleEncodingError::OutOfBounds)?;
                x = 0;
                rep = 1;
            }

            n if n.is_ascii_digit() => {
                let (Some(n), rest) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes)
                else {
                    unreachable!("We peeked and found a digit")
                };
                bytes = rest;

                rep = parse_util::convert(n)?;
            }

            b => return Err(RleEncodingError::UnrecognizedByte { got: b }),
        }
    }

    Ok(live)
}

#[derive(Debug, Error)]
pub enum RleCoordError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Expected x coordinate, found end of input")]
    NoX,

    #[error("Failed to parse x coordinate: {0}")]
    ParseX(#[source] ConvertError),

    #[error("Expected y coordinate, found end of input")]
    NoY,

    #[error("Failed to parse y coordinate: {0}")]
    ParseY(#[source] ConvertError),
}

/// Parse `x = <n>, y = <m>`, leaving whatever follows `m`.
fn read_coordinates(bytes: &[u8]) -> Result<((WorldOffset, WorldOffset), &[u8]), RleCoordError> {
    let bytes = parse_util::expect(b'x', bytes)?;
    let bytes = parse_util::take_blanks(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;
    let bytes = parse_util::take_blanks(bytes);

    let (Some(x_bytes), bytes) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes) else {
        return Err(RleCoordError::NoX);
    };
    let x: WorldOffset = parse_util::convert(x_bytes).map_err(RleCoordError::ParseX)?;

    let bytes = parse_util::take_blanks(bytes);
    let bytes = parse_util::expect(b',', bytes)?;
    let bytes = parse_util::take_blanks(bytes);
    let bytes = parse_util::expect(b'y', bytes)?;
    let bytes = parse_util::take_blanks(bytes);
    let bytes = parse_util::expect(b'=', bytes)?;
    let bytes = parse_util::take_blanks(bytes);

    let (Some(y_bytes), bytes) = parse_util::take_until_fn(|b| !b.is_ascii_digit(), bytes) else {
        return Err(RleCoordError::NoY);
    };
    let y: WorldOffset = parse_util::convert(y_bytes).map_err(RleCoordError::ParseY)?;

    Ok(((x, y), bytes))
}
