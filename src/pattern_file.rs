//! Text serialization of pattern lists.
//!
//! ```text
//! Pattern 1:
//! [['R', 'G', 'E'],
//!  ['E', 'E', 'E']]
//!
//! Pattern 2:
//! ...
//! ```
//!
//! The reader also takes whitespace-separated tokens (`['R' 'G' 'E']`),
//! double quotes and CRLF line endings.

use std::io::{self, Write};

use crate::error::{ParseErrorKind, PatternParseError};
use crate::grid::Grid;

const HEADER: &str = "Pattern";

pub fn write_patterns<'a, W, I>(w: W, grids: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Grid>,
{
    let mut writer = PatternWriter::new(w);
    for grid in grids {
        writer.write(grid)?;
    }
    writer.flush()
}

/// Appends numbered blocks one grid at a time, so a stream can be saved
/// without collecting it first.
pub struct PatternWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> PatternWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn write(&mut self, grid: &Grid) -> io::Result<()> {
        if self.written > 0 {
            writeln!(self.inner)?;
        }
        self.written += 1;
        writeln!(self.inner, "{HEADER} {}:", self.written)?;
        let rows = grid.row_strings();
        for (r, row) in rows.iter().enumerate() {
            let open = if r == 0 { "[" } else { " " };
            let close = if r + 1 == rows.len() { "]" } else { "," };
            let cells: Vec<String> = row.chars().map(|c| format!("'{c}'")).collect();
            writeln!(self.inner, "{open}[{}]{close}", cells.join(", "))?;
        }
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

pub fn format_patterns<'a, I>(grids: I) -> String
where
    I: IntoIterator<Item = &'a Grid>,
{
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_patterns(&mut buf, grids);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Parses every block, in file order. The first malformed block aborts the
/// load.
pub fn parse_patterns(text: &str) -> Result<Vec<Grid>, PatternParseError> {
    let mut grids = Vec::new();
    let mut block = 0;
    let mut body = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with(HEADER) {
            if block > 0 {
                grids.push(parse_block(block, &body)?);
            }
            block += 1;
            parse_header(block, trimmed)?;
            body.clear();
        } else if block == 0 {
            if !trimmed.is_empty() {
                return Err(PatternParseError::new(0, ParseErrorKind::MissingHeader));
            }
        } else {
            body.push_str(trimmed);
            body.push('\n');
        }
    }
    if block > 0 {
        grids.push(parse_block(block, &body)?);
    }
    Ok(grids)
}

fn parse_header(block: usize, line: &str) -> Result<usize, PatternParseError> {
    let bad = || PatternParseError::new(block, ParseErrorKind::BadHeader(line.to_string()));
    let number = line
        .strip_prefix(HEADER)
        .and_then(|rest| rest.strip_suffix(':'))
        .map(str::trim)
        .ok_or_else(bad)?;
    number.parse::<usize>().map_err(|_| bad())
}

fn parse_block(block: usize, body: &str) -> Result<Grid, PatternParseError> {
    let err = |kind| PatternParseError::new(block, kind);

    let mut rows: Vec<Vec<char>> = Vec::new();
    let mut current: Option<Vec<char>> = None;
    let mut depth = 0usize;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '[' => {
                if current.as_ref().is_some_and(|row| !row.is_empty()) {
                    return Err(err(ParseErrorKind::UnexpectedChar('[')));
                }
                depth += 1;
                current = Some(Vec::new());
            }
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| err(ParseErrorKind::UnbalancedBrackets))?;
                if let Some(row) = current.take() {
                    rows.push(row);
                }
            }
            '\'' | '"' => {
                let mut token = String::new();
                loop {
                    match chars.next() {
                        Some(q) if q == c => break,
                        Some(t) => token.push(t),
                        None => return Err(err(ParseErrorKind::UnterminatedToken)),
                    }
                }
                let mut it = token.chars();
                let label = match (it.next(), it.next()) {
                    (Some(label), None) if !label.is_whitespace() => label,
                    _ => return Err(err(ParseErrorKind::BadToken(token))),
                };
                match current.as_mut() {
                    Some(row) => row.push(label),
                    None => return Err(err(ParseErrorKind::UnexpectedChar(c))),
                }
            }
            ',' => {}
            c if c.is_whitespace() => {}
            other => return Err(err(ParseErrorKind::UnexpectedChar(other))),
        }
    }
    if depth != 0 {
        return Err(err(ParseErrorKind::UnbalancedBrackets));
    }

    if rows.first().is_none_or(|row| row.is_empty()) {
        return Err(err(ParseErrorKind::EmptyBlock));
    }
    let expected = rows[0].len();
    if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != expected) {
        return Err(err(ParseErrorKind::RaggedRow {
            row: r + 1,
            expected,
            found: row.len(),
        }));
    }
    Grid::from_rows(rows.as_slice()).ok_or_else(|| err(ParseErrorKind::EmptyBlock))
}
