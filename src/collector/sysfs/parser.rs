//! Readers for single-value sysfs attribute files.
//!
//! Every InfiniBand port attribute is a tiny text file holding one value:
//! a line of text (`state`, `rate`, `link_layer`) or one integer token
//! (`lid`, counters). The pure `parse_*` functions work on file content and
//! the `read_*` helpers add the filesystem access on top.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::collector::traits::FileSystem;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Failure to read one attribute file.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid content in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Returns the first line of `content` without its line terminator.
///
/// An empty file has no value and is an error; an empty first line followed
/// by more content is returned as an empty string.
pub fn parse_line(content: &str) -> Result<String, ParseError> {
    if content.is_empty() {
        return Err(ParseError::new("empty file"));
    }
    let line = content.lines().next().unwrap_or_default();
    Ok(line.trim_end_matches('\r').to_string())
}

/// Splits a C-style integer literal into sign, digits and radix.
///
/// `0x`/`0X` selects hex, a leading `0` selects octal, anything else decimal.
fn split_radix(token: &str) -> (bool, &str, u32) {
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
    {
        (negative, hex, 16)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (negative, &rest[1..], 8)
    } else {
        (negative, rest, 10)
    }
}

fn first_token(content: &str) -> Result<&str, ParseError> {
    content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("no value"))
}

/// Parses the first whitespace-separated token as a signed integer.
///
/// Used for `lid`, which the kernel prints in hex (`0x1a`).
pub fn parse_integer(content: &str) -> Result<i64, ParseError> {
    let token = first_token(content)?;
    let (negative, digits, radix) = split_radix(token);
    if digits.is_empty() {
        return Err(ParseError::new(format!("invalid integer '{}'", token)));
    }
    let value = i64::from_str_radix(digits, radix)
        .map_err(|_| ParseError::new(format!("invalid integer '{}'", token)))?;
    Ok(if negative { -value } else { value })
}

/// Parses the first whitespace-separated token as an unsigned 64-bit counter.
pub fn parse_counter(content: &str) -> Result<u64, ParseError> {
    let token = first_token(content)?;
    let (negative, digits, radix) = split_radix(token);
    if negative || digits.is_empty() {
        return Err(ParseError::new(format!("invalid counter '{}'", token)));
    }
    u64::from_str_radix(digits, radix)
        .map_err(|_| ParseError::new(format!("invalid counter '{}'", token)))
}

fn read_with<T, F: FileSystem>(
    fs: &F,
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, ParseError>,
) -> Result<T, ReadError> {
    let content = fs.read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| ReadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the first line of a text attribute.
pub fn read_line<F: FileSystem>(fs: &F, path: &Path) -> Result<String, ReadError> {
    read_with(fs, path, parse_line)
}

/// Reads a signed integer attribute.
pub fn read_integer<F: FileSystem>(fs: &F, path: &Path) -> Result<i64, ReadError> {
    read_with(fs, path, parse_integer)
}

/// Reads an unsigned counter attribute.
pub fn read_counter<F: FileSystem>(fs: &F, path: &Path) -> Result<u64, ReadError> {
    read_with(fs, path, parse_counter)
}
