//! Capture file format
//!
//! One entry per line:
//!
//! ```text
//! # comment
//! C> 02 01 05 00 00 00 00      message from the client
//! S> 4f14                      message from the server, spaces optional
//! ! usetype bandage            command typed by the user
//! -- disconnect                the connection dropped
//! ```

use anyhow::bail;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{space0, space1},
    combinator::{all_consuming, map, map_res, rest, value},
    multi::many1,
    sequence::{preceded, terminated, tuple},
    IResult,
};

/// Which side sent a captured message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Client,
    Server,
}

/// One line of a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message { origin: Origin, bytes: Vec<u8> },
    Command(String),
    Disconnect,
}

fn origin(input: &str) -> IResult<&str, Origin> {
    alt((value(Origin::Client, tag("C>")), value(Origin::Server, tag("S>"))))(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |digits: &str| {
        u8::from_str_radix(digits, 16)
    })(input)
}

fn message(input: &str) -> IResult<&str, Entry> {
    map(
        tuple((origin, space1, many1(preceded(space0, hex_byte)))),
        |(origin, _, bytes)| Entry::Message { origin, bytes },
    )(input)
}

fn command(input: &str) -> IResult<&str, Entry> {
    map(preceded(tuple((tag("!"), space0)), rest), |text: &str| {
        Entry::Command(text.trim_end().to_string())
    })(input)
}

fn disconnect(input: &str) -> IResult<&str, Entry> {
    value(Entry::Disconnect, tuple((tag("--"), space0, tag("disconnect"))))(input)
}

/// Parse one line, `None` for blank lines and comments
pub fn parse_line(line: &str) -> Option<Result<Entry, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let parsed = all_consuming(terminated(alt((message, command, disconnect)), space0))(line);
    Some(parsed.map(|(_, entry)| entry).map_err(|err| err.to_string()))
}

/// Parse a whole capture
pub fn parse_capture(text: &str) -> anyhow::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        match parse_line(line) {
            Some(Ok(entry)) => entries.push(entry),
            Some(Err(err)) => bail!("line {}: cannot parse '{}': {}", number + 1, line.trim(), err),
            None => {}
        }
    }
    Ok(entries)
}
