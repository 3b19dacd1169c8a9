//! Tie command encoding and parsing.

use core::fmt;

use openrouting_errors::ProtocolError;

use crate::{LINE_TERMINATOR, TIE_SEPARATOR};

/// Which signal a tie routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieKind {
    Video,
    Audio,
    AudioVideo,
}

impl TieKind {
    pub fn suffix(self) -> char {
        match self {
            Self::Video => '%',
            Self::Audio => '$',
            Self::AudioVideo => '!',
        }
    }

    pub fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            '%' => Some(Self::Video),
            '$' => Some(Self::Audio),
            '!' => Some(Self::AudioVideo),
            _ => None,
        }
    }
}

/// A single SIS tie line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieCommand {
    pub input: u32,
    pub output: u32,
    pub kind: TieKind,
}

impl TieCommand {
    pub fn new(input: u32, output: u32, kind: TieKind) -> Self {
        Self {
            input,
            output,
            kind,
        }
    }

    pub fn video(input: u32, output: u32) -> Self {
        Self::new(input, output, TieKind::Video)
    }

    pub fn audio(input: u32, output: u32) -> Self {
        Self::new(input, output, TieKind::Audio)
    }

    /// Append this command, terminator included, to `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.to_string());
        out.push_str(LINE_TERMINATOR);
    }

    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(16);
        self.write_to(&mut out);
        out
    }
}

impl fmt::Display for TieCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.input,
            TIE_SEPARATOR,
            self.output,
            self.kind.suffix()
        )
    }
}

/// Encode a video tie followed by an audio tie for the same input.
///
/// Produces `"{input}*{video}%\r\n{input}*{audio}$\r\n"`, meant to be sent as
/// one write.
pub fn encode_tie(input: u32, video: u32, audio: u32) -> String {
    let mut out = String::with_capacity(32);
    TieCommand::video(input, video).write_to(&mut out);
    TieCommand::audio(input, audio).write_to(&mut out);
    out
}

/// Parse CR LF terminated tie lines, as written by [`encode_tie`].
///
/// # Errors
///
/// Returns [`ProtocolError::Packet`] when a line is unterminated or is not a
/// well-formed tie.
pub fn parse_ties(text: &str) -> Result<Vec<TieCommand>, ProtocolError> {
    let mut ties = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let Some((line, tail)) = rest.split_once(LINE_TERMINATOR) else {
            return Err(ProtocolError::packet(format!(
                "unterminated SIS line {rest:?}"
            )));
        };
        ties.push(parse_line(line)?);
        rest = tail;
    }
    Ok(ties)
}

fn parse_line(line: &str) -> Result<TieCommand, ProtocolError> {
    let malformed = || ProtocolError::packet(format!("malformed SIS tie {line:?}"));

    let mut chars = line.chars();
    let kind = chars
        .next_back()
        .and_then(TieKind::from_suffix)
        .ok_or_else(malformed)?;
    let (input, output) = chars
        .as_str()
        .split_once(TIE_SEPARATOR)
        .ok_or_else(malformed)?;

    let parse = |digits: &str| -> Result<u32, ProtocolError> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        digits.parse().map_err(|_overflow: core::num::ParseIntError| malformed())
    };

    Ok(TieCommand::new(parse(input)?, parse(output)?, kind))
}
