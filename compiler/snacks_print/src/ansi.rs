use const_format::concatcp;
use std::io::{self, Write};

pub const RED: &str = "\x1B[31m";
pub const GREEN: &str = "\x1B[32m";
pub const YELLOW: &str = "\x1B[33m";
pub const BLUE: &str = "\x1B[34m";
pub const MAGENTA: &str = "\x1B[35m";
pub const CYAN: &str = "\x1B[36m";
pub const BOLD: &str = "\x1B[1m";
pub const ITALIC: &str = "\x1B[3m";
pub const RESET: &str = "\x1B[0m";

pub const TYPE: &str = concatcp!(BLUE, BOLD);
pub const TYVAR: &str = concatcp!(YELLOW, ITALIC);
pub const PUNCT: &str = concatcp!(CYAN);
pub const DELIM: &str = concatcp!(CYAN);
pub const KEYWORD: &str = concatcp!(GREEN);
pub const LITERAL: &str = concatcp!(MAGENTA);

pub mod chars {
    use super::*;
    pub const LANGLE: &str = concatcp!(DELIM, "<", RESET);
    pub const RANGLE: &str = concatcp!(DELIM, ">", RESET);
    pub const LBRACE: &str = concatcp!(DELIM, "{", RESET);
    pub const RBRACE: &str = concatcp!(DELIM, "}", RESET);
    pub const LPARN: &str = concatcp!(DELIM, "(", RESET);
    pub const RPARN: &str = concatcp!(DELIM, ")", RESET);
    pub const PIPE: &str = concatcp!(DELIM, "|", RESET);

    pub const COMMA: &str = concatcp!(PUNCT, ",", RESET);
    pub const COLON: &str = concatcp!(PUNCT, ":", RESET);
    pub const ARROW: &str = concatcp!(PUNCT, "->", RESET);

    pub const COMMA_SEP: &str = concatcp!(COMMA, " ");
    pub const PIPE_SEP: &str = concatcp!(" ", PIPE, " ");
}

/// A wrapper for writers that strips ANSI escape codes.
pub struct StripAnsi<'a, W: Write + ?Sized> {
    writer: &'a mut W,
    in_escape: bool,
}

impl<'a, W: Write + ?Sized> StripAnsi<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            in_escape: false,
        }
    }
}

impl<'a, W: Write + ?Sized> Write for StripAnsi<'a, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, &b) in buf.iter().enumerate() {
            if self.in_escape {
                if b == b'm' {
                    self.in_escape = false;
                    start = i + 1;
                }
            } else if b == b'\x1B' {
                self.writer.write_all(&buf[start..i])?;
                self.in_escape = true;
            }
        }
        if !self.in_escape && start < buf.len() {
            self.writer.write_all(&buf[start..])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
