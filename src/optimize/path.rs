//! Structured SVG path data.
//!
//! A `d` attribute is parsed into a flat list of [`Segment`]s with implicit
//! command repetition made explicit and the absolute start and end point of
//! every segment resolved. Geometric rewrites work on this form; the text is
//! only regenerated when something actually changed.
//!
//! Numbers that came from the source keep their exact source spelling when
//! serialized again. Numbers computed by a rewrite are printed with at most
//! three decimals.

use std::fmt;

/// Every command letter the parser understands.
const COMMANDS: &str = "MmLlHhVvCcSsQqTtAaZz";

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// One path command with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Command letter; lowercase is relative.
    pub command: char,
    pub args: Vec<f64>,
    /// Source spelling of `args`, absent for computed segments.
    raw: Option<Vec<String>>,
    /// Absolute current point before the segment.
    pub from: Point,
    /// Absolute current point after the segment.
    pub to: Point,
}

impl Segment {
    /// A computed segment, printed from its numeric values.
    pub fn derived(command: char, args: Vec<f64>, from: Point, to: Point) -> Self {
        Self {
            command,
            args,
            raw: None,
            from,
            to,
        }
    }

    pub fn is_relative(&self) -> bool {
        self.command.is_ascii_lowercase()
    }

    /// Uppercase form of the command letter.
    pub fn kind(&self) -> char {
        self.command.to_ascii_uppercase()
    }

    /// The absolute point formed by `args[index]` and `args[index + 1]`.
    pub fn point(&self, index: usize) -> Point {
        let (x, y) = (self.args[index], self.args[index + 1]);
        if self.is_relative() {
            self.from.offset(x, y)
        } else {
            Point::new(x, y)
        }
    }

    /// Operand texts as they will be serialized.
    fn arg_texts(&self) -> Vec<String> {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => self.args.iter().map(|&value| format_number(value)).collect(),
        }
    }

    /// Serialized length of the operand at `index`.
    pub fn arg_len(&self, index: usize) -> usize {
        match &self.raw {
            Some(raw) => raw[index].len(),
            None => format_number(self.args[index]).len(),
        }
    }
}

/// A parsed `d` attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub segments: Vec<Segment>,
}

impl PathData {
    /// Parses path data. Returns `None` for anything that is not valid.
    pub fn parse(d: &str) -> Option<Self> {
        let mut lexer = Lexer::new(d);
        let mut segments: Vec<Segment> = Vec::new();
        let mut current = Point::default();
        let mut subpath_start = Point::default();
        let mut previous: Option<char> = None;

        while !lexer.at_end() {
            let command = match lexer.command() {
                Some(command) => command,
                None => match previous {
                    Some(prev) if !matches!(prev, 'Z' | 'z') && lexer.at_number() => {
                        implicit_repeat(prev)
                    }
                    _ => return None,
                },
            };
            if segments.is_empty() && !matches!(command, 'M' | 'm') {
                return None;
            }

            let kind = command.to_ascii_uppercase();
            let mut raw = Vec::with_capacity(arity(kind));
            for index in 0..arity(kind) {
                let token = if kind == 'A' && (index == 3 || index == 4) {
                    lexer.flag()?
                } else {
                    lexer.number()?
                };
                raw.push(token.to_string());
            }
            let args = raw
                .iter()
                .map(|token| token.parse::<f64>().ok())
                .collect::<Option<Vec<_>>>()?;

            let to = endpoint(command, &args, current, subpath_start);
            segments.push(Segment {
                command,
                args,
                raw: Some(raw),
                from: current,
                to,
            });

            if kind == 'M' {
                subpath_start = to;
            }
            current = to;
            previous = Some(command);
        }

        Some(Self { segments })
    }

    /// Returns true when the path ends with a close command.
    pub fn is_closed(&self) -> bool {
        self.segments.last().is_some_and(|segment| segment.kind() == 'Z')
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous: Option<char> = None;
        for segment in &self.segments {
            let repeat = previous == Some(segment.command) && segment.kind() != 'M';
            if !repeat {
                write!(f, "{}", segment.command)?;
            }
            for (index, text) in segment.arg_texts().iter().enumerate() {
                let follows_letter = index == 0 && !repeat;
                if !follows_letter && !text.starts_with('-') {
                    f.write_str(" ")?;
                }
                f.write_str(text)?;
            }
            previous = Some(segment.command);
        }
        Ok(())
    }
}

/// Operand count per (uppercase) command.
fn arity(kind: char) -> usize {
    match kind {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        'S' | 'Q' => 4,
        'A' => 7,
        _ => 0,
    }
}

fn implicit_repeat(command: char) -> char {
    match command {
        'M' => 'L',
        'm' => 'l',
        other => other,
    }
}

fn endpoint(command: char, args: &[f64], from: Point, subpath_start: Point) -> Point {
    let relative = command.is_ascii_lowercase();
    let resolve = |x: f64, y: f64| {
        if relative {
            from.offset(x, y)
        } else {
            Point::new(x, y)
        }
    };
    match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => resolve(args[0], args[1]),
        'H' if relative => Point::new(from.x + args[0], from.y),
        'H' => Point::new(args[0], from.y),
        'V' if relative => Point::new(from.x, from.y + args[0]),
        'V' => Point::new(from.x, args[0]),
        'C' => resolve(args[4], args[5]),
        'S' | 'Q' => resolve(args[2], args[3]),
        'A' => resolve(args[5], args[6]),
        _ => subpath_start,
    }
}

/// Prints a computed number with at most three decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = format!("{rounded:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Lexer
// ============================================================================

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while self
            .peek()
            .is_some_and(|byte| byte.is_ascii_whitespace() || byte == b',')
        {
            self.pos += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.text.len()
    }

    fn at_number(&mut self) -> bool {
        self.skip_separators();
        self.peek()
            .is_some_and(|byte| byte.is_ascii_digit() || matches!(byte, b'.' | b'-' | b'+'))
    }

    fn command(&mut self) -> Option<char> {
        self.skip_separators();
        let byte = self.peek()?;
        if !COMMANDS.as_bytes().contains(&byte) {
            return None;
        }
        self.pos += 1;
        Some(byte as char)
    }

    fn flag(&mut self) -> Option<&'a str> {
        self.skip_separators();
        match self.peek()? {
            b'0' | b'1' => {
                self.pos += 1;
                Some(&self.text[self.pos - 1..self.pos])
            }
            _ => None,
        }
    }

    fn number(&mut self) -> Option<&'a str> {
        self.skip_separators();
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let digits = |pos: &mut usize| {
            let from = *pos;
            while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
                *pos += 1;
            }
            *pos > from
        };

        let mut pos = start;
        if matches!(bytes.get(pos), Some(b'-' | b'+')) {
            pos += 1;
        }
        let mut seen_digit = digits(&mut pos);
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            seen_digit |= digits(&mut pos);
        }
        if !seen_digit {
            return None;
        }
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            let mut exponent = pos + 1;
            if matches!(bytes.get(exponent), Some(b'-' | b'+')) {
                exponent += 1;
            }
            if digits(&mut exponent) {
                pos = exponent;
            }
        }

        self.pos = pos;
        Some(&self.text[start..pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_tracks_points() {
        let path = PathData::parse("M2 3h4v-1l1,1Z").unwrap();
        let commands: String = path.segments.iter().map(|s| s.command).collect();
        assert_eq!(commands, "MhvlZ");
        assert_eq!(path.segments[1].to, Point::new(6.0, 3.0));
        assert_eq!(path.segments[2].to, Point::new(6.0, 2.0));
        assert_eq!(path.segments[3].to, Point::new(7.0, 3.0));
        assert_eq!(path.segments[4].to, Point::new(2.0, 3.0));
        assert!(path.is_closed());
    }

    #[test]
    fn implicit_repeats_are_explicit() {
        let path = PathData::parse("m0 0 10 10 5-5c1 1 2 2 3 3 4 4 5 5 6 6").unwrap();
        let commands: String = path.segments.iter().map(|s| s.command).collect();
        assert_eq!(commands, "mllcc");
        assert_eq!(path.segments[2].to, Point::new(15.0, 5.0));
        assert_eq!(path.segments[3].to, Point::new(18.0, 8.0));
        assert_eq!(path.segments[4].to, Point::new(24.0, 14.0));
    }

    #[test]
    fn compact_numbers_and_arc_flags() {
        let path = PathData::parse("M.5.5a2 2 0 011-1e1").unwrap();
        assert_eq!(path.segments[0].args, vec![0.5, 0.5]);
        assert_eq!(path.segments[1].args, vec![2.0, 2.0, 0.0, 0.0, 1.0, 1.0, -10.0]);
    }

    #[test]
    fn rejects_invalid_data() {
        assert!(PathData::parse("L0 0").is_none());
        assert!(PathData::parse("M0 0 L").is_none());
        assert!(PathData::parse("M0 0 X1 1").is_none());
        assert!(PathData::parse("M0 0z 1 1").is_none());
    }

    #[test]
    fn display_keeps_source_spelling() {
        let path = PathData::parse("M.5 -1e1 L 3,4 L5 6").unwrap();
        assert_eq!(path.to_string(), "M.5-1e1L3 4 5 6");
    }

    #[test]
    fn derived_numbers_are_rounded() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.30000000000000004), "0.3");
        assert_eq!(format_number(1.23456), "1.235");
        assert_eq!(format_number(-0.0001), "0");
    }
}
