//! Parser for the stitch pattern language.
//!
//! ```text
//! float     = 1*DIGIT ["." *DIGIT]
//! int       = 1*DIGIT
//! globals   = [W float] [H int] [OC float] [K float] [N int] [M float] [IC float]
//! sequence  = "L" int *("," int) ["S" int] ["C" int]
//! grammar   = globals sequence *(";" sequence)
//! ```
//!
//! Globals may come in any order but each at most once. Within a sequence the
//! options are strictly ordered. Whitespace between tokens is optional.
//! Error offsets count characters from the start of the input.

use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    pattern::{Defaults, PatternConfig, SequenceSpec},
};

/// Lexical token classes.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TokenKind<'a> {
    /// A run of ASCII letters.
    Word(&'a str),
    /// Digits with an optional fractional part.
    Number(&'a str),
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// Any other single character.
    Other(char),
    /// End of input.
    End,
}

impl TokenKind<'_> {
    /// Human-readable form for error messages.
    fn describe(&self) -> String {
        match self {
            Self::Word(s) | Self::Number(s) => format!("'{s}'"),
            Self::Comma => "','".into(),
            Self::Semicolon => "';'".into(),
            Self::Other(c) => format!("'{c}'"),
            Self::End => "end of input".into(),
        }
    }
}

/// A token and where it starts.
#[derive(Clone, Copy, Debug)]
struct Token<'a> {
    /// Token class and text.
    kind: TokenKind<'a>,
    /// Character offset of the first character.
    offset: usize,
}

/// Split `input` into tokens, always ending with [`TokenKind::End`].
fn tokenize(input: &str) -> Vec<Token<'_>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let byte_at = |i: usize| chars.get(i).map_or(input.len(), |&(b, _)| b);
    let run = |mut i: usize, pred: fn(char) -> bool| {
        while i < chars.len() && pred(chars[i].1) {
            i += 1;
        }
        i
    };

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let c = chars[i].1;
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = if c.is_ascii_alphabetic() {
            i = run(i, |c: char| c.is_ascii_alphabetic());
            TokenKind::Word(&input[byte_at(start)..byte_at(i)])
        } else if c.is_ascii_digit() {
            i = run(i, |c: char| c.is_ascii_digit());
            if i < chars.len() && chars[i].1 == '.' {
                i = run(i + 1, |c: char| c.is_ascii_digit());
            }
            TokenKind::Number(&input[byte_at(start)..byte_at(i)])
        } else {
            i += 1;
            match c {
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                other => TokenKind::Other(other),
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
    }
    tokens.push(Token {
        kind: TokenKind::End,
        offset: chars.len(),
    });
    tokens
}

/// Global options and their keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Global {
    /// `W`: card width and height.
    ImageSize,
    /// `H`: hole count.
    Holes,
    /// `OC`: hole circle radius.
    OuterCircle,
    /// `K`: pointiness.
    Pointiness,
    /// `N`: number of sides.
    Sides,
    /// `M`: points per side.
    PointsPerSide,
    /// `IC`: centre hole radius.
    InnerCircle,
}

impl Global {
    /// Look up a global by keyword.
    fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "W" => Self::ImageSize,
            "H" => Self::Holes,
            "OC" => Self::OuterCircle,
            "K" => Self::Pointiness,
            "N" => Self::Sides,
            "M" => Self::PointsPerSide,
            "IC" => Self::InnerCircle,
            _ => return None,
        })
    }

    /// The keyword for this global.
    fn keyword(self) -> &'static str {
        match self {
            Self::ImageSize => "W",
            Self::Holes => "H",
            Self::OuterCircle => "OC",
            Self::Pointiness => "K",
            Self::Sides => "N",
            Self::PointsPerSide => "M",
            Self::InnerCircle => "IC",
        }
    }
}

/// Recursive-descent parser over a token list.
struct Parser<'a> {
    /// Tokens, terminated by `End`.
    tokens: Vec<Token<'a>>,
    /// Index of the next token.
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Tokenize `input` and position at the first token.
    fn new(input: &'a str) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
        }
    }

    /// The next token, without consuming it.
    fn peek(&self) -> Token<'a> {
        self.tokens[self.pos]
    }

    /// Consume the next token. `End` is never consumed.
    fn advance(&mut self) -> Token<'a> {
        let tok = self.peek();
        if tok.kind != TokenKind::End {
            self.pos += 1;
        }
        tok
    }

    /// Consume the next token if it is the keyword `word`.
    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.peek().kind == TokenKind::Word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// A syntax error at `tok`.
    fn error(tok: Token<'_>, expected: impl Into<String>) -> Error {
        Error::Grammar {
            offset: tok.offset,
            expected: expected.into(),
            found: tok.kind.describe(),
        }
    }

    /// Consume a non-negative integer.
    fn integer(&mut self) -> Result<u32> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number(text) if text.bytes().all(|b| b.is_ascii_digit()) => {
                let value = text.parse::<u32>().map_err(|_| {
                    Self::error(tok, format!("an integer no larger than {}", u32::MAX))
                })?;
                self.advance();
                Ok(value)
            }
            _ => Err(Self::error(tok, "an integer")),
        }
    }

    /// Consume a non-negative decimal number.
    fn number(&mut self) -> Result<f64> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Number(text) => {
                let value = text
                    .parse::<f64>()
                    .map_err(|_| Self::error(tok, "a number"))?;
                self.advance();
                Ok(value)
            }
            _ => Err(Self::error(tok, "a number")),
        }
    }

    /// Parse any globals at the head of the input into `config`.
    fn globals(&mut self, config: &mut PatternConfig) -> Result<()> {
        let mut seen: Vec<Global> = Vec::new();
        loop {
            let tok = self.peek();
            let TokenKind::Word(word) = tok.kind else {
                return Ok(());
            };
            let Some(global) = Global::from_keyword(word) else {
                return Ok(());
            };
            if seen.contains(&global) {
                return Err(Error::DuplicateOption {
                    key: global.keyword().to_string(),
                    offset: tok.offset,
                });
            }
            seen.push(global);
            self.advance();

            match global {
                Global::ImageSize => config.image_size = self.number()?,
                Global::Holes => config.hole_count = self.integer()?,
                Global::OuterCircle => config.outer_circle_radius = self.number()?,
                Global::Pointiness => config.pointiness = self.number()?,
                Global::Sides => config.side_count = self.integer()?,
                Global::PointsPerSide => config.points_per_side = self.number()?,
                Global::InnerCircle => config.inner_circle_radius = self.number()?,
            }
        }
    }

    /// Parse one sequence. `expected` describes what may start it.
    fn sequence(&mut self, expected: &str) -> Result<SequenceSpec> {
        if !self.eat_keyword("L") {
            return Err(Self::error(self.peek(), expected));
        }

        let mut skips: SmallVec<[u32; 8]> = SmallVec::new();
        skips.push(self.integer()?);
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            skips.push(self.integer()?);
        }
        let mut spec = SequenceSpec::new(skips);

        let mut follow = "',', 'S', 'C', ';' or end of input";
        if self.eat_keyword("S") {
            spec.start_hole = self.integer()?;
            follow = "'C', ';' or end of input";
        }
        if self.eat_keyword("C") {
            spec.stitch_count = Some(self.integer()?);
            follow = "';' or end of input";
        }

        let tok = self.peek();
        match tok.kind {
            TokenKind::Semicolon | TokenKind::End => Ok(spec),
            _ => Err(Self::error(tok, follow)),
        }
    }

    /// Parse the whole input.
    fn pattern(&mut self, defaults: &Defaults) -> Result<PatternConfig> {
        let mut config = PatternConfig::from_defaults(defaults);
        self.globals(&mut config)?;

        if self.peek().kind == TokenKind::End {
            return Err(Error::EmptySequences);
        }

        loop {
            let expected = if config.sequences.is_empty() {
                "a global option or 'L'"
            } else {
                "'L'"
            };
            config.sequences.push(self.sequence(expected)?);

            if self.advance().kind == TokenKind::End {
                return Ok(config);
            }
        }
    }
}

/// Parse `input` with inch defaults.
pub fn parse(input: &str) -> Result<PatternConfig> {
    parse_with(input, &Defaults::INCH)
}

/// Parse `input`, taking unspecified globals from `defaults`.
///
/// The returned configuration has passed [`PatternConfig::validate`].
pub fn parse_with(input: &str, defaults: &Defaults) -> Result<PatternConfig> {
    let config = parse_unchecked(input, defaults)?;
    config.validate()?;
    Ok(config)
}

/// Parse without range checks, for callers that validate the result themselves.
pub(crate) fn parse_unchecked(input: &str, defaults: &Defaults) -> Result<PatternConfig> {
    Parser::new(input).pattern(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_error(input: &str) -> (usize, String) {
        match parse(input) {
            Err(Error::Grammar {
                offset, expected, ..
            }) => (offset, expected),
            other => panic!("expected a grammar error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn single_sequence_with_defaults() -> Result<()> {
        let c = parse("L 10,1")?;
        assert_eq!(c.hole_count, 32);
        assert_eq!(c.outer_circle_radius, 0.73);
        assert_eq!(c.inner_circle_radius, 0.63);
        assert_eq!(c.image_size, 3.65);
        assert_eq!(c.sequences.len(), 1);
        assert_eq!(c.sequences[0].skips.as_slice(), &[10, 1]);
        assert_eq!(c.sequences[0].start_hole, 0);
        assert_eq!(c.sequences[0].stitch_count, None);
        Ok(())
    }

    #[test]
    fn two_sequences() -> Result<()> {
        let c = parse("H 16 L 7,1 S 2 ; L 4 C 2")?;
        assert_eq!(c.hole_count, 16);
        assert_eq!(
            c.sequences,
            vec![
                SequenceSpec::new(vec![7, 1]).start_at(2),
                SequenceSpec::new(vec![4]).with_count(2),
            ]
        );
        Ok(())
    }

    #[test]
    fn all_globals_in_any_order() -> Result<()> {
        let c = parse("IC 0.7 M 3 N 6 K 0.8 OC 1.1 H 42 W 4 L 16,3")?;
        assert_eq!(c.hole_count, 42);
        assert_eq!(c.outer_circle_radius, 1.1);
        assert_eq!(c.pointiness, 0.8);
        assert_eq!(c.side_count, 6);
        assert_eq!(c.points_per_side, 3.0);
        assert_eq!(c.inner_circle_radius, 0.7);
        assert_eq!(c.image_size, 4.0);
        Ok(())
    }

    #[test]
    fn whitespace_is_optional() -> Result<()> {
        let c = parse("H16 L7,1S2;L4C2")?;
        assert_eq!(c, parse("H 16 L 7,1 S 2 ; L 4 C 2")?);
        let c = parse("L 8,1, 22,31, 12,1 C 33")?;
        assert_eq!(c.sequences[0].skips.as_slice(), &[8, 1, 22, 31, 12, 1]);
        Ok(())
    }

    #[test]
    fn floats_accept_bare_trailing_dot() -> Result<()> {
        assert_eq!(parse("OC 1. L 1")?.outer_circle_radius, 1.0);
        Ok(())
    }

    #[test]
    fn duplicate_global() {
        assert_eq!(
            parse("H 10 H 20 L 1"),
            Err(Error::DuplicateOption {
                key: "H".into(),
                offset: 5
            })
        );
    }

    #[test]
    fn no_sequences() {
        assert_eq!(parse("H 10"), Err(Error::EmptySequences));
        assert_eq!(parse(""), Err(Error::EmptySequences));
        assert_eq!(parse("   "), Err(Error::EmptySequences));
    }

    #[test]
    fn unknown_token() {
        assert_eq!(
            grammar_error("H 16 X 3"),
            (5, "a global option or 'L'".into())
        );
        assert_eq!(grammar_error("L 1 ; Q"), (6, "'L'".into()));
    }

    #[test]
    fn negative_and_malformed_numbers() {
        assert_eq!(grammar_error("L 10,-1").0, 5);
        assert_eq!(grammar_error("H -3 L 1").0, 2);
        assert_eq!(grammar_error("H 3.5 L 1"), (2, "an integer".into()));
        assert_eq!(grammar_error("OC .5 L 1"), (3, "a number".into()));
        assert_eq!(grammar_error("L 1 S 99999999999").0, 6);
    }

    #[test]
    fn sequence_options_are_ordered() {
        assert_eq!(
            grammar_error("L 4 C 2 S 1"),
            (8, "';' or end of input".into())
        );
        assert_eq!(grammar_error("S 1 L 4").0, 0);
        assert_eq!(grammar_error("L 1 S 1 S 2").0, 8);
        // Globals cannot follow a sequence.
        assert_eq!(grammar_error("L 1 H 8").0, 4);
    }

    #[test]
    fn dangling_separators() {
        assert_eq!(grammar_error("L 1 ;"), (5, "'L'".into()));
        assert_eq!(grammar_error("L 1,"), (4, "an integer".into()));
        assert_eq!(grammar_error("L"), (1, "an integer".into()));
    }

    #[test]
    fn offsets_count_characters() {
        // 'é' is two bytes but one character.
        assert_eq!(grammar_error("L 1 é").0, 4);
        assert_eq!(grammar_error("L 1 é ;").0, 4);
    }

    #[test]
    fn ranges_are_validated_after_parsing() {
        assert!(matches!(parse("H 0 L 1"), Err(Error::InvalidGeometry(_))));
        assert!(matches!(parse("K 2 L 1"), Err(Error::InvalidGeometry(_))));
        assert!(matches!(
            parse("OC 0.5 IC 0.6 L 1"),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            parse("H 8 L 1 ; L 2 S 8"),
            Err(Error::InvalidSequence { sequence: 1, .. })
        ));
        assert!(matches!(
            parse("L 1 C 0"),
            Err(Error::InvalidSequence { .. })
        ));
    }

    #[test]
    fn millimetre_defaults() -> Result<()> {
        let c = parse_with("L 10,1", &Defaults::MILLIMETRE)?;
        assert_eq!(c.outer_circle_radius, Defaults::MILLIMETRE.outer_circle_radius);
        Ok(())
    }
}
