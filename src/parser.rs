//! Parser for prefs.js files
//!
//! This module provides a recursive descent parser that converts the browser's
//! JavaScript-like preference syntax into structured data.
//!
//! # Format
//!
//! ```text
//! user_pref("preference.name", value);      // what prefs.js contains
//! pref("preference.name", value);           // default
//! lock_pref("preference.name", value);      // locked
//! sticky_pref("preference.name", value);    // sticky
//! ```
//!
//! Values are `true`/`false`, 32-bit decimal integers, or double-quoted
//! strings.
//!
//! # Example
//!
//! ```rust
//! use ffprefs::{parse_prefs_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     // This is a comment
//!     user_pref("browser.startup.homepage", "about:blank");
//!     user_pref("network.proxy.socks_port", 9050);
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! assert_eq!(prefs[0].value, PrefValue::String("about:blank".to_string()));
//! assert_eq!(prefs[0].pref_type, PrefType::User);
//! assert_eq!(prefs[1].line, 4);
//! # Ok::<(), ffprefs::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use crate::types::{PrefEntry, PrefType, PrefValue};

/// Parse prefs.js content into entries, in input order
///
/// Duplicate keys are kept as separate entries; [`crate::PrefsFile`] is the
/// place where they collapse to one value per key.
pub fn parse_prefs_js(content: &str) -> Result<Vec<PrefEntry>> {
    let mut parser = Parser::new(content)?;
    parser.parse()
}

/// Read and parse a prefs.js file in one step
pub fn parse_prefs_js_file(path: &std::path::Path) -> Result<Vec<PrefEntry>> {
    let content = std::fs::read_to_string(path)?;
    parse_prefs_js(&content)
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current lookahead token
    current: Token,
    /// Where `current` starts, for error reporting
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let (line, column) = lexer.token_position();
        Ok(Parser {
            lexer,
            current,
            line,
            column,
        })
    }

    fn parse(&mut self) -> Result<Vec<PrefEntry>> {
        let mut preferences = Vec::new();
        while self.current != Token::Eof {
            preferences.push(self.parse_statement()?);
        }
        Ok(preferences)
    }

    /// Parse: pref_function "(" key "," value ")" ";"
    fn parse_statement(&mut self) -> Result<PrefEntry> {
        let line = self.line;
        let pref_type = self.parse_pref_function()?;
        self.expect_token(Token::LeftParen)?;
        let key = self.expect_string()?;
        self.expect_token(Token::Comma)?;
        let value = self.parse_value()?;
        self.expect_token(Token::RightParen)?;
        self.expect_token(Token::Semicolon)?;

        let explanation = crate::explanations::explain(&key);
        Ok(PrefEntry {
            key,
            value,
            pref_type,
            line,
            explanation,
        })
    }

    fn parse_pref_function(&mut self) -> Result<PrefType> {
        let pref_type = match &self.current {
            Token::Identifier(ident) => PrefType::from_function_name(ident).ok_or_else(|| {
                self.error(format!(
                    "Unknown pref function '{}'. Expected user_pref, pref, lock_pref, or sticky_pref",
                    ident
                ))
            })?,
            token => {
                return Err(self.error(format!(
                    "Expected pref function name (user_pref, pref, lock_pref, sticky_pref), got {}",
                    describe(token)
                )))
            }
        };
        self.advance()?;
        Ok(pref_type)
    }

    fn parse_value(&mut self) -> Result<PrefValue> {
        let value = match &mut self.current {
            Token::String(s) => PrefValue::String(std::mem::take(s)),
            Token::Integer(n) => PrefValue::Integer(*n),
            Token::Boolean(b) => PrefValue::Bool(*b),
            token => {
                let found = describe(token);
                return Err(self.error(format!(
                    "Expected value (boolean, integer, or string), got {}",
                    found
                )));
            }
        };
        self.advance()?;
        Ok(value)
    }

    fn expect_token(&mut self, expected: Token) -> Result<()> {
        if self.current != expected {
            return Err(self.error(format!(
                "Expected {}, got {}",
                describe(&expected),
                describe(&self.current)
            )));
        }
        self.advance()
    }

    fn expect_string(&mut self) -> Result<String> {
        let key = match &mut self.current {
            Token::String(s) => std::mem::take(s),
            token => {
                let found = describe(token);
                return Err(self.error(format!("Expected preference name string, got {}", found)));
            }
        };
        self.advance()?;
        Ok(key)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        let (line, column) = self.lexer.token_position();
        self.line = line;
        self.column = column;
        Ok(())
    }

    fn error(&self, message: String) -> Error {
        Error::Parser {
            line: self.line,
            column: self.column,
            message,
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Identifier(ident) => format!("identifier '{}'", ident),
        Token::String(_) => "string".to_string(),
        Token::Integer(n) => format!("integer {}", n),
        Token::Boolean(b) => format!("boolean {}", b),
        Token::LeftParen => "'('".to_string(),
        Token::RightParen => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}
