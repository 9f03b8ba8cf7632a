//! Structural queries over report documents
//!
//! A query names an element and a list of attribute equality predicates:
//!
//! ```text
//! testcase[@classname='a.b'][@name=concat('it', "'", 's "x"')]
//! ```
//!
//! Literals are produced by [`crate::escape::escape`], so a query can match
//! any attribute value exactly. An absent attribute compares equal to the
//! empty string.

use xot::{Node, Xot};

use crate::error::{Error, Result};

/// A single `[@attribute=literal]` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub attribute: String,
    pub value: String,
}

/// A parsed query: element name plus attribute predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub element: String,
    pub predicates: Vec<Predicate>,
}

impl Selector {
    /// Parse a query string.
    ///
    /// # Errors
    ///
    /// Returns `Error::Query` if the string is not a well-formed query.
    pub fn parse(query: &str) -> Result<Self> {
        Parser::new(query).selector()
    }

    /// Whether `node` is an element satisfying this selector.
    pub fn matches(&self, xot: &Xot, node: Node) -> bool {
        let Some(element) = xot.element(node) else {
            return false;
        };
        if xot.name(&self.element) != Some(element.name()) {
            return false;
        }
        self.predicates.iter().all(|predicate| {
            let actual = xot
                .name(&predicate.attribute)
                .and_then(|name| xot.get_attribute(node, name))
                .unwrap_or("");
            actual == predicate.value
        })
    }

    /// Find the first descendant of `root`, in document order, satisfying
    /// this selector.
    pub fn find_first(&self, xot: &Xot, root: Node) -> Option<Node> {
        // Names never interned cannot occur in any parsed document.
        xot.name(&self.element)?;
        xot.descendants(root).find(|&node| self.matches(xot, node))
    }
}

struct Parser<'a> {
    query: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            query,
            chars: query.chars().peekable(),
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Query {
            query: self.query.to_string(),
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of query", expected))),
        }
    }

    fn name(&mut self) -> Result<String> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            let valid = if name.is_empty() {
                c.is_alphabetic() || c == '_'
            } else {
                c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
            };
            if !valid {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        if name.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(name)
    }

    fn selector(mut self) -> Result<Selector> {
        let element = self.name()?;
        let mut predicates = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                None => break,
                Some('[') => predicates.push(self.predicate()?),
                Some(&c) => return Err(self.error(format!("unexpected '{}'", c))),
            }
        }
        Ok(Selector {
            element,
            predicates,
        })
    }

    fn predicate(&mut self) -> Result<Predicate> {
        self.expect('[')?;
        self.expect('@')?;
        let attribute = self.name()?;
        self.expect('=')?;
        let value = self.literal()?;
        self.expect(']')?;
        Ok(Predicate { attribute, value })
    }

    fn literal(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.chars.peek() {
            Some('\'') | Some('"') => self.quoted(),
            Some(_) => {
                let function = self.name()?;
                if function != "concat" {
                    return Err(self.error(format!("unknown function '{}'", function)));
                }
                self.concat()
            }
            None => Err(self.error("expected a literal, found end of query")),
        }
    }

    fn quoted(&mut self) -> Result<String> {
        self.skip_whitespace();
        let quote = match self.chars.next() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Err(self.error("expected a quoted string")),
        };
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    fn concat(&mut self) -> Result<String> {
        self.expect('(')?;
        let mut value = self.quoted()?;
        let mut arguments = 1;
        loop {
            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => {
                    value.push_str(&self.quoted()?);
                    arguments += 1;
                }
                Some(')') => break,
                Some(c) => return Err(self.error(format!("unexpected '{}' in concat()", c))),
                None => return Err(self.error("unterminated concat()")),
            }
        }
        if arguments < 2 {
            return Err(self.error("concat() takes at least two arguments"));
        }
        Ok(value)
    }
}
