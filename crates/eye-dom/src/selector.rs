//! Selectors
//!
//! querySelectorAll, closest, matches over a small selector grammar:
//! selector lists, descendant and child combinators, and compounds built from
//! `*`, tag, `#id`, `.class`, `[attr]` and `[attr=value]`.

use crate::{DomTree, NodeId, SelectorError};

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
    source: String,
}

/// Compounds joined by combinators, leftmost first
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    /// The combinator links a compound to the one on its left
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// `None` matches any tag
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    /// `None` tests presence only
    value: Option<String>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { src: source, pos: 0 };
        let mut alternatives = Vec::new();
        loop {
            parser.skip_ws();
            alternatives.push(parser.parse_complex()?);
            match parser.peek() {
                None => break,
                Some(',') => parser.bump(),
                Some(ch) => {
                    return Err(SelectorError::UnexpectedChar { ch, pos: parser.pos });
                }
            }
        }
        Ok(Self {
            alternatives,
            source: source.trim().to_string(),
        })
    }

    /// The selector text as written (trimmed)
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Returns whether any whitespace was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(SelectorError::ExpectedIdent { pos: start });
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let Some(compound) = self.parse_compound()? else {
                return Err(match self.peek() {
                    None | Some(',') | Some('>') => SelectorError::DanglingCombinator,
                    Some(ch) => SelectorError::UnexpectedChar { ch, pos: self.pos },
                });
            };
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                None | Some(',') => break,
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(ch) => return Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
            }
        }
        Ok(ComplexSelector { parts })
    }

    fn parse_compound(&mut self) -> Result<Option<Compound>, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => self.bump(),
            Some(c) if is_ident_char(c) => {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attrs.push(self.parse_attr()?);
                }
                _ => break,
            }
        }

        Ok((self.pos != start).then_some(compound))
    }

    fn parse_attr(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.bump();
                self.skip_ws();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.bump();
                        let start = self.pos;
                        loop {
                            match self.peek() {
                                None => return Err(SelectorError::UnterminatedAttribute),
                                Some(c) if c == quote => break,
                                Some(_) => self.bump(),
                            }
                        }
                        let value = self.src[start..self.pos].to_string();
                        self.bump();
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                Some(value)
            }
            None => return Err(SelectorError::UnterminatedAttribute),
            Some(ch) => return Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
        };
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(AttrMatch { name, value })
            }
            None => Err(SelectorError::UnterminatedAttribute),
            Some(ch) => Err(SelectorError::UnexpectedChar { ch, pos: self.pos }),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl DomTree {
    /// Check if element matches selector
    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector
            .alternatives
            .iter()
            .any(|complex| self.match_from(id, &complex.parts, complex.parts.len() - 1))
    }

    /// Find closest inclusive ancestor matching selector.
    ///
    /// A text node starts the walk at its parent element.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.ancestors(id)
            .filter(|&a| self.get(a).is_some_and(|n| n.is_element()))
            .find(|&a| self.matches(a, selector))
    }

    /// First descendant of `root` matching selector
    pub fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.matches(id, selector))
    }

    /// All descendants of `root` matching selector, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    fn match_from(&self, id: NodeId, parts: &[(Combinator, Compound)], idx: usize) -> bool {
        let (combinator, compound) = &parts[idx];
        if !self.matches_compound(id, compound) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        let Some(parent) = self.parent(id) else {
            return false;
        };
        match combinator {
            Combinator::Child => self.match_from(parent, parts, idx - 1),
            Combinator::Descendant => self
                .ancestors(parent)
                .any(|ancestor| self.match_from(ancestor, parts, idx - 1)),
        }
    }

    fn matches_compound(&self, id: NodeId, compound: &Compound) -> bool {
        let Some(elem) = self.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        if compound.tag.as_ref().is_some_and(|tag| *tag != elem.tag) {
            return false;
        }
        if compound.id.as_ref().is_some_and(|id| elem.id() != Some(id.as_str())) {
            return false;
        }
        if !compound.classes.iter().all(|c| elem.classes.contains(c)) {
            return false;
        }
        compound.attrs.iter().all(|attr| match &attr.value {
            None => elem.has_attr(&attr.name),
            Some(value) => elem.get_attr(&attr.name).as_deref() == Some(value.as_str()),
        })
    }
}
