//! A small CSS selector subset.
//!
//! Supported: selector lists (`a, b`), descendant and child (`>`)
//! combinators, type selectors and `*`, `#id`, `.class`, `[attr]`,
//! `[attr=value]` and `[attr="value"]`.

use std::fmt;

use super::tree::{Document, NodeId};
use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrTest {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One complex selector, stored right-to-left: `subject` is the rightmost
/// compound, `ancestors` holds the rest, nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        for part in split_list(source) {
            alternatives.push(parse_complex(part.trim(), source)?);
        }
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

fn error(source: &str, msg: &str) -> AppError {
    AppError::Selector(format!("{msg} in '{source}'"))
}

fn parse_complex(part: &str, source: &str) -> Result<Complex> {
    if part.is_empty() {
        return Err(error(source, "empty selector"));
    }

    let mut compounds: Vec<Compound> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut chars = part.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            if !compounds.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            continue;
        }
        if ch == '>' {
            chars.next();
            if compounds.is_empty() || pending == Some(Combinator::Child) {
                return Err(error(source, "unexpected '>'"));
            }
            pending = Some(Combinator::Child);
            continue;
        }

        let mut end = part.len();
        let mut in_brackets = false;
        let mut quote: Option<char> = None;
        for (i, c) in part[start..].char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') if in_brackets => quote = Some(c),
                (None, '[') => in_brackets = true,
                (None, ']') => in_brackets = false,
                (None, c) if !in_brackets && (c.is_whitespace() || c == '>') => {
                    end = start + i;
                    break;
                }
                _ => {}
            }
        }
        let compound = parse_compound(&part[start..end], source)?;
        if !compounds.is_empty() {
            combinators.push(pending.take().unwrap_or(Combinator::Descendant));
        }
        compounds.push(compound);
        pending = None;
        while chars.peek().is_some_and(|&(i, _)| i < end) {
            chars.next();
        }
    }

    if pending == Some(Combinator::Child) {
        return Err(error(source, "dangling '>'"));
    }

    let subject = compounds.pop().ok_or_else(|| error(source, "empty selector"))?;
    let mut ancestors = Vec::with_capacity(compounds.len());
    while let Some(compound) = compounds.pop() {
        let comb = combinators.pop().unwrap_or(Combinator::Descendant);
        ancestors.push((comb, compound));
    }
    Ok(Complex { subject, ancestors })
}

/// Split a selector list on commas outside `[...]` and quoted values.
fn split_list(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_brackets = false;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

/// Byte index of the `]` closing an attribute test, skipping quoted text.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

fn parse_compound(text: &str, source: &str) -> Result<Compound> {
    let mut compound = Compound::default();
    let mut rest = text;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let (ident, after) = take_ident(rest);
        if !ident.is_empty() {
            compound.tag = Some(ident.to_ascii_lowercase());
            rest = after;
        }
    }

    while let Some(c) = rest.chars().next() {
        match c {
            '#' | '.' => {
                let (ident, after) = take_ident(&rest[1..]);
                if ident.is_empty() {
                    return Err(error(source, &format!("expected name after '{c}'")));
                }
                if c == '#' {
                    compound.id = Some(ident.to_string());
                } else {
                    compound.classes.push(ident.to_string());
                }
                rest = after;
            }
            '[' => {
                let close = closing_bracket(rest).ok_or_else(|| error(source, "unclosed '['"))?;
                let inner = rest[1..close].trim();
                compound.attrs.push(parse_attr(inner, source)?);
                rest = &rest[close + 1..];
            }
            _ => return Err(error(source, &format!("unexpected '{c}'"))),
        }
    }
    Ok(compound)
}

fn parse_attr(inner: &str, source: &str) -> Result<AttrTest> {
    match inner.split_once('=') {
        None => {
            let (name, tail) = take_ident(inner);
            if name.is_empty() || !tail.is_empty() {
                return Err(error(source, "invalid attribute selector"));
            }
            Ok(AttrTest::Exists(name.to_string()))
        }
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            if name.is_empty() || take_ident(name).0.len() != name.len() {
                return Err(error(source, "invalid attribute selector"));
            }
            Ok(AttrTest::Equals(name.to_string(), value.to_string()))
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag
            && *tag != el.tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && doc.id(node) != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|test| match test {
            AttrTest::Exists(name) if name == "class" => !doc.classes(node).is_empty(),
            AttrTest::Exists(name) => doc.attr(node, name).is_some(),
            AttrTest::Equals(name, value) if name == "class" => doc.classes(node).join(" ") == *value,
            AttrTest::Equals(name, value) => doc.attr(node, name) == Some(value.as_str()),
        })
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.subject.matches(doc, node) && self.match_ancestors(doc, node, 0)
    }

    fn match_ancestors(&self, doc: &Document, node: NodeId, idx: usize) -> bool {
        let Some((comb, compound)) = self.ancestors.get(idx) else {
            return true;
        };
        match comb {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| compound.matches(doc, p) && self.match_ancestors(doc, p, idx + 1)),
            Combinator::Descendant => {
                let mut current = doc.parent(node);
                while let Some(p) = current {
                    if compound.matches(doc, p) && self.match_ancestors(doc, p, idx + 1) {
                        return true;
                    }
                    current = doc.parent(p);
                }
                false
            }
        }
    }
}
