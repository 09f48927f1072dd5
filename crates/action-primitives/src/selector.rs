//! Minimal CSS selector matching for scripted pages
//!
//! Supports `tag`, `*`, `.class`, `#id`, `[attr]`, `[attr="v"]`, `[attr*="v"]`,
//! compounds of those, and comma-separated lists. Combinators are rejected.

use crate::{errors::PageError, types::ElementHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(Vec<Compound>);

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrTest {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self, PageError> {
        let compounds = selector
            .split(',')
            .map(parse_compound)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(compounds))
    }

    pub fn matches(&self, element: &ElementHandle) -> bool {
        self.0.iter().any(|compound| compound.matches(element))
    }
}

impl Compound {
    fn matches(&self, element: &ElementHandle) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&element.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|test| match &test.op {
            AttrOp::Exists => element.has_attribute(&test.name),
            AttrOp::Equals(value) => element.attribute(&test.name) == Some(value.as_str()),
            AttrOp::Contains(value) => element
                .attribute(&test.name)
                .map(|actual| actual.contains(value.as_str()))
                .unwrap_or(false),
        })
    }
}

fn parse_compound(raw: &str) -> Result<Compound, PageError> {
    let source = raw.trim();
    if source.is_empty() {
        return Err(PageError::Selector(format!("empty selector in '{raw}'")));
    }

    let chars: Vec<char> = source.chars().collect();
    let mut compound = Compound::default();
    let mut pos = 0;

    if chars[0] == '*' {
        pos = 1;
    } else {
        let tag = read_ident(&chars, &mut pos);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while pos < chars.len() {
        match chars[pos] {
            '.' => {
                pos += 1;
                let class = read_ident(&chars, &mut pos);
                if class.is_empty() {
                    return Err(PageError::Selector(format!("missing class name in '{source}'")));
                }
                compound.classes.push(class);
            }
            '#' => {
                pos += 1;
                let id = read_ident(&chars, &mut pos);
                if id.is_empty() {
                    return Err(PageError::Selector(format!("missing id in '{source}'")));
                }
                compound.id = Some(id);
            }
            '[' => {
                let close = chars[pos..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|offset| pos + offset)
                    .ok_or_else(|| PageError::Selector(format!("unclosed '[' in '{source}'")))?;
                let inner: String = chars[pos + 1..close].iter().collect();
                compound.attrs.push(parse_attr(&inner, source)?);
                pos = close + 1;
            }
            other => {
                return Err(PageError::Selector(format!(
                    "unsupported token '{other}' in '{source}'"
                )))
            }
        }
    }

    Ok(compound)
}

fn parse_attr(inner: &str, source: &str) -> Result<AttrTest, PageError> {
    let (name, op) = if let Some((name, value)) = inner.split_once("*=") {
        (name, AttrOp::Contains(unquote(value)))
    } else if let Some((name, value)) = inner.split_once('=') {
        (name, AttrOp::Equals(unquote(value)))
    } else {
        (inner, AttrOp::Exists)
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(PageError::Selector(format!(
            "missing attribute name in '{source}'"
        )));
    }
    Ok(AttrTest {
        name: name.to_string(),
        op,
    })
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let mut ident = String::new();
    while *pos < chars.len() {
        let c = chars[*pos];
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            ident.push(c);
            *pos += 1;
        } else {
            break;
        }
    }
    ident
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}
