//! Template Descriptors
//!
//! A model is described by a [`Layer`]: an ordered list of keys, each naming
//! one element with the syntax `tag(.class)*(:slot(-default)?)?`, and a
//! [`Branch`] holding either nothing or the element's own children.

use crate::error::TemplateError;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::str::FromStr;

/// Parsed template key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateKey {
    pub tag: String,
    pub classes: Vec<String>,
    pub slot: Option<SlotSpec>,
}

/// Slot declared by a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: String,
    pub default: Option<String>,
}

impl FromStr for TemplateKey {
    type Err = TemplateError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (selector, slot) = match key.split_once(':') {
            Some((selector, slot)) => (selector, Some(slot)),
            None => (key, None),
        };

        let mut parts = selector.split('.');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() {
            return Err(TemplateError::EmptyTag {
                key: key.to_string(),
            });
        }
        if !is_valid_tag(tag) {
            return Err(TemplateError::InvalidTag {
                key: key.to_string(),
                tag: tag.to_string(),
            });
        }
        let classes = parts
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        let slot = match slot {
            None => None,
            Some(slot) => {
                let (name, default) = match slot.split_once('-') {
                    Some((name, default)) => (name.trim(), Some(default.trim().to_string())),
                    None => (slot.trim(), None),
                };
                if name.is_empty() {
                    return Err(TemplateError::EmptySlotName {
                        key: key.to_string(),
                    });
                }
                Some(SlotSpec {
                    name: name.to_string(),
                    default,
                })
            }
        };

        Ok(Self {
            tag: tag.to_ascii_lowercase(),
            classes,
            slot,
        })
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        if let Some(slot) = &self.slot {
            write!(f, ":{}", slot.name)?;
            if let Some(default) = &slot.default {
                write!(f, "-{default}")?;
            }
        }
        Ok(())
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// One level of a model descriptor, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    entries: Vec<(String, Branch)>,
}

/// What sits under a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    /// No children
    Leaf,
    Nested(Layer),
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element without children
    pub fn leaf(mut self, key: &str) -> Self {
        self.entries.push((key.to_string(), Branch::Leaf));
        self
    }

    /// Add an element whose children are described by `children`
    pub fn nest(mut self, key: &str, children: Layer) -> Self {
        self.entries.push((key.to_string(), Branch::Nested(children)));
        self
    }

    pub fn entries(&self) -> &[(String, Branch)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct LayerVisitor;

impl<'de> Visitor<'de> for LayerVisitor {
    type Value = Layer;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of template keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Layer, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, branch)) = map.next_entry::<String, Branch>()? {
            entries.push((key, branch));
        }
        Ok(Layer { entries })
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LayerVisitor)
    }
}

/// Maps become nested layers; every other value ends the branch
struct BranchVisitor;

impl<'de> Visitor<'de> for BranchVisitor {
    type Value = Branch;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a nested map or any terminal value")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Branch, A::Error> {
        LayerVisitor.visit_map(map).map(Branch::Nested)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Branch, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Branch::Leaf)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_none<E: de::Error>(self) -> Result<Branch, E> {
        Ok(Branch::Leaf)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Branch, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for Branch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BranchVisitor)
    }
}
