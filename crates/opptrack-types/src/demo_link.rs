//! Demo links are stored inline in an opportunity's list-of-strings column
//! as `label|url` or a bare `url`.
//!
//! Decoding is lenient: the first `|` wins, as long as it is neither the
//! first nor the last character. Encoding is strict: a label may not contain
//! `|`, because the result would not decode back to the same pair.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

pub const SEPARATOR: char = '|';

/// A URL with an optional display label
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DemoLink {
    pub label: String,
    pub url: String,
}

impl DemoLink {
    /// Build a link for storage. Rejects labels containing the separator.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.contains(SEPARATOR) {
            return Err(Error::LabelContainsSeparator(label));
        }
        Ok(Self {
            label,
            url: url.into(),
        })
    }

    pub fn unlabeled(url: impl Into<String>) -> Self {
        Self {
            label: String::new(),
            url: url.into(),
        }
    }

    /// Decode a stored string
    pub fn parse(raw: &str) -> Self {
        match raw.find(SEPARATOR) {
            Some(idx) if idx > 0 && idx < raw.len() - 1 => Self {
                label: raw[..idx].to_string(),
                url: raw[idx + 1..].to_string(),
            },
            _ => Self::unlabeled(raw),
        }
    }

    /// Encode for storage
    pub fn serialize(&self) -> String {
        if self.has_label() {
            format!("{}{}{}", self.label, SEPARATOR, self.url)
        } else {
            self.url.clone()
        }
    }

    /// Text shown for the link: the label, else the URL's host without a
    /// leading `www.`, else the raw URL.
    pub fn display(&self) -> String {
        if self.has_label() {
            return self.label.clone();
        }

        match Url::parse(&self.url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
                None => self.url.clone(),
            },
            Err(_) => self.url.clone(),
        }
    }

    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

impl From<&str> for DemoLink {
    fn from(raw: &str) -> Self {
        DemoLink::parse(raw)
    }
}

/// Editable list of demo links backing the form's link editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DemoLinks {
    links: Vec<DemoLink>,
}

impl DemoLinks {
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        Self {
            links: raw.iter().map(|s| DemoLink::parse(s.as_ref())).collect(),
        }
    }

    /// Encode for storage, dropping entries with a blank URL
    pub fn to_raw(&self) -> Vec<String> {
        self.links
            .iter()
            .filter(|link| !link.url.trim().is_empty())
            .map(DemoLink::serialize)
            .collect()
    }

    pub fn links(&self) -> &[DemoLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn add(&mut self, link: DemoLink) -> Result<()> {
        if link.label.contains(SEPARATOR) {
            return Err(Error::LabelContainsSeparator(link.label));
        }
        self.links.push(link);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<DemoLink> {
        self.check_index(index)?;
        Ok(self.links.remove(index))
    }

    pub fn replace(&mut self, index: usize, link: DemoLink) -> Result<()> {
        self.check_index(index)?;
        if link.label.contains(SEPARATOR) {
            return Err(Error::LabelContainsSeparator(link.label));
        }
        self.links[index] = link;
        Ok(())
    }

    /// Move the entry at `from` so that it ends up at `to`
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let link = self.links.remove(from);
        self.links.insert(to, link);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.links.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.links.len(),
            });
        }
        Ok(())
    }
}
