//! Load a hand-curated noun sense lexicon into a [`SenseInventory`].
//!
//! The lexicon is line oriented. Each non-comment line adds one sense to a
//! noun:
//!
//! ```text
//! // comment
//! bank|banks,river,shore,water,stream
//! bank,finance,money,loan,account
//! ```
//!
//! The leading field is the noun with an optional plural after `|`. The
//! second field is the sense label, which also seeds the sense's context
//! words; the remaining fields are further context words. Lines naming the
//! same noun (or its registered plural) accumulate senses on one entry.
//! Everything is case-folded and trimmed, and the noun and its plural are
//! never context words of their own senses.
//!
//! # Example
//! ```rust
//! use wsd_lexicon::SenseInventory;
//!
//! # fn main() -> anyhow::Result<()> {
//! let inv = SenseInventory::parse(
//!     "bank|banks,river,shore,water\nbank,finance,money,loan\n",
//! )?;
//! let entry = inv.get("Banks").expect("plural resolves");
//! assert_eq!(entry.noun(), "bank");
//! assert_eq!(entry.senses().len(), 2);
//! assert_eq!(inv.canonical("banks"), Some("bank"));
//! # Ok(()) }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// One meaning of a noun: a display label and its context words.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sense {
    label: String,
    words: BTreeSet<String>,
}

impl Sense {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    /// Human-readable name, e.g. `bank (river)`.
    pub fn display_name(&self, noun: &str) -> String {
        format!("{noun} ({})", self.label)
    }
}

/// All senses of one noun.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SenseEntry {
    noun: String,
    plural: Option<String>,
    senses: Vec<Sense>,
}

impl SenseEntry {
    /// Canonical (singular) form; output files are named after it.
    pub fn noun(&self) -> &str {
        &self.noun
    }

    pub fn plural(&self) -> Option<&str> {
        self.plural.as_deref()
    }

    pub fn senses(&self) -> &[Sense] {
        &self.senses
    }

    /// True if `word` (case-folded) is the noun or its plural.
    pub fn is_form(&self, word: &str) -> bool {
        word == self.noun || self.plural.as_deref() == Some(word)
    }

    /// Owned copy of every sense's context words, in sense order.
    ///
    /// Bootstrapping grows these copies; the inventory itself stays as loaded.
    pub fn context_sets(&self) -> Vec<BTreeSet<String>> {
        self.senses.iter().map(|s| s.words.clone()).collect()
    }

    fn push_sense(&mut self, label: &str, fields: &[&str]) {
        let words = fields
            .iter()
            .map(|f| normalize(f))
            .filter(|w| !w.is_empty() && !self.is_form(w))
            .collect();
        self.senses.push(Sense {
            label: label.trim().to_string(),
            words,
        });
    }
}

/// Every lexicon noun, addressable by singular or plural form.
#[derive(Clone, Debug, Default)]
pub struct SenseInventory {
    entries: Vec<SenseEntry>,
    forms: HashMap<String, usize>,
}

impl SenseInventory {
    /// Read and parse a lexicon file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read lexicon {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse lexicon {}", path.display()))
    }

    /// Parse lexicon text already in memory.
    pub fn parse(text: &str) -> Result<Self> {
        let mut inv = Self::default();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 2 || fields[1].trim().is_empty() {
                bail!(
                    "line {}: expected `noun[|plural],label,context...`, got {line:?}",
                    lineno + 1
                );
            }

            let (noun, plural) = match fields[0].split_once('|') {
                Some((noun, plural)) => (normalize(noun), Some(normalize(plural))),
                None => (normalize(fields[0]), None),
            };
            let plural = plural.filter(|p| !p.is_empty() && *p != noun);
            if noun.is_empty() {
                bail!("line {}: empty noun", lineno + 1);
            }

            let idx = inv
                .entry_index(&noun, plural.as_deref())
                .with_context(|| format!("line {}", lineno + 1))?;
            inv.entries[idx].push_sense(fields[1], &fields[1..]);
        }
        Ok(inv)
    }

    /// Look up an entry by singular or plural form, ignoring case.
    pub fn get(&self, form: &str) -> Option<&SenseEntry> {
        self.forms
            .get(&normalize(form))
            .map(|&idx| &self.entries[idx])
    }

    /// Canonical noun for a singular or plural form.
    pub fn canonical(&self, form: &str) -> Option<&str> {
        self.get(form).map(SenseEntry::noun)
    }

    pub fn contains(&self, form: &str) -> bool {
        self.forms.contains_key(&normalize(form))
    }

    /// Canonical nouns in lexicon order.
    pub fn nouns(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(SenseEntry::noun)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_index(&mut self, noun: &str, plural: Option<&str>) -> Result<usize> {
        let existing = self.forms.get(noun).copied();
        let plural_owner = plural.and_then(|p| self.forms.get(p).copied());

        let idx = match (existing, plural_owner) {
            (Some(a), Some(b)) if a != b => {
                bail!("plural {:?} already belongs to another noun", plural.unwrap_or_default())
            }
            (None, Some(b)) => bail!(
                "plural {:?} already belongs to {:?}",
                plural.unwrap_or_default(),
                self.entries[b].noun
            ),
            (Some(idx), _) => idx,
            (None, None) => {
                self.entries.push(SenseEntry {
                    noun: noun.to_string(),
                    plural: None,
                    senses: Vec::new(),
                });
                let idx = self.entries.len() - 1;
                self.forms.insert(noun.to_string(), idx);
                idx
            }
        };

        if let Some(p) = plural
            && self.entries[idx].plural.is_none()
            && !self.entries[idx].is_form(p)
        {
            self.entries[idx].plural = Some(p.to_string());
            self.forms.insert(p.to_string(), idx);
        }
        Ok(idx)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
