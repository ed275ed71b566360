//! Word-frequency rankings over comma-separated sample files.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::corpus::Sample;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Rank words by descending count, skipping the focus noun and its plural.
///
/// Ties keep first-seen order. A `limit` of 0 keeps every word.
pub fn rank_words<I, S>(words: I, noun: &str, plural: Option<&str>, limit: usize) -> Vec<WordFrequency>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<WordFrequency> = Vec::new();

    for raw in words {
        let word = raw.as_ref().trim().to_lowercase();
        if word.is_empty() || word == noun || plural == Some(word.as_str()) {
            continue;
        }
        match slots.get(&word) {
            Some(&idx) => ranked[idx].count += 1,
            None => {
                slots.insert(word.clone(), ranked.len());
                ranked.push(WordFrequency { word, count: 1 });
            }
        }
    }

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    if limit > 0 {
        ranked.truncate(limit);
    }
    ranked
}

/// [`rank_words`] over every line of a comma-separated file.
pub fn top_words(
    path: impl AsRef<Path>,
    noun: &str,
    plural: Option<&str>,
    limit: usize,
) -> Result<Vec<WordFrequency>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut words = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        words.extend(line.split(',').map(str::to_string));
    }
    Ok(rank_words(words, noun, plural, limit))
}

/// Share of samples containing at least one of `vocabulary`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Coverage {
    pub hits: usize,
    pub misses: usize,
}

impl Coverage {
    pub fn measure(samples: &[Sample<'_>], vocabulary: &HashSet<&str>, noun: &str, plural: Option<&str>) -> Self {
        let mut coverage = Self::default();
        for sample in samples {
            let hit = sample
                .words()
                .filter(|w| *w != noun && Some(*w) != plural)
                .any(|w| vocabulary.contains(w));
            if hit {
                coverage.hits += 1;
            } else {
                coverage.misses += 1;
            }
        }
        coverage
    }

    pub fn hit_rate(&self) -> f64 {
        percent(self.hits, self.hits + self.misses)
    }

    pub fn miss_rate(&self) -> f64 {
        percent(self.misses, self.hits + self.misses)
    }
}

pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 * 100.0) / total as f64
    }
}
