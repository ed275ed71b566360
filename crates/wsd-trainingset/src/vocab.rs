//! Reading labelled training sets back and numbering their vocabulary.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::bootstrap::create_writer;
use crate::error::PipelineError;
use crate::layout::{LABELLED_SUFFIX, OutputLayout};

/// Labelled samples of one noun, in file order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelledSet {
    samples: Vec<(usize, Vec<String>)>,
}

impl LabelledSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse {}", path.display()))
    }

    /// Parse `<sense>|w1,w2,...` lines, skipping `//` comments and blanks.
    pub fn parse(text: &str) -> Result<Self> {
        let mut samples = Vec::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let Some((sense, words)) = line.split_once('|') else {
                bail!("line {}: expected `<sense>|words`, got {line:?}", lineno + 1);
            };
            let sense: usize = sense
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad sense index {sense:?}", lineno + 1))?;
            let words = words
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect();
            samples.push((sense, words));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[(usize, Vec<String>)] {
        &self.samples
    }

    /// Samples grouped by sense index, ascending.
    pub fn by_sense(&self) -> BTreeMap<usize, Vec<&[String]>> {
        let mut grouped: BTreeMap<usize, Vec<&[String]>> = BTreeMap::new();
        for (sense, words) in &self.samples {
            grouped.entry(*sense).or_default().push(words);
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Word ids, assigned from 1 in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    ids: HashMap<String, usize>,
    words: Vec<String>,
}

impl Vocabulary {
    /// Id of `word`, registering it if new.
    pub fn add(&mut self, word: &str) -> usize {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        self.words.push(word.to_string());
        let id = self.words.len();
        self.ids.insert(word.to_string(), id);
        id
    }

    pub fn id(&self, word: &str) -> Option<usize> {
        self.ids.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// `(word, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.words
            .iter()
            .enumerate()
            .map(|(idx, word)| (word.as_str(), idx + 1))
    }

    /// Write `word,id` lines.
    pub fn write(&self, path: &Path) -> Result<(), PipelineError> {
        let mut out = create_writer(path)?;
        for (word, id) in self.iter() {
            writeln!(out, "{word},{id}").map_err(|e| PipelineError::output(path, e))?;
        }
        out.flush().map_err(|e| PipelineError::output(path, e))
    }
}

/// Number every word of every labelled file under the layout, files taken
/// in name order.
pub fn build_vocabulary(layout: &OutputLayout) -> Result<Vocabulary, PipelineError> {
    let dir = layout.labelled_dir();
    let mut vocab = Vocabulary::default();
    if !dir.is_dir() {
        warn!("no labelled training sets under {}", dir.display());
        return Ok(vocab);
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(&dir).map_err(|e| PipelineError::read(&dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::read(&dir, e))?.path();
        let labelled = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(LABELLED_SUFFIX));
        if labelled && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    for path in &files {
        let set = LabelledSet::load(path).map_err(PipelineError::Corpus)?;
        let per_sense: Vec<String> = set
            .by_sense()
            .iter()
            .map(|(sense, samples)| format!("{sense}:{}", samples.len()))
            .collect();
        debug!("{}: {} samples ({})", path.display(), set.len(), per_sense.join(" "));
        for (_, words) in set.samples() {
            for word in words {
                vocab.add(word);
            }
        }
    }
    info!("{} words from {} labelled files", vocab.len(), files.len());
    Ok(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labelled_lines() {
        let set = LabelledSet::parse(
            "// bank:====\n// syns\n0|shore,water,fish\n\n1|money,loan\n0|river\n",
        )
        .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.samples()[1], (1, vec!["money".to_string(), "loan".to_string()]));
        let grouped = set.by_sense();
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(grouped[&0].len(), 2);
    }

    #[test]
    fn rejects_lines_without_a_sense() {
        let err = LabelledSet::parse("0|a,b\nwater,money\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!(LabelledSet::parse("x|a\n").is_err());
    }

    #[test]
    fn ids_start_at_one_in_first_seen_order() {
        let mut vocab = Vocabulary::default();
        assert_eq!(vocab.add("water"), 1);
        assert_eq!(vocab.add("money"), 2);
        assert_eq!(vocab.add("water"), 1);
        assert_eq!(vocab.id("money"), Some(2));
        assert_eq!(vocab.id("fish"), None);
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn builds_from_labelled_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        fs::create_dir_all(layout.labelled_dir()).unwrap();
        fs::write(layout.labelled("bass"), "// bass\n0|fish,lake\n").unwrap();
        fs::write(layout.labelled("bank"), "// bank\n0|shore,fish\n1|money\n").unwrap();
        fs::write(layout.ambiguous("bank"), "ignored,words\n").unwrap();

        let vocab = build_vocabulary(&layout).unwrap();
        let pairs: Vec<_> = vocab.iter().collect();
        assert_eq!(pairs, vec![("shore", 1), ("fish", 2), ("money", 3), ("lake", 4)]);

        vocab.write(&layout.vocab()).unwrap();
        assert_eq!(
            fs::read_to_string(layout.vocab()).unwrap(),
            "shore,1\nfish,2\nmoney,3\nlake,4\n"
        );
    }

    #[test]
    fn missing_labelled_dir_gives_empty_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = build_vocabulary(&OutputLayout::new(dir.path())).unwrap();
        assert!(vocab.is_empty());
    }
}
