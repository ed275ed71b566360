//! Context-window extraction from tagged sentences into per-noun corpora.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use wsd_lexicon::SenseInventory;
use wsd_text::{Tagger, is_undesirable};
use wsd_types::{Sentence, TaggedToken};

use crate::config::Settings;
use crate::layout::OutputLayout;

const PROGRESS_EVERY: usize = 100_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WindowConfig {
    pub window_size: usize,
    pub min_valid_size: usize,
    /// 0 disables the cap.
    pub max_bytes_per_noun: u64,
}

impl WindowConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            window_size: settings.window_size,
            min_valid_size: settings.min_valid_size(),
            max_bytes_per_noun: settings.max_bytes_per_noun,
        }
    }
}

/// Inclusive `[left, right]` around position `i`, clamped to the sentence
/// and moved past the last full stop left of `i`.
pub fn window_bounds(tokens: &[TaggedToken], i: usize, window_size: usize) -> (usize, usize) {
    let mut left = i.saturating_sub(window_size);
    let right = i.saturating_add(window_size).min(tokens.len().saturating_sub(1));
    if let Some(pos) = tokens[left..i].iter().rposition(|t| t.token.is_full_stop()) {
        left += pos + 1;
    }
    (left, right)
}

/// Case-folded context words of `tokens[left..=right]`, stopping at the
/// first full stop.
pub fn collect_window(tokens: &[TaggedToken], left: usize, right: usize) -> Vec<String> {
    let mut words = Vec::new();
    for tagged in &tokens[left..=right] {
        if tagged.token.is_full_stop() {
            break;
        }
        if !tagged.token.is_textual() {
            continue;
        }
        let word = tagged.text().to_lowercase();
        if !is_undesirable(&word) {
            words.push(word);
        }
    }
    words
}

/// Counters for one extraction run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtractionReport {
    pub documents: usize,
    pub failed_documents: usize,
    pub sentences: usize,
    /// Admitted samples per canonical noun.
    pub samples: BTreeMap<String, usize>,
    /// Nouns whose output file could not be created or written.
    pub failed_nouns: BTreeSet<String>,
}

impl ExtractionReport {
    pub fn total_samples(&self) -> usize {
        self.samples.values().sum()
    }
}

enum NounSink {
    Open {
        path: PathBuf,
        writer: BufWriter<File>,
        bytes: u64,
    },
    Failed,
}

/// Lazily opened output files, one per noun.
struct NounSinks {
    layout: OutputLayout,
    sinks: HashMap<String, NounSink>,
}

impl NounSinks {
    fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            sinks: HashMap::new(),
        }
    }

    fn bytes(&self, noun: &str) -> u64 {
        match self.sinks.get(noun) {
            Some(NounSink::Open { bytes, .. }) => *bytes,
            _ => 0,
        }
    }

    fn is_failed(&self, noun: &str) -> bool {
        matches!(self.sinks.get(noun), Some(NounSink::Failed))
    }

    /// Append one line. Returns false when the noun's file is unusable.
    fn append(&mut self, noun: &str, line: &str) -> bool {
        if !self.sinks.contains_key(noun) {
            let sink = match open_sink(&self.layout, noun) {
                Ok(sink) => sink,
                Err(e) => {
                    error!("{noun}: cannot create {}: {e}", self.layout.unlabelled(noun).display());
                    NounSink::Failed
                }
            };
            self.sinks.insert(noun.to_string(), sink);
        }

        let Some(sink) = self.sinks.get_mut(noun) else {
            return false;
        };
        let NounSink::Open {
            path,
            writer,
            bytes,
        } = sink
        else {
            return false;
        };
        let result = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"));
        match result {
            Ok(()) => {
                *bytes += line.len() as u64 + 1;
                true
            }
            Err(e) => {
                error!("{noun}: write to {} failed: {e}", path.display());
                *sink = NounSink::Failed;
                false
            }
        }
    }

    /// Flush and close every file. Nouns whose file could not be created,
    /// written or flushed are returned, and their partial files removed so a
    /// later run extracts them again.
    fn close(self) -> Vec<String> {
        let mut failed = Vec::new();
        for (noun, sink) in self.sinks {
            match sink {
                NounSink::Open {
                    path, mut writer, ..
                } => {
                    if let Err(e) = writer.flush() {
                        error!("{noun}: flush of {} failed: {e}", path.display());
                        drop(writer);
                        discard(&path);
                        failed.push(noun);
                    }
                }
                NounSink::Failed => {
                    discard(&self.layout.unlabelled(&noun));
                    failed.push(noun);
                }
            }
        }
        failed
    }
}

fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!("removed incomplete {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!("cannot remove incomplete {}: {e}", path.display()),
    }
}

fn open_sink(layout: &OutputLayout, noun: &str) -> io::Result<NounSink> {
    let path = layout.unlabelled(noun);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let bytes = file.metadata()?.len();
    debug!("{noun}: writing samples to {}", path.display());
    Ok(NounSink::Open {
        path,
        writer: BufWriter::new(file),
        bytes,
    })
}

/// Streams tagged sentences into per-noun unlabelled sample files.
pub struct Extractor<'a> {
    inventory: &'a SenseInventory,
    focus: HashSet<String>,
    config: WindowConfig,
    sinks: NounSinks,
    report: ExtractionReport,
}

impl<'a> Extractor<'a> {
    /// `focus` holds canonical nouns; occurrences of any other noun are ignored.
    pub fn new(
        inventory: &'a SenseInventory,
        focus: impl IntoIterator<Item = String>,
        config: WindowConfig,
        layout: OutputLayout,
    ) -> Self {
        Self {
            inventory,
            focus: focus.into_iter().collect(),
            config,
            sinks: NounSinks::new(layout),
            report: ExtractionReport::default(),
        }
    }

    pub fn report(&self) -> &ExtractionReport {
        &self.report
    }

    /// Extract from one input file. Unreadable files are skipped.
    pub fn process_file(&mut self, tagger: &dyn Tagger, path: &Path) {
        match fs::read_to_string(path) {
            Ok(text) => self.process_document(tagger, &path.display().to_string(), &text),
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                self.report.failed_documents += 1;
            }
        }
    }

    /// Tag one document and extract from every sentence. A tagging failure
    /// skips the document.
    pub fn process_document(&mut self, tagger: &dyn Tagger, name: &str, text: &str) {
        let sentences = match tagger.tag(text) {
            Ok(sentences) => sentences,
            Err(e) => {
                warn!("skipping {name}: {e:#}");
                self.report.failed_documents += 1;
                return;
            }
        };
        info!("{name}: {} sentences", sentences.len());
        for sentence in &sentences {
            self.process_sentence(sentence);
        }
        self.report.documents += 1;
    }

    pub fn process_sentence(&mut self, sentence: &Sentence) {
        self.report.sentences += 1;
        if self.report.sentences % PROGRESS_EVERY == 0 {
            info!(
                "processed {} sentences, {} samples",
                self.report.sentences,
                self.report.total_samples()
            );
        }

        let tokens = &sentence.tokens;
        for (i, tagged) in tokens.iter().enumerate() {
            if !tagged.tag.is_common_noun() {
                continue;
            }
            let Some(noun) = self.inventory.canonical(tagged.text()) else {
                continue;
            };
            if !self.focus.contains(noun) || self.sinks.is_failed(noun) {
                continue;
            }

            let (left, right) = window_bounds(tokens, i, self.config.window_size);
            if right - left < self.config.min_valid_size {
                continue;
            }
            let words = collect_window(tokens, left, right);
            if words.len() < self.config.min_valid_size {
                continue;
            }
            let cap = self.config.max_bytes_per_noun;
            if cap > 0 && self.sinks.bytes(noun) >= cap {
                continue;
            }

            let noun = noun.to_string();
            if self.sinks.append(&noun, &words.join(",")) {
                *self.report.samples.entry(noun).or_default() += 1;
            } else {
                self.report.failed_nouns.insert(noun);
            }
        }
    }

    /// Flush every noun file and return the run's counters. Nouns that
    /// failed keep no file and report no samples.
    pub fn finish(mut self) -> ExtractionReport {
        for noun in self.sinks.close() {
            self.report.samples.remove(&noun);
            self.report.failed_nouns.insert(noun);
        }
        self.report
    }
}
