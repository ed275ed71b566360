//! The two batch stages: extraction over an input directory, then
//! bootstrapping and labelling per focus noun.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use tracing::{error, info, warn};
use wsd_lexicon::{SenseEntry, SenseInventory};
use wsd_text::Tagger;

use crate::bootstrap::{Bootstrapper, Convergence, LabelCounts, ScoreReport, create_writer};
use crate::config::Settings;
use crate::corpus::Corpus;
use crate::error::PipelineError;
use crate::extract::{ExtractionReport, Extractor, WindowConfig};
use crate::frequency::{Coverage, rank_words, top_words};
use crate::layout::OutputLayout;

/// Resolve requested words to canonical lexicon nouns, in request order
/// without repeats. No request means every noun.
pub fn select_focus(
    inventory: &SenseInventory,
    requested: &[String],
) -> Result<Vec<String>, PipelineError> {
    if requested.is_empty() {
        return Ok(inventory.nouns().map(str::to_string).collect());
    }
    let mut seen = HashSet::new();
    let mut focus = Vec::new();
    for word in requested {
        let noun = inventory
            .canonical(word)
            .ok_or_else(|| PipelineError::UnknownFocusWord(word.clone()))?;
        if seen.insert(noun) {
            focus.push(noun.to_string());
        }
    }
    Ok(focus)
}

/// Input documents in file-name order.
fn input_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::read(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| PipelineError::read(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Extract windows for every focus noun that has no unlabelled file yet.
pub fn extract_corpus(
    input_dir: &Path,
    layout: &OutputLayout,
    inventory: &SenseInventory,
    focus: &[String],
    settings: &Settings,
    tagger: &dyn Tagger,
) -> Result<ExtractionReport, PipelineError> {
    let pending: Vec<String> = focus
        .iter()
        .filter(|noun| {
            let done = layout.unlabelled(noun).exists();
            if done {
                info!("{noun}: unlabelled samples already present, skipping extraction");
            }
            !done
        })
        .cloned()
        .collect();
    if pending.is_empty() {
        info!("nothing to extract");
        return Ok(ExtractionReport::default());
    }

    let files = input_files(input_dir)?;
    info!(
        "extracting {} nouns from {} documents in {}",
        pending.len(),
        files.len(),
        input_dir.display()
    );

    let start = Instant::now();
    let mut extractor = Extractor::new(
        inventory,
        pending,
        WindowConfig::from_settings(settings),
        layout.clone(),
    );
    for path in &files {
        extractor.process_file(tagger, path);
    }
    let report = extractor.finish();
    info!(
        "extraction done in {} ms: {} documents ({} failed), {} sentences, {} samples",
        start.elapsed().as_millis(),
        report.documents,
        report.failed_documents,
        report.sentences,
        report.total_samples()
    );
    Ok(report)
}

/// Numbers for one noun that reached labelling.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSummary {
    pub initial: ScoreReport,
    pub last: ScoreReport,
    pub convergence: Convergence,
    pub counts: LabelCounts,
    /// Success rate fell below the threshold, so ambiguous samples and
    /// failure frequencies were written.
    pub below_threshold: bool,
}

#[derive(Debug)]
pub enum NounOutcome {
    Labelled(LabelSummary),
    /// A labelled file from an earlier run exists.
    AlreadyLabelled,
    /// Unlabelled file missing or without samples.
    NoCorpus,
    Failed(PipelineError),
}

#[derive(Debug)]
pub struct NounReport {
    pub noun: String,
    pub outcome: NounOutcome,
}

/// Bootstrap and label every focus noun. Failures are confined to their noun.
pub fn bootstrap_nouns(
    layout: &OutputLayout,
    inventory: &SenseInventory,
    focus: &[String],
    settings: &Settings,
) -> Vec<NounReport> {
    let mut reports = Vec::with_capacity(focus.len());
    for noun in focus {
        let Some(entry) = inventory.get(noun) else {
            warn!("{noun}: not in lexicon, skipping");
            continue;
        };
        let outcome = match bootstrap_noun(layout, entry, settings) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{noun}: {e}");
                // a half-written labelled file would make the next run skip this noun
                let _ = fs::remove_file(layout.labelled(entry.noun()));
                NounOutcome::Failed(e)
            }
        };
        reports.push(NounReport {
            noun: entry.noun().to_string(),
            outcome,
        });
    }
    reports
}

fn bootstrap_noun(
    layout: &OutputLayout,
    entry: &SenseEntry,
    settings: &Settings,
) -> Result<NounOutcome, PipelineError> {
    let noun = entry.noun();
    let labelled = layout.labelled(noun);
    if labelled.exists() {
        info!("{noun}: already labelled at {}, skipping", labelled.display());
        return Ok(NounOutcome::AlreadyLabelled);
    }
    let unlabelled = layout.unlabelled(noun);
    if !unlabelled.exists() {
        info!("{noun}: no unlabelled samples, skipping");
        return Ok(NounOutcome::NoCorpus);
    }

    let corpus = Corpus::open(&unlabelled, settings.load_mode).map_err(PipelineError::Corpus)?;
    let samples = corpus
        .samples()
        .with_context(|| format!("decode {}", unlabelled.display()))
        .map_err(PipelineError::Corpus)?;
    if samples.is_empty() {
        info!("{noun}: no unlabelled samples, skipping");
        return Ok(NounOutcome::NoCorpus);
    }
    info!(
        "{noun}: {} samples ({} bytes, {:?})",
        samples.len(),
        corpus.byte_len(),
        settings.load_mode
    );

    let top = rank_words(
        samples.iter().flat_map(|s| s.words()),
        noun,
        entry.plural(),
        settings.collector_count,
    );
    let vocabulary: HashSet<&str> = top.iter().map(|f| f.word.as_str()).collect();
    let coverage = Coverage::measure(&samples, &vocabulary, noun, entry.plural());
    info!(
        "{noun}: top {} words cover {} samples ({:.2}%), miss {} ({:.2}%)",
        top.len(),
        coverage.hits,
        coverage.hit_rate(),
        coverage.misses,
        coverage.miss_rate()
    );

    let mut boot = Bootstrapper::new(entry);
    let initial = boot.report(&samples);
    boot.log_report("initial", &initial);

    let convergence = boot.run_to_fixpoint(&samples, settings.max_iterations);
    let last = boot.report(&samples);
    let header = boot.render_report(&last);
    info!("{noun}: report\n{}", header.trim_end());

    let below_threshold = last.success_rate() < settings.fail_threshold;
    let ambiguous = layout.ambiguous(noun);
    let counts = boot.write_labelled(
        &samples,
        &header,
        &labelled,
        below_threshold.then_some(ambiguous.as_path()),
    )?;
    info!(
        "{noun}: wrote {} labelled samples to {}",
        counts.labelled,
        labelled.display()
    );

    if below_threshold {
        warn!(
            "{noun}: success rate {:.2}% below threshold {:.2}%, {} ambiguous samples",
            last.success_rate(),
            settings.fail_threshold,
            counts.ambiguous
        );
        write_fail_frequencies(layout, entry, &ambiguous, settings.collector_count)?;
    }

    Ok(NounOutcome::Labelled(LabelSummary {
        initial,
        last,
        convergence,
        counts,
        below_threshold,
    }))
}

fn write_fail_frequencies(
    layout: &OutputLayout,
    entry: &SenseEntry,
    ambiguous: &Path,
    limit: usize,
) -> Result<(), PipelineError> {
    let ranked =
        top_words(ambiguous, entry.noun(), entry.plural(), limit).map_err(PipelineError::Corpus)?;
    let path = layout.fail_frequencies(entry.noun());
    let mut out = create_writer(&path)?;
    for freq in &ranked {
        writeln!(out, "{}", freq.word).map_err(|e| PipelineError::output(&path, e))?;
    }
    out.flush().map_err(|e| PipelineError::output(&path, e))?;
    info!(
        "{}: wrote {} failure frequencies to {}",
        entry.noun(),
        ranked.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> SenseInventory {
        SenseInventory::parse(
            "bank|banks,river,shore,water,stream\nbank,finance,money,loan,account\nbass,fish,lake\n",
        )
        .unwrap()
    }

    #[test]
    fn focus_defaults_to_every_noun() {
        let inv = inventory();
        assert_eq!(select_focus(&inv, &[]).unwrap(), vec!["bank", "bass"]);
    }

    #[test]
    fn focus_canonicalizes_and_dedups() {
        let inv = inventory();
        let requested = vec!["Banks".to_string(), "bass".to_string(), "bank".to_string()];
        assert_eq!(select_focus(&inv, &requested).unwrap(), vec!["bank", "bass"]);
    }

    #[test]
    fn unknown_focus_word_is_fatal() {
        let inv = inventory();
        let err = select_focus(&inv, &["bank".to_string(), "trout".to_string()]).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownFocusWord(ref w) if w == "trout"));
    }

    #[test]
    fn input_files_are_sorted_text_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::create_dir(dir.path().join("c.txt")).unwrap();
        let names: Vec<_> = input_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn missing_input_dir_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("corpus");
        let err = input_files(&missing).unwrap_err();
        assert!(matches!(err, PipelineError::Read { ref path, .. } if *path == missing));
        assert!(err.to_string().contains("corpus"));
    }

    #[test]
    fn missing_or_empty_corpus_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        fs::create_dir_all(layout.unlabelled_dir()).unwrap();
        fs::write(layout.unlabelled("bass"), "\n").unwrap();
        let inv = inventory();
        let reports = bootstrap_nouns(&layout, &inv, &select_focus(&inv, &[]).unwrap(), &Settings::default());
        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert!(matches!(report.outcome, NounOutcome::NoCorpus), "{report:?}");
        }
        assert!(!layout.labelled_dir().exists());
    }

    #[test]
    fn low_success_writes_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        fs::create_dir_all(layout.unlabelled_dir()).unwrap();
        fs::write(
            layout.unlabelled("bank"),
            "shore,water,fish\nwater,money,pebble\nwater,money,pebble,cloud\n",
        )
        .unwrap();
        let inv = inventory();
        let reports = bootstrap_nouns(&layout, &inv, &["bank".to_string()], &Settings::default());

        let NounOutcome::Labelled(summary) = &reports[0].outcome else {
            panic!("expected labelling, got {:?}", reports[0].outcome);
        };
        assert!(summary.below_threshold);
        assert_eq!(summary.counts, LabelCounts { labelled: 1, ambiguous: 2 });
        assert_eq!(
            fs::read_to_string(layout.ambiguous("bank")).unwrap(),
            "water,money,pebble\nwater,money,pebble,cloud\n"
        );
        let freqs = fs::read_to_string(layout.fail_frequencies("bank")).unwrap();
        assert_eq!(freqs.lines().take(3).collect::<Vec<_>>(), vec!["water", "money", "pebble"]);
    }
}
