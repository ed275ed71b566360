//! Sense-set bootstrapping, scoring and labelled output.
//!
//! Each sense starts with its lexicon seed words. A pass scores every
//! sample; samples with a unique winning sense donate their unclaimed words
//! to that sense's candidate pool. Words landing in more than one pool in
//! the same pass are discarded, the rest are merged. Passes repeat until one
//! merges nothing (or the iteration bound is hit), after which every sample
//! is labelled with its winning sense.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};
use wsd_lexicon::SenseEntry;

use crate::corpus::Sample;
use crate::error::PipelineError;
use crate::frequency::percent;

/// Result of scoring one sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// Exactly one sense has the highest count.
    Winner(usize),
    /// Every sense scored zero.
    NoEvidence,
    /// Two or more senses share the highest, non-zero count.
    Tie,
}

impl Verdict {
    pub fn winner(self) -> Option<usize> {
        match self {
            Verdict::Winner(idx) => Some(idx),
            Verdict::NoEvidence | Verdict::Tie => None,
        }
    }
}

/// Count, per sense, how many of `words` belong to that sense's set.
/// The focus noun and its plural never count.
pub fn score<'w>(
    words: impl IntoIterator<Item = &'w str>,
    senses: &[BTreeSet<String>],
    noun: &str,
    plural: Option<&str>,
) -> Vec<usize> {
    let mut counts = vec![0usize; senses.len()];
    for word in words {
        if word == noun || plural == Some(word) {
            continue;
        }
        for (count, set) in counts.iter_mut().zip(senses) {
            if set.contains(word) {
                *count += 1;
            }
        }
    }
    counts
}

/// Pick the sense whose count strictly exceeds every other.
pub fn best_index(counts: &[usize]) -> Verdict {
    let Some(&best) = counts.iter().max() else {
        return Verdict::NoEvidence;
    };
    if best == 0 {
        return Verdict::NoEvidence;
    }
    let mut leaders = counts.iter().enumerate().filter(|&(_, &c)| c == best);
    match (leaders.next(), leaders.next()) {
        (Some((idx, _)), None) => Verdict::Winner(idx),
        _ => Verdict::Tie,
    }
}

/// Drop every word that appears in more than one pool.
pub fn filter_duplicates(pools: Vec<BTreeSet<String>>) -> Vec<BTreeSet<String>> {
    let mut claims: HashMap<String, usize> = HashMap::new();
    for word in pools.iter().flatten() {
        *claims.entry(word.clone()).or_default() += 1;
    }
    pools
        .into_iter()
        .map(|mut pool| {
            pool.retain(|word| claims.get(word) == Some(&1));
            pool
        })
        .collect()
}

/// Counts over a whole corpus.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScoreReport {
    pub matched: usize,
    pub no_evidence: usize,
    pub tied: usize,
}

impl ScoreReport {
    pub fn total(&self) -> usize {
        self.matched + self.no_evidence + self.tied
    }

    /// Percentage of samples with a unique winner.
    pub fn success_rate(&self) -> f64 {
        percent(self.matched, self.total())
    }

    pub fn tie_rate(&self) -> f64 {
        percent(self.tied, self.total())
    }

    pub fn no_evidence_rate(&self) -> f64 {
        percent(self.no_evidence, self.total())
    }
}

/// One bootstrapping pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PassOutcome {
    /// Per-sense words merged this pass, already de-duplicated.
    pub promoted: Vec<BTreeSet<String>>,
}

impl PassOutcome {
    pub fn merged(&self) -> usize {
        self.promoted.iter().map(BTreeSet::len).sum()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Convergence {
    pub passes: usize,
    pub merged: usize,
    /// False when the iteration bound stopped the loop.
    pub converged: bool,
}

/// How many samples went to each labelled output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LabelCounts {
    pub labelled: usize,
    pub ambiguous: usize,
}

/// Bootstrapping state for one noun. Owns its sense sets; nothing is shared
/// with other nouns or written back to the inventory.
#[derive(Clone, Debug)]
pub struct Bootstrapper {
    noun: String,
    plural: Option<String>,
    labels: Vec<String>,
    seeds: Vec<BTreeSet<String>>,
    senses: Vec<BTreeSet<String>>,
}

impl Bootstrapper {
    pub fn new(entry: &SenseEntry) -> Self {
        let labels = entry
            .senses()
            .iter()
            .map(|s| s.display_name(entry.noun()))
            .collect();
        Self::from_parts(entry.noun(), entry.plural(), labels, entry.context_sets())
    }

    pub fn from_parts(
        noun: &str,
        plural: Option<&str>,
        labels: Vec<String>,
        senses: Vec<BTreeSet<String>>,
    ) -> Self {
        Self {
            noun: noun.to_string(),
            plural: plural.map(str::to_string),
            labels,
            seeds: senses.clone(),
            senses,
        }
    }

    pub fn noun(&self) -> &str {
        &self.noun
    }

    pub fn plural(&self) -> Option<&str> {
        self.plural.as_deref()
    }

    pub fn senses(&self) -> &[BTreeSet<String>] {
        &self.senses
    }

    pub fn seeds(&self) -> &[BTreeSet<String>] {
        &self.seeds
    }

    pub fn verdict(&self, sample: &Sample<'_>) -> Verdict {
        best_index(&score(
            sample.words(),
            &self.senses,
            &self.noun,
            self.plural.as_deref(),
        ))
    }

    fn is_focus(&self, word: &str) -> bool {
        word == self.noun || self.plural.as_deref() == Some(word)
    }

    /// Gather, per winning sense, the words no sense currently claims.
    pub fn collect_candidates(&self, samples: &[Sample<'_>]) -> Vec<BTreeSet<String>> {
        let mut pools = vec![BTreeSet::new(); self.senses.len()];
        for sample in samples {
            let Some(winner) = self.verdict(sample).winner() else {
                continue;
            };
            for word in sample.words() {
                if self.is_focus(word) || self.senses.iter().any(|set| set.contains(word)) {
                    continue;
                }
                pools[winner].insert(word.to_string());
            }
        }
        pools
    }

    /// Collect candidates once and merge the uniquely claimed ones.
    pub fn run_pass(&mut self, samples: &[Sample<'_>]) -> PassOutcome {
        let promoted = filter_duplicates(self.collect_candidates(samples));
        for (set, words) in self.senses.iter_mut().zip(&promoted) {
            set.extend(words.iter().cloned());
        }
        PassOutcome { promoted }
    }

    /// Repeat passes until one merges nothing, at most `max_iterations` times.
    pub fn run_to_fixpoint(&mut self, samples: &[Sample<'_>], max_iterations: usize) -> Convergence {
        let mut merged = 0;
        for pass in 1..=max_iterations {
            let outcome = self.run_pass(samples);
            let added = outcome.merged();
            info!("{}: iteration {} merged {} words", self.noun, pass, added);
            merged += added;
            if added == 0 {
                return Convergence {
                    passes: pass,
                    merged,
                    converged: true,
                };
            }
        }
        warn!(
            "{}: no fixpoint after {} passes, labelling with current sets",
            self.noun, max_iterations
        );
        Convergence {
            passes: max_iterations,
            merged,
            converged: false,
        }
    }

    pub fn report(&self, samples: &[Sample<'_>]) -> ScoreReport {
        let mut report = ScoreReport::default();
        for sample in samples {
            match self.verdict(sample) {
                Verdict::Winner(_) => report.matched += 1,
                Verdict::NoEvidence => report.no_evidence += 1,
                Verdict::Tie => report.tied += 1,
            }
        }
        report
    }

    /// Comment block written at the head of the labelled file.
    pub fn render_report(&self, report: &ScoreReport) -> String {
        let rule = "=".repeat(72);
        let noun = &self.noun;
        let mut out = String::new();
        let _ = writeln!(out, "// {noun}:{rule}");
        let _ = writeln!(
            out,
            "// {noun}:matched:{}, no evidence:{}, ambiguous:{}",
            report.matched, report.no_evidence, report.tied
        );
        let _ = writeln!(out, "// {noun}:matched rate  :{:.2}", report.success_rate());
        let _ = writeln!(out, "// {noun}:non match rate:{:.2}", report.tie_rate());
        let _ = writeln!(out, "// {noun}:no evidence   :{:.2}", report.no_evidence_rate());
        let _ = writeln!(out, "// syns");
        for (idx, set) in self.seeds.iter().enumerate() {
            let _ = writeln!(out, "// {idx} {}: {}", self.label(idx), join_set(set));
        }
        for (idx, set) in self.senses.iter().enumerate() {
            let _ = writeln!(out, "// new {idx} {}: {}", self.label(idx), join_set(set));
        }
        let _ = writeln!(out, "// {noun}:{rule}");
        out
    }

    /// Log the headline numbers of a report.
    pub fn log_report(&self, stage: &str, report: &ScoreReport) {
        info!(
            "{}: {} matched {}, no evidence {}, ambiguous {} (matched rate {:.2}%, non match rate {:.2}%)",
            self.noun,
            stage,
            report.matched,
            report.no_evidence,
            report.tied,
            report.success_rate(),
            report.tie_rate()
        );
    }

    fn label(&self, idx: usize) -> &str {
        self.labels.get(idx).map(String::as_str).unwrap_or("?")
    }

    /// Write `<sense>|<words>` lines for every sample with a unique winner,
    /// preceded by `header`. Other samples go to `ambiguous` when given.
    pub fn write_labelled(
        &self,
        samples: &[Sample<'_>],
        header: &str,
        labelled: &Path,
        ambiguous: Option<&Path>,
    ) -> Result<LabelCounts, PipelineError> {
        let mut out = create_writer(labelled)?;
        let mut amb = ambiguous.map(create_writer).transpose()?;
        let mut counts = LabelCounts::default();

        out.write_all(header.as_bytes())
            .map_err(|e| PipelineError::output(labelled, e))?;
        for sample in samples {
            match self.verdict(sample).winner() {
                Some(idx) => {
                    writeln!(out, "{idx}|{}", sample.joined())
                        .map_err(|e| PipelineError::output(labelled, e))?;
                    counts.labelled += 1;
                }
                None => {
                    if let (Some(writer), Some(path)) = (amb.as_mut(), ambiguous) {
                        writeln!(writer, "{}", sample.joined())
                            .map_err(|e| PipelineError::output(path, e))?;
                        counts.ambiguous += 1;
                    }
                }
            }
        }

        out.flush().map_err(|e| PipelineError::output(labelled, e))?;
        if let (Some(mut writer), Some(path)) = (amb, ambiguous) {
            writer.flush().map_err(|e| PipelineError::output(path, e))?;
        }
        Ok(counts)
    }
}

pub(crate) fn create_writer(path: &Path) -> Result<BufWriter<File>, PipelineError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| PipelineError::output(dir, e))?;
    }
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| PipelineError::output(path, e))
}

fn join_set(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn bank() -> Bootstrapper {
        Bootstrapper::from_parts(
            "bank",
            Some("banks"),
            vec!["bank (river)".into(), "bank (finance)".into()],
            vec![
                set(&["river", "shore", "water", "stream"]),
                set(&["finance", "money", "loan", "account"]),
            ],
        )
    }

    fn samples(lines: &[&'static str]) -> Vec<Sample<'static>> {
        lines.iter().map(|&l| Sample::parse(l)).collect()
    }

    #[test]
    fn best_index_rules() {
        assert_eq!(best_index(&[]), Verdict::NoEvidence);
        assert_eq!(best_index(&[0, 0]), Verdict::NoEvidence);
        assert_eq!(best_index(&[0]), Verdict::NoEvidence);
        assert_eq!(best_index(&[3, 3]), Verdict::Tie);
        assert_eq!(best_index(&[0, 2, 0]), Verdict::Winner(1));
        assert_eq!(best_index(&[2, 1]), Verdict::Winner(0));
        assert_eq!(best_index(&[1, 3, 3]), Verdict::Tie);
    }

    #[test]
    fn empty_sample_has_no_winner() {
        let boot = bank();
        assert_eq!(boot.verdict(&Sample::parse("")), Verdict::NoEvidence);
    }

    #[test]
    fn scores_the_bank_scenario() {
        let boot = bank();
        assert_eq!(boot.verdict(&Sample::parse("shore,water,fish")), Verdict::Winner(0));
        assert_eq!(boot.verdict(&Sample::parse("money,loan,water")), Verdict::Winner(1));
        assert_eq!(boot.verdict(&Sample::parse("water,money")), Verdict::Tie);
    }

    #[test]
    fn focus_forms_never_score() {
        let senses = vec![set(&["bank", "river"]), set(&["money"])];
        let counts = score(["bank", "banks", "river"], &senses, "bank", Some("banks"));
        assert_eq!(counts, vec![1, 0]);
    }

    #[test]
    fn filter_duplicates_removes_shared_words() {
        let pools = vec![set(&["fish", "boat", "cash"]), set(&["cash", "teller"]), set(&["boat"])];
        let filtered = filter_duplicates(pools);
        assert_eq!(filtered, vec![set(&["fish"]), set(&["teller"]), set(&[])]);
    }

    #[test]
    fn candidates_are_unclaimed_words_of_winning_samples() {
        let boot = bank();
        let corpus = samples(&["shore,water,fish,bank", "money,teller", "water,money,boat"]);
        let pools = boot.collect_candidates(&corpus);
        assert_eq!(pools, vec![set(&["fish"]), set(&["teller"])]);
    }

    #[test]
    fn pass_never_promotes_a_word_into_two_senses() {
        let mut boot = bank();
        let corpus = samples(&["shore,water,boat", "money,loan,boat", "river,fish"]);
        let outcome = boot.run_pass(&corpus);
        assert_eq!(outcome.promoted, vec![set(&["fish"]), set(&[])]);
        for (i, a) in outcome.promoted.iter().enumerate() {
            for b in outcome.promoted.iter().skip(i + 1) {
                assert!(a.is_disjoint(b));
            }
        }
        assert!(!boot.senses()[0].contains("boat"));
        assert!(!boot.senses()[1].contains("boat"));
    }

    #[test]
    fn fixpoint_grows_monotonically_and_is_stable() {
        let mut boot = bank();
        let corpus = samples(&[
            "shore,water,fish",
            "fish,rod,bait",
            "rod,reel",
            "money,loan,teller",
            "teller,queue",
            "water,money",
        ]);
        let before: Vec<usize> = boot.senses().iter().map(BTreeSet::len).collect();
        let convergence = boot.run_to_fixpoint(&corpus, 50);
        assert!(convergence.converged);
        assert!(convergence.passes >= 2);
        for (set, size) in boot.senses().iter().zip(before) {
            assert!(set.len() >= size);
        }
        assert!(boot.senses()[0].contains("reel"));
        assert!(boot.senses()[1].contains("queue"));
        assert_eq!(boot.run_pass(&corpus).merged(), 0);
        // seeds stay untouched
        assert!(!boot.seeds()[0].contains("fish"));
    }

    #[test]
    fn iteration_bound_stops_the_loop() {
        let mut boot = bank();
        let corpus = samples(&["shore,water,fish", "fish,rod", "rod,reel"]);
        let convergence = boot.run_to_fixpoint(&corpus, 1);
        assert!(!convergence.converged);
        assert_eq!(convergence.passes, 1);
    }

    #[test]
    fn report_separates_silence_from_ties() {
        let boot = bank();
        let corpus = samples(&["shore,water,fish", "water,money", "pebble,cloud", "loan"]);
        let report = boot.report(&corpus);
        assert_eq!(
            report,
            ScoreReport {
                matched: 2,
                no_evidence: 1,
                tied: 1
            }
        );
        assert_eq!(report.success_rate(), 50.0);
        assert_eq!(report.tie_rate(), 25.0);
    }

    #[test]
    fn rendered_report_lists_seed_and_final_sets() {
        let mut boot = bank();
        let corpus = samples(&["shore,water,fish"]);
        boot.run_to_fixpoint(&corpus, 10);
        let text = boot.render_report(&boot.report(&corpus));
        assert!(text.lines().all(|l| l.starts_with("//")));
        assert!(text.contains("// 0 bank (river): river,shore,stream,water"));
        assert!(text.contains("// new 0 bank (river): fish,river,shore,stream,water"));
        assert!(text.contains("bank:matched:1, no evidence:0, ambiguous:0"));
    }

    #[test]
    fn writes_labelled_and_ambiguous_lines() {
        let dir = tempfile::tempdir().unwrap();
        let labelled = dir.path().join("labelled").join("bank-labelled-trainingset.csv");
        let ambiguous = dir.path().join("labelled").join("bank-ambiguous-trainingset.csv");
        let boot = bank();
        let corpus = samples(&["shore,water,fish", "water,money", "money,loan,water"]);

        let counts = boot
            .write_labelled(&corpus, "// header\n", &labelled, Some(&ambiguous))
            .unwrap();
        assert_eq!(counts, LabelCounts { labelled: 2, ambiguous: 1 });
        assert_eq!(
            fs::read_to_string(&labelled).unwrap(),
            "// header\n0|shore,water,fish\n1|money,loan,water\n"
        );
        assert_eq!(fs::read_to_string(&ambiguous).unwrap(), "water,money\n");
    }

    #[test]
    fn ambiguous_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let labelled = dir.path().join("out.csv");
        let boot = bank();
        let corpus = samples(&["water,money"]);
        let counts = boot.write_labelled(&corpus, "", &labelled, None).unwrap();
        assert_eq!(counts, LabelCounts::default());
        assert_eq!(fs::read_to_string(&labelled).unwrap(), "");
    }
}
