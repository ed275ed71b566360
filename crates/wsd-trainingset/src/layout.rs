//! Where each artifact lives under the output root.

use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn unlabelled_dir(&self) -> PathBuf {
        self.root.join("unlabelled")
    }

    pub fn labelled_dir(&self) -> PathBuf {
        self.root.join("labelled")
    }

    /// `<root>/unlabelled/<noun>-trainingset.csv`
    pub fn unlabelled(&self, noun: &str) -> PathBuf {
        self.unlabelled_dir().join(format!("{noun}-trainingset.csv"))
    }

    /// `<root>/labelled/<noun>-labelled-trainingset.csv`
    pub fn labelled(&self, noun: &str) -> PathBuf {
        self.labelled_dir()
            .join(format!("{noun}{LABELLED_SUFFIX}"))
    }

    pub fn ambiguous(&self, noun: &str) -> PathBuf {
        self.labelled_dir()
            .join(format!("{noun}-ambiguous-trainingset.csv"))
    }

    pub fn fail_frequencies(&self, noun: &str) -> PathBuf {
        self.labelled_dir()
            .join(format!("{noun}-fail-frequencies-trainingset.csv"))
    }

    pub fn vocab(&self) -> PathBuf {
        self.root.join("vocab.txt")
    }
}

pub(crate) const LABELLED_SUFFIX: &str = "-labelled-trainingset.csv";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_noun() {
        let layout = OutputLayout::new("/out");
        assert_eq!(
            layout.unlabelled("bank"),
            PathBuf::from("/out/unlabelled/bank-trainingset.csv")
        );
        assert_eq!(
            layout.labelled("bank"),
            PathBuf::from("/out/labelled/bank-labelled-trainingset.csv")
        );
        assert_eq!(
            layout.ambiguous("bank"),
            PathBuf::from("/out/labelled/bank-ambiguous-trainingset.csv")
        );
        assert_eq!(
            layout.fail_frequencies("bank"),
            PathBuf::from("/out/labelled/bank-fail-frequencies-trainingset.csv")
        );
        assert_eq!(layout.vocab(), PathBuf::from("/out/vocab.txt"));
    }
}
