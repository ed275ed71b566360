//! Read-only view of a noun's unlabelled samples.
//!
//! Bootstrapping walks the same corpus once per pass, so the file is loaded
//! once (memory-mapped or read into a buffer) and samples borrow their words
//! from that backing storage.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use memmap2::Mmap;

/// Strategy for loading corpus files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Ok(LoadMode::Mmap),
            "owned" => Ok(LoadMode::Owned),
            other => Err(format!("unknown load mode {other:?}")),
        }
    }
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// One comma-joined window, split into case-folded words.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sample<'a> {
    words: Vec<Cow<'a, str>>,
}

impl<'a> Sample<'a> {
    /// Parse one corpus line. Empty fields are dropped.
    pub fn parse(line: &'a str) -> Self {
        let words = line
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| {
                if w.chars().any(char::is_uppercase) {
                    Cow::Owned(w.to_lowercase())
                } else {
                    Cow::Borrowed(w)
                }
            })
            .collect();
        Self { words }
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(|w| w.as_ref())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words re-joined with commas, as written to labelled output.
    pub fn joined(&self) -> String {
        self.words.join(",")
    }
}

pub struct Corpus {
    buffer: Buffer,
}

impl Corpus {
    pub fn open(path: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?
            .len();

        // Zero-length maps are rejected on some platforms.
        let buffer = if mode == LoadMode::Mmap && len > 0 {
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))?
        } else {
            let mut buf = Vec::with_capacity(len as usize);
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Buffer::Owned(buf)
        };
        Ok(Self { buffer })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            buffer: Buffer::Owned(text.into().into_bytes()),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.buffer.as_slice().len()
    }

    /// Every non-empty line as a sample, in file order.
    pub fn samples(&self) -> io::Result<Vec<Sample<'_>>> {
        let text = std::str::from_utf8(self.buffer.as_slice())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(text
            .lines()
            .map(Sample::parse)
            .filter(|s| !s.is_empty())
            .collect())
    }
}
