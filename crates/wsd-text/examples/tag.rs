use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wsd_text::{RuleTagger, SlashTagger, Tagger, is_undesirable};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p wsd-text --example tag -- <file> [--slash]")?;
    let slash = match args.next().as_deref() {
        None => false,
        Some("--slash") => true,
        Some(other) => bail!("unexpected argument {other:?}"),
    };

    let text =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let tagger: Box<dyn Tagger> = if slash {
        Box::new(SlashTagger)
    } else {
        Box::new(RuleTagger)
    };
    let sentences = tagger.tag(&text)?;

    println!("File: {}", path.display());
    println!("Sentences: {}", sentences.len());
    for (idx, sentence) in sentences.iter().enumerate().take(20) {
        let rendered: Vec<String> = sentence
            .tokens
            .iter()
            .map(|t| {
                let mark = if is_undesirable(&t.text().to_lowercase()) {
                    "~"
                } else {
                    ""
                };
                format!("{mark}{}/{}", t.text(), t.tag)
            })
            .collect();
        println!("{:>3}: {}", idx + 1, rendered.join(" "));
    }

    Ok(())
}
