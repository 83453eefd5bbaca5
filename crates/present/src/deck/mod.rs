pub mod fence;
pub mod inline;
pub mod splitter;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use splitter::{Line, MetaBlock, RawSection};

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no title found; a deck starts with a `# Title` line")]
    MissingTitle,

    #[error("line {line}: unexpected header line: {text:?}")]
    UnexpectedHeaderLine { line: usize, text: String },

    #[error("line {line}: unexpected {kind} before the first slide")]
    UnexpectedMetadata { line: usize, kind: &'static str },
}

#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub title: String,
    pub subtitle: Option<String>,
    /// Date from the header, interpreted as UTC.
    pub time: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub authors: Vec<Author>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub lines: Vec<String>,
}

impl Author {
    /// Lines shown on the title slide. Links like `<me@example.com>` are left out.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| !(l.starts_with('<') && l.ends_with('>')))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Heading level, 2 or 3.
    pub level: u8,
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// One slide as shown on screen.
#[derive(Debug, Clone, Copy)]
pub enum Slide<'a> {
    Title(&'a Deck),
    Section(&'a Section),
}

impl Deck {
    /// The title slide plus one slide per section.
    pub fn slide_count(&self) -> usize {
        self.sections.len() + 1
    }

    pub fn slide(&self, index: usize) -> Option<Slide<'_>> {
        match index {
            0 => Some(Slide::Title(self)),
            i => self.sections.get(i - 1).map(Slide::Section),
        }
    }
}

pub fn load(path: &Path) -> Result<Deck, DeckError> {
    let content = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

pub fn parse(source: &str) -> Result<Deck, DeckError> {
    let outline = splitter::split(source);
    let title_line = outline.title.ok_or(DeckError::MissingTitle)?;

    let mut deck = Deck {
        title: title_text(&title_line.text),
        ..Default::default()
    };

    for block in &outline.meta {
        check_metadata_block(block)?;
        if block.after_blank {
            deck.authors.push(Author {
                lines: block.lines.iter().map(|l| l.text.trim().to_string()).collect(),
            });
        } else {
            parse_header(&mut deck, &block.lines)?;
        }
    }

    deck.sections = outline.sections.into_iter().map(build_section).collect();
    Ok(deck)
}

fn title_text(line: &str) -> String {
    line.trim().trim_start_matches('#').trim().to_string()
}

fn build_section(raw: RawSection) -> Section {
    let body = raw
        .lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Section {
        level: raw.level,
        title: raw.title,
        body,
    }
}

fn check_metadata_block(block: &MetaBlock) -> Result<(), DeckError> {
    let Some(first) = block.lines.first() else {
        return Ok(());
    };
    let trimmed = first.text.trim_start();
    let kind = if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
        "code block"
    } else if trimmed.starts_with('#') {
        "heading"
    } else if trimmed.starts_with('>') {
        "block quote"
    } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ") {
        "list"
    } else {
        return Ok(());
    };
    Err(DeckError::UnexpectedMetadata {
        line: first.number,
        kind,
    })
}

fn parse_header(deck: &mut Deck, lines: &[Line]) -> Result<(), DeckError> {
    for line in lines {
        let text = line.text.trim();
        if let Some(tags) = text.strip_prefix("Tags:") {
            deck.tags = tags.split(',').map(|t| t.trim().to_string()).collect();
        } else if let Some(summary) = text.strip_prefix("Summary:") {
            deck.summary = Some(summary.trim().to_string());
        } else if let Some(time) = parse_time(text) {
            deck.time = Some(time);
        } else if deck.subtitle.is_none() {
            deck.subtitle = Some(text.to_string());
        } else {
            return Err(DeckError::UnexpectedHeaderLine {
                line: line.number,
                text: text.to_string(),
            });
        }
    }
    Ok(())
}

/// Accepts `15:04 2 Jan 2006` or `2 Jan 2006`. A bare date means 11:00 UTC,
/// which falls on the same calendar day everywhere.
pub fn parse_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = NaiveDateTime::parse_from_str(text, "%H:%M %d %b %Y") {
        return Some(t);
    }
    NaiveDate::parse_from_str(text, "%d %b %Y")
        .ok()
        .and_then(|d| d.and_hms_opt(11, 0, 0))
}
