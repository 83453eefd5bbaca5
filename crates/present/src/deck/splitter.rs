use std::sync::LazyLock;

use regex::Regex;

use super::fence::Fence;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[ \t]+(.*?))?[ \t]*$").expect("valid title regex"));
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{2,3})(?:[ \t]+(.*?))?[ \t]*$").expect("valid section regex"));

/// A line of source text together with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// A blank-line-separated block between the title and the first section.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaBlock {
    pub lines: Vec<Line>,
    /// Whether a blank line separates this block from whatever precedes it.
    pub after_blank: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub level: u8,
    pub title: String,
    pub lines: Vec<Line>,
}

/// The structural skeleton of a deck, before header interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub title: Option<Line>,
    pub meta: Vec<MetaBlock>,
    pub sections: Vec<RawSection>,
}

/// Split a deck source into its title line, metadata blocks and sections.
///
/// `##` and `###` headings start sections; deeper headings stay in the body.
/// Lines inside fenced code blocks are never treated as headings. Anything
/// before the title line is skipped.
pub fn split(source: &str) -> Outline {
    let source = source.replace("\r\n", "\n");
    let mut outline = Outline::default();
    let mut fence = Fence::default();
    let mut pending_blank = false;

    for (i, text) in source.split('\n').enumerate() {
        let line = Line {
            number: i + 1,
            text: text.to_string(),
        };

        if fence.update(text) {
            push_body(&mut outline, line, &mut pending_blank);
            continue;
        }

        if outline.title.is_none() {
            if TITLE_RE.is_match(text) {
                outline.title = Some(line);
                pending_blank = false;
            }
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(text) {
            outline.sections.push(RawSection {
                level: caps[1].len() as u8,
                title: caps.get(2).map_or("", |m| m.as_str()).to_string(),
                lines: Vec::new(),
            });
            continue;
        }

        if text.trim().is_empty() {
            pending_blank = true;
            if let Some(section) = outline.sections.last_mut() {
                section.lines.push(line);
            }
            continue;
        }

        push_body(&mut outline, line, &mut pending_blank);
    }

    for section in &mut outline.sections {
        trim_blank_lines(&mut section.lines);
    }

    outline
}

fn push_body(outline: &mut Outline, line: Line, pending_blank: &mut bool) {
    if let Some(section) = outline.sections.last_mut() {
        section.lines.push(line);
    } else if outline.title.is_some() {
        match outline.meta.last_mut() {
            Some(block) if !*pending_blank => block.lines.push(line),
            _ => outline.meta.push(MetaBlock {
                lines: vec![line],
                after_blank: *pending_blank,
            }),
        }
    }
    *pending_blank = false;
}

fn trim_blank_lines(lines: &mut Vec<Line>) {
    while lines.last().is_some_and(|l| l.text.trim().is_empty()) {
        lines.pop();
    }
    let leading = lines
        .iter()
        .take_while(|l| l.text.trim().is_empty())
        .count();
    lines.drain(..leading);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_title_and_sections() {
        let outline = split("# Deck\n\n## One\n\nBody one\n\n### Two\n\nBody two\n");
        assert_eq!(outline.title.as_ref().map(|l| l.number), Some(1));
        assert_eq!(outline.sections.len(), 2);
        assert_eq!(outline.sections[0].level, 2);
        assert_eq!(outline.sections[0].title, "One");
        assert_eq!(texts(&outline.sections[0].lines), vec!["Body one"]);
        assert_eq!(outline.sections[1].level, 3);
        assert_eq!(texts(&outline.sections[1].lines), vec!["Body two"]);
    }

    #[test]
    fn test_meta_blocks() {
        let outline = split("# Deck\nSubtitle\nTags: a, b\n\nJane Doe\n<jane@example.com>\n\nJohn\n\n## First\n");
        assert_eq!(outline.meta.len(), 3);
        assert!(!outline.meta[0].after_blank);
        assert_eq!(texts(&outline.meta[0].lines), vec!["Subtitle", "Tags: a, b"]);
        assert!(outline.meta[1].after_blank);
        assert_eq!(
            texts(&outline.meta[1].lines),
            vec!["Jane Doe", "<jane@example.com>"]
        );
        assert_eq!(texts(&outline.meta[2].lines), vec!["John"]);
        assert_eq!(outline.sections.len(), 1);
    }

    #[test]
    fn test_deep_headings_stay_in_body() {
        let outline = split("# Deck\n\n## Slide\n\n#### Detail\n\ntext");
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(
            texts(&outline.sections[0].lines),
            vec!["#### Detail", "", "text"]
        );
    }

    #[test]
    fn test_heading_in_code_block_no_split() {
        let outline = split("# Deck\n\n## Code\n\n```sh\n## not a slide\n```\n");
        assert_eq!(outline.sections.len(), 1);
        assert_eq!(
            texts(&outline.sections[0].lines),
            vec!["```sh", "## not a slide", "```"]
        );
    }

    #[test]
    fn test_empty_section() {
        let outline = split("# Deck\n\n## Only a title\n\n## Next\n\nbody");
        assert_eq!(outline.sections.len(), 2);
        assert!(outline.sections[0].lines.is_empty());
    }

    #[test]
    fn test_text_before_title_is_skipped() {
        let outline = split("stray\n\n# Deck\n## One");
        assert_eq!(outline.title.map(|l| l.number), Some(3));
        assert!(outline.meta.is_empty());
    }

    #[test]
    fn test_no_title() {
        let outline = split("## One\n\ntext");
        assert!(outline.title.is_none());
        assert!(outline.sections.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let outline = split("# Deck\r\nSub\r\n\r\n## One\r\nBody\r\n");
        assert_eq!(texts(&outline.meta[0].lines), vec!["Sub"]);
        assert_eq!(texts(&outline.sections[0].lines), vec!["Body"]);
    }
}
