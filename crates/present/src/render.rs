use std::sync::LazyLock;

use eframe::egui::{self, Color32, FontFamily, FontId, Pos2, Stroke};
use regex::Regex;

use crate::deck::fence::Fence;
use crate::deck::inline::{Inline, parse_inlines};
use crate::deck::{Deck, Section, Slide};
use crate::theme::Theme;

const PADDING: f32 = 70.0;
const BLOCK_GAP: f32 = 18.0;
const MARKER_WIDTH: f32 = 40.0;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}[ \t]+(.+?)[ \t]*$").expect("valid heading regex"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+][ \t]+(.+)$").expect("valid bullet regex"));
static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,9})[.)][ \t]+(.+)$").expect("valid ordered item regex"));
static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX])\][ \t]+(.+)$").expect("valid task regex"));

/// A piece of slide body, ready to be laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyBlock {
    Paragraph(Vec<Inline>),
    Item {
        marker: ItemMarker,
        inlines: Vec<Inline>,
    },
    Heading(Vec<Inline>),
    Code(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemMarker {
    Bullet,
    Ordered(u32),
    Task { done: bool },
}

/// Break a section body into paragraphs, list items, minor headings and code.
///
/// Consecutive text lines join into one paragraph; blank lines separate them.
pub fn body_blocks(body: &str) -> Vec<BodyBlock> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Vec<&str> = Vec::new();
    let mut fence = Fence::default();

    for line in body.lines() {
        let was_open = fence.is_open();
        if fence.update(line) {
            if !was_open {
                flush_paragraph(&mut paragraph, &mut blocks);
            } else if fence.is_open() {
                code.push(line);
            } else {
                blocks.push(BodyBlock::Code(code.join("\n")));
                code.clear();
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
        } else if let Some(block) = list_item(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(block);
        } else if let Some(caps) = HEADING_RE.captures(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(BodyBlock::Heading(parse_inlines(&caps[1])));
        } else {
            paragraph.push(trimmed);
        }
    }
    // An unterminated fence still shows its code
    if fence.is_open() {
        blocks.push(BodyBlock::Code(code.join("\n")));
    }
    flush_paragraph(&mut paragraph, &mut blocks);
    blocks
}

fn list_item(line: &str) -> Option<BodyBlock> {
    if let Some(caps) = BULLET_RE.captures(line) {
        let item = caps.get(1).map_or("", |m| m.as_str());
        let (marker, text) = match TASK_RE.captures(item) {
            Some(task) => (
                ItemMarker::Task {
                    done: &task[1] != " ",
                },
                task.get(2).map_or("", |m| m.as_str()),
            ),
            None => (ItemMarker::Bullet, item),
        };
        return Some(BodyBlock::Item {
            marker,
            inlines: parse_inlines(text),
        });
    }
    let caps = ORDERED_RE.captures(line)?;
    let number = caps[1].parse().ok()?;
    Some(BodyBlock::Item {
        marker: ItemMarker::Ordered(number),
        inlines: parse_inlines(&caps[2]),
    })
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<BodyBlock>) {
    if !paragraph.is_empty() {
        blocks.push(BodyBlock::Paragraph(parse_inlines(&paragraph.join(" "))));
        paragraph.clear();
    }
}

/// Colors and size shared by every span of one text block.
#[derive(Debug, Clone, Copy)]
struct SpanStyle {
    font_size: f32,
    color: Color32,
    link_color: Color32,
}

/// Create a LayoutJob from inline elements.
fn inlines_to_job(inlines: &[Inline], style: SpanStyle, max_width: f32) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width.max(1.0);
    append_inlines(&mut job, inlines, style, false, false);
    job
}

fn append_inlines(
    job: &mut egui::text::LayoutJob,
    inlines: &[Inline],
    style: SpanStyle,
    bold: bool,
    italic: bool,
) {
    for inline in inlines {
        match inline {
            Inline::Text(s) => {
                // No bold face is loaded; a slightly larger size stands in
                let size = if bold {
                    style.font_size + 1.0
                } else {
                    style.font_size
                };
                let format = egui::text::TextFormat {
                    font_id: FontId::new(size, FontFamily::Proportional),
                    color: style.color,
                    italics: italic,
                    ..Default::default()
                };
                job.append(s, 0.0, format);
            }
            Inline::Bold(children) => append_inlines(job, children, style, true, italic),
            Inline::Italic(children) => append_inlines(job, children, style, bold, true),
            Inline::Strikethrough(children) => {
                let mut inner_job = egui::text::LayoutJob::default();
                append_inlines(&mut inner_job, children, style, bold, italic);
                for section in &inner_job.sections {
                    let mut format = section.format.clone();
                    format.strikethrough = Stroke::new(1.0, format.color);
                    job.append(&inner_job.text[section.byte_range.clone()], 0.0, format);
                }
            }
            Inline::Code(s) => {
                let format = egui::text::TextFormat {
                    font_id: FontId::new(style.font_size * 0.85, FontFamily::Monospace),
                    color: style.color,
                    background: Color32::from_rgba_unmultiplied(
                        128,
                        128,
                        128,
                        (style.color.a() as f32 * 30.0 / 255.0) as u8,
                    ),
                    ..Default::default()
                };
                job.append(s, 0.0, format);
            }
            Inline::Link { text, url } => {
                let link_style = SpanStyle {
                    color: style.link_color,
                    ..style
                };
                if text.is_empty() {
                    append_inlines(job, &[Inline::Text(url.clone())], link_style, bold, italic);
                } else {
                    append_inlines(job, text, link_style, bold, italic);
                }
            }
        }
    }
}

/// Layout and paint inlines at `pos`, returning the y just below them.
fn paint_inlines(
    ui: &egui::Ui,
    inlines: &[Inline],
    style: SpanStyle,
    pos: Pos2,
    max_width: f32,
) -> f32 {
    let job = inlines_to_job(inlines, style, max_width);
    let galley = ui.painter().layout_job(job);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, style.color);
    pos.y + height
}

/// Paint one slide into `rect`. `scale` maps design units to screen points.
pub fn render_slide(
    ui: &egui::Ui,
    slide: Slide<'_>,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    scale: f32,
) {
    ui.painter().rect_filled(
        rect,
        6.0 * scale,
        Theme::with_opacity(theme.slide_background, opacity),
    );
    match slide {
        Slide::Title(deck) => render_title(ui, deck, theme, rect, opacity, scale),
        Slide::Section(section) => render_section(ui, section, theme, rect, opacity, scale),
    }
}

fn render_title(
    ui: &egui::Ui,
    deck: &Deck,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    scale: f32,
) {
    let content = rect.shrink(PADDING * scale);
    let heading_color = Theme::with_opacity(theme.heading_color, opacity);
    let text_color = Theme::with_opacity(theme.foreground, opacity);
    let accent = Theme::with_opacity(theme.accent, opacity);

    let mut y = content.top() + content.height() * 0.25;
    y = paint_text(
        ui,
        &deck.title,
        egui::FontId::proportional(theme.title_size * scale),
        heading_color,
        content.left(),
        y,
        content.width(),
    );
    if let Some(subtitle) = &deck.subtitle {
        y += BLOCK_GAP * scale;
        y = paint_text(
            ui,
            subtitle,
            egui::FontId::proportional(theme.body_size * 1.2 * scale),
            accent,
            content.left(),
            y,
            content.width(),
        );
    }
    if let Some(time) = deck.time {
        y += BLOCK_GAP * scale;
        y = paint_text(
            ui,
            &time.format("%-d %B %Y").to_string(),
            egui::FontId::proportional(theme.body_size * 0.8 * scale),
            text_color,
            content.left(),
            y,
            content.width(),
        );
    }
    y += BLOCK_GAP * 2.0 * scale;
    for author in &deck.authors {
        for line in author.text_lines() {
            y = paint_text(
                ui,
                line,
                egui::FontId::proportional(theme.body_size * 0.8 * scale),
                text_color,
                content.left(),
                y,
                content.width(),
            );
        }
        y += BLOCK_GAP * 0.5 * scale;
    }
}

fn render_section(
    ui: &egui::Ui,
    section: &Section,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    scale: f32,
) {
    let content = rect.shrink(PADDING * scale);
    let heading_color = Theme::with_opacity(theme.heading_color, opacity);
    let text_color = Theme::with_opacity(theme.foreground, opacity);
    let heading_font =
        egui::FontId::proportional(theme.section_heading_size(section.level) * scale);

    if section.is_empty() {
        // Title-only slides are centred vertically
        let galley = ui.painter().layout(
            section.title.clone(),
            heading_font,
            heading_color,
            content.width(),
        );
        let pos = egui::pos2(
            content.left(),
            content.center().y - galley.rect.height() / 2.0,
        );
        ui.painter().galley(pos, galley, heading_color);
        return;
    }

    let mut y = paint_text(
        ui,
        &section.title,
        heading_font,
        heading_color,
        content.left(),
        content.top(),
        content.width(),
    );
    y += BLOCK_GAP * 2.0 * scale;

    let body_style = SpanStyle {
        font_size: theme.body_size * scale,
        color: text_color,
        link_color: Theme::with_opacity(theme.accent, opacity),
    };
    for block in body_blocks(&section.body) {
        if y > content.bottom() {
            break;
        }
        y = match block {
            BodyBlock::Paragraph(inlines) => paint_inlines(
                ui,
                &inlines,
                body_style,
                egui::pos2(content.left(), y),
                content.width(),
            ),
            BodyBlock::Item { marker, inlines } => {
                let x = content.left() + 12.0 * scale;
                paint_marker(ui, marker, body_style, egui::pos2(x, y));
                let offset = MARKER_WIDTH * scale;
                paint_inlines(
                    ui,
                    &inlines,
                    body_style,
                    egui::pos2(x + offset, y),
                    content.width() - 12.0 * scale - offset,
                )
            }
            BodyBlock::Heading(inlines) => paint_inlines(
                ui,
                &inlines,
                SpanStyle {
                    font_size: theme.body_size * 1.15 * scale,
                    color: heading_color,
                    ..body_style
                },
                egui::pos2(content.left(), y),
                content.width(),
            ),
            BodyBlock::Code(code) => paint_code(ui, &code, theme, content, y, opacity, scale),
        };
        y += BLOCK_GAP * scale;
    }
}

/// Draw a bullet, number or checkbox at the start of a list item.
fn paint_marker(ui: &egui::Ui, marker: ItemMarker, style: SpanStyle, pos: Pos2) {
    let text = match marker {
        ItemMarker::Bullet => "\u{2022}".to_string(),
        ItemMarker::Ordered(n) => format!("{n}."),
        ItemMarker::Task { done } => {
            let side = style.font_size * 0.7;
            let top = pos.y + (style.font_size * 1.2 - side) / 2.0;
            let rect = egui::Rect::from_min_size(egui::pos2(pos.x, top), egui::vec2(side, side));
            let stroke = Stroke::new((style.font_size * 0.08).max(1.0), style.color);
            ui.painter()
                .rect_stroke(rect, side * 0.15, stroke, egui::StrokeKind::Inside);
            if done {
                let check = [
                    rect.left_top() + egui::vec2(side * 0.2, side * 0.5),
                    rect.left_top() + egui::vec2(side * 0.42, side * 0.75),
                    rect.left_top() + egui::vec2(side * 0.8, side * 0.25),
                ];
                ui.painter().line_segment([check[0], check[1]], stroke);
                ui.painter().line_segment([check[1], check[2]], stroke);
            }
            return;
        }
    };
    let galley = ui.painter().layout_no_wrap(
        text,
        FontId::proportional(style.font_size),
        style.color,
    );
    ui.painter().galley(pos, galley, style.color);
}

/// Lay out wrapped text at (`x`, `y`) and return the y just below it.
fn paint_text(
    ui: &egui::Ui,
    text: &str,
    font: egui::FontId,
    color: egui::Color32,
    x: f32,
    y: f32,
    width: f32,
) -> f32 {
    let galley = ui
        .painter()
        .layout(text.to_string(), font, color, width.max(1.0));
    let height = galley.rect.height();
    ui.painter().galley(egui::pos2(x, y), galley, color);
    y + height
}

fn paint_code(
    ui: &egui::Ui,
    code: &str,
    theme: &Theme,
    content: egui::Rect,
    y: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let inset = 14.0 * scale;
    let color = Theme::with_opacity(theme.code_foreground, opacity);
    let galley = ui.painter().layout(
        code.to_string(),
        egui::FontId::monospace(theme.code_size * scale),
        color,
        content.width() - inset * 2.0,
    );
    let block = egui::Rect::from_min_size(
        egui::pos2(content.left(), y),
        egui::vec2(content.width(), galley.rect.height() + inset * 2.0),
    );
    ui.painter().rect_filled(
        block,
        4.0 * scale,
        Theme::with_opacity(theme.code_background, opacity),
    );
    ui.painter()
        .galley(block.min + egui::vec2(inset, inset), galley, color);
    block.bottom()
}
