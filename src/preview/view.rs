//! Rendered preview built from the comrak AST
//!
//! The document is parsed with the same extensions the HTML renderer uses and
//! converted into a small block/inline model, which is then laid out with
//! egui widgets: sized headings, styled spans, bullet and numbered lists,
//! framed code blocks, striped tables and clickable links.

use comrak::{
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena,
};
use eframe::egui::{self, RichText};

use crate::markdown::MarkdownOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Display Model
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting that applies to a run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text { text: String, style: SpanStyle },
    Image { url: String, alt: String },
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// `Some(checked)` for task list items
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph(Vec<Inline>),
    /// `start` is set for ordered lists
    List { start: Option<usize>, items: Vec<ListItem> },
    Quote(Vec<Block>),
    CodeBlock { info: String, literal: String },
    Table { header: Vec<Vec<Inline>>, rows: Vec<Vec<Vec<Inline>>> },
    Rule,
    /// Raw HTML, only kept when raw HTML is allowed
    Html(String),
    Footnote { name: String, blocks: Vec<Block> },
}

// ─────────────────────────────────────────────────────────────────────────────
// AST Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown into display blocks.
pub fn parse_blocks(markdown: &str, options: &MarkdownOptions) -> Vec<Block> {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options.to_comrak_options());
    collect_blocks(root, options.allow_raw_html)
}

fn collect_blocks<'a>(node: &'a AstNode<'a>, raw_html: bool) -> Vec<Block> {
    node.children()
        .filter_map(|child| convert_block(child, raw_html))
        .collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>, raw_html: bool) -> Option<Block> {
    let ast = node.data.borrow();
    let block = match &ast.value {
        NodeValue::Heading(heading) => Block::Heading {
            level: heading.level,
            inlines: collect_inlines(node, raw_html),
        },
        NodeValue::Paragraph => Block::Paragraph(collect_inlines(node, raw_html)),
        NodeValue::List(list) => Block::List {
            start: match list.list_type {
                ListType::Ordered => Some(list.start),
                ListType::Bullet => None,
            },
            items: node
                .children()
                .map(|item| convert_item(item, raw_html))
                .collect(),
        },
        NodeValue::BlockQuote => Block::Quote(collect_blocks(node, raw_html)),
        NodeValue::CodeBlock(code) => Block::CodeBlock {
            info: code.info.clone(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) if raw_html => Block::Html(html.literal.clone()),
        NodeValue::ThematicBreak => Block::Rule,
        NodeValue::Table(_) => convert_table(node, raw_html),
        NodeValue::FootnoteDefinition(def) => Block::Footnote {
            name: def.name.clone(),
            blocks: collect_blocks(node, raw_html),
        },
        _ => return None,
    };
    Some(block)
}

fn convert_item<'a>(node: &'a AstNode<'a>, raw_html: bool) -> ListItem {
    let task = match &node.data.borrow().value {
        NodeValue::TaskItem(mark) => Some(matches!(mark, Some('x') | Some('X'))),
        _ => None,
    };
    ListItem {
        task,
        blocks: collect_blocks(node, raw_html),
    }
}

fn convert_table<'a>(node: &'a AstNode<'a>, raw_html: bool) -> Block {
    let mut header = Vec::new();
    let mut rows = Vec::new();
    for row in node.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells: Vec<_> = row
            .children()
            .map(|cell| collect_inlines(cell, raw_html))
            .collect();
        if is_header {
            header = cells;
        } else {
            rows.push(cells);
        }
    }
    Block::Table { header, rows }
}

fn collect_inlines<'a>(node: &'a AstNode<'a>, raw_html: bool) -> Vec<Inline> {
    let mut inlines = Vec::new();
    push_inlines(node, &SpanStyle::default(), raw_html, &mut inlines);
    inlines
}

fn push_inlines<'a>(
    node: &'a AstNode<'a>,
    style: &SpanStyle,
    raw_html: bool,
    out: &mut Vec<Inline>,
) {
    for child in node.children() {
        let ast = child.data.borrow();
        match &ast.value {
            NodeValue::Text(t) => out.push(text(t, style.clone())),
            NodeValue::SoftBreak => out.push(text(" ", style.clone())),
            NodeValue::LineBreak => out.push(Inline::LineBreak),
            NodeValue::Code(code) => out.push(text(
                &code.literal,
                SpanStyle {
                    code: true,
                    ..style.clone()
                },
            )),
            NodeValue::HtmlInline(html) => {
                if raw_html {
                    out.push(text(
                        html,
                        SpanStyle {
                            code: true,
                            ..style.clone()
                        },
                    ));
                }
            }
            NodeValue::FootnoteReference(reference) => {
                out.push(text(&format!("[{}]", reference.name), style.clone()))
            }
            NodeValue::Emph => {
                let inner = SpanStyle {
                    emphasis: true,
                    ..style.clone()
                };
                push_inlines(child, &inner, raw_html, out);
            }
            NodeValue::Strong => {
                let inner = SpanStyle {
                    strong: true,
                    ..style.clone()
                };
                push_inlines(child, &inner, raw_html, out);
            }
            NodeValue::Strikethrough => {
                let inner = SpanStyle {
                    strikethrough: true,
                    ..style.clone()
                };
                push_inlines(child, &inner, raw_html, out);
            }
            NodeValue::Link(link) => {
                let inner = SpanStyle {
                    link: Some(link.url.clone()),
                    ..style.clone()
                };
                push_inlines(child, &inner, raw_html, out);
            }
            NodeValue::Image(image) => out.push(Inline::Image {
                url: image.url.clone(),
                alt: plain_text(child),
            }),
            _ => push_inlines(child, style, raw_html, out),
        }
    }
}

fn text(text: &str, style: SpanStyle) -> Inline {
    Inline::Text {
        text: text.to_string(),
        style,
    }
}

/// Concatenated text of a node's descendants.
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    node.descendants()
        .filter_map(|n| match &n.data.borrow().value {
            NodeValue::Text(t) => Some(t.clone()),
            NodeValue::Code(code) => Some(code.literal.clone()),
            _ => None,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// egui Layout
// ─────────────────────────────────────────────────────────────────────────────

fn heading_size(level: u8, base: f32) -> f32 {
    let scale = match level {
        1 => 1.8,
        2 => 1.5,
        3 => 1.3,
        4 => 1.15,
        5 => 1.05,
        _ => 1.0,
    };
    base * scale
}

/// Lay out blocks top to bottom.
pub fn show_blocks(ui: &mut egui::Ui, blocks: &[Block], font_size: f32) {
    for (index, block) in blocks.iter().enumerate() {
        show_block(ui, index, block, font_size);
    }
}

fn show_block(ui: &mut egui::Ui, index: usize, block: &Block, font_size: f32) {
    match block {
        Block::Heading { level, inlines } => {
            ui.add_space(6.0);
            show_inlines(ui, inlines, heading_size(*level, font_size), true);
            ui.add_space(4.0);
        }
        Block::Paragraph(inlines) => {
            show_inlines(ui, inlines, font_size, false);
            ui.add_space(4.0);
        }
        Block::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match (item.task, start) {
                    (Some(true), _) => "[x]".to_string(),
                    (Some(false), _) => "[ ]".to_string(),
                    (None, Some(n)) => format!("{}.", n + i),
                    (None, None) => "•".to_string(),
                };
                ui.horizontal_top(|ui| {
                    ui.label(RichText::new(marker).size(font_size));
                    ui.vertical(|ui| show_blocks(ui, &item.blocks, font_size));
                });
            }
            ui.add_space(4.0);
        }
        Block::Quote(blocks) => {
            egui::Frame::none()
                .fill(ui.visuals().faint_bg_color)
                .rounding(4.0)
                .inner_margin(egui::Margin::symmetric(10.0, 6.0))
                .show(ui, |ui| {
                    let weak = ui.visuals().weak_text_color();
                    ui.style_mut().visuals.override_text_color = Some(weak);
                    show_blocks(ui, blocks, font_size);
                });
            ui.add_space(4.0);
        }
        Block::CodeBlock { info, literal } => {
            egui::Frame::none()
                .fill(ui.visuals().extreme_bg_color)
                .rounding(4.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    if !info.is_empty() {
                        ui.label(RichText::new(info).small().weak());
                    }
                    ui.label(
                        RichText::new(literal.trim_end_matches('\n'))
                            .monospace()
                            .size(font_size * 0.9),
                    );
                });
            ui.add_space(4.0);
        }
        Block::Table { header, rows } => {
            egui::Grid::new(("preview_table", index))
                .striped(true)
                .show(ui, |ui| {
                    for cell in header {
                        show_inlines(ui, cell, font_size, true);
                    }
                    ui.end_row();
                    for row in rows {
                        for cell in row {
                            show_inlines(ui, cell, font_size, false);
                        }
                        ui.end_row();
                    }
                });
            ui.add_space(4.0);
        }
        Block::Rule => {
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);
        }
        Block::Html(html) => {
            ui.label(RichText::new(html.trim_end()).monospace().weak());
        }
        Block::Footnote { name, blocks } => {
            ui.horizontal_top(|ui| {
                ui.label(RichText::new(format!("[{}]", name)).size(font_size * 0.85));
                ui.vertical(|ui| show_blocks(ui, blocks, font_size * 0.85));
            });
        }
    }
}

fn span_text(ui: &egui::Ui, text: &str, style: &SpanStyle, size: f32, strong: bool) -> RichText {
    let mut rich = RichText::new(text).size(size);
    if strong || style.strong {
        rich = rich.strong();
    }
    if style.emphasis {
        rich = rich.italics();
    }
    if style.strikethrough {
        rich = rich.strikethrough();
    }
    if style.code {
        rich = rich
            .monospace()
            .background_color(ui.visuals().code_bg_color);
    }
    rich
}

/// One wrapped row of inline spans.
fn show_inlines(ui: &mut egui::Ui, inlines: &[Inline], size: f32, strong: bool) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for inline in inlines {
            match inline {
                Inline::Text { text, style } => {
                    let rich = span_text(ui, text, style, size, strong);
                    match &style.link {
                        Some(url) => {
                            ui.hyperlink_to(rich, url);
                        }
                        None => {
                            ui.label(rich);
                        }
                    }
                }
                Inline::Image { url, alt } => {
                    let label = if alt.is_empty() { url } else { alt };
                    ui.hyperlink_to(RichText::new(format!("🖼 {}", label)).size(size), url);
                }
                Inline::LineBreak => ui.end_row(),
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
