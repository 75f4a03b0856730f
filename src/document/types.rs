//! Core document types.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Structural markdown construct that the style tables are keyed on.
///
/// Both the terminal renderer and the HTML renderer look styling up by
/// element kind rather than by node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Heading1,
    Heading2,
    Heading3,
    /// Heading levels 4-6
    MinorHeading,
    Paragraph,
    BulletList,
    OrderedList,
    ListItem,
    InlineCode,
    CodeBlock,
    BlockQuote,
    Link,
    Table,
    TableRow,
    TableHeaderCell,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Rule,
    RawHtml,
}

impl ElementKind {
    /// Every element kind, in table order.
    pub const ALL: [Self; 21] = [
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::MinorHeading,
        Self::Paragraph,
        Self::BulletList,
        Self::OrderedList,
        Self::ListItem,
        Self::InlineCode,
        Self::CodeBlock,
        Self::BlockQuote,
        Self::Link,
        Self::Table,
        Self::TableRow,
        Self::TableHeaderCell,
        Self::TableCell,
        Self::Emphasis,
        Self::Strong,
        Self::Strikethrough,
        Self::Rule,
        Self::RawHtml,
    ];

    /// Element kind for a heading of the given level.
    pub const fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            _ => Self::MinorHeading,
        }
    }
}

/// A rendered markdown page, laid out as terminal lines.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Rendered lines for display
    lines: Vec<RenderedLine>,
    /// Code blocks for lazy syntax highlighting
    code_blocks: Vec<CodeBlockRef>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a new document from parsed results.
    pub(crate) const fn new(lines: Vec<RenderedLine>, code_blocks: Vec<CodeBlockRef>) -> Self {
        Self { lines, code_blocks }
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Concatenated line text, one rendered line per text line.
    ///
    /// Empty for an empty document.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(RenderedLine::content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get visible lines for rendering.
    ///
    /// Returns lines from `offset` to `offset + count`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    /// Get a specific rendered line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    /// Lazily apply syntax highlighting to code blocks intersecting `range`.
    pub fn ensure_highlight_for_range(&mut self, range: Range<usize>) {
        for block in &mut self.code_blocks {
            if block.highlighted
                || block.line_range.end <= range.start
                || block.line_range.start >= range.end
            {
                continue;
            }

            let highlighted = crate::highlight::highlight_code(
                block.language.as_deref(),
                &block.raw_lines.join("\n"),
            );

            for (line_idx, spans) in (block.line_range.start..block.line_range.end).zip(highlighted)
            {
                if line_idx >= self.lines.len() {
                    break;
                }
                let trimmed_spans = truncate_spans(&spans, block.content_width);
                let trimmed_len = spans_width(&trimmed_spans);
                let padding = " "
                    .repeat(block.content_width.saturating_sub(trimmed_len) + block.right_padding);

                let mut line_spans = Vec::new();
                line_spans.push(InlineSpan::new("│ ".to_string(), InlineStyle::default()));
                line_spans.extend(trimmed_spans);
                line_spans.push(InlineSpan::new(format!("{padding} │"), InlineStyle::default()));
                let content = spans_to_string(&line_spans);
                self.lines[line_idx] =
                    RenderedLine::with_spans(content, LineType::CodeBlock, line_spans);
            }

            block.highlighted = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockRef {
    pub line_range: Range<usize>,
    pub language: Option<String>,
    pub raw_lines: Vec<String>,
    pub highlighted: bool,
    pub content_width: usize,
    pub right_padding: usize,
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The text content of the line
    content: String,
    /// The type of line (for styling)
    line_type: LineType,
    /// Optional inline-styled spans for rendering
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub html: bool,
    pub fg: Option<InlineColor>,
}

impl InlineStyle {
    /// Element kinds that apply to this span, innermost last.
    pub fn element_kinds(self) -> impl Iterator<Item = ElementKind> {
        [
            (self.emphasis, ElementKind::Emphasis),
            (self.strong, ElementKind::Strong),
            (self.strikethrough, ElementKind::Strikethrough),
            (self.link, ElementKind::Link),
            (self.code, ElementKind::InlineCode),
            (self.html, ElementKind::RawHtml),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
    }
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table border or body row
    Table,
    /// Table header row
    TableHeader,
    /// Horizontal rule
    HorizontalRule,
    /// Raw HTML passed through verbatim
    Html,
    /// Empty line
    Empty,
}

impl LineType {
    /// Element kind that styles a whole line of this type.
    pub const fn element_kind(self) -> Option<ElementKind> {
        match self {
            Self::Paragraph => Some(ElementKind::Paragraph),
            Self::Heading(level) => Some(ElementKind::heading(level)),
            Self::CodeBlock => Some(ElementKind::CodeBlock),
            Self::BlockQuote => Some(ElementKind::BlockQuote),
            Self::ListItem(_) => Some(ElementKind::ListItem),
            Self::Table => Some(ElementKind::TableCell),
            Self::TableHeader => Some(ElementKind::TableHeaderCell),
            Self::HorizontalRule => Some(ElementKind::Rule),
            Self::Html => Some(ElementKind::RawHtml),
            Self::Empty => None,
        }
    }
}

pub(crate) fn spans_to_string(spans: &[InlineSpan]) -> String {
    let mut content = String::new();
    for span in spans {
        content.push_str(span.text());
    }
    content
}

/// Display width of the spans in terminal columns.
pub(crate) fn spans_width(spans: &[InlineSpan]) -> usize {
    spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.text()))
        .sum()
}

/// Keep at most `max_width` columns of `spans`, never splitting a wide char.
pub(crate) fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        let mut taken = String::new();
        let mut exhausted = false;
        for ch in span.text().chars() {
            let width = ch.width().unwrap_or(0);
            if width > remaining {
                exhausted = true;
                break;
            }
            taken.push(ch);
            remaining -= width;
        }
        if !taken.is_empty() {
            out.push(InlineSpan::new(taken, span.style()));
        }
        if exhausted {
            break;
        }
    }
    out
}
