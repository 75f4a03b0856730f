//! Markdown parsing with comrak.

use anyhow::Result;
use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

use super::types::{
    CodeBlockRef, Document, InlineSpan, InlineStyle, LineType, RenderedLine, spans_to_string,
    spans_width, truncate_spans,
};

const CODE_RIGHT_PADDING: usize = 3;

impl Document {
    /// Parse markdown source into a Document.
    ///
    /// # Example
    ///
    /// ```
    /// use docdeck::document::Document;
    ///
    /// let doc = Document::parse("# Hello\n\nWorld").unwrap();
    /// assert_eq!(doc.line_at(0).unwrap().content(), "Hello");
    /// assert_eq!(doc.line_at(2).unwrap().content(), "World");
    /// ```
    ///
    /// # Errors
    ///
    /// Parsing itself is infallible; the `Result` is kept so callers treat
    /// rendering like the other fallible document operations.
    pub fn parse(source: &str) -> Result<Self> {
        parse(source)
    }

    /// Parse markdown and wrap text to `width` columns.
    ///
    /// # Errors
    ///
    /// See [`Document::parse`].
    pub fn parse_with_layout(source: &str, width: u16) -> Result<Self> {
        parse_with_layout(source, width)
    }
}

/// Parse markdown source into a Document.
///
/// # Errors
///
/// See [`Document::parse`].
pub fn parse(source: &str) -> Result<Document> {
    parse_with_layout(source, 80)
}

/// Parse markdown source into a Document with layout and wrapping.
///
/// # Errors
///
/// See [`Document::parse`].
pub fn parse_with_layout(source: &str, width: u16) -> Result<Document> {
    let arena = Arena::new();
    let options = markdown_options();
    let root = parse_document(&arena, source, &options);

    let mut out = LineSink {
        lines: Vec::new(),
        code_blocks: Vec::new(),
        wrap_width: width.max(1) as usize,
    };
    out.process_node(root, 0, None);

    // Drop the trailing spacer so an empty page renders nothing.
    while out
        .lines
        .last()
        .is_some_and(|line| matches!(line.line_type(), LineType::Empty))
    {
        out.lines.pop();
    }

    Ok(Document::new(out.lines, out.code_blocks))
}

/// Comrak options shared by the terminal and HTML renderers.
///
/// GFM tables, strikethrough, autolinks and task lists are enabled. Raw HTML
/// is kept in the tree so both renderers can pass it through.
pub fn markdown_options() -> Options {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.unsafe_ = true;

    options
}

struct LineSink {
    lines: Vec<RenderedLine>,
    code_blocks: Vec<CodeBlockRef>,
    wrap_width: usize,
}

impl LineSink {
    fn push_empty(&mut self) {
        self.lines
            .push(RenderedLine::new(String::new(), LineType::Empty));
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.wrap_width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(RenderedLine::with_spans(content, line_type, line_spans));
        }
    }

    fn process_node<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, list_marker: Option<&str>) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                // Keep headings visually separated with one row above.
                if !self.lines.is_empty() {
                    ensure_trailing_empty_lines(&mut self.lines, 1);
                }

                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Heading(heading.level), "", "");
                self.push_empty();
            }

            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, "", "");
                self.push_empty();
            }

            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string);
                self.push_code_block(language, &code_block.literal);
            }

            NodeValue::HtmlBlock(block) => {
                for raw_line in block.literal.lines() {
                    self.lines
                        .push(RenderedLine::new(raw_line.to_string(), LineType::Html));
                }
                self.push_empty();
            }

            NodeValue::List(list) => {
                let list_depth = depth + 1;
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                let list_len = node.children().count();
                let max_number = list.start + list_len.saturating_sub(1);
                let number_width = max_number.to_string().len();

                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => format!(
                            "{:>width$}{delimiter} ",
                            list.start + index,
                            width = number_width
                        ),
                    };
                    self.process_node(child, list_depth, Some(&marker));
                }
                if depth == 0 {
                    self.push_empty();
                }
            }

            NodeValue::Item(_) | NodeValue::TaskItem(_) => {
                self.push_list_item(node, depth, list_marker.unwrap_or("- "));
            }

            NodeValue::BlockQuote => {
                self.push_blockquote(node, 1);
                self.push_empty();
            }

            NodeValue::ThematicBreak => {
                let width = self.wrap_width.min(40);
                self.lines
                    .push(RenderedLine::new("─".repeat(width), LineType::HorizontalRule));
                self.push_empty();
            }

            NodeValue::Table(_) => {
                for (spans, line_type) in render_table(node, self.wrap_width) {
                    let content = spans_to_string(&spans);
                    self.lines
                        .push(RenderedLine::with_spans(content, line_type, spans));
                }
                self.push_empty();
            }

            _ => {
                for child in node.children() {
                    self.process_node(child, depth, list_marker);
                }
            }
        }
    }

    fn push_code_block(&mut self, language: Option<String>, literal: &str) {
        let content_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .min(self.wrap_width.saturating_sub(4).max(1));
        let label = format!(" {} ", language.as_deref().unwrap_or("code"));
        let frame_inner_width = content_width + 2 + CODE_RIGHT_PADDING;
        let visible_label: String = label.chars().take(frame_inner_width).collect();
        let top = format!(
            "┌{}{}┐",
            visible_label,
            "─".repeat(frame_inner_width.saturating_sub(visible_label.chars().count()))
        );
        self.lines.push(RenderedLine::new(top, LineType::CodeBlock));

        let body_start = self.lines.len();
        let raw_lines: Vec<String> = literal.lines().map(ToString::to_string).collect();
        for raw_line in &raw_lines {
            let plain_style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            let spans = vec![InlineSpan::new(raw_line.clone(), plain_style)];
            let trimmed_spans = truncate_spans(&spans, content_width);
            let trimmed_len = spans_width(&trimmed_spans);
            let padding =
                " ".repeat(content_width.saturating_sub(trimmed_len) + CODE_RIGHT_PADDING);

            let mut line_spans = Vec::new();
            line_spans.push(InlineSpan::new("│ ".to_string(), InlineStyle::default()));
            line_spans.extend(trimmed_spans);
            line_spans.push(InlineSpan::new(format!("{padding} │"), InlineStyle::default()));
            let content = spans_to_string(&line_spans);
            self.lines.push(RenderedLine::with_spans(
                content,
                LineType::CodeBlock,
                line_spans,
            ));
        }
        let body_end = self.lines.len();

        self.code_blocks.push(CodeBlockRef {
            line_range: body_start..body_end,
            language,
            raw_lines,
            highlighted: false,
            content_width,
            right_padding: CODE_RIGHT_PADDING,
        });

        self.lines.push(RenderedLine::new(
            format!("└{}┘", "─".repeat(frame_inner_width)),
            LineType::CodeBlock,
        ));
        self.push_empty();
    }

    fn push_list_item<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, base_marker: &str) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let marker = match task_marker(node) {
            Some(task) => format!("{task} "),
            None => base_marker.to_string(),
        };
        let prefix_first = format!("{indent}{marker}");
        let marker_width = UnicodeWidthStr::width(marker.as_str());
        let prefix_next = format!("{indent}{}", " ".repeat(marker_width));
        let mut rendered_paragraphs = 0usize;

        for child in node.children() {
            let is_text_block = matches!(
                child.data.borrow().value,
                NodeValue::Paragraph | NodeValue::Heading(_)
            );
            if is_text_block {
                if rendered_paragraphs > 0 {
                    self.lines
                        .push(RenderedLine::new(String::new(), LineType::ListItem(depth)));
                }
                let spans = collect_inline_spans(child);
                let prefix = if rendered_paragraphs == 0 {
                    &prefix_first
                } else {
                    &prefix_next
                };
                self.push_wrapped(&spans, LineType::ListItem(depth), prefix, &prefix_next);
                rendered_paragraphs += 1;
            } else {
                self.process_node(child, depth, None);
            }
        }

        if rendered_paragraphs == 0 {
            self.lines.push(RenderedLine::new(
                prefix_first.clone(),
                LineType::ListItem(depth),
            ));
        }
    }

    fn push_blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = quote_prefix(quote_depth);

        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                        self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                }
                NodeValue::BlockQuote => {
                    self.push_blockquote(child, quote_depth + 1);
                }
                _ => {
                    let text = extract_text(child);
                    for raw_line in text.lines() {
                        let spans = vec![InlineSpan::new(
                            raw_line.to_string(),
                            InlineStyle::default(),
                        )];
                        self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                    }
                }
            }
        }
    }
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| matches!(line.line_type(), LineType::Empty))
        .count();
    for _ in existing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

fn quote_prefix(depth: usize) -> String {
    let mut prefix = String::from("  ");
    for _ in 0..depth {
        prefix.push('│');
        prefix.push(' ');
    }
    prefix
}

type TableCell = Vec<InlineSpan>;

fn border_span(text: String) -> InlineSpan {
    InlineSpan::new(text, InlineStyle::default())
}

fn render_table<'a>(
    table_node: &'a AstNode<'a>,
    wrap_width: usize,
) -> Vec<(Vec<InlineSpan>, LineType)> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    for row in &mut rows {
        row.resize_with(num_cols, Vec::new);
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(spans_width(cell));
        }
    }

    // Table row width is: 1 + sum(col_width + 3) for all columns.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        let Some((widest_idx, _)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if col_widths[widest_idx] > 1 {
            col_widths[widest_idx] -= 1;
        } else {
            break;
        }
    }

    let mut lines = Vec::new();
    lines.push((
        vec![render_table_border(&col_widths, '┌', '┬', '┐')],
        LineType::Table,
    ));
    for (idx, row) in rows.iter().enumerate() {
        let is_header = has_header && idx == 0;
        let line_type = if is_header {
            LineType::TableHeader
        } else {
            LineType::Table
        };
        lines.push((render_table_row(row, &col_widths, &alignments), line_type));
        if is_header {
            lines.push((
                vec![render_table_border(&col_widths, '├', '┼', '┤')],
                LineType::Table,
            ));
        }
    }
    lines.push((
        vec![render_table_border(&col_widths, '└', '┴', '┘')],
        LineType::Table,
    ));
    lines
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<TableCell>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let NodeValue::TableRow(is_header_row) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= is_header_row;

        let row_cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(collect_inline_spans)
            .collect();
        rows.push(row_cells);
    }

    (alignments, rows, has_header)
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> InlineSpan {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    border_span(out)
}

fn render_table_row(
    cells: &[TableCell],
    widths: &[usize],
    alignments: &[TableAlignment],
) -> Vec<InlineSpan> {
    let mut out = vec![border_span("│".to_string())];
    for (idx, width) in widths.iter().enumerate() {
        let content = cells
            .get(idx)
            .map(|cell| truncate_spans(cell, *width))
            .unwrap_or_default();
        let padding = width.saturating_sub(spans_width(&content));
        let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => (padding, 0),
            TableAlignment::Center => (padding / 2, padding - padding / 2),
            TableAlignment::Left | TableAlignment::None => (0, padding),
        };

        out.push(border_span(" ".repeat(left + 1)));
        out.extend(content);
        out.push(border_span(format!("{} │", " ".repeat(right))));
    }
    out
}

pub(crate) fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(c) => text.push_str(&c.literal),
        NodeValue::HtmlInline(html) => text.push_str(html),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline_spans_recursive(child, InlineStyle::default(), &mut spans);
    }
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        // Nested blocks inside an item are rendered on their own lines.
        NodeValue::List(_) | NodeValue::Item(_) | NodeValue::CodeBlock(_) => {}
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.clone(), style));
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                emphasis: false,
                strong: false,
                strikethrough: false,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::HtmlInline(html) => {
            let html_style = InlineStyle { html: true, ..style };
            spans.push(InlineSpan::new(html.clone(), html_style));
        }
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) => {
            let next = InlineStyle { link: true, ..style };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            let label = if alt.is_empty() { &image.url } else { &alt };
            let next = InlineStyle { link: true, ..style };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), next));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_inline_spans_recursive(child, style, spans);
            }
        }
    }
}

fn task_marker<'a>(node: &'a AstNode<'a>) -> Option<&'static str> {
    match node.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(if symbol.is_some() { "✓" } else { "□" }),
        _ => None,
    }
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_new_line = |prefix: &str,
                          current: &mut Vec<InlineSpan>,
                          current_len: &mut usize,
                          has_word: &mut bool| {
        current.clear();
        *current_len = UnicodeWidthStr::width(prefix);
        if !prefix.is_empty() {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
        }
        *has_word = false;
    };

    start_new_line(prefix_first, &mut current, &mut current_len, &mut has_word);

    for token in tokens {
        let token_len = UnicodeWidthStr::width(token.text());
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(std::mem::take(&mut current));
            start_new_line(prefix_next, &mut current, &mut current_len, &mut has_word);
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    lines.push(current);
    lines
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        match ws_state {
            Some(state) if state == is_ws => buf.push(ch),
            Some(_) => {
                out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
                buf.push(ch);
                ws_state = Some(is_ws);
            }
            None => {
                buf.push(ch);
                ws_state = Some(is_ws);
            }
        }
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(doc: &Document, line_type: LineType) -> Vec<String> {
        doc.visible_lines(0, doc.line_count())
            .into_iter()
            .filter(|l| *l.line_type() == line_type)
            .map(|l| l.content().to_string())
            .collect()
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("").unwrap();
        assert_eq!(doc.line_count(), 0);
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_whitespace_only_renders_nothing() {
        let doc = parse("   \n\n  ").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_heading_renders_plain_text() {
        let doc = parse("# Hi").unwrap();
        let first = doc.line_at(0).unwrap();
        assert_eq!(*first.line_type(), LineType::Heading(1));
        assert_eq!(first.content(), "Hi");
    }

    #[test]
    fn test_parse_multiple_headings() {
        let doc = parse("# One\n\n## Two\n\n### Three").unwrap();
        let levels: Vec<_> = doc
            .visible_lines(0, doc.line_count())
            .into_iter()
            .filter_map(|l| match l.line_type() {
                LineType::Heading(level) => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, [1, 2, 3]);
    }

    #[test]
    fn test_heading_has_blank_row_above() {
        let doc = Document::parse_with_layout("Paragraph\n\n## Heading", 80).unwrap();
        let heading_line = (0..doc.line_count())
            .find(|&i| *doc.line_at(i).unwrap().line_type() == LineType::Heading(2))
            .unwrap();
        assert!(heading_line >= 2);
        assert_eq!(
            *doc.line_at(heading_line - 1).unwrap().line_type(),
            LineType::Empty
        );
    }

    #[test]
    fn test_bold_text_is_strong_span() {
        let doc = parse("**bold**").unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(*line.line_type(), LineType::Paragraph);
        let spans = line.spans().unwrap();
        let bold = spans.iter().find(|s| s.text() == "bold").unwrap();
        assert!(bold.style().strong);
    }

    #[test]
    fn test_inline_styles_create_spans() {
        let md = "*em* **strong** `code` [link](https://example.com) ~~strike~~";
        let doc = parse(md).unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();

        assert!(spans.iter().any(|s| s.style().emphasis));
        assert!(spans.iter().any(|s| s.style().strong));
        assert!(spans.iter().any(|s| s.style().code));
        assert!(spans.iter().any(|s| s.style().link));
        assert!(spans.iter().any(|s| s.style().strikethrough));
    }

    #[test]
    fn test_parse_link() {
        let doc = parse("[Click here](https://example.com)").unwrap();
        let line = doc.line_at(0).unwrap();
        assert_eq!(line.content(), "Click here");
        assert!(line.spans().unwrap().iter().all(|s| s.style().link));
    }

    #[test]
    fn test_autolink_is_link() {
        let doc = parse("see https://example.com now").unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();
        let linked: String = spans
            .iter()
            .filter(|s| s.style().link)
            .map(InlineSpan::text)
            .collect();
        assert_eq!(linked, "https://example.com");
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let md = "This is a long paragraph that should wrap at the specified width.";
        let doc = Document::parse_with_layout(md, 20).unwrap();
        let paragraph_lines = lines_of(&doc, LineType::Paragraph);
        assert!(paragraph_lines.len() > 1);
        for line in paragraph_lines {
            assert!(line.chars().count() <= 20);
        }
    }

    #[test]
    fn test_wide_chars_wrap_by_display_width() {
        let doc = Document::parse_with_layout("漢字 漢字 漢字", 6).unwrap();
        let paragraph_lines = lines_of(&doc, LineType::Paragraph);
        assert_eq!(paragraph_lines.len(), 3);
        for line in paragraph_lines {
            assert!(UnicodeWidthStr::width(line.as_str()) <= 6, "{line:?}");
        }
    }

    #[test]
    fn test_code_block_renders_framed_box() {
        let doc = parse("```rust\nfn main() {}\n```").unwrap();
        let code_lines = lines_of(&doc, LineType::CodeBlock);

        assert!(code_lines.first().unwrap().starts_with('┌'));
        assert!(code_lines.first().unwrap().contains(" rust "));
        assert!(code_lines.last().unwrap().starts_with('└'));
        assert!(code_lines.iter().any(|l| l.contains("fn main() {}")));
        assert!(!code_lines.iter().any(|l| l.starts_with("```")));
        let top_width = code_lines[0].chars().count();
        for line in &code_lines {
            assert_eq!(line.chars().count(), top_width);
        }
    }

    #[test]
    fn test_code_block_is_plain_until_range_is_highlighted() {
        let mut doc = parse("```rust\nfn main() {}\n```").unwrap();
        let plain = doc
            .visible_lines(0, 10)
            .into_iter()
            .find(|l| l.content().contains("fn main"))
            .unwrap()
            .spans()
            .unwrap()
            .iter()
            .all(|s| s.style().fg.is_none());
        assert!(plain, "Expected plain code before lazy highlighting");

        doc.ensure_highlight_for_range(0..doc.line_count());
        let code_line = doc
            .visible_lines(0, 10)
            .into_iter()
            .find(|l| l.content().contains("fn main"))
            .unwrap();
        assert!(
            code_line
                .spans()
                .unwrap()
                .iter()
                .any(|s| s.style().fg.is_some())
        );
    }

    #[test]
    fn test_unordered_list_uses_bullet_character() {
        let doc = parse("* Item").unwrap();
        let items = lines_of(&doc, LineType::ListItem(1));
        assert_eq!(items[0], "• Item");
    }

    #[test]
    fn test_ordered_list_alignment_for_two_digits() {
        let doc = parse("9. Ninth\n10. Tenth").unwrap();
        let items = lines_of(&doc, LineType::ListItem(1));
        assert!(items[0].starts_with(" 9. "));
        assert!(items[1].starts_with("10. "));
    }

    #[test]
    fn test_nested_list_indents_children() {
        let doc = parse("- Parent\n  - Child").unwrap();
        assert!(lines_of(&doc, LineType::ListItem(1))[0].starts_with("• Parent"));
        assert!(lines_of(&doc, LineType::ListItem(2))[0].starts_with("  • Child"));
    }

    #[test]
    fn test_list_wraps_with_hanging_indent() {
        let md = "1. This is a long list item that should wrap to the next line.";
        let doc = Document::parse_with_layout(md, 20).unwrap();
        let items = lines_of(&doc, LineType::ListItem(1));
        assert!(items.len() > 1);
        assert!(items[0].starts_with("1. "));
        assert!(items[1].starts_with("   "));
    }

    #[test]
    fn test_task_list_marker() {
        let doc = parse("- [x] Done\n- [ ] Todo").unwrap();
        let items = lines_of(&doc, LineType::ListItem(1));
        assert!(items[0].starts_with("✓ Done"));
        assert!(items[1].starts_with("□ Todo"));
    }

    #[test]
    fn test_parse_blockquote() {
        let doc = parse("> This is a quote").unwrap();
        let quotes = lines_of(&doc, LineType::BlockQuote);
        assert_eq!(quotes.len(), 1);
        assert!(quotes[0].starts_with("  │ This"));
    }

    #[test]
    fn test_gfm_table_marks_header_row() {
        let doc = parse("| A | B |\n|---|---|\n| 1 | 2 |").unwrap();
        let header = lines_of(&doc, LineType::TableHeader);
        assert_eq!(header.len(), 1);
        assert!(header[0].starts_with("│ A"));

        let body = lines_of(&doc, LineType::Table);
        assert!(body[0].starts_with('┌'));
        assert!(body.iter().any(|l| l.starts_with("│ 1")));
        assert!(body.last().unwrap().starts_with('└'));
    }

    #[test]
    fn test_table_cells_keep_inline_styles() {
        let doc = parse("| Name | Note |\n|---|---|\n| **bold** | `code` |").unwrap();
        let row = doc
            .visible_lines(0, doc.line_count())
            .into_iter()
            .find(|l| l.content().contains("bold"))
            .unwrap();
        assert_eq!(*row.line_type(), LineType::Table);
        assert_eq!(row.content(), "│ bold │ code │");

        let spans = row.spans().unwrap();
        let bold = spans.iter().find(|s| s.text() == "bold").unwrap();
        assert!(bold.style().strong);
        let code = spans.iter().find(|s| s.text() == "code").unwrap();
        assert!(code.style().code);
        assert!(spans.iter().filter(|s| s.text().contains('│')).all(|s| !s.style().strong));
    }

    #[test]
    fn test_table_alignment_pads_styled_cells() {
        let doc = parse("| Qty |\n|---:|\n| *7* |").unwrap();
        let row = doc
            .visible_lines(0, doc.line_count())
            .into_iter()
            .find(|l| l.content().contains('7'))
            .unwrap();
        assert_eq!(row.content(), "│   7 │");
        let seven = row.spans().unwrap().iter().find(|s| s.text() == "7").unwrap();
        assert!(seven.style().emphasis);
    }

    #[test]
    fn test_gfm_table_respects_layout_width() {
        let md = "| Very long heading | Value |\n|---|---:|\n| some really long content | 12345 |";
        let doc = Document::parse_with_layout(md, 24).unwrap();
        for line in doc.visible_lines(0, 20) {
            if matches!(line.line_type(), LineType::Table | LineType::TableHeader) {
                assert!(UnicodeWidthStr::width(line.content()) <= 24);
            }
        }
    }

    #[test]
    fn test_raw_html_block_passes_through() {
        let doc = parse("<div class=\"note\">hello</div>").unwrap();
        let html = lines_of(&doc, LineType::Html);
        assert_eq!(html, ["<div class=\"note\">hello</div>"]);
    }

    #[test]
    fn test_inline_html_is_marked() {
        let doc = parse("press <kbd>q</kbd> to quit").unwrap();
        let spans = doc.line_at(0).unwrap().spans().unwrap();
        assert!(spans.iter().any(|s| s.style().html && s.text() == "<kbd>"));
    }

    #[test]
    fn test_thematic_break() {
        let doc = parse("a\n\n---\n\nb").unwrap();
        assert_eq!(lines_of(&doc, LineType::HorizontalRule).len(), 1);
    }

    #[test]
    fn test_image_renders_placeholder() {
        let doc = parse("![diagram](arch.png)").unwrap();
        assert!(doc.plain_text().contains("[Image: diagram]"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let md = "# T\n\n- a\n- b\n\n```\nx\n```\n";
        let a = parse(md).unwrap();
        let b = parse(md).unwrap();
        assert_eq!(a.plain_text(), b.plain_text());
    }
}
