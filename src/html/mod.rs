//! Markdown to styled HTML.
//!
//! Walks the same comrak tree as the terminal renderer and tags every element
//! with a class from [`class_for`]. The matching CSS comes from the same
//! table through [`stylesheet`], so a page and its stylesheet never drift.

mod export;

use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{Arena, parse_document};

use crate::document::{ElementKind, extract_text, markdown_options};

pub use export::{export_site, page_file_name};

/// Class name and CSS declarations for one element kind.
struct ElementStyle {
    class: &'static str,
    css: &'static str,
}

const fn element_style(kind: ElementKind) -> ElementStyle {
    let (class, css) = match kind {
        ElementKind::Heading1 => (
            "dd-h1",
            "font-size: 1.875rem; line-height: 2.25rem; font-weight: 700; margin: 0 0 1.5rem;",
        ),
        ElementKind::Heading2 => (
            "dd-h2",
            "font-size: 1.5rem; line-height: 2rem; font-weight: 600; margin: 2rem 0 1rem;",
        ),
        ElementKind::Heading3 => (
            "dd-h3",
            "font-size: 1.25rem; line-height: 1.75rem; font-weight: 600; margin: 1.5rem 0 0.75rem;",
        ),
        ElementKind::MinorHeading => ("dd-h4", "font-weight: 600; margin: 1rem 0 0.5rem;"),
        ElementKind::Paragraph => ("dd-p", "margin: 0 0 1rem;"),
        ElementKind::BulletList => (
            "dd-ul",
            "list-style-type: disc; padding-left: 1.5rem; margin: 0 0 1rem;",
        ),
        ElementKind::OrderedList => (
            "dd-ol",
            "list-style-type: decimal; padding-left: 1.5rem; margin: 0 0 1rem;",
        ),
        ElementKind::ListItem => ("dd-li", "margin-bottom: 0.5rem;"),
        ElementKind::InlineCode => (
            "dd-code",
            "background: rgba(255, 255, 255, 0.1); border-radius: 0.25rem; padding: 0 0.25rem;",
        ),
        ElementKind::CodeBlock => (
            "dd-pre",
            "display: block; background: rgba(255, 255, 255, 0.1); border-radius: 0.25rem; \
             padding: 1rem; margin: 1rem 0; overflow-x: auto;",
        ),
        ElementKind::BlockQuote => (
            "dd-blockquote",
            "border-left: 4px solid rgba(255, 255, 255, 0.3); padding-left: 1rem; \
             margin: 1rem 0; font-style: italic;",
        ),
        ElementKind::Link => ("dd-a", "color: #bfdbfe; text-decoration: underline;"),
        ElementKind::Table => ("dd-table", "min-width: 100%; border-collapse: collapse;"),
        ElementKind::TableRow => (
            "dd-tr",
            "border-top: 1px solid rgba(255, 255, 255, 0.2);",
        ),
        ElementKind::TableHeaderCell => (
            "dd-th",
            "padding: 0.5rem 1rem; text-align: left; font-weight: 600; \
             border-bottom: 1px solid rgba(255, 255, 255, 0.2);",
        ),
        ElementKind::TableCell => (
            "dd-td",
            "padding: 0.5rem 1rem; border-bottom: 1px solid rgba(255, 255, 255, 0.2);",
        ),
        ElementKind::Emphasis => ("dd-em", "font-style: italic;"),
        ElementKind::Strong => ("dd-strong", "font-weight: 700;"),
        ElementKind::Strikethrough => ("dd-del", "text-decoration: line-through;"),
        ElementKind::Rule => (
            "dd-hr",
            "border: 0; border-top: 1px solid rgba(255, 255, 255, 0.3); margin: 2rem 0;",
        ),
        // Passed through verbatim, so the class is never emitted.
        ElementKind::RawHtml => ("dd-raw", ""),
    };
    ElementStyle { class, css }
}

/// CSS class attached to elements of `kind`.
pub const fn class_for(kind: ElementKind) -> &'static str {
    element_style(kind).class
}

/// Page chrome that is not keyed on a markdown element.
const CHROME_CSS: &str = "\
* { box-sizing: border-box; }
body { margin: 0; min-height: 100vh; color: #fff; font-family: system-ui, sans-serif; line-height: 1.5;
  background: linear-gradient(135deg, #0f172a 0%, #1e3a8a 50%, #312e81 100%) fixed; }
.dd-glass { backdrop-filter: blur(12px); background: rgba(255, 255, 255, 0.3);
  box-shadow: 0 10px 15px rgba(0, 0, 0, 0.2); }
.dd-header { position: fixed; top: 0; left: 0; right: 0; z-index: 10; padding: 1rem; }
.dd-header-inner { max-width: 80rem; margin: 0 auto; display: flex; align-items: center;
  justify-content: space-between; }
.dd-title { font-size: 1.5rem; font-weight: 700; margin: 0; }
.dd-menu { position: relative; }
.dd-menu summary { cursor: pointer; list-style: none; padding: 0.5rem; border-radius: 0.5rem;
  font-size: 1.5rem; }
.dd-menu summary:hover { background: rgba(255, 255, 255, 0.2); }
.dd-menu nav { position: absolute; top: 100%; left: 0; width: 16rem; padding: 1rem;
  border-bottom-right-radius: 0.5rem; }
.dd-menu a { display: block; padding: 0.5rem 1rem; color: #fff; text-decoration: none;
  border-radius: 0.5rem; }
.dd-menu a:hover, .dd-menu a.dd-current { background: rgba(255, 255, 255, 0.2); }
.dd-main { padding: 5rem 1rem 8rem; }
.dd-card { max-width: 56rem; margin: 0 auto; padding: 2rem; border-radius: 0.5rem; }
.dd-footer { position: fixed; bottom: 2rem; left: 0; right: 0; z-index: 10; }
.dd-footer-inner { max-width: 56rem; margin: 0 auto; padding: 0 1rem; display: flex;
  justify-content: space-between; align-items: center; }
.dd-nav { padding: 1rem; border-radius: 0.5rem; color: #fff; text-decoration: none;
  font-size: 0.875rem; }
.dd-nav:hover { background: rgba(255, 255, 255, 0.4); }
.dd-table-wrap { overflow-x: auto; margin: 1rem 0; }
.dd-a:hover { color: #dbeafe; }
.dd-pre code { background: none; padding: 0; }
";

/// Stylesheet for exported pages: page chrome plus one rule per element kind.
pub fn stylesheet() -> String {
    let mut css = String::from(CHROME_CSS);
    for kind in ElementKind::ALL {
        let style = element_style(kind);
        if style.css.is_empty() {
            continue;
        }
        css.push_str(&format!(".{} {{ {} }}\n", style.class, style.css));
    }
    css
}

/// Escape for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render markdown to an HTML fragment.
///
/// Empty input yields an empty string. Raw HTML in the source is emitted
/// unchanged.
pub fn render_markdown(source: &str) -> String {
    let arena = Arena::new();
    let options = markdown_options();
    let root = parse_document(&arena, source, &options);

    let mut out = String::new();
    for child in root.children() {
        render_node(child, &mut out, false);
    }
    out
}

fn open(out: &mut String, tag: &str, kind: ElementKind) {
    out.push_str(&format!("<{tag} class=\"{}\">", class_for(kind)));
}

fn render_children<'a>(node: &'a AstNode<'a>, out: &mut String, tight: bool) {
    for child in node.children() {
        render_node(child, out, tight);
    }
}

fn render_node<'a>(node: &'a AstNode<'a>, out: &mut String, tight: bool) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => {
            let tag = format!("h{}", heading.level);
            open(out, &tag, ElementKind::heading(heading.level));
            render_children(node, out, false);
            out.push_str(&format!("</{tag}>\n"));
        }
        NodeValue::Paragraph => {
            // Tight list items hold their text directly.
            if tight {
                render_children(node, out, false);
            } else {
                open(out, "p", ElementKind::Paragraph);
                render_children(node, out, false);
                out.push_str("</p>\n");
            }
        }
        NodeValue::CodeBlock(block) => {
            let language = block
                .info
                .split_whitespace()
                .next()
                .filter(|s| !s.is_empty());
            let code_class =
                language.map_or_else(String::new, |l| format!(" class=\"language-{}\"", escape_html(l)));
            let body = crate::highlight::highlight_html(language, &block.literal)
                .unwrap_or_else(|| escape_html(block.literal.trim_end_matches('\n')));
            open(out, "pre", ElementKind::CodeBlock);
            out.push_str(&format!("<code{code_class}>{body}</code></pre>\n"));
        }
        NodeValue::HtmlBlock(block) => {
            out.push_str(&block.literal);
        }
        NodeValue::List(list) => {
            let (tag, kind) = match list.list_type {
                ListType::Bullet => ("ul", ElementKind::BulletList),
                ListType::Ordered => ("ol", ElementKind::OrderedList),
            };
            if list.list_type == ListType::Ordered && list.start != 1 {
                out.push_str(&format!(
                    "<{tag} class=\"{}\" start=\"{}\">\n",
                    class_for(kind),
                    list.start
                ));
            } else {
                open(out, tag, kind);
                out.push('\n');
            }
            for item in node.children() {
                render_node(item, out, list.tight);
            }
            out.push_str(&format!("</{tag}>\n"));
        }
        NodeValue::Item(_) => {
            open(out, "li", ElementKind::ListItem);
            render_children(node, out, tight);
            out.push_str("</li>\n");
        }
        NodeValue::TaskItem(symbol) => {
            open(out, "li", ElementKind::ListItem);
            let checked = if symbol.is_some() { " checked=\"\"" } else { "" };
            out.push_str(&format!("<input type=\"checkbox\" disabled=\"\"{checked} /> "));
            render_children(node, out, tight);
            out.push_str("</li>\n");
        }
        NodeValue::BlockQuote => {
            open(out, "blockquote", ElementKind::BlockQuote);
            out.push('\n');
            render_children(node, out, false);
            out.push_str("</blockquote>\n");
        }
        NodeValue::ThematicBreak => {
            out.push_str(&format!("<hr class=\"{}\" />\n", class_for(ElementKind::Rule)));
        }
        NodeValue::Table(table) => {
            render_table(node, &table.alignments, out);
        }
        NodeValue::Text(text) => out.push_str(&escape_html(text)),
        NodeValue::Code(code) => {
            open(out, "code", ElementKind::InlineCode);
            out.push_str(&escape_html(&code.literal));
            out.push_str("</code>");
        }
        NodeValue::HtmlInline(html) => out.push_str(html),
        NodeValue::Link(link) => {
            let title = if link.title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", escape_html(&link.title))
            };
            out.push_str(&format!(
                "<a class=\"{}\" href=\"{}\"{title}>",
                class_for(ElementKind::Link),
                escape_html(&link.url)
            ));
            render_children(node, out, false);
            out.push_str("</a>");
        }
        NodeValue::Image(image) => {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" />",
                escape_html(&image.url),
                escape_html(&extract_text(node))
            ));
        }
        NodeValue::Emph => wrap_inline(node, out, "em", ElementKind::Emphasis),
        NodeValue::Strong => wrap_inline(node, out, "strong", ElementKind::Strong),
        NodeValue::Strikethrough => wrap_inline(node, out, "del", ElementKind::Strikethrough),
        NodeValue::SoftBreak => out.push('\n'),
        NodeValue::LineBreak => out.push_str("<br />\n"),
        _ => render_children(node, out, tight),
    }
}

fn wrap_inline<'a>(node: &'a AstNode<'a>, out: &mut String, tag: &str, kind: ElementKind) {
    open(out, tag, kind);
    render_children(node, out, false);
    out.push_str(&format!("</{tag}>"));
}

fn render_table<'a>(node: &'a AstNode<'a>, alignments: &[TableAlignment], out: &mut String) {
    out.push_str("<div class=\"dd-table-wrap\">");
    open(out, "table", ElementKind::Table);
    out.push('\n');

    let mut body_open = false;
    for row in node.children() {
        let NodeValue::TableRow(is_header) = row.data.borrow().value else {
            continue;
        };
        if is_header {
            out.push_str("<thead>\n");
        } else if !body_open {
            out.push_str("<tbody>\n");
            body_open = true;
        }

        open(out, "tr", ElementKind::TableRow);
        let (tag, kind) = if is_header {
            ("th", ElementKind::TableHeaderCell)
        } else {
            ("td", ElementKind::TableCell)
        };
        for (idx, cell) in row.children().enumerate() {
            let align = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
                TableAlignment::Left => " style=\"text-align: left\"",
                TableAlignment::Center => " style=\"text-align: center\"",
                TableAlignment::Right => " style=\"text-align: right\"",
                TableAlignment::None => "",
            };
            out.push_str(&format!("<{tag} class=\"{}\"{align}>", class_for(kind)));
            render_children(cell, out, false);
            out.push_str(&format!("</{tag}>"));
        }
        out.push_str("</tr>\n");

        if is_header {
            out.push_str("</thead>\n");
        }
    }
    if body_open {
        out.push_str("</tbody>\n");
    }
    out.push_str("</table></div>\n");
}
