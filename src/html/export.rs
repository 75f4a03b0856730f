use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use super::{escape_html, render_markdown, stylesheet};
use crate::site::Configuration;

/// File name of the exported page at `index` (zero-based).
///
/// Pages are numbered from 1 on disk: `page-1.html`, `page-2.html`, ...
pub fn page_file_name(index: usize) -> String {
    format!("page-{}.html", index + 1)
}

/// Write a static site for `config` into `out_dir`.
///
/// Produces `index.html` (a copy of the first page), one `page-<n>.html` per
/// page, and `style.css`. A configuration with no pages still gets an
/// `index.html` with the header and an empty content card.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn export_site(config: &Configuration, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    write_file(&out_dir.join("style.css"), &stylesheet())?;

    if config.is_empty() {
        write_file(&out_dir.join("index.html"), &render_page(config, None))?;
        tracing::info!(dir = %out_dir.display(), "exported empty site");
        return Ok(());
    }

    for index in 0..config.len() {
        let html = render_page(config, Some(index));
        write_file(&out_dir.join(page_file_name(index)), &html)?;
        if index == 0 {
            write_file(&out_dir.join("index.html"), &html)?;
        }
    }

    tracing::info!(dir = %out_dir.display(), pages = config.len(), "exported site");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn render_page(config: &Configuration, current: Option<usize>) -> String {
    let title = escape_html(&config.title);
    let content = current
        .and_then(|index| config.page(index))
        .map_or_else(String::new, |page| render_markdown(&page.content));

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
         <title>{title}</title>\n<link rel=\"stylesheet\" href=\"style.css\" />\n</head>\n<body>\n"
    );

    html.push_str("<header class=\"dd-header dd-glass\"><div class=\"dd-header-inner\">\n");
    html.push_str("<details class=\"dd-menu\"><summary aria-label=\"Menu\">≡</summary>\n");
    html.push_str("<nav class=\"dd-glass\">\n");
    for (index, page) in config.pages.iter().enumerate() {
        let marker = if Some(index) == current {
            " class=\"dd-current\" aria-current=\"page\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<a href=\"{}\"{marker}>{}</a>",
            page_file_name(index),
            escape_html(&page.title)
        );
    }
    html.push_str("</nav></details>\n");
    let _ = writeln!(html, "<h1 class=\"dd-title\">{title}</h1>\n<div></div>");
    html.push_str("</div></header>\n");

    html.push_str("<main class=\"dd-main\"><article class=\"dd-card dd-glass\">\n");
    html.push_str(&content);
    html.push_str("</article></main>\n");

    html.push_str("<footer class=\"dd-footer\"><div class=\"dd-footer-inner\">\n");
    let previous = current
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| config.page(index).map(|page| (index, page)));
    match previous {
        Some((index, page)) => {
            let _ = writeln!(
                html,
                "<a class=\"dd-nav dd-glass\" rel=\"prev\" href=\"{}\">‹ {}</a>",
                page_file_name(index),
                escape_html(&page.title)
            );
        }
        None => html.push_str("<div></div>\n"),
    }
    let next = current.and_then(|index| config.page(index + 1).map(|page| (index + 1, page)));
    match next {
        Some((index, page)) => {
            let _ = writeln!(
                html,
                "<a class=\"dd-nav dd-glass\" rel=\"next\" href=\"{}\">{} ›</a>",
                page_file_name(index),
                escape_html(&page.title)
            );
        }
        None => html.push_str("<div></div>\n"),
    }
    html.push_str("</div></footer>\n</body>\n</html>\n");

    html
}
