use std::path::{Path, PathBuf};

use docdeck::html::{export_site, page_file_name};
use docdeck::site::{Configuration, load_configuration};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pages.toml")
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_export_writes_every_page_and_stylesheet() {
    let config = load_configuration(&fixture()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    export_site(&config, dir.path()).unwrap();

    for index in 0..config.len() {
        assert!(dir.path().join(page_file_name(index)).exists());
    }
    assert!(!dir.path().join(page_file_name(config.len())).exists());
    assert_eq!(read(dir.path(), "index.html"), read(dir.path(), "page-1.html"));

    let css = read(dir.path(), "style.css");
    assert!(css.contains(".dd-h1"));
    assert!(css.contains(".dd-blockquote"));
}

#[test]
fn test_exported_pages_link_neighbours() {
    let config = load_configuration(&fixture()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    export_site(&config, dir.path()).unwrap();

    let first = read(dir.path(), "page-1.html");
    assert!(first.contains("<title>Field Guide</title>"));
    assert!(!first.contains("rel=\"prev\""));
    assert!(first.contains("rel=\"next\" href=\"page-2.html\">Configuration ›"));

    let middle = read(dir.path(), "page-2.html");
    assert!(middle.contains("rel=\"prev\" href=\"page-1.html\">‹ Introduction"));
    assert!(middle.contains("Reference &amp; FAQ ›"));
    assert!(middle.contains("<th"));

    let last = read(dir.path(), "page-3.html");
    assert!(!last.contains("rel=\"next\""));
    assert!(last.contains("aria-current=\"page\">Reference &amp; FAQ</a>"));
}

#[test]
fn test_exported_content_uses_element_classes() {
    let config = load_configuration(&fixture()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    export_site(&config, dir.path()).unwrap();

    let first = read(dir.path(), "page-1.html");
    assert!(first.contains("class=\"dd-h1\""));
    assert!(first.contains("<strong class=\"dd-strong\">installation</strong>"));
    assert!(first.contains("class=\"dd-ul\""));
    assert!(first.contains("type=\"checkbox\""));

    let second = read(dir.path(), "page-2.html");
    assert!(second.contains("class=\"dd-pre\""));
    assert!(second.contains("class=\"dd-blockquote\""));
}

#[test]
fn test_export_of_empty_configuration() {
    let dir = tempfile::tempdir().unwrap();
    export_site(&Configuration::default(), dir.path()).unwrap();

    let index = read(dir.path(), "index.html");
    assert!(index.contains("<title>Documentation</title>"));
    assert!(!dir.path().join("page-1.html").exists());
}
