//! The file logger records cascade decisions.

use cascada::{Config, Document, StyleApplier, StyleSheet, init_logger};
use log::LevelFilter;

#[test]
fn test_cascade_trace_written_to_file() {
    let path = std::env::temp_dir().join(format!("cascada-log-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&path);
    init_logger(&path, LevelFilter::Trace).unwrap();
    assert!(init_logger(&path, LevelFilter::Trace).is_err());

    let mut doc = Document::parse(r#"<p style="color; margin: 0">x</p>"#).unwrap();
    StyleApplier::new(Config::default())
        .with_stylesheet(StyleSheet::parse("p { color: red }").unwrap())
        .apply(&mut doc);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("[DEBUG] parsed document"), "{contents}");
    assert!(contents.contains("[TRACE] CASCADE: node='p' matched=1 inline=1"), "{contents}");
    assert!(contents.contains("[WARN] skipping inline declaration 'color'"), "{contents}");
    let _ = std::fs::remove_file(&path);
}
