//! End-to-end tests for the facade functions.

use cascada_rs::{Config, Environment, Error, inline_css, parse_markup, parse_stylesheet};

// ============================================================================
// PARSE ENTRY POINTS
// ============================================================================

#[test]
fn test_parse_markup_reports_position() {
    let err = parse_markup("<div>\n  <td/>\n</div>").unwrap_err();
    assert_eq!((err.line, err.col), (2, 3));
}

#[test]
fn test_parse_stylesheet_reports_message() {
    let err = parse_stylesheet("p { color }").unwrap_err();
    assert!(err.to_string().starts_with("CSS syntax error:"), "{err}");
}

// ============================================================================
// INLINE PIPELINE
// ============================================================================

#[test]
fn test_inline_css_combines_sources() {
    let html = r#"<html><head><style>body { color: #222 } .x { color: red }</style></head><body><p class="x">a</p><p>b</p></body></html>"#;
    let out = inline_css(html, &["p { margin: 0 }"], &Config::default()).unwrap();
    insta::assert_snapshot!(out, @r#"<html><head></head><body style="color:#222;"><p class="x" style="color:red;margin:0;">a</p><p style="margin:0;">b</p></body></html>"#);
}

#[test]
fn test_inline_css_respects_environment() {
    let html = r#"<style>@media (max-width: 500px) { p { display: none } }</style><p>x</p>"#;
    assert_eq!(inline_css(html, &[], &Config::default()).unwrap(), "<p>x</p>");

    let phone = Config::default().with_environment(Environment::new(375.0, 812.0));
    assert_eq!(
        inline_css(html, &[], &phone).unwrap(),
        r#"<p style="display:none;">x</p>"#
    );
}

#[test]
fn test_inline_css_errors_are_wrapped() {
    let config = Config::default();
    assert!(matches!(
        inline_css("<p>", &["p {"], &config),
        Err(Error::Style(_))
    ));
    assert!(matches!(
        inline_css("<p>", &[], &config.clone().with_auto_close(false)),
        Err(Error::Markup(_))
    ));
    assert!(matches!(
        inline_css("<style>p { : }</style>", &[], &config),
        Err(Error::Style(_))
    ));
}

#[test]
fn test_inline_css_handles_deep_nesting() {
    let depth = 5_000;
    let markup = "<div>".repeat(depth);
    let out = inline_css(&markup, &["div { color: red }"], &Config::default()).unwrap();
    let open = r#"<div style="color:red;">"#;
    assert_eq!(out.matches(open).count(), depth);
    assert!(out.ends_with("</div></div>"));
}
