//! End-to-end tests for scoping stylesheets from files and strings.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use cssm::Error;
use cssm::document::Rule;
use cssm::prelude::*;
use parking_lot::Mutex;

/// Log output collected by a test subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records warnings.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured.text())
}

fn write(dir: &Path, name: &str, css: &str) {
    std::fs::write(dir.join(name), css).expect("Failed to write fixture");
}

#[test]
fn test_default_names_are_deterministic() {
    let processor = Processor::new(Config::new());
    let mut store = ModuleStore::new();

    let out = processor
        .process_str("a.css", ".my-class { color: red; }", &mut store)
        .unwrap();

    assert_eq!(out.translations.get("my-class"), Some("_my-class_87y09_uyu04"));
    assert_eq!(out.css, "._my-class_87y09_uyu04 {\n  color: red;\n}\n");
}

#[test]
fn test_content_naming_mode() {
    let options = Options::from_toml_str("naming = \"content\"").unwrap();
    let processor = Processor::new(Config::from_options(options));
    let mut store = ModuleStore::new();

    let out = processor.process_str("any.css", ".a {}", &mut store).unwrap();

    assert_eq!(out.translations.get("a"), Some("_a_36roc_1"));
}

#[test]
fn test_basic_scenario() {
    let processor = Processor::new(Config::new());
    let mut store = ModuleStore::new();
    let css = ".className { color: red; }\n.className .subClass { color: blue; }";

    let out = processor.process_str("a.css", css, &mut store).unwrap();

    let class_name = out.translations.get("className").unwrap();
    let sub_class = out.translations.get("subClass").unwrap();
    assert_eq!(out.translations.len(), 2);
    assert_eq!(
        out.css,
        format!(
            ".{class_name} {{\n  color: red;\n}}\n\n.{class_name} .{sub_class} {{\n  color: blue;\n}}\n"
        )
    );
}

#[test]
fn test_process_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "base.css", ".button { padding: 4px; }");
    write(
        dir.path(),
        "app.css",
        "@use (.button, .button as .primary) from './base';\n.primary .icon { margin: 0; }",
    );

    let session = Session::new(Config::new());
    let base = session.process_file(dir.path().join("base.css")).unwrap();
    let app = session.process_file(dir.path().join("app.css")).unwrap();

    let scoped = base.translations.get("button").unwrap();
    assert_eq!(app.translations.get("button"), Some(scoped));
    assert_eq!(app.translations.get("primary"), Some(scoped));
    assert!(app.css.starts_with(&format!(".{scoped} .")));
    assert!(!app.css.contains("@use"));

    let stored = session.translations(dir.path().join("app.css")).unwrap();
    assert_eq!(stored, app.translations);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.css");

    let err = Processor::new(Config::new())
        .process_file(&path, &mut ModuleStore::new())
        .unwrap_err();

    assert!(matches!(err, Error::Io { path: ref p, .. } if p == &path));
}

#[test]
fn test_warn_policy_logs_and_continues() {
    let config = Config::new().missing_reference(MissingReferencePolicy::Warn);
    let processor = Processor::new(config);
    let mut store = ModuleStore::new();

    let (result, logs) = capture_warnings(|| {
        processor.process_str("/app/main.css", "@use .a from './later';\n.a {}", &mut store)
    });

    let out = result.unwrap();
    assert!(out.translations.contains("a"));
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("cssm::resolve"), "logs: {logs}");
    assert!(logs.contains("'/app/later.css' not found or not imported yet"), "logs: {logs}");
}

#[test]
fn test_ignore_policy_is_silent() {
    let config = Config::new().missing_reference(MissingReferencePolicy::Ignore);
    let processor = Processor::new(config);
    let mut store = ModuleStore::new();

    let (result, logs) = capture_warnings(|| {
        processor.process_str("/app/main.css", "@use .a from './later';\n.a {}", &mut store)
    });

    assert!(result.is_ok());
    assert!(logs.is_empty(), "logs: {logs}");
    assert!(store.get(Path::new("/app/later.css")).unwrap().is_placeholder());
}

#[test]
fn test_placeholder_names_survive_processing() {
    let config = Config::new().missing_reference(MissingReferencePolicy::Ignore);
    let processor = Processor::new(config);
    let mut store = ModuleStore::new();

    let early = processor
        .process_str("/app.css", "@use .card from './card';", &mut store)
        .unwrap();
    let card = processor
        .process_str("/card.css", ".card {}", &mut store)
        .unwrap();

    assert_eq!(early.translations.get("card"), card.translations.get("card"));
}

#[test]
fn test_content_naming_keeps_placeholders_apart() {
    let toml = "naming = \"content\"\nmissing-reference = \"ignore\"";
    let options = Options::from_toml_str(toml).unwrap();
    let processor = Processor::new(Config::from_options(options));
    let mut store = ModuleStore::new();

    let out = processor
        .process_str(
            "/app.css",
            "@use .x as .one from './one';\n@use .x as .two from './two';",
            &mut store,
        )
        .unwrap();

    assert_ne!(out.translations.get("one"), out.translations.get("two"));
}

#[test]
fn test_missing_class_in_processed_file_warns() {
    let processor = Processor::new(Config::new());
    let mut store = ModuleStore::new();
    processor.process_str("/base.css", ".a {}", &mut store).unwrap();

    let (result, logs) = capture_warnings(|| {
        processor.process_str("/app.css", "@use .nope from './base';", &mut store)
    });

    assert!(result.unwrap().translations.contains("nope"));
    assert!(logs.contains("does not define class 'nope'"), "logs: {logs}");
    assert!(!store.table(Path::new("/base.css")).unwrap().contains("nope"));
}

#[test]
fn test_directive_errors_are_fatal() {
    let processor = Processor::new(Config::new());
    let mut store = ModuleStore::new();

    for css in [
        "@use .a, .b from './x';",
        "@use .a from ./x;",
        "@use (.a from './x';",
        "@use .a from './x' extra;",
    ] {
        let err = processor.process_str("/app.css", css, &mut store).unwrap_err();
        assert!(err.is_syntax(), "{css} gave {err}");
    }
    assert!(store.is_empty());
}

#[test]
fn test_unclosed_scope_is_fatal() {
    let mut document = Document::new(
        "/a.css",
        "",
        vec![Node::Rule(Rule::new(":local(.a .b", vec![]))],
    );

    let err = Processor::new(Config::new())
        .process(&mut document, &mut ModuleStore::new())
        .unwrap_err();

    assert!(err.is_syntax());
}

#[test]
fn test_import_syntax_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "cssm.toml",
        "syntax = [\"use\", \"import\"]\ncamel-case = true\n",
    );
    write(dir.path(), "theme.css", ".accent-color {}");
    write(
        dir.path(),
        "page.css",
        ":import {\n  theme: \"from './theme'\";\n}\n.page-title theme::accent-color {}",
    );

    let options = Options::from_file(dir.path().join("cssm.toml")).unwrap();
    let session = Session::new(Config::from_options(options));
    let theme = session.process_file(dir.path().join("theme.css")).unwrap();
    let page = session.process_file(dir.path().join("page.css")).unwrap();

    let accent = theme.translations.get("accentColor").unwrap();
    let title = page.translations.get("pageTitle").unwrap();
    assert_eq!(page.css, format!(".{title} .{accent} {{\n}}\n"));
    assert!(!page.translations.contains("theme"));
}

#[test]
fn test_bad_options_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "cssm.toml", "missing-reference = \"sometimes\"");

    let err = Options::from_file(dir.path().join("cssm.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_session_across_threads() {
    let session = Session::new(Config::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let session = session.clone();
            thread::spawn(move || {
                session
                    .process_str(format!("/part{i}.css"), ".shared {}")
                    .unwrap()
            })
        })
        .collect();

    let mut names: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().translations.get("shared").unwrap().to_string())
        .collect();
    names.sort();
    names.dedup();

    assert_eq!(names.len(), 4);
    assert_eq!(session.store().len(), 4);
}

#[test]
fn test_custom_generator_and_resolver() {
    let config = Config::new()
        .name_fn(|name, seed| {
            let stem = seed.path.file_stem().unwrap_or_default().to_string_lossy();
            format!("{stem}__{name}")
        })
        .path_resolver(|declared: &str, _dir: &Path| {
            Path::new("/lib").join(declared.trim_start_matches("~/"))
        });
    let processor = Processor::new(config);
    let mut store = ModuleStore::new();

    processor
        .process_str("/lib/grid.css", ".row {}", &mut store)
        .unwrap();
    let out = processor
        .process_str("/src/app.css", "@use .row from '~/grid';\n.row {}", &mut store)
        .unwrap();

    assert_eq!(out.css, ".grid__row {\n}\n");
}
