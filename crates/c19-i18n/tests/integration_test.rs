//! Integration tests for the i18n system

use c19_i18n::{fluent_args, I18nError, I18nManager, Locale};
use std::fs;
use tempfile::TempDir;

/// Directory with an English override that drops most messages
fn create_override_locales() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(temp_dir.path().join("en")).unwrap();
    fs::write(
        temp_dir.path().join("en/main.ftl"),
        "report-title = Weekly Pandemic Digest\nfailure-generic = Something broke.\n",
    )
    .unwrap();
    temp_dir
}

#[test]
fn test_bundled_locales_load() {
    let manager = I18nManager::bundled(Locale::English).unwrap();
    assert_eq!(manager.default_locale(), &Locale::English);
    assert_eq!(manager.loaded_locales().len(), 2);
}

#[test]
fn test_messages_with_arguments() {
    let manager = I18nManager::bundled(Locale::English).unwrap();
    let args = fluent_args!["country" => "Japan"];
    let title = manager
        .get_message("chart-monthly-title", &Locale::English, args.as_ref())
        .unwrap();
    assert_eq!(title, "Japan: new cases and deaths");

    let title_ja = manager
        .get_message("chart-monthly-title", &Locale::Japanese, args.as_ref())
        .unwrap();
    assert_eq!(title_ja, "Japan 新規感染者数・死者数の推移");
}

#[test]
fn test_failure_messages_match_original_wording() {
    let manager = I18nManager::bundled(Locale::Japanese).unwrap();
    assert_eq!(manager.text("failure-image", None), "画像ファイルは作成できませんでした。");
    assert_eq!(manager.text("failure-pdf", None), "PDFファイルは作成できませんでした。");
    assert_eq!(manager.text("failure-generic", None), "エラーが発生しました。");
}

#[test]
fn test_missing_message_falls_back_to_key() {
    let manager = I18nManager::bundled(Locale::English).unwrap();
    assert_eq!(manager.text("no-such-message", None), "no-such-message");
    assert!(matches!(
        manager.get_message("no-such-message", &Locale::English, None),
        Err(I18nError::MessageNotFound { .. })
    ));
}

#[test]
fn test_missing_argument_is_an_error() {
    let manager = I18nManager::bundled(Locale::English).unwrap();
    let result = manager.get_message("report-generated-at", &Locale::English, None);
    assert!(matches!(result, Err(I18nError::MessageFormat { .. })));
}

#[test]
fn test_override_directory_replaces_bundled_text() {
    let dir = create_override_locales();
    let manager = I18nManager::new(Locale::English, Some(dir.path())).unwrap();

    assert_eq!(manager.text("report-title", None), "Weekly Pandemic Digest");
    // Japanese has no override file and keeps the bundled text.
    assert_eq!(
        manager
            .get_message("report-title", &Locale::Japanese, None)
            .unwrap(),
        "COVID-19 レポート"
    );
    assert!(!manager.has_message("series-cases", &Locale::English));
}

#[test]
fn test_japanese_falls_back_to_english() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("ja")).unwrap();
    fs::write(temp_dir.path().join("ja/main.ftl"), "series-cases = 感染者数\n").unwrap();

    let manager = I18nManager::new(Locale::Japanese, Some(temp_dir.path())).unwrap();
    assert_eq!(manager.text("series-cases", None), "感染者数");
    assert_eq!(manager.text("series-deaths", None), "Deaths");
}

#[test]
fn test_broken_override_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("en")).unwrap();
    fs::write(temp_dir.path().join("en/main.ftl"), "= no id\n").unwrap();

    let err = I18nManager::new(Locale::English, Some(temp_dir.path())).unwrap_err();
    assert!(matches!(err, I18nError::FluentParse { .. }));
}
