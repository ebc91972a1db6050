//! End-to-end pipeline tests against a scripted stand-in for bundletool.
//!
//! The fake tool behaves like `java -jar bundletool.jar build-apks`: it
//! checks the password flags, then drops a prepared .apks archive at the
//! `--output=` path.

#![cfg(unix)]

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aab2apk::convert::{
    ConversionPhase, ConversionRequest, ConversionResult, Converter,
};
use aab2apk::prefs::{KEY_BUNDLE_TOOL, KEY_JAVA_EXECUTABLE, PreferenceStore};
use tempfile::TempDir;

fn write_executable(path: &Path, script: &str) {
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Writes a zip archive shaped like bundletool's universal-mode output.
fn write_apks_fixture(path: &Path, universal_bytes: &[u8]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("universal.apk", options).unwrap();
    writer.write_all(universal_bytes).unwrap();
    writer.start_file("toc.pb", options).unwrap();
    writer.write_all(b"table of contents").unwrap();
    writer.finish().unwrap();
}

/// A fake tool that validates the password flags and copies the fixture
/// archive to the requested output path.
fn succeeding_tool(dir: &Path, fixture: &Path) -> PathBuf {
    let tool = dir.join("fake-java");
    write_executable(
        &tool,
        &format!(
            "#!/bin/sh\n\
             out=\"\"\n\
             seen_ks_pass=0\n\
             seen_key_pass=0\n\
             for arg in \"$@\"; do\n\
               case \"$arg\" in\n\
                 --output=*) out=\"${{arg#--output=}}\" ;;\n\
                 --ks-pass=pass:s3cret) seen_ks_pass=1 ;;\n\
                 --key-pass=pass:k3y) seen_key_pass=1 ;;\n\
               esac\n\
             done\n\
             if [ \"$seen_ks_pass\" -ne 1 ] || [ \"$seen_key_pass\" -ne 1 ]; then\n\
               echo \"missing password flags\" 1>&2\n\
               exit 9\n\
             fi\n\
             cp \"{}\" \"$out\"\n",
            fixture.display()
        ),
    );
    tool
}

fn store_with_tools(dir: &Path, java: &Path) -> PreferenceStore {
    let mut store = PreferenceStore::open(dir.join("preferences.json")).unwrap();
    store
        .put(KEY_JAVA_EXECUTABLE, &java.to_string_lossy())
        .unwrap();
    store
        .put(KEY_BUNDLE_TOOL, &dir.join("bundletool.jar").to_string_lossy())
        .unwrap();
    store
}

fn request(bundle_path: &str) -> ConversionRequest {
    ConversionRequest {
        bundle_path: bundle_path.to_string(),
        keystore_path: "release.jks".to_string(),
        keystore_password: "s3cret".to_string(),
        key_password: "k3y".to_string(),
        key_alias: "upload".to_string(),
    }
}

fn converter_with_succeeding_tool(dir: &TempDir, universal_bytes: &[u8]) -> (Converter, PathBuf) {
    let fixture = dir.path().join("fixture.apks");
    write_apks_fixture(&fixture, universal_bytes);
    let tool = succeeding_tool(dir.path(), &fixture);
    let store = store_with_tools(dir.path(), &tool);
    let output_dir = dir.path().join("out");
    (Converter::new(store, &output_dir), output_dir)
}

#[tokio::test]
async fn successful_conversion_produces_the_final_apk() {
    let dir = TempDir::new().unwrap();
    let (converter, output_dir) = converter_with_succeeding_tool(&dir, b"universal payload");

    let result = converter.convert(request("app-release.aab")).await;

    assert_eq!(
        result,
        ConversionResult::Success {
            artifact_name: "app-release.apk".to_string()
        }
    );
    assert_eq!(
        fs::read(output_dir.join("app-release.apk")).unwrap(),
        b"universal payload"
    );
    // Transients are deleted on success
    assert!(!output_dir.join("result.apks").exists());
    assert!(!output_dir.join("toc.pb").exists());
}

#[tokio::test]
async fn failing_tool_reports_stderr_verbatim() {
    let dir = TempDir::new().unwrap();
    let tool = dir.path().join("fake-java");
    write_executable(
        &tool,
        "#!/bin/sh\necho \"keystore was tampered with\" 1>&2\nexit 1\n",
    );
    let store = store_with_tools(dir.path(), &tool);
    let converter = Converter::new(store, dir.path().join("out"));

    let result = converter.convert(request("app-release.aab")).await;

    assert_eq!(
        result,
        ConversionResult::Failure {
            message: "keystore was tampered with\n".to_string()
        }
    );
}

#[tokio::test]
async fn successful_conversion_overwrites_a_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let (converter, output_dir) = converter_with_succeeding_tool(&dir, b"new bytes");

    fs::create_dir_all(&output_dir).unwrap();
    fs::write(output_dir.join("app-release.apk"), b"old bytes").unwrap();

    let result = converter.convert(request("app-release.aab")).await;

    assert!(matches!(result, ConversionResult::Success { .. }));
    assert_eq!(
        fs::read(output_dir.join("app-release.apk")).unwrap(),
        b"new bytes"
    );
}

#[tokio::test]
async fn missing_executable_surfaces_as_failure_not_panic() {
    let dir = TempDir::new().unwrap();
    let store = store_with_tools(dir.path(), &dir.path().join("no-such-java"));
    let converter = Converter::new(store, dir.path().join("out"));

    let result = converter.convert(request("app-release.aab")).await;

    match result {
        ConversionResult::Failure { message } => assert!(!message.is_empty()),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn blank_request_fields_fail_before_any_process_spawns() {
    let dir = TempDir::new().unwrap();
    // No tool paths configured at all: validation must reject the request
    // before the missing configuration is ever consulted.
    let store = PreferenceStore::open(dir.path().join("preferences.json")).unwrap();
    let converter = Converter::new(store, dir.path().join("out"));

    let mut req = request("app-release.aab");
    req.key_alias = "   ".to_string();
    let result = converter.convert(req).await;

    match result {
        ConversionResult::Failure { message } => assert!(message.contains("key alias")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn terminal_state_is_published_and_dismissable() {
    let dir = TempDir::new().unwrap();
    let (converter, _) = converter_with_succeeding_tool(&dir, b"payload");

    assert_eq!(converter.state().phase, ConversionPhase::Init);

    converter.convert(request("app-release.aab")).await;
    let state = converter.state();
    assert_eq!(state.phase, ConversionPhase::Success);
    assert!(state.last_result.is_some());

    converter.dismiss();
    let state = converter.state();
    assert_eq!(state.phase, ConversionPhase::Init);
    // Dismissal changes displayed state only; the result stays readable
    assert!(state.last_result.is_some());
}

#[tokio::test]
async fn concurrent_requests_are_serialized_and_both_complete() {
    let dir = TempDir::new().unwrap();
    let (converter, output_dir) = converter_with_succeeding_tool(&dir, b"payload");
    let converter = Arc::new(converter);

    let first = {
        let converter = Arc::clone(&converter);
        tokio::spawn(async move { converter.convert(request("alpha.aab")).await })
    };
    let second = {
        let converter = Arc::clone(&converter);
        tokio::spawn(async move { converter.convert(request("beta.aab")).await })
    };

    let (first, second) = (first.await.unwrap(), second.await.unwrap());
    assert!(matches!(first, ConversionResult::Success { .. }));
    assert!(matches!(second, ConversionResult::Success { .. }));
    assert!(output_dir.join("alpha.apk").exists());
    assert!(output_dir.join("beta.apk").exists());
}
