//! Working paths inside the fixed output directory.

use std::path::{Path, PathBuf};

/// Deterministic filesystem layout for one conversion.
///
/// All conversions share these fixed intermediate names, which is why the
/// pipeline serializes conversions: two in-flight runs would corrupt each
/// other's intermediates.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Intermediate multi-package archive written by bundletool.
    pub apks_path: PathBuf,
    /// Universal APK as unpacked from the archive.
    pub universal_apk: PathBuf,
    /// Table-of-contents blob shipped inside the archive.
    pub toc_path: PathBuf,
    /// Final artifact, `<bundle-base-name>.apk`.
    pub final_apk: PathBuf,
    /// File name of the final artifact.
    pub artifact_name: String,
}

impl OutputLayout {
    /// Derives the working paths for `bundle_path` inside `output_dir`.
    pub fn new(output_dir: &Path, bundle_path: &str) -> Self {
        let base = Path::new(bundle_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "result".to_string());
        let artifact_name = format!("{}.apk", base);

        Self {
            apks_path: output_dir.join("result.apks"),
            universal_apk: output_dir.join("universal.apk"),
            toc_path: output_dir.join("toc.pb"),
            final_apk: output_dir.join(&artifact_name),
            artifact_name,
        }
    }
}

/// Returns the fixed per-user output directory (the documents folder).
pub fn default_output_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_name_derives_from_bundle_base_name() {
        let layout = OutputLayout::new(Path::new("/out"), "/builds/app-release.aab");
        assert_eq!(layout.artifact_name, "app-release.apk");
        assert_eq!(layout.final_apk, Path::new("/out/app-release.apk"));
    }

    #[test]
    fn intermediates_use_fixed_names() {
        let layout = OutputLayout::new(Path::new("/out"), "whatever.aab");
        assert_eq!(layout.apks_path, Path::new("/out/result.apks"));
        assert_eq!(layout.universal_apk, Path::new("/out/universal.apk"));
        assert_eq!(layout.toc_path, Path::new("/out/toc.pb"));
    }

    #[test]
    fn pathological_bundle_path_falls_back_to_result() {
        let layout = OutputLayout::new(Path::new("/out"), "");
        assert_eq!(layout.artifact_name, "result.apk");
    }

    #[test]
    fn extensionless_bundle_keeps_its_name() {
        let layout = OutputLayout::new(Path::new("/out"), "/builds/mybundle");
        assert_eq!(layout.artifact_name, "mybundle.apk");
    }
}
