// In: src/resolver.rs

//! Model-file discovery.
//!
//! The two AI transforms load their weights from model files installed by
//! platform-specific installers into a handful of well-known directories.
//! This module generates every candidate location for a model and returns the
//! first one that exists on disk. Resolution is read-only and uncached: every
//! call probes the filesystem afresh.
//!
//! Candidate order is directory-major: for each directory in order, for each
//! base name in order, for each extension in order. Directory order therefore
//! dominates the newest-first base-name lists — an older model version in an
//! earlier-listed directory wins over a newer version in a later one.

use std::path::{Path, PathBuf};

use crate::error::StarflowError;

//==================================================================================
// I. Resolved Path Evidence
//==================================================================================

/// An absolute model path proven to exist at resolution time.
///
/// Only the resolver constructs these; holding one is evidence that the file
/// was present when the run started. It is checked once per run, not
/// re-validated on reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModelPath(PathBuf);

impl ResolvedModelPath {
    pub(crate) fn new(path: PathBuf) -> Self {
        ResolvedModelPath(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ResolvedModelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.display().fmt(f)
    }
}

//==================================================================================
// II. Candidate Generation & Resolution
//==================================================================================

/// Build every candidate path in resolution order:
/// `dirs` outermost, then `base_names`, then `extensions`.
///
/// Extensions carry their leading dot and are appended verbatim, so versioned
/// base names like `BlurXTerminator.5` survive intact.
pub fn candidate_paths(
    base_names: &[&str],
    dirs: &[PathBuf],
    extensions: &[&str],
) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(dirs.len() * base_names.len() * extensions.len());
    for dir in dirs {
        for base in base_names {
            for ext in extensions {
                out.push(dir.join(format!("{base}{ext}")));
            }
        }
    }
    out
}

/// Find the first existing model file among the candidates.
///
/// Fails with [`StarflowError::ModelNotFound`] carrying the complete ordered
/// candidate list when nothing exists.
pub fn resolve_model(
    base_names: &[&str],
    dirs: &[PathBuf],
    extensions: &[&str],
) -> Result<ResolvedModelPath, StarflowError> {
    let candidates = candidate_paths(base_names, dirs, extensions);
    for candidate in &candidates {
        if candidate.exists() {
            log::debug!("resolved model file: {}", candidate.display());
            return Ok(ResolvedModelPath::new(candidate.clone()));
        }
    }
    Err(StarflowError::ModelNotFound {
        checked: candidates,
    })
}

//==================================================================================
// III. Default Catalogs
//==================================================================================

/// Known base names for the stellar sharpening model, newest first.
pub const SHARPEN_MODEL_BASES: [&str; 3] = [
    "BlurXTerminator.5",
    "BlurXTerminator.4",
    "BlurXTerminator.3",
];

/// Known base names for the star-separation model, newest first.
pub const SEPARATION_MODEL_BASES: [&str; 3] = [
    "StarXTerminator.12",
    "StarXTerminator.11",
    "StarXTerminator.10",
];

/// Model file extensions in preference order: packaged Core ML first, legacy
/// Core ML second, TensorFlow graph (the cross-platform fallback) last.
pub const MODEL_EXTENSIONS: [&str; 3] = [".mlpackage", ".mlmodel", ".pb"];

/// Standard install directories across macOS and Windows, in search order.
///
/// Per-user directories are skipped when no home directory can be determined.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    // macOS
    dirs.push(PathBuf::from("/Applications/PixInsight/library"));
    if let Some(home) = home_dir() {
        dirs.push(home.join("Library/Application Support/RC-Astro/BlurXTerminator"));
        dirs.push(home.join("Library/Application Support/RC-Astro/StarXTerminator"));
    }
    dirs.push(PathBuf::from(
        "/Library/Application Support/RC-Astro/BlurXTerminator",
    ));
    dirs.push(PathBuf::from(
        "/Library/Application Support/RC-Astro/StarXTerminator",
    ));

    // Windows
    dirs.push(PathBuf::from("C:/Program Files/PixInsight/library"));
    if let Some(home) = home_dir() {
        dirs.push(home.join("AppData/Roaming/RC-Astro/BlurXTerminator"));
        dirs.push(home.join("AppData/Roaming/RC-Astro/StarXTerminator"));
    }
    dirs.push(PathBuf::from("C:/ProgramData/RC-Astro/BlurXTerminator"));
    dirs.push(PathBuf::from("C:/ProgramData/RC-Astro/StarXTerminator"));

    dirs
}

/// Resolve the stellar sharpening model from the standard install locations.
pub fn resolve_sharpen_model() -> Result<ResolvedModelPath, StarflowError> {
    resolve_model(
        &SHARPEN_MODEL_BASES,
        &default_search_dirs(),
        &MODEL_EXTENSIONS,
    )
}

/// Resolve the star-separation model from the standard install locations.
pub fn resolve_separation_model() -> Result<ResolvedModelPath, StarflowError> {
    resolve_model(
        &SEPARATION_MODEL_BASES,
        &default_search_dirs(),
        &MODEL_EXTENSIONS,
    )
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dirs(paths: &[&PathBuf]) -> Vec<PathBuf> {
        paths.iter().map(|p| (*p).clone()).collect()
    }

    #[test]
    fn candidate_order_is_directory_major() {
        let dirs = vec![PathBuf::from("/d1"), PathBuf::from("/d2")];
        let bases = ["Model.2", "Model.1"];
        let exts = [".mlpackage", ".pb"];

        let candidates = candidate_paths(&bases, &dirs, &exts);

        assert_eq!(candidates.len(), 2 * 2 * 2);
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/d1/Model.2.mlpackage"),
                PathBuf::from("/d1/Model.2.pb"),
                PathBuf::from("/d1/Model.1.mlpackage"),
                PathBuf::from("/d1/Model.1.pb"),
                PathBuf::from("/d2/Model.2.mlpackage"),
                PathBuf::from("/d2/Model.2.pb"),
                PathBuf::from("/d2/Model.1.mlpackage"),
                PathBuf::from("/d2/Model.1.pb"),
            ]
        );
    }

    #[test]
    fn first_existing_candidate_wins() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let d1 = tmp.path().join("d1");
        let d2 = tmp.path().join("d2");
        fs::create_dir_all(&d1).unwrap();
        fs::create_dir_all(&d2).unwrap();

        // Legacy extension in d1, preferred extension in d2.
        fs::write(d1.join("Model.1.pb"), b"w").unwrap();
        fs::write(d2.join("Model.1.mlpackage"), b"w").unwrap();

        let resolved =
            resolve_model(&["Model.1"], &dirs(&[&d1, &d2]), &MODEL_EXTENSIONS).expect("resolve");
        assert_eq!(resolved.as_path(), d1.join("Model.1.pb"));
    }

    #[test]
    fn directory_order_dominates_version_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let d1 = tmp.path().join("d1");
        let d2 = tmp.path().join("d2");
        fs::create_dir_all(&d1).unwrap();
        fs::create_dir_all(&d2).unwrap();

        // Older version in the earlier directory, newest in the later one.
        fs::write(d1.join("Model.1.pb"), b"old").unwrap();
        fs::write(d2.join("Model.2.pb"), b"new").unwrap();

        let resolved =
            resolve_model(&["Model.2", "Model.1"], &dirs(&[&d1, &d2]), &[".pb"]).expect("resolve");
        assert_eq!(resolved.as_path(), d1.join("Model.1.pb"));
    }

    #[test]
    fn extension_preference_within_one_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let d1 = tmp.path().join("d1");
        fs::create_dir_all(&d1).unwrap();

        fs::write(d1.join("Model.2.pb"), b"w").unwrap();
        fs::write(d1.join("Model.2.mlmodel"), b"w").unwrap();

        let resolved =
            resolve_model(&["Model.2"], &dirs(&[&d1]), &MODEL_EXTENSIONS).expect("resolve");
        assert_eq!(resolved.as_path(), d1.join("Model.2.mlmodel"));
    }

    #[test]
    fn not_found_carries_full_ordered_candidate_list() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let d1 = tmp.path().join("empty");
        fs::create_dir_all(&d1).unwrap();

        let bases = ["A.2", "A.1"];
        let err = resolve_model(&bases, &dirs(&[&d1]), &MODEL_EXTENSIONS).unwrap_err();

        match err {
            StarflowError::ModelNotFound { checked } => {
                assert_eq!(checked.len(), 1 * 2 * 3);
                assert_eq!(checked, candidate_paths(&bases, &dirs(&[&d1]), &MODEL_EXTENSIONS));
            }
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[test]
    fn default_catalogs_are_newest_first() {
        assert!(SHARPEN_MODEL_BASES[0].ends_with(".5"));
        assert!(SEPARATION_MODEL_BASES[0].ends_with(".12"));
        assert_eq!(MODEL_EXTENSIONS[0], ".mlpackage");
    }
}
