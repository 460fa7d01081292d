//! Document-to-disk pipeline.
//!
//! Ties the stages together: load the document, collect its templates,
//! resolve, generate, and write. Nothing is written unless every earlier
//! stage succeeded.

use std::path::{Path, PathBuf};

use crate::error::CompileResult;
use crate::firmware::generator::{GeneratedProfiles, GeneratorOptions, ProfileGenerator};
use crate::firmware::validator::{DuckyPadLimits, ProfileValidator, ValidationReport, ValidationWarning};
use crate::firmware::writer::{write_profiles, WrittenProfile};
use crate::models::{Document, NamedColors};
use crate::parser;
use crate::services::layer_refs::SwitcherIndex;
use crate::services::resolver::{resolve_document, ResolvedDocument};
use crate::services::templates::TemplateStore;

/// Outcome of a full build.
#[derive(Debug)]
pub struct BuildOutput {
    /// Generated profiles and warnings.
    pub generated: GeneratedProfiles,
    /// What was written where.
    pub written: Vec<WrittenProfile>,
}

/// Service running documents through the whole pipeline.
pub struct ProfileService;

impl ProfileService {
    /// Loads a document and every template it references.
    ///
    /// `templates_dir`, when given, is searched before the directories
    /// next to the document.
    ///
    /// # Errors
    ///
    /// Returns parse and I/O errors from the document or a template file.
    pub fn load(
        path: &Path,
        templates_dir: Option<&Path>,
    ) -> CompileResult<(Document, TemplateStore)> {
        let document = parser::load_document(path)?;

        let mut store = TemplateStore::from_document(&document);
        for dir in Self::search_dirs(path, templates_dir) {
            store = store.with_search_dir(dir);
        }
        store.load_referenced(&document)?;

        Ok((document, store))
    }

    /// Loads and resolves a document.
    ///
    /// # Errors
    ///
    /// See [`ProfileService::load`].
    pub fn resolve(path: &Path, templates_dir: Option<&Path>) -> CompileResult<ResolvedDocument> {
        let (document, store) = Self::load(path, templates_dir)?;
        Ok(resolve_document(&document, &store))
    }

    /// Resolves a document and reports every limit problem and warning
    /// without generating.
    ///
    /// # Errors
    ///
    /// See [`ProfileService::load`].
    pub fn check(path: &Path, templates_dir: Option<&Path>) -> CompileResult<ValidationReport> {
        let resolved = Self::resolve(path, templates_dir)?;
        let mut report = ProfileValidator::new(&DuckyPadLimits).validate(&resolved);

        let mut switch_warnings = Vec::new();
        SwitcherIndex::build(&resolved, &mut switch_warnings);
        for warning in &switch_warnings {
            report.add_warning(ValidationWarning::from(warning));
        }
        Ok(report)
    }

    /// Resolves and generates every profile in memory.
    ///
    /// # Errors
    ///
    /// Returns load errors, limit violations, and invalid colors.
    pub fn generate(
        path: &Path,
        templates_dir: Option<&Path>,
        options: GeneratorOptions,
    ) -> CompileResult<GeneratedProfiles> {
        let resolved = Self::resolve(path, templates_dir)?;

        let options = match path.file_name() {
            Some(name) if options.source_name.is_none() => {
                options.with_source_name(name.to_string_lossy())
            }
            _ => options,
        };

        ProfileGenerator::new(&DuckyPadLimits, &NamedColors, options).generate(resolved)
    }

    /// Generates every profile and writes them under `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns any generation error before touching the filesystem, or an
    /// I/O error while writing.
    pub fn build(
        path: &Path,
        templates_dir: Option<&Path>,
        output_dir: &Path,
        options: GeneratorOptions,
    ) -> CompileResult<BuildOutput> {
        let generated = Self::generate(path, templates_dir, options)?;
        let written = write_profiles(&generated, output_dir)?;
        Ok(BuildOutput { generated, written })
    }

    fn search_dirs(path: &Path, templates_dir: Option<&Path>) -> Vec<PathBuf> {
        templates_dir
            .map(Path::to_path_buf)
            .into_iter()
            .chain(TemplateStore::default_search_dirs(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_templates_dir_searched_first() {
        let temp = TempDir::new().unwrap();
        let doc_dir = temp.path().join("docs");
        let custom = temp.path().join("custom");
        fs::create_dir_all(doc_dir.join("templates")).unwrap();
        fs::create_dir_all(&custom).unwrap();

        fs::write(
            doc_dir.join("templates").join("base.yaml"),
            "template:\n  keys:\n    1: { key: a }\n",
        )
        .unwrap();
        fs::write(custom.join("base.yaml"), "template:\n  keys:\n    1: { key: z }\n").unwrap();

        let doc = doc_dir.join("pad.yaml");
        fs::write(&doc, "profile:\n  name: Pad\n  templates: [base]\n").unwrap();

        let resolved = ProfileService::resolve(&doc, Some(custom.as_path())).unwrap();
        assert_eq!(resolved.main.keys[&1].key.as_deref(), Some("z"));

        let resolved = ProfileService::resolve(&doc, None).unwrap();
        assert_eq!(resolved.main.keys[&1].key.as_deref(), Some("a"));
    }

    #[test]
    fn test_generate_uses_file_name_as_source() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("pad.yaml");
        fs::write(&doc, "profile:\n  name: Pad\n  keys:\n    1: { key: a }\n").unwrap();

        let generated = ProfileService::generate(
            &doc,
            None,
            GeneratorOptions::default().with_readme(true),
        )
        .unwrap();
        let readme = generated.profiles[0].file("README.md").unwrap();
        assert!(readme.contains("`pad.yaml`"));
    }
}
