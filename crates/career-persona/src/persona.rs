//! Persona
//!
//! Who the agent speaks as, and the context it answers from. The profile is
//! taken from a résumé PDF in the persona directory when one is present, with
//! a plain-text export as the fallback.

use std::path::{Path, PathBuf};

use crate::error::{PersonaError, Result};

/// Summary file names, in lookup order
const SUMMARY_FILES: [&str; 2] = ["summary.txt", "summary"];

/// Plain-text export of the résumé / LinkedIn profile
const PROFILE_FILE: &str = "profile.txt";

const PDF_EXTENSION: &str = "pdf";

/// The person the agent represents
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub summary: String,
    pub profile: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, summary: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            profile: profile.into(),
        }
    }

    /// Load persona context from `dir`.
    ///
    /// A summary file is required. The profile comes from the first `*.pdf`
    /// (by file name) whose text can be extracted, then `profile.txt`, and is
    /// otherwise left empty.
    pub fn load(dir: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref();

        let summary_path = SUMMARY_FILES
            .iter()
            .map(|file| dir.join(file))
            .find(|path| path.is_file())
            .ok_or_else(|| PersonaError::MissingSummary(dir.to_path_buf()))?;
        let summary = read(&summary_path)?;

        let profile = load_profile(dir)?;

        let persona = Self::new(name, summary, profile);
        tracing::info!(
            name = %persona.name,
            summary_chars = persona.summary.len(),
            profile_chars = persona.profile.len(),
            "Loaded persona"
        );
        Ok(persona)
    }

    /// The fixed system prompt establishing identity and behaviour
    pub fn system_prompt(&self) -> String {
        let name = &self.name;
        let mut prompt = format!(
            "You are acting as {name}. You are answering questions on {name}'s website, \
particularly questions related to {name}'s career, background, skills and experience. \
Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
You are given a summary of {name}'s background and LinkedIn profile which you can use to answer questions. \
Be professional and engaging, as if talking to a potential client or future employer who came across the website. \
If you don't know the answer to any question, use your record_unknown_question tool to record the question that you couldn't answer, even if it's about something trivial or unrelated to career. \
If the user is engaging in discussion, try to steer them towards getting in touch via email; ask for their email and record it using your record_user_details tool. "
        );

        prompt.push_str(&format!(
            "\n\n## Summary:\n{}\n\n## LinkedIn Profile:\n{}\n\n",
            self.summary, self.profile
        ));
        prompt.push_str(&format!(
            "With this context, please chat with the user, always staying in character as {name}."
        ));
        prompt
    }
}

fn load_profile(dir: &Path) -> Result<String> {
    if let Some(pdf_path) = find_pdf(dir)? {
        match extract_pdf_text(&pdf_path)? {
            Some(text) => {
                tracing::info!(path = %pdf_path.display(), "Using résumé PDF as profile");
                return Ok(text);
            }
            None => {
                tracing::warn!(path = %pdf_path.display(), "No text extracted from PDF, trying {}", PROFILE_FILE);
            }
        }
    }

    let profile_path = dir.join(PROFILE_FILE);
    if profile_path.is_file() {
        return read(&profile_path);
    }

    tracing::warn!(dir = %dir.display(), "No profile found, continuing with summary only");
    Ok(String::new())
}

fn find_pdf(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| PersonaError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut pdfs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
        })
        .collect();
    pdfs.sort();

    Ok(pdfs.into_iter().next())
}

/// Text of every page, or `None` when the file is not a readable PDF
fn extract_pdf_text(path: &Path) -> Result<Option<String>> {
    let bytes = std::fs::read(path).map_err(|source| PersonaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match pdf_extract::extract_text_from_mem(&bytes) {
        Ok(text) if !text.trim().is_empty() => Ok(Some(text)),
        Ok(_) => Ok(None),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not extract PDF text");
            Ok(None)
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PersonaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_contents() {
        let persona = Persona::new("Ada Lovelace", "Mathematician.", "Analytical Engine, 1843.");
        let prompt = persona.system_prompt();

        assert!(prompt.starts_with("You are acting as Ada Lovelace."));
        assert!(prompt.contains("record_unknown_question"));
        assert!(prompt.contains("record_user_details"));
        assert!(prompt.contains("## Summary:\nMathematician."));
        assert!(prompt.contains("## LinkedIn Profile:\nAnalytical Engine, 1843."));
        assert!(prompt.ends_with("always staying in character as Ada Lovelace."));
    }

    #[test]
    fn test_load_prefers_summary_txt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summary.txt"), "new summary").unwrap();
        std::fs::write(dir.path().join("summary"), "old summary").unwrap();
        std::fs::write(dir.path().join("profile.txt"), "profile text").unwrap();

        let persona = Persona::load(dir.path(), "Ada").unwrap();
        assert_eq!(persona.summary, "new summary");
        assert_eq!(persona.profile, "profile text");
    }

    #[test]
    fn test_load_falls_back_to_legacy_summary() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summary"), "old summary").unwrap();

        let persona = Persona::load(dir.path(), "Ada").unwrap();
        assert_eq!(persona.summary, "old summary");
        assert!(persona.profile.is_empty());
    }

    #[test]
    fn test_load_requires_summary() {
        let dir = tempfile::tempdir().unwrap();
        let err = Persona::load(dir.path(), "Ada").unwrap_err();
        assert!(matches!(err, PersonaError::MissingSummary(_)));
    }

    /// One-page PDF with `text` set in a base-14 font
    fn pdf_with_text(text: &str) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{Document, Object, Stream, dictionary};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_load_reads_profile_from_pdf() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summary.txt"), "summary").unwrap();
        std::fs::write(dir.path().join("profile.txt"), "stale export").unwrap();
        std::fs::write(dir.path().join("resume_for_Virtual_Assistant.pdf"), pdf_with_text("Analytical Engine")).unwrap();

        let persona = Persona::load(dir.path(), "Ada").unwrap();
        assert!(persona.profile.contains("Analytical Engine"));
        assert!(!persona.profile.contains("stale export"));
    }

    #[test]
    fn test_unreadable_pdf_falls_back_to_profile_txt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summary.txt"), "summary").unwrap();
        std::fs::write(dir.path().join("profile.txt"), "profile text").unwrap();
        std::fs::write(dir.path().join("resume.PDF"), b"not really a pdf").unwrap();

        let persona = Persona::load(dir.path(), "Ada").unwrap();
        assert_eq!(persona.profile, "profile text");
    }
}
