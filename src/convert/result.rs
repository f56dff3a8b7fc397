//! Output files and the result of a conversion.

use crate::common::{Diagnostics, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A single generated output file.
///
/// Master files carry document content; auxiliary files are everything
/// else a master refers to (style sheets, included chapters).
#[derive(Debug, Clone)]
pub struct OutputFile {
    name: String,
    mime: &'static str,
    is_master: bool,
    contains_math: bool,
    bytes: Vec<u8>,
}

impl OutputFile {
    /// Create an output file
    pub fn new(name: impl Into<String>, mime: &'static str, is_master: bool, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            is_master,
            contains_math: false,
            bytes,
        }
    }

    /// Mark the file as containing mathematical content
    #[inline]
    pub fn with_math(mut self, contains_math: bool) -> Self {
        self.contains_math = contains_math;
        self
    }

    /// The file name, relative to the output directory
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The MIME type of the content
    pub fn mime(&self) -> &str {
        self.mime
    }

    /// Whether this is a master document
    pub fn is_master(&self) -> bool {
        self.is_master
    }

    /// Whether the file contains mathematical content
    pub fn contains_math(&self) -> bool {
        self.contains_math
    }

    /// The file content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the file, returning the content
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the file below `dir`, creating directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or the file
    /// cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// One entry in the content table of a conversion result.
///
/// Content entries describe where the document headings ended up, so a
/// caller can build navigation without parsing the output.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    /// Heading text
    pub title: String,
    /// Outline level, 1 is the topmost
    pub level: u8,
    /// Name of the output file holding the heading
    pub file: String,
    /// Anchor within the file, empty when the file itself is the target
    pub target: String,
}

impl ContentEntry {
    /// Create a content entry
    pub fn new(title: impl Into<String>, level: u8, file: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level,
            file: file.into(),
            target: target.into(),
        }
    }

    /// The reference for a link to this entry, `file#target` or `file`
    pub fn href(&self) -> String {
        if self.target.is_empty() {
            self.file.clone()
        } else {
            format!("{}#{}", self.file, self.target)
        }
    }
}

/// The complete result of converting one document.
///
/// Files are ordered with master documents first, auxiliary files after
/// them, so `files().first()` is always the primary output.
#[derive(Debug, Clone, Default)]
pub struct ConverterResult {
    files: Vec<OutputFile>,
    masters: usize,
    content: Vec<ContentEntry>,
    title_page: Option<usize>,
    toc: Option<usize>,
    bibliography: Option<usize>,
    cover: Option<usize>,
    diagnostics: Diagnostics,
}

impl ConverterResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a master document, keeping masters ahead of auxiliary files.
    /// Returns the index of the added file.
    pub fn add_master(&mut self, file: OutputFile) -> usize {
        let index = self.masters;
        self.files.insert(index, file);
        self.masters += 1;
        for role in [
            &mut self.title_page,
            &mut self.toc,
            &mut self.bibliography,
            &mut self.cover,
        ] {
            if let Some(i) = role {
                if *i >= index {
                    *i += 1;
                }
            }
        }
        index
    }

    /// Add an auxiliary file. Returns the index of the added file.
    pub fn add(&mut self, file: OutputFile) -> usize {
        self.files.push(file);
        self.files.len() - 1
    }

    /// All files, masters first
    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    /// The primary master document, if any file was produced
    pub fn master(&self) -> Option<&OutputFile> {
        self.files.first().filter(|f| f.is_master())
    }

    /// The master documents
    pub fn masters(&self) -> &[OutputFile] {
        &self.files[..self.masters]
    }

    /// Append a content entry
    pub fn add_content(&mut self, entry: ContentEntry) {
        self.content.push(entry);
    }

    /// The content table, in document order
    pub fn content(&self) -> &[ContentEntry] {
        &self.content
    }

    pub fn set_title_page(&mut self, index: usize) {
        self.title_page = Some(index);
    }

    pub fn set_toc(&mut self, index: usize) {
        self.toc = Some(index);
    }

    pub fn set_bibliography(&mut self, index: usize) {
        self.bibliography = Some(index);
    }

    pub fn set_cover(&mut self, index: usize) {
        self.cover = Some(index);
    }

    /// The file holding the title page, if one was identified
    pub fn title_page(&self) -> Option<&OutputFile> {
        self.title_page.and_then(|i| self.files.get(i))
    }

    /// The file holding the table of contents, if one was identified
    pub fn toc(&self) -> Option<&OutputFile> {
        self.toc.and_then(|i| self.files.get(i))
    }

    /// The file holding the bibliography, if one was identified
    pub fn bibliography(&self) -> Option<&OutputFile> {
        self.bibliography.and_then(|i| self.files.get(i))
    }

    /// The cover file, if one was identified
    pub fn cover(&self) -> Option<&OutputFile> {
        self.cover.and_then(|i| self.files.get(i))
    }

    /// Diagnostics collected during the conversion
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Write every file below `dir` and return the written paths
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be written.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut paths = Vec::with_capacity(self.files.len());
        for file in &self.files {
            paths.push(file.write_to(dir)?);
        }
        Ok(paths)
    }
}
