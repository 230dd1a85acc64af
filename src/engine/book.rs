//! File-backed engine implementation.
//!
//! Books persist as JSON `.omr` files next to their source (or under a
//! configured base folder): radix, source path, and the per-sheet stub
//! records with the latest step each sheet has reached. Export writes a
//! MusicXML container, print a minimal PDF; the transcription content of
//! individual steps is the recognition engine's concern, not this layer's.
use std::collections::BTreeSet;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::radix::{AliasTable, radix_of};
use crate::core::step::Step;
use crate::engine::{Book, Engine};
use crate::error::{Error, Result};

/// One sheet of a book: 1-based number, validity, latest step reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetStub {
    pub number: u32,
    pub valid: bool,
    pub step: Option<Step>,
}

/// Persisted form of a [`ScoreBook`].
#[derive(Debug, Serialize, Deserialize)]
struct BookFile {
    radix: String,
    source: PathBuf,
    sheet_count: u32,
    stubs: Vec<SheetStub>,
}

/// Script file: a source to load plus steps to apply to every valid sheet.
#[derive(Debug, Serialize, Deserialize)]
struct ScriptFile {
    source: PathBuf,
    #[serde(default)]
    steps: Vec<Step>,
}

/// The file-backed [`Engine`].
#[derive(Debug, Default)]
pub struct OmrEngine {
    /// Folder under which book folders are created; defaults to the
    /// source's parent folder.
    base_folder: Option<PathBuf>,
    aliases: AliasTable,
}

impl OmrEngine {
    pub fn new(base_folder: Option<PathBuf>, aliases: AliasTable) -> Self {
        Self {
            base_folder,
            aliases,
        }
    }

    /// Book folder for a given source: `<base>/<radix>`.
    fn book_folder(&self, source: &Path, radix: &str) -> PathBuf {
        let base = match &self.base_folder {
            Some(base) => base.clone(),
            None => source.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        };
        base.join(radix)
    }

    fn new_book(&self, source: &Path, sheet_count: u32) -> ScoreBook {
        let radix = radix_of(source, &self.aliases);
        let folder = self.book_folder(source, &radix);
        ScoreBook {
            book_path: folder.join(format!("{radix}.omr")),
            radix,
            source: source.to_path_buf(),
            sheet_count,
            stubs: Vec::new(),
            tabs_ready: false,
            closed: false,
        }
    }
}

impl Engine for OmrEngine {
    fn load_script(&self, path: &Path) -> Result<Box<dyn Book>> {
        let content = fs::read_to_string(path).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let script: ScriptFile = serde_json::from_str(&content).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        info!("Running script {} on {}", path.display(), script.source.display());
        let mut book = self.new_book(&script.source, 1);
        book.create_stubs(None)?;

        for step in script.steps {
            for number in book.valid_stub_numbers() {
                book.ensure_step(number, step)?;
            }
        }

        Ok(Box::new(book))
    }

    fn load_input(&self, path: &Path) -> Result<Box<dyn Book>> {
        // A fresh input carries a single sheet until the recognition engine
        // says otherwise; stubs are created by the pipeline.
        debug!("Loading input {}", path.display());
        Ok(Box::new(self.new_book(path, 1)))
    }

    fn load_book(&self, path: &Path) -> Result<Box<dyn Book>> {
        debug!("Loading book {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let file: BookFile = serde_json::from_str(&content).map_err(|e| Error::Load {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        Ok(Box::new(ScoreBook {
            radix: file.radix,
            source: file.source,
            book_path: path.to_path_buf(),
            sheet_count: file.sheet_count,
            stubs: file.stubs,
            tabs_ready: false,
            closed: false,
        }))
    }
}

/// The file-backed [`Book`].
#[derive(Debug)]
pub struct ScoreBook {
    radix: String,
    source: PathBuf,
    book_path: PathBuf,
    sheet_count: u32,
    stubs: Vec<SheetStub>,
    tabs_ready: bool,
    closed: bool,
}

impl ScoreBook {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether per-sheet presentation has been made available.
    pub fn tabs_ready(&self) -> bool {
        self.tabs_ready
    }

    fn stub_mut(&mut self, number: u32) -> Result<&mut SheetStub> {
        let radix = self.radix.clone();
        self.stubs
            .iter_mut()
            .find(|s| s.number == number)
            .ok_or(Error::UnknownSheet { radix, number })
    }
}

impl Book for ScoreBook {
    fn radix(&self) -> &str {
        &self.radix
    }

    fn default_path(&self) -> PathBuf {
        self.book_path.clone()
    }

    fn stub_numbers(&self) -> Vec<u32> {
        self.stubs.iter().map(|s| s.number).collect()
    }

    fn valid_stub_numbers(&self) -> Vec<u32> {
        self.stubs
            .iter()
            .filter(|s| s.valid)
            .map(|s| s.number)
            .collect()
    }

    fn first_valid_stub(&self) -> Option<u32> {
        self.stubs.iter().find(|s| s.valid).map(|s| s.number)
    }

    fn create_stubs(&mut self, subset: Option<&BTreeSet<u32>>) -> Result<()> {
        // Only sheets the source actually has, filtered by the subset.
        self.stubs = (1..=self.sheet_count)
            .filter(|n| subset.is_none_or(|ids| ids.contains(n)))
            .map(|number| SheetStub {
                number,
                valid: true,
                step: None,
            })
            .collect();
        Ok(())
    }

    fn create_stub_tabs(&mut self) {
        self.tabs_ready = true;
    }

    fn ensure_step(&mut self, number: u32, target: Step) -> Result<()> {
        let stub = self.stub_mut(number)?;
        if !stub.valid {
            return Ok(());
        }
        match stub.step {
            Some(reached) if reached >= target => {}
            _ => {
                debug!("Sheet {} reaching step {}", number, target);
                stub.step = Some(target);
            }
        }
        Ok(())
    }

    fn export_to(&self, number: u32, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(target)?;
        let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("score-partwise");
        root.push_attribute(("version", "3.1"));
        writer.write_event(Event::Start(root))?;

        writer.write_event(Event::Start(BytesStart::new("movement-title")))?;
        writer.write_event(Event::Text(BytesText::new(&self.radix)))?;
        writer.write_event(Event::End(BytesEnd::new("movement-title")))?;

        writer.write_event(Event::Start(BytesStart::new("identification")))?;
        writer.write_event(Event::Start(BytesStart::new("encoding")))?;
        writer.write_event(Event::Start(BytesStart::new("software")))?;
        writer.write_event(Event::Text(BytesText::new("scorebook")))?;
        writer.write_event(Event::End(BytesEnd::new("software")))?;
        writer.write_event(Event::Start(BytesStart::new("encoding-date")))?;
        let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
        writer.write_event(Event::Text(BytesText::new(&date)))?;
        writer.write_event(Event::End(BytesEnd::new("encoding-date")))?;
        writer.write_event(Event::End(BytesEnd::new("encoding")))?;
        writer.write_event(Event::End(BytesEnd::new("identification")))?;

        let mut part = BytesStart::new("part");
        let id = format!("sheet-{number}");
        part.push_attribute(("id", id.as_str()));
        writer.write_event(Event::Empty(part))?;

        writer.write_event(Event::End(BytesEnd::new("score-partwise")))?;
        info!("Exported {} to {}", self.radix, target.display());
        Ok(())
    }

    fn print_to(&self, _number: u32, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, minimal_pdf(&self.radix))?;
        info!("Printed {} to {}", self.radix, target.display());
        Ok(())
    }

    fn store(&self, path: &Path, backup: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if backup && path.exists() {
            let mut backup_path = path.as_os_str().to_owned();
            backup_path.push(".backup");
            fs::rename(path, PathBuf::from(backup_path))?;
        }

        let file = BookFile {
            radix: self.radix.clone(),
            source: self.source.clone(),
            sheet_count: self.sheet_count,
            stubs: self.stubs.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| Error::format(path, e))?;
        fs::write(path, json)?;
        info!("Stored book {} to {}", self.radix, path.display());
        Ok(())
    }

    fn close(&mut self) {
        debug!("Closing book {}", self.radix);
        self.closed = true;
    }
}

/// A one-page PDF naming the book. Real page rendering belongs to the
/// recognition engine.
fn minimal_pdf(title: &str) -> Vec<u8> {
    let text = title.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)");
    let content = format!("BT /F1 12 Tf 72 770 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }
    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    out.into_bytes()
}
