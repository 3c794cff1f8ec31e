//! Paths and the issue date, resolved once at startup
//!
//! `Config` is built in `main` from command-line flags (each of which can
//! also come from an environment variable) and passed by reference to every
//! command. Nothing mutates it afterwards.

use crate::error::ConstanciaResult;
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Folder under the user's documents directory that receives certificates
pub const OUTPUT_FOLDER: &str = "Certificados-Constancias";

/// Word template looked up next to the executable
pub const TEMPLATE_DOCX: &str = "plantilla_constancias.docx";

/// Blank workbook written by the template download
pub const TEMPLATE_XLSX: &str = "plantilla_constancias.xlsx";

/// Prefix of every generated file name
pub const OUTPUT_PREFIX: &str = "CONSTANCIA_";

/// Extension of generated documents
pub const OUTPUT_EXTENSION: &str = "docx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub downloads_dir: PathBuf,
    /// Date printed as `DIA_REALIZA`
    pub today: NaiveDate,
}

/// Values supplied on the command line; `None` falls back to the defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub template_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub downloads_dir: Option<PathBuf>,
    pub today: Option<NaiveDate>,
}

impl Config {
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self {
            template_path: overrides
                .template_path
                .unwrap_or_else(default_template_path),
            output_dir: overrides.output_dir.unwrap_or_else(default_output_dir),
            downloads_dir: overrides
                .downloads_dir
                .unwrap_or_else(default_downloads_dir),
            today: overrides
                .today
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        }
    }

    /// Where the blank workbook goes
    pub fn template_workbook_path(&self) -> PathBuf {
        self.downloads_dir.join(TEMPLATE_XLSX)
    }

    /// Create the output directory (and parents) if missing
    pub fn ensure_output_dir(&self) -> ConstanciaResult<&Path> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(&self.output_dir)
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `<documents>/Certificados-Constancias`
pub fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| home().join("Documents"))
        .join(OUTPUT_FOLDER)
}

pub fn default_downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| home().join("Downloads"))
}

/// The Word template shipped next to the executable, else in the working
/// directory
pub fn default_template_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_DOCX)))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(TEMPLATE_DOCX))
}
