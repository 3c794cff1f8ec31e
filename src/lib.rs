//! Constancias - certificate batch generator
//!
//! Reads rows from a spreadsheet and fills a Word template with each row's
//! values, writing one `CONSTANCIA_<name>.docx` per row.
//!
//! # Features
//!
//! - `{{TOKEN}}` placeholders in template paragraphs
//! - Spanish long-form dates (`15 de marzo de 2024`)
//! - Column validation before any document is written
//! - Per-row error isolation: one bad row never stops the batch
//! - Blank Excel template with the required headers
//!
//! # Example
//!
//! ```no_run
//! use constancias::config::{Config, ConfigOverrides};
//! use constancias::core::Generator;
//!
//! let config = Config::resolve(ConfigOverrides::default());
//! let report = Generator::new(&config).generate_from_excel("datos.xlsx")?;
//!
//! println!("{} certificados en {}", report.generated_count(), report.output_dir.display());
//! # Ok::<(), constancias::error::ConstanciaError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod docx;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConstanciaError, ConstanciaResult};
pub use types::{BatchReport, CellValue, Dataset, Placeholder, Row, SubstitutionMap};
