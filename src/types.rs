use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::{ConstanciaError, ConstanciaResult};

//==============================================================================
// Dataset Types
//==============================================================================

/// Required dataset columns, in the order the blank template workbook lists them.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "nombre",
    "tipo",
    "id",
    "programa",
    "ficha",
    "fecha1",
    "fecha2",
    "fecha3",
    "fecha4",
    "interesar",
];

/// A single spreadsheet cell as read from the workbook
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value the way it is written into a document
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(true) => "VERDADERO".to_string(),
            CellValue::Bool(false) => "FALSO".to_string(),
            CellValue::Date(dt) => dt.date().format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Integral numbers lose the decimal part (identification numbers are usually
/// stored as floats by spreadsheets)
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One data row of the sheet; `number` is the 1-based spreadsheet row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub number: usize,
    pub cells: Vec<CellValue>,
}

/// The first worksheet of a workbook, with normalized header names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of `record` under column `name`; missing trailing cells read as empty
    pub fn cell<'a>(&self, record: &'a Record, name: &str) -> Option<&'a CellValue> {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.column_index(name)
            .map(|idx| record.cells.get(idx).unwrap_or(EMPTY))
    }

    /// `column=value` pairs for every column, used when logging a failed row
    pub fn dump(&self, record: &Record) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let value = record
                    .cells
                    .get(idx)
                    .map(CellValue::render)
                    .unwrap_or_default();
                format!("{}={:?}", col, value)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Typed view of one record holding the fields a certificate needs
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub number: usize,
    pub nombre: CellValue,
    pub tipo: CellValue,
    pub id: CellValue,
    pub programa: CellValue,
    pub ficha: CellValue,
    pub fechas: [CellValue; 4],
    pub interesar: CellValue,
}

impl Row {
    /// Build the typed row. Columns are expected to be validated already; a
    /// column that is still absent is reported as a missing field.
    pub fn from_record(dataset: &Dataset, record: &Record) -> ConstanciaResult<Self> {
        let field = |name: &str| -> ConstanciaResult<CellValue> {
            dataset
                .cell(record, name)
                .cloned()
                .ok_or_else(|| ConstanciaError::MissingField(name.to_string()))
        };

        Ok(Self {
            number: record.number,
            nombre: field("nombre")?,
            tipo: field("tipo")?,
            id: field("id")?,
            programa: field("programa")?,
            ficha: field("ficha")?,
            fechas: [
                field("fecha1")?,
                field("fecha2")?,
                field("fecha3")?,
                field("fecha4")?,
            ],
            interesar: field("interesar")?,
        })
    }

    /// The person's name, required to name the output file. Surrounding
    /// whitespace is dropped so it never turns into `_` in the file name.
    pub fn name(&self) -> ConstanciaResult<String> {
        if self.nombre.is_blank() {
            return Err(ConstanciaError::MissingField("nombre".to_string()));
        }
        Ok(self.nombre.render().trim().to_string())
    }
}

//==============================================================================
// Placeholders
//==============================================================================

/// The closed set of tokens a row can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Nombre,
    TipoDeDocumento,
    NumeroIdentificacion,
    NombreDelPrograma,
    NumeroFicha,
    FechaOne,
    FechaTwo,
    FechaThree,
    FechaFour,
    Interesar,
    DiaRealiza,
}

impl Placeholder {
    pub const ALL: [Placeholder; 11] = [
        Placeholder::Nombre,
        Placeholder::TipoDeDocumento,
        Placeholder::NumeroIdentificacion,
        Placeholder::NombreDelPrograma,
        Placeholder::NumeroFicha,
        Placeholder::FechaOne,
        Placeholder::FechaTwo,
        Placeholder::FechaThree,
        Placeholder::FechaFour,
        Placeholder::Interesar,
        Placeholder::DiaRealiza,
    ];

    /// Token name as written between `{{` and `}}` in the template.
    /// Matching is exact: note the space in `NOMBRE DEL PROGRAMA` and the
    /// lowercase `interesar`.
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Nombre => "NOMBRE",
            Placeholder::TipoDeDocumento => "TIPO_DE_DOCUMENTO",
            Placeholder::NumeroIdentificacion => "NUMERO_IDENTIFICACION",
            Placeholder::NombreDelPrograma => "NOMBRE DEL PROGRAMA",
            Placeholder::NumeroFicha => "NUMERO_FICHA",
            Placeholder::FechaOne => "FECHA_ONE",
            Placeholder::FechaTwo => "FECHA_TWO",
            Placeholder::FechaThree => "FECHA_THREE",
            Placeholder::FechaFour => "FECHA_FOUR",
            Placeholder::Interesar => "interesar",
            Placeholder::DiaRealiza => "DIA_REALIZA",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.token() == token)
    }

    /// Date placeholders in column order (`fecha1`..`fecha4`)
    pub fn dates() -> [Placeholder; 4] {
        [
            Placeholder::FechaOne,
            Placeholder::FechaTwo,
            Placeholder::FechaThree,
            Placeholder::FechaFour,
        ]
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.token())
    }
}

/// Token name → rendered value, built fresh for every row.
///
/// Keys can only enter through [`Placeholder`], so the map never holds a
/// token the generator does not know about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionMap {
    values: HashMap<&'static str, String>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder.token(), value.into());
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.insert(placeholder, value);
        self
    }

    /// Exact, case-sensitive lookup by token name
    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//==============================================================================
// Batch Report
//==============================================================================

/// A row that could not be turned into a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    pub row_number: usize,
    pub name: String,
    pub error: String,
}

/// Outcome of one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub output_dir: std::path::PathBuf,
    pub generated: Vec<std::path::PathBuf>,
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }
}
