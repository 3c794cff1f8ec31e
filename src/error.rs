use thiserror::Error;

pub type ConstanciaResult<T> = Result<T, ConstanciaError>;

#[derive(Error, Debug)]
pub enum ConstanciaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Columnas faltantes en el archivo Excel: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid date in column '{column}': '{value}'")]
    InvalidDate { column: String, value: String },

    #[error("Missing value for field '{0}'")]
    MissingField(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl ConstanciaError {
    /// Errors that abort the whole batch before (or instead of) touching
    /// further rows. Everything else is isolated to the row that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConstanciaError::Template(_)
                | ConstanciaError::Excel(_)
                | ConstanciaError::MissingColumns(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_names() {
        let err = ConstanciaError::MissingColumns(vec!["fecha3".into(), "interesar".into()]);
        assert_eq!(
            err.to_string(),
            "Columnas faltantes en el archivo Excel: fecha3, interesar"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ConstanciaError::Template("missing".into()).is_fatal());
        assert!(ConstanciaError::Excel("bad".into()).is_fatal());
        assert!(ConstanciaError::MissingColumns(vec![]).is_fatal());
        assert!(!ConstanciaError::MissingField("nombre".into()).is_fatal());
        assert!(!ConstanciaError::InvalidDate {
            column: "fecha1".into(),
            value: "x".into()
        }
        .is_fatal());
    }
}
