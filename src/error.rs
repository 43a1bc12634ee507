use thiserror::Error;

/// Every failure the engine can report, as an explicit variant.
///
/// Loader and session failures are terminal for the current invocation:
/// callers report them and exit, no partial ledger is ever exposed.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The source is neither CSV nor JSON tabular data.
    #[error("unsupported file format: {0} (expected CSV or JSON)")]
    Format(String),

    /// A required column is missing from the source.
    #[error("missing required column '{0}' (need date, description, amount)")]
    Schema(String),

    /// A field is present but its value cannot be converted to its typed form.
    #[error("row {row}: could not parse {field} value '{value}'")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// An analytics command ran before any ledger was loaded.
    #[error("no data loaded, run load first")]
    NoSession,

    /// The session store is unreadable or unwritable.
    #[error("session store error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// The source file could not be read at all.
    #[error("could not read source file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_session_message() {
        // This exact wording is what the CLI shows the user.
        assert_eq!(
            AnalyzerError::NoSession.to_string(),
            "no data loaded, run load first"
        );
    }

    #[test]
    fn test_parse_error_names_the_offending_value() {
        let err = AnalyzerError::Parse {
            row: 3,
            field: "date",
            value: "not-a-date".to_string(),
        };
        assert_eq!(err.to_string(), "row 3: could not parse date value 'not-a-date'");
    }

    #[test]
    fn test_schema_error_names_the_column() {
        let err = AnalyzerError::Schema("amount".to_string());
        assert!(err.to_string().contains("'amount'"));
    }
}
