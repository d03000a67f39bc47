//! Query input and response output.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::{domain::Operator, Query, QueryResult};

/// Response filename used when no operator is configured.
pub const DEFAULT_RESPONSE_FILE: &str = "response.json";

/// Errors that can occur while reading a query file.
#[derive(Debug, thiserror::Error)]
pub enum QueryFileError {
    /// The file could not be opened.
    #[error("failed to read query file: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid JSON.
    #[error("malformed query file: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is neither an object nor an array of objects.
    #[error("query file must contain an object or an array of objects")]
    Shape,
}

/// Decode queries from JSON: either a single object or an array of objects.
///
/// # Errors
///
/// Returns an error if the input cannot be read, is not JSON, or has any
/// other shape.
pub fn read_queries<R: Read>(reader: R) -> Result<Vec<Query>, QueryFileError> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Object(map) => Ok(vec![Query::from(map)]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(Query::from(map)),
                _ => Err(QueryFileError::Shape),
            })
            .collect(),
        _ => Err(QueryFileError::Shape),
    }
}

/// Decode queries from the file at `path`.
///
/// # Errors
///
/// See [`read_queries`].
pub fn load_queries(path: &Path) -> Result<Vec<Query>, QueryFileError> {
    let queries = read_queries(BufReader::new(File::open(path)?))?;
    tracing::info!("Loaded {} queries from {}", queries.len(), path.display());
    Ok(queries)
}

/// The filename for a query response.
///
/// With an operator this is
/// `response_<id>_<first>_<last>_<YYYYMMDD>_<HHMM>.json`; without one it is
/// [`DEFAULT_RESPONSE_FILE`].
#[must_use]
pub fn response_filename(operator: Option<&Operator>, now: NaiveDateTime) -> PathBuf {
    operator.map_or_else(
        || PathBuf::from(DEFAULT_RESPONSE_FILE),
        |op| {
            PathBuf::from(format!(
                "response_{}_{}_{}_{}.json",
                op.id,
                op.first_name,
                op.last_name,
                now.format("%Y%m%d_%H%M")
            ))
        },
    )
}

/// Write query results as a pretty-printed JSON array to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_response(results: &[QueryResult<'_>], path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::domain::Field;

    #[test]
    fn single_object_is_one_query() {
        let queries = read_queries(r#"{"origin": "LHR", "price": "300"}"#.as_bytes()).unwrap();
        assert_eq!(
            queries,
            [Query::new().with(Field::Origin, "LHR").with(Field::Price, "300")]
        );
    }

    #[test]
    fn array_is_many_queries_in_order() {
        let queries =
            read_queries(r#"[{"origin": "LHR"}, {}, {"price": 100}]"#.as_bytes()).unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[2].as_map()["price"], json!(100));
    }

    #[test]
    fn bad_input_is_an_error() {
        assert!(matches!(
            read_queries("{oops".as_bytes()),
            Err(QueryFileError::Json(_))
        ));
        assert!(matches!(
            read_queries("[1, 2]".as_bytes()),
            Err(QueryFileError::Shape)
        ));
        assert!(matches!(
            read_queries(r#""origin""#.as_bytes()),
            Err(QueryFileError::Shape)
        ));
    }

    #[test]
    fn response_filename_uses_operator_and_time() {
        let now = NaiveDate::from_ymd_opt(2025, 11, 14)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let operator = Operator {
            id: "231ADB234".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        };

        assert_eq!(
            response_filename(Some(&operator), now),
            PathBuf::from("response_231ADB234_Ada_Lovelace_20251114_0905.json")
        );
        assert_eq!(response_filename(None, now), PathBuf::from("response.json"));
    }
}
