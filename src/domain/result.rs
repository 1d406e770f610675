//! Result type alias for GeoExport

use super::errors::GeoExportError;

/// Result type alias for GeoExport operations
///
/// # Examples
///
/// ```
/// use geoexport::domain::result::Result;
/// use geoexport::domain::errors::GeoExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GeoExportError::Encoding("bad ring".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeoExportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::GeoExportError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(GeoExportError::Projection("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
