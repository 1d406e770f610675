//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GeoExportConfig;
use crate::domain::errors::GeoExportError;
use crate::domain::result::Result;
use crate::domain::ExportFormat;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`GeoExportConfig`]
/// 4. Applies environment variable overrides (`GEOEXPORT_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`GeoExportError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use geoexport::config::loader::load_config;
///
/// let config = load_config("geoexport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GeoExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GeoExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GeoExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Same as [`load_config`] for configuration text already in memory
pub fn parse_config(contents: &str) -> Result<GeoExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: GeoExportConfig = toml::from_str(&contents)
        .map_err(|e| GeoExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GeoExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GeoExportError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(GeoExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Applies environment variable overrides using the `GEOEXPORT_*` prefix
///
/// Variables follow the pattern `GEOEXPORT_<SECTION>_<KEY>`, for example
/// `GEOEXPORT_EXPORT_OUTPUT_NAME` or `GEOEXPORT_DELIVERY_OUTPUT_DIR`. List
/// values (`formats`, `bounds`) are comma separated.
fn apply_env_overrides(config: &mut GeoExportConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("GEOEXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("GEOEXPORT_EXPORT_GEOMETRY") {
        config.export.geometry = val;
    }
    if let Ok(val) = std::env::var("GEOEXPORT_EXPORT_OUTPUT_NAME") {
        config.export.output_name = Some(val);
    }
    if let Ok(val) = std::env::var("GEOEXPORT_EXPORT_BOUNDS") {
        config.export.bounds = Some(parse_bounds(&val)?);
    }
    if let Ok(val) = std::env::var("GEOEXPORT_EXPORT_FORMATS") {
        config.export.formats = parse_formats(&val)?;
    }

    // Delivery overrides
    if let Ok(val) = std::env::var("GEOEXPORT_DELIVERY_OUTPUT_DIR") {
        config.delivery.output_dir = val;
    }
    if let Ok(val) = std::env::var("GEOEXPORT_DELIVERY_STAGING_DIR") {
        config.delivery.staging_dir = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GEOEXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.trim().parse::<bool>().map_err(|_| {
            GeoExportError::Configuration(format!(
                "Invalid GEOEXPORT_LOGGING_LOCAL_ENABLED '{val}': expected true or false"
            ))
        })?;
    }
    if let Ok(val) = std::env::var("GEOEXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("GEOEXPORT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

/// Parses `xmin,ymin,xmax,ymax`
pub(crate) fn parse_bounds(value: &str) -> Result<[f64; 4]> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| GeoExportError::Configuration(format!("Invalid bounds '{value}': {e}")))?;
    <[f64; 4]>::try_from(parts).map_err(|parts| {
        GeoExportError::Configuration(format!(
            "Invalid bounds '{value}': expected 4 numbers, got {}",
            parts.len()
        ))
    })
}

/// Parses a comma-separated format list such as `geojson,shapefile`
pub(crate) fn parse_formats(value: &str) -> Result<Vec<ExportFormat>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ExportFormat>().map_err(GeoExportError::Configuration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeometryKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("GEOEXPORT_LOADER_TEST_NAME", "parcels");
        let input = "output_name = \"${GEOEXPORT_LOADER_TEST_NAME}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "output_name = \"parcels\"");
        std::env::remove_var("GEOEXPORT_LOADER_TEST_NAME");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("GEOEXPORT_LOADER_MISSING");
        let input = "output_name = \"${GEOEXPORT_LOADER_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("GEOEXPORT_LOADER_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("GEOEXPORT_LOADER_COMMENTED");
        let input = "# output_name = \"${GEOEXPORT_LOADER_COMMENTED}\"\ngeometry = \"polygon\"\n";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(GeoExportError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[export]
geometry = "polygon"
output_name = "parcels"
bounds = [0.0, 0.0, 10.0, 5.0]
formats = ["geojson", "shapefile"]

[delivery]
output_dir = "out"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.export.geometry_kind().unwrap(), GeometryKind::Polygon);
        assert_eq!(config.export.output_name.as_deref(), Some("parcels"));
        assert_eq!(
            config.export.formats,
            vec![ExportFormat::GeoJson, ExportFormat::Shapefile]
        );
        assert_eq!(config.delivery.output_dir, "out");
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_parse_config_requires_export_section() {
        let err = parse_config("[application]\nlog_level = \"info\"\n").unwrap_err();
        assert!(matches!(err, GeoExportError::Configuration(_)));
    }

    #[test]
    fn test_parse_config_rejects_unknown_geometry() {
        let err = parse_config("[export]\ngeometry = \"point\"\n").unwrap_err();
        assert!(err.to_string().contains("export.geometry"));
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(parse_bounds("0, 1, 2.5, 3").unwrap(), [0.0, 1.0, 2.5, 3.0]);
        assert!(parse_bounds("0,1,2").is_err());
        assert!(parse_bounds("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            parse_formats("geojson, shp").unwrap(),
            vec![ExportFormat::GeoJson, ExportFormat::Shapefile]
        );
        assert!(parse_formats("geojson,kml").is_err());
    }
}
