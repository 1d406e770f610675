//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let formats: Vec<&str> = config.export.formats.iter().map(|f| f.as_str()).collect();

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Geometry: {}", config.export.geometry);
        println!(
            "  Output Name: {}",
            config.export.output_name.as_deref().unwrap_or("out (default)")
        );
        match config.export.bounds {
            Some(b) => println!("  Bounds: [{}, {}, {}, {}]", b[0], b[1], b[2], b[3]),
            None => println!("  Bounds: computed from dataset"),
        }
        println!("  Formats: {}", formats.join(", "));
        println!("  Output Directory: {}", config.delivery.output_dir);
        println!(
            "  Staging Directory: {}",
            config.delivery.staging_path().display()
        );
        println!("  File Logging: {}", config.logging.local_enabled);
        println!();
        Ok(0)
    }
}
