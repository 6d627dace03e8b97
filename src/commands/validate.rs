use super::Host;
use super::config::Config;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `kaya.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let config_path = args.config.as_ref();

    match Config::load(Utf8Path::new("."), config_path) {
        Ok(config) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file found)");
            }
            let _ = writeln!(host.output(), "Input: {}", config.input);
            let _ = writeln!(host.output(), "LMDI periods: {}", config.lmdi_periods.len());
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_generated_config_is_valid() {
        let (_tmp, dir) = temp_dir();
        let config_path = dir.join("kaya.toml");

        let mut init_host = TestHost::default();
        init_config(&mut init_host, &InitArgs { output: config_path.clone() }).unwrap();
        assert!(init_host.output_str().contains("Generated default configuration file"));

        let mut host = TestHost::default();
        let args = ValidateArgs { config: Some(config_path) };
        validate_config(&mut host, &args).unwrap();

        assert!(host.output_str().contains("Configuration file is valid"));
        assert!(host.output_str().contains("LMDI periods: 3"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_toml_syntax() {
        let (_tmp, dir) = temp_dir();
        let config_path = dir.join("invalid_syntax.toml");
        std::fs::write(
            &config_path,
            r#"
# Missing closing bracket
[[lmdi_periods]
start = 1990
"#,
        )
        .unwrap();

        let mut host = TestHost::default();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });

        assert!(result.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_str().contains("Configuration validation failed"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_unknown_field() {
        let (_tmp, dir) = temp_dir();
        let config_path = dir.join("unknown_field.toml");
        std::fs::write(&config_path, "unknown_field = \"value\"\n").unwrap();

        let mut host = TestHost::default();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });

        assert!(result.is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_bad_period_bound() {
        let (_tmp, dir) = temp_dir();
        let config_path = dir.join("bad_bound.toml");
        std::fs::write(
            &config_path,
            r#"
[[lmdi_periods]]
start = "yesterday"
end = 2019
"#,
        )
        .unwrap();

        let mut host = TestHost::default();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });

        assert!(result.is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_empty_config_is_valid() {
        let (_tmp, dir) = temp_dir();
        let config_path = dir.join("empty.toml");
        std::fs::write(&config_path, "# Empty config file\n").unwrap();

        let mut host = TestHost::default();
        validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap();
    }
}
