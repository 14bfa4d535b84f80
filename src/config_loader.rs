use crate::config::RenderOptions;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load rendering options from a YAML file
///
/// Missing keys take their default values:
///
/// ```yaml
/// decimal_ips: true
/// include_stubs: false
/// group_separator: "-"
/// group_by_first_segment: true
/// reduce_links: true
/// ```
pub fn load_options(options_path: &Path) -> Result<RenderOptions> {
    info!("Loading options from: {:?}", options_path);

    let file = File::open(options_path)
        .wrap_err_with(|| format!("Failed to open options file '{}'", options_path.display()))?;

    let options: RenderOptions = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse options file '{}'", options_path.display()))?;

    options.validate()?;

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_partial_options() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "decimal_ips: true\ngroup_separator: \"-\"\n").unwrap();

        let options = load_options(temp_file.path()).unwrap();
        assert!(options.decimal_ips);
        assert_eq!(options.group_separator.as_deref(), Some("-"));
        assert!(options.include_stubs);
        assert!(options.reduce_links);
        assert!(!options.group_by_first_segment);
    }

    #[test]
    fn test_load_invalid_options() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "group_separator: \"\"\n").unwrap();
        assert!(load_options(temp_file.path()).is_err());

        let mut bad_yaml = NamedTempFile::new().unwrap();
        write!(bad_yaml, "reduce_links: [not, a, bool]\n").unwrap();
        assert!(load_options(bad_yaml.path()).is_err());
    }

    #[test]
    fn test_load_missing_options_file() {
        assert!(load_options(Path::new("/nonexistent/options.yaml")).is_err());
    }
}
