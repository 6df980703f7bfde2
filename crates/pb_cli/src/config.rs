use std::path::Path;

use pb_core::{DigestConfig, Error, Result};

/// Load the topic/keyword configuration from a YAML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<DigestConfig> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let config: DigestConfig = serde_yaml::from_str(&raw)
        .map_err(|e| Error::Config(format!("invalid config file: {}", e)))?;
    if config.keywords.is_empty() {
        return Err(Error::Config("no keyword topics configured".to_string()));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
max_results: 10
keywords:
  LLM:
    filters: [\"large language model\", \"LLM\"]
    max_results: 20
  SLAM:
    filters: [\"SLAM\"]
";

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_config_compiles_topics() {
        let (_dir, path) = write_config(SAMPLE);
        let config = load_config(&path).unwrap();

        assert_eq!(config.max_results, 10);
        assert!(!config.update_paper_links);

        let topics = config.topics();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic, "LLM");
        assert_eq!(topics[0].query, "\"large language model\" OR LLM");
        assert_eq!(topics[0].max_results, 20);
        assert_eq!(topics[1].topic, "SLAM");
        assert_eq!(topics[1].query, "SLAM");
        assert_eq!(topics[1].max_results, 10);
    }

    #[test]
    fn test_load_config_rejects_empty_keywords() {
        let (_dir, path) = write_config("max_results: 10\nkeywords: {}\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("does/not/exist.yaml").is_err());
    }
}
