use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    #[serde(default = "default_days_to_check")]
    pub days_to_check: u32,

    #[serde(default = "default_offset_step")]
    pub offset_step: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Stop after this many index pages even if the cutoff was never seen
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl Default for ScrapConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            days_to_check: default_days_to_check(),
            offset_step: default_offset_step(),
            user_agent: default_user_agent(),
            max_pages: None,
        }
    }
}

fn default_keywords() -> Vec<String> {
    vec![String::from("tree")]
}

fn default_days_to_check() -> u32 {
    1
}

fn default_offset_step() -> usize {
    99
}

fn default_user_agent() -> String {
    String::from("Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0")
}

impl ScrapConfig {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Couldn't open {}", path.display()))?;
        let conf = serde_yaml::from_reader(file)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            bail!("At least one keyword is required");
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            bail!("Keywords cannot be blank");
        }
        if self.offset_step == 0 {
            bail!("offsetStep must be greater than 0");
        }
        if self.max_pages == Some(0) {
            bail!("maxPages must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_yaml() {
        let conf: ScrapConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(conf, ScrapConfig::default());
        assert_eq!(conf.keywords, vec!["tree"]);
        assert_eq!(conf.offset_step, 99);
        assert_eq!(conf.max_pages, None);
    }

    #[test]
    fn camel_case_keys() {
        let yaml = "keywords: [bike, desk]\ndaysToCheck: 3\nmaxPages: 5\n";
        let conf: ScrapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(conf.keywords, vec!["bike", "desk"]);
        assert_eq!(conf.days_to_check, 3);
        assert_eq!(conf.max_pages, Some(5));
        assert_eq!(conf.offset_step, 99);
    }

    #[test]
    fn rejects_empty_keywords() {
        let conf = ScrapConfig {
            keywords: vec![],
            ..Default::default()
        };
        assert!(conf.validate().is_err());
    }

    #[test]
    fn rejects_zero_step() {
        let conf = ScrapConfig {
            offset_step: 0,
            ..Default::default()
        };
        assert!(conf.validate().is_err());
    }
}
