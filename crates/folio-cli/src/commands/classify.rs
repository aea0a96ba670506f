//! Classify command implementation

use std::path::Path;

use anyhow::Result;

use super::load_options;

pub fn cmd_classify(description: &str, config: Option<&Path>) -> Result<()> {
    let options = load_options(config)?;

    match options.rules.classify(description) {
        Some(category) => println!("{}", category),
        None => println!("unclassified"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use folio_core::{Category, PipelineConfig};

    #[test]
    fn test_default_rules_put_dividend_first() {
        let options = PipelineConfig::default().into_options();
        assert_eq!(
            options.rules.classify("Dividend payment AAPL"),
            Some(Category::Dividend)
        );
    }

    #[test]
    fn test_config_file_reorders_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            "[[rules]]\npattern = \"tax\"\ncategory = \"tax\"\n\n\
             [[rules]]\npattern = \"dividend\"\ncategory = \"dividend\"\n",
        )
        .unwrap();

        let options = super::load_options(Some(&path)).unwrap();
        assert_eq!(
            options.rules.classify("Dividend tax withheld"),
            Some(Category::Tax)
        );
    }
}
