use console::style;
use std::path::PathBuf;
use lowerfile::utils::Config;
use lowerfile::{FilterInput, LowerResult};

/// Entry point called by the CLI.
pub fn handle(paths: &[PathBuf], config: &Config) -> LowerResult<()> {
    let filter = config.filter.build()?;
    let folding = filter.encoding().unwrap_or("ascii");

    for path in paths {
        filter.apply(FilterInput::from(path.as_path()))?;
        if !config.output.quiet {
            println!(
                "{}  [{}]",
                style(path.display()).blue().underlined(),
                style(folding).cyan().bold(),
            );
        }
    }
    Ok(())
}
