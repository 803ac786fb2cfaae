pub mod apply;
pub mod descriptor;

use crate::cli::Commands;
use lowerfile::LowerResult;
use lowerfile::utils::Config;

pub fn handle_command(command: Commands, config: &mut Config) -> LowerResult<()> {
    match command {
        Commands::Apply { paths, encoding } => {
            if encoding.is_some() {
                config.filter.encoding = encoding;
            }
            apply::handle(&paths, config)
        }
        Commands::Descriptor { json, encoding } => {
            if encoding.is_some() {
                config.filter.encoding = encoding;
            }
            descriptor::handle(&json, config)
        }
    }
}
