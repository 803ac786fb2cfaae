use lowerfile::utils::Config;
use lowerfile::{FilterInput, LowerResult};

pub fn handle(json: &str, config: &Config) -> LowerResult<()> {
    let filter = config.filter.build()?;
    let value: serde_json::Value = serde_json::from_str(json)?;

    let out = filter.apply(FilterInput::from(value))?;
    println!("{}", serde_json::to_string_pretty(&out.into_value())?);
    Ok(())
}
