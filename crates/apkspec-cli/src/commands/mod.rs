pub mod completions;
pub mod fields;
pub mod validate;

use apkspec_schema::Stage;
use console::Style;

pub const EXIT_SUCCESS: u8 = 0;
/// The manifest was read but failed somewhere in the pipeline.
pub const EXIT_INVALID: u8 = 1;
/// The manifest could not be read at all, or some other operational failure.
pub const EXIT_FAILURE: u8 = 2;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_stage(stage: Stage) -> String {
    let tag = stage.to_string();
    match stage {
        Stage::Loader => Style::new().red().bold().apply_to(tag).to_string(),
        Stage::Resolver => Style::new().yellow().apply_to(tag).to_string(),
        Stage::Validator => Style::new().magenta().apply_to(tag).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_pretty_serializes_value() {
        let val = serde_json::json!({"key": "value"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"key\""));
        assert!(result.contains("\"value\""));
    }

    #[test]
    fn colorized_stage_keeps_the_tag_text() {
        for stage in [Stage::Loader, Stage::Resolver, Stage::Validator] {
            assert!(colorize_stage(stage).contains(&stage.to_string()));
        }
    }
}
