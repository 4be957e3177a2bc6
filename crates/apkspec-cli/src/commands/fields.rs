use super::{json_pretty, EXIT_SUCCESS};
use apkspec_schema::FIELDS;

pub fn run(json: bool) -> Result<u8, String> {
    if json {
        let payload: Vec<_> = FIELDS
            .iter()
            .map(|f| {
                serde_json::json!({
                    "section": f.section,
                    "key": f.key,
                    "required": f.required,
                    "default": f.default,
                    "doc": f.doc,
                })
            })
            .collect();
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    let mut section = "";
    for field in FIELDS {
        if field.section != section {
            if !section.is_empty() {
                println!();
            }
            println!("[{}]", field.section);
            section = field.section;
        }
        let status = if field.required {
            "required".to_owned()
        } else {
            match field.default {
                Some(default) => format!("default: {default}"),
                None => "optional".to_owned(),
            }
        };
        println!("  {:<28} {:<32} {}", field.key, status, field.doc);
    }
    Ok(EXIT_SUCCESS)
}
