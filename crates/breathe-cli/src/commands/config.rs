use breathe_core::Config;
use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-path key (e.g. "audio.voice")
    Get { key: String },
    /// Change one value; premium selections need `subscription.premium_unlocked`
    Set {
        key: String,
        /// Option id, number, bool, or JSON for `breathing.custom_pattern`
        value: String,
    },
    /// Print every key as `key = value`
    List {
        /// Print the whole config as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the config file with defaults
    Reset,
}

/// Flatten nested sections into `(dot.path, value)` rows, skipping unset options.
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if prefix.is_empty() || !map.contains_key("inhale_secs") => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, rows);
            }
        }
        Value::Null => {}
        Value::String(s) => rows.push((prefix.to_string(), s.clone())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            Config::load()?.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::List { json } => {
            let tree = serde_json::to_value(Config::load()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                let mut rows = Vec::new();
                flatten("", &tree, &mut rows);
                for (key, value) in rows {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("wrote defaults to {}", Config::path()?.display());
        }
    }
    Ok(())
}
