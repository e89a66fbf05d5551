use breathe_core::catalog::pattern;
use breathe_core::{Config, Entitlements, ValidationError};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum PatternAction {
    /// List the built-in patterns
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one pattern by id
    Show {
        /// Pattern id (e.g. "four_seven_eight")
        id: String,
    },
}

pub fn run(action: PatternAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PatternAction::List { json } => {
            let patterns = pattern::all();
            if json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
                return Ok(());
            }

            // An unreadable config falls back to the default markers.
            let config = Config::load_or_default();
            let entitlements = config.entitlements();
            for p in &patterns {
                let marker = if p.id == config.breathing.pattern { "*" } else { " " };
                let lock = if entitlements.can_use(p) { "" } else { "  [premium]" };
                println!(
                    "{marker} {:<20} {:<10} {}{lock}",
                    p.id,
                    p.timing_display(),
                    p.name
                );
            }
        }
        PatternAction::Show { id } => {
            let found = pattern::find(&id).ok_or(ValidationError::UnknownId {
                kind: "pattern",
                id,
            })?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
    }
    Ok(())
}
