use breathe_core::{BackgroundSound, GuidanceMode, SessionLength, VoiceOption};
use serde::Serialize;

#[derive(Serialize)]
struct OptionEntry {
    id: &'static str,
    name: &'static str,
    premium: bool,
}

#[derive(Serialize)]
struct OptionsListing {
    guidance: Vec<OptionEntry>,
    voices: Vec<OptionEntry>,
    background_sounds: Vec<OptionEntry>,
    session_lengths: Vec<OptionEntry>,
}

fn listing() -> OptionsListing {
    OptionsListing {
        guidance: GuidanceMode::ALL
            .into_iter()
            .map(|m| OptionEntry {
                id: m.id(),
                name: m.title(),
                premium: false,
            })
            .collect(),
        voices: VoiceOption::ALL
            .into_iter()
            .map(|v| OptionEntry {
                id: v.id(),
                name: v.display_name(),
                premium: v.is_premium(),
            })
            .collect(),
        background_sounds: BackgroundSound::ALL
            .into_iter()
            .map(|s| OptionEntry {
                id: s.id(),
                name: s.display_name(),
                premium: s.is_premium(),
            })
            .collect(),
        session_lengths: SessionLength::ALL
            .into_iter()
            .map(|l| OptionEntry {
                id: l.id(),
                name: l.display_name(),
                premium: l.is_premium(),
            })
            .collect(),
    }
}

fn print_section(title: &str, entries: &[OptionEntry]) {
    println!("{title}:");
    for entry in entries {
        let lock = if entry.premium { "  [premium]" } else { "" };
        println!("  {:<16} {}{lock}", entry.id, entry.name);
    }
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let listing = listing();
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    print_section("Guidance", &listing.guidance);
    print_section("Voices", &listing.voices);
    print_section("Background sounds", &listing.background_sounds);
    print_section("Session lengths", &listing.session_lengths);
    Ok(())
}
