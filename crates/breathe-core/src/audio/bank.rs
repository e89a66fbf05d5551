//! Asset lookup with premium-to-default fallback.
//!
//! A missing premium voice asset falls back to the default voice asset of
//! the same role. Anything still unresolved is skipped: audio problems
//! never reach the session engine.

use std::collections::HashSet;
use std::path::Path;

use super::Cue;
use crate::catalog::BackgroundSound;

const AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Set of available asset stems.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    stems: HashSet<String>,
}

impl SoundBank {
    pub fn with_stems<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stems: stems.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect every `.mp3`/`.wav` stem under `dir`, one level of
    /// subdirectories deep (premium voices ship in their own folders).
    ///
    /// # Errors
    /// Returns an error if `dir` itself cannot be read.
    pub fn scan(dir: &Path) -> std::io::Result<Self> {
        let mut stems = HashSet::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if let Ok(children) = std::fs::read_dir(&path) {
                    for child in children.flatten() {
                        insert_stem(&mut stems, &child.path());
                    }
                }
            } else {
                insert_stem(&mut stems, &path);
            }
        }
        tracing::debug!(count = stems.len(), dir = %dir.display(), "scanned sound bank");
        Ok(Self { stems })
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.stems.contains(stem)
    }

    /// Resolve the asset stem to play for `cue`.
    pub fn resolve(&self, cue: &Cue) -> Option<String> {
        let primary = cue.file_stem()?;
        if self.contains(&primary) {
            return Some(primary);
        }
        match cue.fallback_stem() {
            Some(fallback) if self.contains(&fallback) => {
                tracing::debug!(%primary, %fallback, "premium asset missing, using default voice");
                Some(fallback)
            }
            _ => {
                tracing::warn!(%primary, "no asset for cue");
                None
            }
        }
    }

    pub fn resolve_background(&self, sound: BackgroundSound) -> Option<String> {
        let stem = sound.file_stem()?;
        if self.contains(stem) {
            Some(stem.to_string())
        } else {
            tracing::warn!(stem, "background track not found");
            None
        }
    }
}

fn insert_stem(stems: &mut HashSet<String>, path: &Path) {
    let is_audio = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !is_audio {
        return;
    }
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        stems.insert(stem.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VoiceOption;
    use crate::session::Phase;

    fn bank() -> SoundBank {
        SoundBank::with_stems(["inhale", "hold", "exhale", "two", "male_deep_inhale", "calm_music"])
    }

    #[test]
    fn premium_voice_asset_is_preferred() {
        let cue = Cue::Instruction {
            phase: Phase::Inhale,
            voice: VoiceOption::MaleDeep,
        };
        assert_eq!(bank().resolve(&cue).as_deref(), Some("male_deep_inhale"));
    }

    #[test]
    fn missing_premium_asset_falls_back_to_default_voice() {
        let cue = Cue::Instruction {
            phase: Phase::Exhale,
            voice: VoiceOption::MaleDeep,
        };
        assert_eq!(bank().resolve(&cue).as_deref(), Some("exhale"));

        let count = Cue::Count {
            number: 2,
            voice: VoiceOption::FemaleCalm,
        };
        assert_eq!(bank().resolve(&count).as_deref(), Some("two"));
    }

    #[test]
    fn unresolvable_cue_is_none() {
        assert_eq!(bank().resolve(&Cue::PingBetween), None);
        assert_eq!(bank().resolve_background(BackgroundSound::OceanWaves), None);
        assert_eq!(bank().resolve_background(BackgroundSound::Silence), None);
    }

    #[test]
    fn scan_picks_up_nested_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inhale.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        let nested = dir.path().join("Male Deep");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("male_deep_hold.WAV"), b"").unwrap();

        let bank = SoundBank::scan(dir.path()).unwrap();
        assert_eq!(bank.len(), 2);
        assert!(bank.contains("inhale"));
        assert!(bank.contains("male_deep_hold"));
        assert!(!bank.contains("notes"));
    }
}
