//! Build sounds from preset descriptors
//!
//! Resolving a `source_locator` to bytes (file, URL, cache) is up to the
//! caller's resolver. Descriptors that fail to resolve or decode are skipped
//! and reported; the rest come back ordered by instrument family.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decode;
use crate::sound::{SoundModel, UNKNOWN_CATEGORY};

/// One entry of a preset as handed over by storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleDescriptor {
    pub display_name: String,
    pub source_locator: String,
    pub category: Option<String>,
}

impl SampleDescriptor {
    pub fn new(display_name: impl Into<String>, source_locator: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            source_locator: source_locator.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// File extension of the locator, ignoring any query string or fragment
    pub fn extension_hint(&self) -> Option<&str> {
        let path = self.source_locator.split(['?', '#']).next().unwrap_or_default();
        Path::new(path).extension().and_then(|e| e.to_str())
    }
}

/// A descriptor that didn't make it into the bank
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub index: usize,
    pub display_name: String,
    pub reason: String,
}

/// Outcome of [`DescriptorLoader::load_all`]
#[derive(Debug, Default)]
pub struct LoadReport {
    pub sounds: Vec<SoundModel>,
    pub failures: Vec<LoadFailure>,
}

/// Sort key grouping drum sounds: kick, snare, clap, hats, everything else
///
/// Matches substrings of the lowercased name, so `"BD_808"` is a kick and
/// `"ch_tight"` a hat.
pub fn instrument_rank(name: &str) -> u8 {
    let n = name.to_lowercase();
    let has = |keys: &[&str]| keys.iter().any(|k| n.contains(k));
    if has(&["kick", "bd"]) {
        1
    } else if has(&["snare", "sd"]) {
        2
    } else if has(&["clap", "rim"]) {
        3
    } else if has(&["hat", "ch", "oh"]) {
        4
    } else {
        10
    }
}

/// Turns descriptors into [`SoundModel`]s through a byte resolver
pub struct DescriptorLoader<R> {
    resolver: R,
}

impl<R> DescriptorLoader<R>
where
    R: FnMut(&SampleDescriptor) -> anyhow::Result<Vec<u8>>,
{
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Resolve and decode every descriptor
    ///
    /// `on_progress` receives a whole percentage after each descriptor,
    /// success or not, ending at 100.
    pub fn load_all(
        &mut self,
        descriptors: &[SampleDescriptor],
        mut on_progress: impl FnMut(u8),
    ) -> LoadReport {
        let mut report = LoadReport::default();
        let total = descriptors.len();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let name = if descriptor.display_name.trim().is_empty() {
                format!("sound-{}", index)
            } else {
                descriptor.display_name.clone()
            };

            match self.load_one(descriptor) {
                Ok(sample) => {
                    let category = descriptor
                        .category
                        .clone()
                        .filter(|c| !c.trim().is_empty())
                        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
                    report.sounds.push(SoundModel::new(name, category, sample));
                }
                Err(e) => {
                    log::warn!("load_all: skipping '{}' ({}): {:#}", name, descriptor.source_locator, e);
                    report.failures.push(LoadFailure {
                        index,
                        display_name: name,
                        reason: format!("{:#}", e),
                    });
                }
            }

            on_progress(((index + 1) * 100 / total) as u8);
        }

        report.sounds.sort_by_key(|s| instrument_rank(s.display_name()));

        log::info!(
            "load_all: {} loaded, {} skipped",
            report.sounds.len(),
            report.failures.len()
        );
        report
    }

    fn load_one(&mut self, descriptor: &SampleDescriptor) -> anyhow::Result<crate::Sample> {
        let bytes = (self.resolver)(descriptor)?;
        let sample = match descriptor.extension_hint() {
            Some(ext) => decode::load_with_hint(bytes, ext)?,
            None => decode::load(bytes)?,
        };
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav(frames: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames {
                writer.write_sample((i % 100) as i16 * 100).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn resolve(descriptor: &SampleDescriptor) -> anyhow::Result<Vec<u8>> {
        match descriptor.source_locator.as_str() {
            "missing.wav" => anyhow::bail!("not found"),
            "garbage.wav" => Ok(vec![0x42; 64]),
            _ => Ok(wav(800)),
        }
    }

    #[test]
    fn test_rank_by_instrument_family() {
        assert_eq!(instrument_rank("Kick 808"), 1);
        assert_eq!(instrument_rank("BD_hard"), 1);
        assert_eq!(instrument_rank("Snare"), 2);
        assert_eq!(instrument_rank("Rimshot"), 3);
        assert_eq!(instrument_rank("Open Hat"), 4);
        assert_eq!(instrument_rank("Pad"), 10);
    }

    #[test]
    fn test_extension_hint() {
        assert_eq!(SampleDescriptor::new("a", "presets/808/kick.wav").extension_hint(), Some("wav"));
        assert_eq!(SampleDescriptor::new("a", "http://h/x.mp3?v=2").extension_hint(), Some("mp3"));
        assert_eq!(SampleDescriptor::new("a", "blob-1234").extension_hint(), None);
    }

    #[test]
    fn test_load_all_skips_failures_and_sorts() {
        let descriptors = vec![
            SampleDescriptor::new("Pad", "pad.wav"),
            SampleDescriptor::new("Broken", "garbage.wav"),
            SampleDescriptor::new("Hat", "hat.wav").with_category("drums"),
            SampleDescriptor::new("Gone", "missing.wav"),
            SampleDescriptor::new("Kick", "kick.wav"),
            SampleDescriptor::new("", "noname.wav"),
        ];

        let mut progress = Vec::new();
        let report = DescriptorLoader::new(resolve).load_all(&descriptors, |p| progress.push(p));

        let names: Vec<_> = report.sounds.iter().map(|s| s.display_name().to_string()).collect();
        assert_eq!(names, vec!["Kick", "Hat", "Pad", "sound-5"]);
        assert_eq!(report.sounds[1].category(), "drums");
        assert_eq!(report.sounds[0].category(), UNKNOWN_CATEGORY);

        let failed: Vec<_> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![1, 3]);

        assert_eq!(progress, vec![16, 33, 50, 66, 83, 100]);
    }

    #[test]
    fn test_sort_is_stable_within_a_family() {
        let descriptors = vec![
            SampleDescriptor::new("Kick B", "b.wav"),
            SampleDescriptor::new("Kick A", "a.wav"),
        ];
        let report = DescriptorLoader::new(resolve).load_all(&descriptors, |_| {});
        let names: Vec<_> = report.sounds.iter().map(|s| s.display_name()).collect();
        assert_eq!(names, vec!["Kick B", "Kick A"]);
    }
}
