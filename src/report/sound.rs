//! The sound definitions report.

use super::{bullets_or_placeholder, nice_name, Reports};

impl Reports<'_> {
    /// `- <Nice name> (<identifier>)` bullets for every indexed sound.
    pub fn sound_definitions(&self) -> String {
        let lines = self
            .index
            .sounds
            .keys()
            .map(|identifier| format!("{} ({identifier})", nice_name(identifier)))
            .collect();
        bullets_or_placeholder(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::super::NO_MATCHING_DATA;
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::index::AssetIndex;
    use crate::resolver::CrossRefs;

    #[test]
    fn test_sound_bullets_with_nice_names() {
        let mut index = AssetIndex::default();
        index.sounds.insert("ns.golem.roar".to_string(), vec!["sounds/roar".to_string()]);
        index.sounds.insert("ns.ambient.cold_wind".to_string(), Vec::new());
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let config = GeneratorConfig::new("BP", "RP", "data");
        let reports = Reports { index: &index, refs: &refs, config: &config };

        assert_eq!(
            reports.sound_definitions(),
            "- Ns Ambient Cold Wind (ns.ambient.cold_wind)\n- Ns Golem Roar (ns.golem.roar)"
        );
    }

    #[test]
    fn test_no_sounds_renders_placeholder() {
        let index = AssetIndex::default();
        let mut warnings = crate::error::Warnings::new();
        let refs = CrossRefs::build(&index, &mut warnings);
        let config = GeneratorConfig::new("BP", "RP", "data");
        let reports = Reports { index: &index, refs: &refs, config: &config };
        assert_eq!(reports.sound_definitions(), NO_MATCHING_DATA);
    }
}
