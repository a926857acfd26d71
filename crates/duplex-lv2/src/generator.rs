//! Writing the bundle documents to disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use duplex_core::{CachedBusConfig, Plugin, PluginConfig, PluginResult};

use crate::config::Lv2Config;
use crate::ttl::TtlGenerator;

/// Audio port counts for the plugin description.
///
/// Preferred channel configurations win; otherwise the bus configuration
/// decides (summed over all buses when there are aux buses, the main bus
/// maximum otherwise).
pub fn max_total_channels<P: Plugin>(plugin: &P, config: &PluginConfig) -> (usize, usize) {
    config
        .preferred_max_channels()
        .unwrap_or_else(|| CachedBusConfig::from_processor(plugin).max_total_channels())
}

fn write_document(path: &Path, label: &str, text: &str) -> PluginResult<()> {
    print!("Writing {}...", label);
    let _ = std::io::stdout().flush();
    fs::write(path, format!("{}\n", text))?;
    println!(" done!");
    Ok(())
}

/// Write `manifest.ttl`, `<basename>.ttl` and (with presets enabled)
/// `presets.ttl` to the current directory, replacing existing files.
pub fn write_lv2_files<P: Plugin>(basename: &str, config: &PluginConfig, lv2_config: &Lv2Config) -> PluginResult<()> {
    write_lv2_files_in::<P>(Path::new("."), basename, config, lv2_config)
}

/// Like [`write_lv2_files`], into `dir`.
pub fn write_lv2_files_in<P: Plugin>(
    dir: &Path,
    basename: &str,
    config: &PluginConfig,
    lv2_config: &Lv2Config,
) -> PluginResult<()> {
    let mut plugin = P::create();
    let (num_inputs, num_outputs) = max_total_channels(&plugin, config);
    log::debug!(
        "Generating LV2 description for '{}' ({} in / {} out)",
        config.name,
        num_inputs,
        num_outputs
    );

    let mut generator = TtlGenerator::new(config, lv2_config, basename);

    write_document(&dir.join("manifest.ttl"), "manifest.ttl", &generator.manifest(&plugin))?;

    let plugin_file = format!("{}.ttl", basename);
    let description = generator.plugin_description(&plugin, num_inputs, num_outputs);
    write_document(&dir.join(&plugin_file), &plugin_file, &description)?;

    if lv2_config.presets {
        let presets = generator.presets(&mut plugin)?;
        write_document(&dir.join("presets.ttl"), "presets.ttl", &presets)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_core::{
        AudioProcessor, BusInfo, Category, ChannelBuffer, ChannelLayout, MidiBuffer, Parameter, ParameterInfo,
        ParameterKind, ParameterSet, PluginError,
    };

    struct Surround {
        parameters: ParameterSet,
    }

    impl AudioProcessor for Surround {
        fn prepare(&mut self, _sample_rate: f64, _max_block_size: usize) {}
        fn process(&mut self, _buffer: &mut ChannelBuffer<f32>, _midi: &mut MidiBuffer) {}

        fn bus_info(&self, is_input: bool, index: usize) -> Option<BusInfo> {
            match (index, is_input) {
                (0, true) => Some(BusInfo::stereo("Input")),
                (0, false) => Some(BusInfo::new("Output", ChannelLayout::surround_5_1())),
                _ => None,
            }
        }
    }

    impl Plugin for Surround {
        fn create() -> Self {
            Self {
                parameters: ParameterSet::new(vec![Parameter::new(ParameterInfo::new(
                    "width",
                    "Width",
                    ParameterKind::float(0.0, 2.0),
                    1.0,
                ))]),
            }
        }

        fn parameters(&self) -> &ParameterSet {
            &self.parameters
        }
    }

    static CONFIG: PluginConfig = PluginConfig::new("Upmix", Category::Effect, "Dplx", "upmx");
    static STEREO_ONLY: PluginConfig =
        PluginConfig::new("Upmix", Category::Effect, "Dplx", "upmx").with_channel_configurations(&[(1, 1), (2, 2)]);
    static LV2_CONFIG: Lv2Config = Lv2Config::new("urn:duplex:upmix");

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("duplex-lv2-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_channel_totals() {
        let plugin = Surround::create();
        assert_eq!(max_total_channels(&plugin, &CONFIG), (2, 6));
        assert_eq!(max_total_channels(&plugin, &STEREO_ONLY), (2, 2));
    }

    #[test]
    fn test_writes_three_documents() {
        let dir = scratch_dir("write");
        fs::write(dir.join("presets.ttl"), "stale").unwrap();

        write_lv2_files_in::<Surround>(&dir, "upmix", &CONFIG, &LV2_CONFIG).unwrap();

        let manifest = fs::read_to_string(dir.join("manifest.ttl")).unwrap();
        assert!(manifest.contains("rdfs:seeAlso <upmix.ttl>"));
        let description = fs::read_to_string(dir.join("upmix.ttl")).unwrap();
        assert!(description.contains("lv2_audio_out_6"));
        assert!(description.ends_with(".\n\n"));
        // No programs, so only the header remains.
        let presets = fs::read_to_string(dir.join("presets.ttl")).unwrap();
        assert!(presets.starts_with("@prefix atom:"));
        assert!(!presets.contains("stale"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_presets_can_be_disabled() {
        static NO_PRESETS: Lv2Config = Lv2Config::new("urn:duplex:upmix").with_presets(false);
        let dir = scratch_dir("no-presets");
        write_lv2_files_in::<Surround>(&dir, "upmix", &CONFIG, &NO_PRESETS).unwrap();
        assert!(dir.join("manifest.ttl").exists());
        assert!(!dir.join("presets.ttl").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_io_errors_propagate() {
        let missing = std::env::temp_dir().join("duplex-lv2-missing").join("nested");
        let _ = fs::remove_dir_all(&missing);
        let result = write_lv2_files_in::<Surround>(&missing, "upmix", &CONFIG, &LV2_CONFIG);
        assert!(matches!(result, Err(PluginError::Io(_))));
    }
}
