//! Duplex Gain - Example gain plugin exporting VST2 and LV2 from one type.
//!
//! Shows the parts every plugin needs:
//! 1. A `ParameterSet` built in `create()`
//! 2. `AudioProcessor` for the DSP, `Plugin` for the host-facing side
//! 3. Static configs plus one export macro per format

use duplex::prelude::*;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Shared plugin configuration (format-agnostic metadata)
pub static CONFIG: PluginConfig = PluginConfig::new("Duplex Gain", Category::Effect, "Dplx", "gain")
    .with_vendor("Duplex Audio")
    .with_url("https://github.com/duplex-audio/duplex")
    .with_email("support@example.com")
    .with_version(env!("CARGO_PKG_VERSION"));

/// VST2-specific configuration
#[cfg(feature = "vst2")]
pub static VST2_CONFIG: Vst2Config = Vst2Config::new("DxGn");

/// LV2-specific configuration
#[cfg(feature = "lv2")]
pub static LV2_CONFIG: Lv2Config = Lv2Config::new("urn:duplex-audio:gain").with_category("AmplifierPlugin");

// =============================================================================
// Programs
// =============================================================================

static UNITY: [ProgramValue; 2] = [ProgramValue::new("gain", 0.0), ProgramValue::new("mute", 0.0)];
static QUIET: [ProgramValue; 2] = [ProgramValue::new("gain", -12.0), ProgramValue::new("mute", 0.0)];
static BOOST: [ProgramValue; 2] = [ProgramValue::new("gain", 6.0), ProgramValue::new("mute", 0.0)];

// =============================================================================
// Gain Plugin
// =============================================================================

/// Gain with a mute switch and bypass.
pub struct Gain {
    parameters: ParameterSet,
    programs: ProgramList,
}

impl Gain {
    /// Gain as a linear multiplier, 0 when muted.
    pub fn gain_linear(&self) -> f64 {
        let muted = self.parameters.by_id("mute").is_some_and(|p| p.plain() >= 0.5);
        if muted {
            return 0.0;
        }
        self.parameters
            .by_id("gain")
            .map(|p| db_to_gain(p.plain()))
            .unwrap_or(1.0)
    }

    fn process_generic<S: Sample>(&mut self, buffer: &mut ChannelBuffer<S>) {
        buffer.apply_gain(S::from_f64(self.gain_linear()));
    }
}

impl AudioProcessor for Gain {
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize) {
        log::debug!("Gain prepared at {} Hz, {} samples", sample_rate, max_block_size);
    }

    fn process(&mut self, buffer: &mut ChannelBuffer<f32>, _midi: &mut MidiBuffer) {
        self.process_generic(buffer);
    }

    fn supports_double_precision(&self) -> bool {
        true
    }

    fn process_f64(&mut self, buffer: &mut ChannelBuffer<f64>, _midi: &mut MidiBuffer) {
        self.process_generic(buffer);
    }
}

impl Plugin for Gain {
    fn create() -> Self {
        Self {
            parameters: ParameterSet::new(vec![
                Parameter::new(
                    ParameterInfo::new("gain", "Gain", ParameterKind::float(-60.0, 12.0), 0.0)
                        .with_label("dB")
                        .with_precision(1),
                ),
                Parameter::new(ParameterInfo::new("mute", "Mute", ParameterKind::Bool, 0.0)),
                Parameter::new(ParameterInfo::new("bypass", "Bypass", ParameterKind::Bool, 0.0).bypass()),
            ]),
            programs: ProgramList::new(&[("Unity", &UNITY), ("Quiet", &QUIET), ("Boost", &BOOST)]),
        }
    }

    fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    fn programs(&self) -> Option<&ProgramList> {
        Some(&self.programs)
    }

    fn programs_mut(&mut self) -> Option<&mut ProgramList> {
        Some(&mut self.programs)
    }
}

// =============================================================================
// Plugin Exports
// =============================================================================

#[cfg(feature = "vst2")]
export_vst2!(CONFIG, VST2_CONFIG, Gain);

#[cfg(feature = "lv2")]
export_lv2!(CONFIG, LV2_CONFIG, Gain);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_programs_set_gain() {
        let mut gain = Gain::create();
        assert!((gain.gain_linear() - 1.0).abs() < 1e-9);

        gain.set_current_program(1);
        assert!((gain.gain_linear() - db_to_gain(-12.0)).abs() < 1e-6);
        assert_eq!(gain.program_name(2), "Boost");
    }

    #[test]
    fn test_mute_silences() {
        let gain = Gain::create();
        gain.parameters().by_id("mute").unwrap().set_normalized(1.0);
        assert_eq!(gain.gain_linear(), 0.0);
    }
}
