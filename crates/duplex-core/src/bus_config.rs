//! Bus descriptions and the cached bus configuration used by format adapters.
//!
//! Adapters query the processor once (at construction and after every layout
//! change) and keep a [`CachedBusConfig`] so channel totals are available
//! without calling back into the engine on the audio thread.

use crate::channel_layout::ChannelLayout;
use crate::processor::AudioProcessor;
use crate::types::{MAX_BUSES, MAX_CHANNELS};

/// Audio bus type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusType {
    /// Main audio bus (e.g., primary stereo input/output).
    #[default]
    Main,
    /// Auxiliary bus (e.g., sidechain input).
    Aux,
}

/// Information about an audio bus.
#[derive(Debug, Clone, PartialEq)]
pub struct BusInfo {
    /// Display name for the bus (e.g., "Input", "Sidechain").
    pub name: &'static str,
    /// Bus type (main or auxiliary).
    pub bus_type: BusType,
    /// Current channel layout.
    pub layout: ChannelLayout,
}

impl BusInfo {
    /// Main bus with an explicit layout.
    pub fn new(name: &'static str, layout: ChannelLayout) -> Self {
        Self {
            name,
            bus_type: BusType::Main,
            layout,
        }
    }

    /// Stereo main bus.
    pub fn stereo(name: &'static str) -> Self {
        Self::new(name, ChannelLayout::stereo())
    }

    /// Mono main bus.
    pub fn mono(name: &'static str) -> Self {
        Self::new(name, ChannelLayout::mono())
    }

    /// Auxiliary bus (e.g., sidechain).
    pub fn aux(name: &'static str, layout: ChannelLayout) -> Self {
        Self {
            name,
            bus_type: BusType::Aux,
            layout,
        }
    }

    /// Number of channels in this bus.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.layout.len()
    }
}

/// Lightweight bus information for caching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CachedBusInfo {
    /// Number of channels in the current layout.
    pub channel_count: usize,
    /// Largest channel count the bus accepts.
    pub max_channel_count: usize,
    /// Bus type (main or auxiliary).
    pub bus_type: BusType,
}

impl CachedBusInfo {
    pub const fn new(channel_count: usize, bus_type: BusType) -> Self {
        Self {
            channel_count,
            max_channel_count: channel_count,
            bus_type,
        }
    }

    /// Same bus, declaring a larger supported channel count.
    pub const fn with_max_channels(mut self, max_channel_count: usize) -> Self {
        self.max_channel_count = max_channel_count;
        self
    }
}

/// Cached bus configuration from a processor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedBusConfig {
    /// Input bus information.
    pub input_buses: Vec<CachedBusInfo>,
    /// Output bus information.
    pub output_buses: Vec<CachedBusInfo>,
}

impl CachedBusConfig {
    /// Create a new cached bus configuration.
    ///
    /// # Panics
    ///
    /// Panics if bus counts exceed MAX_BUSES.
    pub fn new(input_buses: Vec<CachedBusInfo>, output_buses: Vec<CachedBusInfo>) -> Self {
        assert!(
            input_buses.len() <= MAX_BUSES,
            "Input bus count {} exceeds MAX_BUSES ({})",
            input_buses.len(),
            MAX_BUSES
        );
        assert!(
            output_buses.len() <= MAX_BUSES,
            "Output bus count {} exceeds MAX_BUSES ({})",
            output_buses.len(),
            MAX_BUSES
        );

        Self {
            input_buses,
            output_buses,
        }
    }

    /// Snapshot a processor's current bus configuration.
    pub fn from_processor<P: AudioProcessor + ?Sized>(processor: &P) -> Self {
        let collect = |is_input: bool| -> Vec<CachedBusInfo> {
            (0..processor.bus_count(is_input))
                .filter_map(|i| {
                    processor.bus_info(is_input, i).map(|bus| {
                        CachedBusInfo::new(bus.channel_count(), bus.bus_type).with_max_channels(
                            processor
                                .max_supported_channels(is_input, i)
                                .min(MAX_CHANNELS),
                        )
                    })
                })
                .collect()
        };

        Self {
            input_buses: collect(true),
            output_buses: collect(false),
        }
    }

    pub fn input_bus_count(&self) -> usize {
        self.input_buses.len()
    }

    pub fn output_bus_count(&self) -> usize {
        self.output_buses.len()
    }

    /// Whether the processor has any sidechain or auxiliary bus.
    pub fn has_aux_buses(&self) -> bool {
        self.input_buses.len() > 1 || self.output_buses.len() > 1
    }

    /// Get the total number of input channels across all buses.
    pub fn total_input_channels(&self) -> usize {
        self.input_buses.iter().map(|b| b.channel_count).sum()
    }

    /// Get the total number of output channels across all buses.
    pub fn total_output_channels(&self) -> usize {
        self.output_buses.iter().map(|b| b.channel_count).sum()
    }

    /// Channel totals advertised to a host as `(inputs, outputs)`.
    ///
    /// With several buses in either direction this is the sum of the current
    /// channel counts. With at most one bus per direction it is the largest
    /// layout the main bus accepts, so hosts can negotiate up to it.
    pub fn max_total_channels(&self) -> (usize, usize) {
        if self.has_aux_buses() {
            return (self.total_input_channels(), self.total_output_channels());
        }

        let main_max = |buses: &[CachedBusInfo]| {
            buses
                .first()
                .map(|b| b.max_channel_count.max(b.channel_count))
                .unwrap_or(0)
        };

        (main_max(&self.input_buses), main_max(&self.output_buses))
    }

    /// Validate that this configuration doesn't exceed system limits.
    pub fn validate(&self) -> Result<(), String> {
        if self.input_buses.len() > MAX_BUSES {
            return Err(format!(
                "Plugin declares {} input buses, but MAX_BUSES is {}",
                self.input_buses.len(),
                MAX_BUSES
            ));
        }
        if self.output_buses.len() > MAX_BUSES {
            return Err(format!(
                "Plugin declares {} output buses, but MAX_BUSES is {}",
                self.output_buses.len(),
                MAX_BUSES
            ));
        }

        for (direction, buses) in [("Input", &self.input_buses), ("Output", &self.output_buses)] {
            for (i, bus) in buses.iter().enumerate() {
                if bus.channel_count > MAX_CHANNELS {
                    return Err(format!(
                        "{} bus {} declares {} channels, but MAX_CHANNELS is {}",
                        direction, i, bus.channel_count, MAX_CHANNELS
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Default for CachedBusConfig {
    /// Create a default stereo configuration (2in/2out, main bus only).
    fn default() -> Self {
        Self::new(
            vec![CachedBusInfo::new(2, BusType::Main)],
            vec![CachedBusInfo::new(2, BusType::Main)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CachedBusConfig::default();
        assert_eq!(config.input_bus_count(), 1);
        assert_eq!(config.output_bus_count(), 1);
        assert_eq!(config.total_input_channels(), 2);
        assert_eq!(config.total_output_channels(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_total_channels_single_bus_uses_max_supported() {
        let config = CachedBusConfig::new(
            vec![CachedBusInfo::new(2, BusType::Main).with_max_channels(8)],
            vec![CachedBusInfo::new(2, BusType::Main).with_max_channels(6)],
        );
        assert_eq!(config.max_total_channels(), (8, 6));
    }

    #[test]
    fn test_max_total_channels_with_sidechain_sums_buses() {
        let config = CachedBusConfig::new(
            vec![
                CachedBusInfo::new(2, BusType::Main).with_max_channels(8),
                CachedBusInfo::new(1, BusType::Aux),
            ],
            vec![CachedBusInfo::new(2, BusType::Main)],
        );
        assert!(config.has_aux_buses());
        assert_eq!(config.max_total_channels(), (3, 2));
    }

    #[test]
    fn test_validate_too_many_channels() {
        let config = CachedBusConfig::new(
            vec![CachedBusInfo::new(MAX_CHANNELS + 1, BusType::Main)],
            vec![],
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_config() {
        let config = CachedBusConfig::new(vec![], vec![]);
        assert_eq!(config.max_total_channels(), (0, 0));
        assert!(config.validate().is_ok());
    }
}
