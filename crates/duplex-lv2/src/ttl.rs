//! Turtle documents describing a plugin.
//!
//! An LV2 bundle needs three documents:
//!
//! - `manifest.ttl` - plugin, UI and preset subjects with links to the others
//! - `<binary>.ttl` - features, extensions and the port list
//! - `presets.ttl` - one preset per program with its state and port values
//!
//! All of them are derived from a live plugin instance queried once.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use duplex_core::{Parameter, Plugin, PluginConfig, PluginResult};

use crate::config::Lv2Config;
use crate::params::{ControlPort, PortClass};
use crate::symbol::SymbolRegistry;
use crate::uris;

/// File extension of the plugin binary on this platform.
pub const BINARY_EXTENSION: &str = std::env::consts::DLL_SUFFIX;

/// Escape text for a single-quoted (`"..."`) Turtle literal.
///
/// Line breaks are not allowed inside such a literal and become `\n`/`\r`.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn open_port(text: &mut String, index: usize) {
    text.push_str(if index == 0 { "    lv2:port [\n" } else { "    [\n" });
}

fn close_port(text: &mut String, index: usize, count: usize) {
    text.push_str(if index + 1 == count { "    ] ;\n\n" } else { "    ] ,\n" });
}

/// Port symbol source: the parameter id, or `port<N>` when it has none.
fn symbol_source(parameter: &Parameter, index: usize) -> String {
    if parameter.id().is_empty() {
        format!("port{}", index + 1)
    } else {
        parameter.id().to_string()
    }
}

/// Generates the documents of one bundle.
pub struct TtlGenerator<'a> {
    config: &'a PluginConfig,
    lv2_config: &'a Lv2Config,
    binary: &'a str,
    symbols: SymbolRegistry,
}

impl<'a> TtlGenerator<'a> {
    /// `binary` is the library name without extension; it also names the
    /// plugin document.
    pub fn new(config: &'a PluginConfig, lv2_config: &'a Lv2Config, binary: &'a str) -> Self {
        Self {
            config,
            lv2_config,
            binary,
            symbols: SymbolRegistry::new(),
        }
    }

    fn has_editor<P: Plugin>(&self, plugin: &P) -> bool {
        self.config.has_editor || plugin.has_editor()
    }

    /// Contents of `manifest.ttl`.
    pub fn manifest<P: Plugin>(&self, plugin: &P) -> String {
        let uri = self.lv2_config.uri;
        let binary = format!("{}{}", self.binary, BINARY_EXTENSION);
        let mut text = String::new();

        text += &format!("@prefix lv2:  <{}> .\n", uris::CORE_PREFIX);
        text += &format!("@prefix pset: <{}> .\n", uris::PRESETS_PREFIX);
        text += &format!("@prefix rdf:  <{}> .\n", uris::RDF_PREFIX);
        text += &format!("@prefix rdfs: <{}> .\n", uris::RDFS_PREFIX);
        text += &format!("@prefix ui:   <{}> .\n", uris::UI_PREFIX);
        text += "\n";

        text += &format!("<{}>\n", uri);
        text += "    a lv2:Plugin ;\n";
        text += &format!("    lv2:binary <{}> ;\n", binary);
        text += &format!("    rdfs:seeAlso <{}.ttl> .\n", self.binary);
        text += "\n";

        if self.has_editor(plugin) {
            text += &format!("<{}#ExternalUI>\n", uri);
            text += &format!("    a <{}> ;\n", uris::EXTERNAL_UI_WIDGET);
            text += &format!("    ui:binary <{}> ;\n", binary);
            text += &format!("    lv2:requiredFeature <{}> ;\n", uris::INSTANCE_ACCESS);
            text += &format!("    lv2:extensionData <{}> .\n", uris::PROGRAMS_UI_INTERFACE);
            text += "\n";

            text += &format!("<{}#ParentUI>\n", uri);
            text += &format!("    a {} ;\n", uris::parent_ui_class());
            text += &format!("    ui:binary <{}> ;\n", binary);
            text += &format!("    lv2:requiredFeature <{}> ;\n", uris::INSTANCE_ACCESS);
            text += "    lv2:optionalFeature ui:noUserResize ;\n";
            text += &format!("    lv2:extensionData <{}> .\n", uris::PROGRAMS_UI_INTERFACE);
            text += "\n";
        }

        if self.lv2_config.presets {
            for index in 0..plugin.num_programs() {
                text += &format!("<{}>\n", self.lv2_config.preset_uri(index));
                text += "    a pset:Preset ;\n";
                text += &format!("    lv2:appliesTo <{}> ;\n", uri);
                text += &format!("    rdfs:label \"{}\" ;\n", escape_literal(&plugin.program_name(index)));
                text += "    rdfs:seeAlso <presets.ttl> .\n";
                text += "\n";
            }
        }

        text
    }

    /// Contents of `<binary>.ttl` for a plugin with the given audio port
    /// counts.
    pub fn plugin_description<P: Plugin>(&mut self, plugin: &P, num_inputs: usize, num_outputs: usize) -> String {
        let uri = self.lv2_config.uri;
        let lv2 = self.lv2_config;
        let mut text = String::new();
        self.symbols.clear();

        text += &format!("@prefix atom: <{}> .\n", uris::ATOM_PREFIX);
        text += &format!("@prefix doap: <{}> .\n", uris::DOAP_PREFIX);
        text += &format!("@prefix foaf: <{}> .\n", uris::FOAF_PREFIX);
        text += &format!("@prefix lv2:  <{}> .\n", uris::CORE_PREFIX);
        text += &format!("@prefix rdf:  <{}> .\n", uris::RDF_PREFIX);
        text += &format!("@prefix rdfs: <{}> .\n", uris::RDFS_PREFIX);
        text += &format!("@prefix ui:   <{}> .\n", uris::UI_PREFIX);
        text += "\n";

        text += &format!("<{}>\n", uri);
        text += &format!("    a {} ;\n", lv2.plugin_type(self.config));
        text += &format!("    lv2:requiredFeature <{}> ,\n", uris::BOUNDED_BLOCK_LENGTH);
        if lv2.fixed_block_size {
            text += &format!("                        <{}> ,\n", uris::FIXED_BLOCK_LENGTH);
        }
        text += &format!("                        <{}> ;\n", uris::URID_MAP);
        text += &format!("    lv2:extensionData <{}> ,\n", uris::OPTIONS_INTERFACE);
        if lv2.state {
            text += &format!("                      <{}> ,\n", uris::STATE_INTERFACE);
        }
        text += &format!("                      <{}> ;\n", uris::PROGRAMS_INTERFACE);
        text += "\n";

        if self.has_editor(plugin) {
            text += &format!("    ui:ui <{}#ExternalUI> ,\n", uri);
            text += &format!("          <{}#ParentUI> ;\n", uri);
            text += "\n";
        }

        let mut port_index = 0;

        if self.config.wants_midi_input || lv2.time_position {
            text += "    lv2:port [\n";
            text += "        a lv2:InputPort, atom:AtomPort ;\n";
            text += "        atom:bufferType atom:Sequence ;\n";
            if self.config.wants_midi_input {
                text += &format!("        atom:supports <{}> ;\n", uris::MIDI_EVENT);
            }
            if lv2.time_position {
                text += &format!("        atom:supports <{}> ;\n", uris::TIME_POSITION);
            }
            text += &format!("        lv2:index {} ;\n", port_index);
            text += "        lv2:symbol \"lv2_events_in\" ;\n";
            text += "        lv2:name \"Events Input\" ;\n";
            text += "        lv2:designation lv2:control ;\n";
            if !self.config.is_instrument() {
                text += "        lv2:portProperty lv2:connectionOptional ;\n";
            }
            text += "    ] ;\n\n";
            port_index += 1;
        }

        if self.config.produces_midi_output {
            text += "    lv2:port [\n";
            text += "        a lv2:OutputPort, atom:AtomPort ;\n";
            text += "        atom:bufferType atom:Sequence ;\n";
            text += &format!("        atom:supports <{}> ;\n", uris::MIDI_EVENT);
            text += &format!("        lv2:index {} ;\n", port_index);
            text += "        lv2:symbol \"lv2_midi_out\" ;\n";
            text += "        lv2:name \"MIDI Output\" ;\n";
            text += "    ] ;\n\n";
            port_index += 1;
        }

        text += "    lv2:port [\n";
        text += "        a lv2:InputPort, lv2:ControlPort ;\n";
        text += &format!("        lv2:index {} ;\n", port_index);
        text += "        lv2:symbol \"lv2_freewheel\" ;\n";
        text += "        lv2:name \"Freewheel\" ;\n";
        text += "        lv2:default 0.0 ;\n";
        text += "        lv2:minimum 0.0 ;\n";
        text += "        lv2:maximum 1.0 ;\n";
        text += &format!("        lv2:designation <{}> ;\n", uris::FREE_WHEELING);
        text += &format!("        lv2:portProperty lv2:toggled, <{}> ;\n", uris::NOT_ON_GUI);
        text += "    ] ;\n\n";
        port_index += 1;

        if lv2.latency {
            text += "    lv2:port [\n";
            text += "        a lv2:OutputPort, lv2:ControlPort ;\n";
            text += &format!("        lv2:index {} ;\n", port_index);
            text += "        lv2:symbol \"lv2_latency\" ;\n";
            text += "        lv2:name \"Latency\" ;\n";
            text += &format!("        lv2:designation <{}> ;\n", uris::LATENCY);
            text += "        lv2:portProperty lv2:reportsLatency, lv2:integer ;\n";
            text += "    ] ;\n\n";
            port_index += 1;
        }

        for i in 0..num_inputs {
            open_port(&mut text, i);
            text += "        a lv2:InputPort, lv2:AudioPort ;\n";
            text += &format!("        lv2:index {} ;\n", port_index);
            text += &format!("        lv2:symbol \"lv2_audio_in_{}\" ;\n", i + 1);
            text += &format!("        lv2:name \"Audio Input {}\" ;\n", i + 1);
            close_port(&mut text, i, num_inputs);
            port_index += 1;
        }

        for i in 0..num_outputs {
            open_port(&mut text, i);
            text += "        a lv2:OutputPort, lv2:AudioPort ;\n";
            text += &format!("        lv2:index {} ;\n", port_index);
            text += &format!("        lv2:symbol \"lv2_audio_out_{}\" ;\n", i + 1);
            text += &format!("        lv2:name \"Audio Output {}\" ;\n", i + 1);
            close_port(&mut text, i, num_outputs);
            port_index += 1;
        }

        let parameters = plugin.parameters();
        let count = parameters.len();
        for (i, parameter) in parameters.iter().enumerate() {
            let port = ControlPort::new(parameter);
            open_port(&mut text, i);
            text += "        a lv2:InputPort, lv2:ControlPort ;\n";
            text += &format!("        lv2:index {} ;\n", port_index);
            text += &format!(
                "        lv2:symbol \"{}\" ;\n",
                self.symbols.symbol_for(&symbol_source(parameter, i), i)
            );

            let name = parameter.name(usize::MAX);
            if name.is_empty() {
                text += &format!("        lv2:name \"Port {}\" ;\n", i + 1);
            } else {
                text += &format!("        lv2:name \"{}\" ;\n", escape_literal(name));
            }

            text += &format!("        lv2:default {:?} ;\n", port.default());
            text += &format!("        lv2:minimum {:?} ;\n", port.minimum());
            text += &format!("        lv2:maximum {:?} ;\n", port.maximum());

            match port.class() {
                PortClass::Int => text += "        lv2:portProperty lv2:integer ;\n",
                PortClass::Bool => text += "        lv2:portProperty lv2:toggled ;\n",
                PortClass::Choice => {
                    text += "        lv2:portProperty lv2:integer, lv2:enumeration ;\n";
                    if let duplex_core::ParameterKind::Choice { choices } = parameter.kind() {
                        for (value, label) in choices.iter().enumerate() {
                            text += &format!(
                                "        lv2:scalePoint [ rdfs:label \"{}\" ; rdf:value {} ] ;\n",
                                escape_literal(label),
                                value
                            );
                        }
                    }
                }
                PortClass::Float | PortClass::Generic => {}
            }

            if !parameter.is_automatable() {
                text += &format!("        lv2:portProperty <{}> ;\n", uris::EXPENSIVE);
            }

            close_port(&mut text, i, count);
            port_index += 1;
        }

        text += &format!("    doap:name \"{}\" ;\n", escape_literal(self.config.name));
        text += &format!(
            "    doap:maintainer [ foaf:name \"{}\" ] .\n",
            escape_literal(self.config.vendor)
        );

        text
    }

    /// Contents of `presets.ttl`.
    ///
    /// Selects every program in turn to capture its state and values, then
    /// restores the program that was current before.
    pub fn presets<P: Plugin>(&mut self, plugin: &mut P) -> PluginResult<String> {
        let lv2 = self.lv2_config;
        let mut text = String::new();

        text += &format!("@prefix atom:  <{}> .\n", uris::ATOM_PREFIX);
        text += &format!("@prefix lv2:   <{}> .\n", uris::CORE_PREFIX);
        text += &format!("@prefix pset:  <{}> .\n", uris::PRESETS_PREFIX);
        text += &format!("@prefix rdf:   <{}> .\n", uris::RDF_PREFIX);
        text += &format!("@prefix rdfs:  <{}> .\n", uris::RDFS_PREFIX);
        text += &format!("@prefix state: <{}> .\n", uris::STATE_PREFIX);
        text += &format!("@prefix xsd:   <{}> .\n", uris::XSD_PREFIX);
        text += "\n";

        let num_programs = plugin.num_programs();
        let previous = plugin.current_program();

        for index in 0..num_programs {
            log::debug!("Saving preset {}/{}", index + 1, num_programs);
            plugin.set_current_program(index);
            self.symbols.clear();

            let num_parameters = plugin.parameters().len();
            text += &format!("<{}> a pset:Preset", lv2.preset_uri(index));

            if lv2.state {
                text += " ;\n";
                text += "    state:state [\n";
                if lv2.state_string {
                    let state = plugin.state_string()?.replace("\r\n", "\n");
                    text += &format!("        <{}>\n", uris::STATE_STRING);
                    text += "\"\"\"\n";
                    text += &escape_literal(&state);
                    text += "\"\"\"\n";
                } else {
                    let chunk = STANDARD.encode(plugin.program_state()?);
                    text += &format!("        <{}> [\n", uris::STATE_BINARY);
                    text += "            a atom:Chunk ;\n";
                    text += &format!("            rdf:value \"{}\"^^xsd:base64Binary ;\n", chunk);
                    text += "        ] ;\n";
                }

                if num_parameters == 0 {
                    text += "    ] .\n\n";
                    continue;
                }
                text += "    ] ;\n\n";
            } else if num_parameters == 0 {
                text += " .\n\n";
                continue;
            } else {
                text += " ;\n\n";
            }

            for (j, parameter) in plugin.parameters().iter().enumerate() {
                text += if j == 0 { "    lv2:port [\n" } else { "    [\n" };
                text += &format!(
                    "        lv2:symbol \"{}\" ;\n",
                    self.symbols.symbol_for(&symbol_source(parameter, j), j)
                );
                text += &format!("        pset:value {:?} ;\n", ControlPort::new(parameter).value());
                text += if j + 1 == num_parameters { "    ] " } else { "    ] ,\n" };
            }
            text += ".\n\n";
        }

        if num_programs > 0 {
            plugin.set_current_program(previous);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_core::{
        AudioProcessor, Category, ChannelBuffer, MidiBuffer, ParameterInfo, ParameterKind, ParameterSet,
        ProgramList, ProgramValue,
    };

    static WAVES: [&str; 3] = ["Sine", "Saw", "Square"];
    static SOFT: [ProgramValue; 2] = [ProgramValue::new("level", 0.25), ProgramValue::new("wave", 0.0)];
    static HARD: [ProgramValue; 2] = [ProgramValue::new("level", 1.0), ProgramValue::new("wave", 2.0)];

    struct TestSynth {
        parameters: ParameterSet,
        programs: Option<ProgramList>,
    }

    impl TestSynth {
        fn without_programs() -> Self {
            Self {
                programs: None,
                ..Self::create()
            }
        }

        fn without_parameters() -> Self {
            Self {
                parameters: ParameterSet::empty(),
                ..Self::create()
            }
        }
    }

    impl AudioProcessor for TestSynth {
        fn prepare(&mut self, _sample_rate: f64, _max_block_size: usize) {}
        fn process(&mut self, _buffer: &mut ChannelBuffer<f32>, _midi: &mut MidiBuffer) {}
    }

    impl Plugin for TestSynth {
        fn create() -> Self {
            Self {
                parameters: ParameterSet::new(vec![
                    Parameter::new(ParameterInfo::new("level", "Level", ParameterKind::float(0.0, 1.0), 0.5)),
                    Parameter::new(ParameterInfo::new("wave", "Wave \"shape\"", ParameterKind::Choice { choices: &WAVES }, 1.0)),
                    Parameter::new(ParameterInfo::new("Level", "", ParameterKind::Bool, 0.0).non_automatable()),
                ]),
                programs: Some(ProgramList::new(&[("Soft", &SOFT), ("Hard", &HARD)])),
            }
        }

        fn parameters(&self) -> &ParameterSet {
            &self.parameters
        }

        fn programs(&self) -> Option<&ProgramList> {
            self.programs.as_ref()
        }

        fn programs_mut(&mut self) -> Option<&mut ProgramList> {
            self.programs.as_mut()
        }
    }

    static CONFIG: PluginConfig = PluginConfig::new("Test Synth", Category::Instrument, "Dplx", "tsyn")
        .with_vendor("Duplex Audio");
    static LV2_CONFIG: Lv2Config = Lv2Config::new("urn:duplex:test-synth");

    #[test]
    fn test_manifest_lists_plugin_and_presets() {
        let synth = TestSynth::create();
        let generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");
        let text = generator.manifest(&synth);

        assert!(text.contains("<urn:duplex:test-synth>\n    a lv2:Plugin ;\n"));
        assert!(text.contains(&format!("    lv2:binary <test_synth{}> ;\n", BINARY_EXTENSION)));
        assert!(text.contains("    rdfs:seeAlso <test_synth.ttl> .\n"));
        assert!(text.contains("<urn:duplex:test-synth#preset001>\n    a pset:Preset ;\n"));
        assert!(text.contains("    rdfs:label \"Hard\" ;\n"));
        assert!(!text.contains("preset003"));
        assert!(!text.contains("ExternalUI"));
    }

    #[test]
    fn test_plugin_description_ports() {
        let synth = TestSynth::create();
        let mut generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");
        let text = generator.plugin_description(&synth, 0, 2);

        assert!(text.contains("    a lv2:InstrumentPlugin, lv2:Plugin ;\n"));
        assert!(text.contains(&format!("<{}> ,\n", uris::STATE_INTERFACE)));

        // Events in, freewheel, latency, two outputs, three controls.
        assert!(text.contains("        lv2:index 0 ;\n        lv2:symbol \"lv2_events_in\""));
        assert!(!text.contains("lv2:connectionOptional"));
        assert!(text.contains("        lv2:index 1 ;\n        lv2:symbol \"lv2_freewheel\""));
        assert!(text.contains("        lv2:index 2 ;\n        lv2:symbol \"lv2_latency\""));
        assert!(text.contains("        lv2:index 4 ;\n        lv2:symbol \"lv2_audio_out_2\""));
        assert!(!text.contains("lv2_audio_in_"));
        assert!(text.contains("        lv2:index 5 ;\n        lv2:symbol \"level\" ;\n"));

        assert!(text.contains("        lv2:default 0.5 ;\n        lv2:minimum 0.0 ;\n        lv2:maximum 1.0 ;\n"));
        assert!(text.contains("        lv2:name \"Wave \\\"shape\\\"\" ;\n"));
        assert!(text.contains("        lv2:portProperty lv2:integer, lv2:enumeration ;\n"));
        assert!(text.contains("        lv2:scalePoint [ rdfs:label \"Square\" ; rdf:value 2 ] ;\n"));

        // The bool id collides with "level" and has no name.
        assert!(text.contains("        lv2:symbol \"level_2\" ;\n        lv2:name \"Port 3\" ;\n"));
        assert!(text.contains(&format!("        lv2:portProperty <{}> ;\n", uris::EXPENSIVE)));

        assert!(text.ends_with("    doap:maintainer [ foaf:name \"Duplex Audio\" ] .\n"));
    }

    #[test]
    fn test_audio_port_grouping() {
        let synth = TestSynth::without_parameters();
        let mut generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");
        let text = generator.plugin_description(&synth, 2, 1);

        assert!(text.contains("lv2_audio_in_1\" ;\n        lv2:name \"Audio Input 1\" ;\n    ] ,\n    [\n"));
        assert!(text.contains("lv2_audio_in_2\" ;\n        lv2:name \"Audio Input 2\" ;\n    ] ;\n\n"));
        assert!(text.contains("lv2_audio_out_1\" ;\n        lv2:name \"Audio Output 1\" ;\n    ] ;\n\n    doap:name"));
    }

    #[test]
    fn test_presets_embed_state_and_values() {
        let mut synth = TestSynth::create();
        let mut generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");
        let text = generator.presets(&mut synth).unwrap();

        assert!(text.contains("<urn:duplex:test-synth#preset002> a pset:Preset ;\n    state:state [\n"));
        assert!(text.contains("            a atom:Chunk ;\n"));
        assert!(text.contains("\"^^xsd:base64Binary ;\n"));
        assert!(text.contains("        lv2:symbol \"level\" ;\n        pset:value 0.25 ;\n"));
        assert!(text.contains("        lv2:symbol \"wave\" ;\n        pset:value 2.0 ;\n"));
        // Symbols restart for every preset.
        assert_eq!(text.matches("lv2:symbol \"level_2\"").count(), 2);
        assert!(!text.contains("level_3"));
        assert!(text.contains("pset:value 0.0 ;\n    ] .\n\n"));

        // Generation leaves the first program selected again.
        assert_eq!(synth.current_program(), 0);
    }

    #[test]
    fn test_presets_with_string_state() {
        static STRING_STATE: Lv2Config = Lv2Config::new("urn:duplex:test-synth").with_state_string();
        let mut synth = TestSynth::create();
        let mut generator = TtlGenerator::new(&CONFIG, &STRING_STATE, "test_synth");
        let text = generator.presets(&mut synth).unwrap();

        assert!(text.contains(&format!("        <{}>\n\"\"\"\n", uris::STATE_STRING)));
        assert!(!text.contains("atom:Chunk"));
    }

    #[test]
    fn test_presets_without_parameters_close_state() {
        let mut synth = TestSynth::without_parameters();
        let mut generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");
        let text = generator.presets(&mut synth).unwrap();
        assert!(text.contains("        ] ;\n    ] .\n\n"));
        assert!(!text.contains("lv2:port"));

        static STATELESS: Lv2Config = Lv2Config::new("urn:duplex:test-synth").with_state(false);
        let mut generator = TtlGenerator::new(&CONFIG, &STATELESS, "test_synth");
        let text = generator.presets(&mut synth).unwrap();
        assert!(text.contains("<urn:duplex:test-synth#preset001> a pset:Preset .\n\n"));
    }

    #[test]
    fn test_no_programs_yields_header_only() {
        let mut synth = TestSynth::without_programs();
        let mut generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");
        let text = generator.presets(&mut synth).unwrap();
        assert!(text.starts_with("@prefix atom:"));
        assert!(text.ends_with(&format!("@prefix xsd:   <{}> .\n\n", uris::XSD_PREFIX)));
        assert!(!text.contains("pset:Preset"));

        let manifest = generator.manifest(&synth);
        assert!(!manifest.contains("pset:Preset ;"));
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
    }

    #[test]
    fn test_escape_literal_line_breaks() {
        assert_eq!(escape_literal("a\nb\r\tc"), r"a\nb\r\tc");
    }

    #[test]
    fn test_multi_line_program_name_stays_on_one_line() {
        let mut synth = TestSynth::create();
        synth.programs = Some(ProgramList::new(&[("Soft\nPad", &SOFT)]));
        let mut generator = TtlGenerator::new(&CONFIG, &LV2_CONFIG, "test_synth");

        let manifest = generator.manifest(&synth);
        assert!(manifest.contains("    rdfs:label \"Soft\\nPad\" ;\n"));
        assert!(!manifest.contains("Soft\nPad"));
    }
}
