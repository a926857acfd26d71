//! URIs and prefixes used in the generated descriptions.

pub const ATOM_PREFIX: &str = "http://lv2plug.in/ns/ext/atom#";
pub const CORE_PREFIX: &str = "http://lv2plug.in/ns/lv2core#";
pub const PRESETS_PREFIX: &str = "http://lv2plug.in/ns/ext/presets#";
pub const STATE_PREFIX: &str = "http://lv2plug.in/ns/ext/state#";
pub const UI_PREFIX: &str = "http://lv2plug.in/ns/extensions/ui#";
pub const RDF_PREFIX: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_PREFIX: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_PREFIX: &str = "http://www.w3.org/2001/XMLSchema#";
pub const DOAP_PREFIX: &str = "http://usefulinc.com/ns/doap#";
pub const FOAF_PREFIX: &str = "http://xmlns.com/foaf/0.1/";

pub const BOUNDED_BLOCK_LENGTH: &str = "http://lv2plug.in/ns/ext/buf-size#boundedBlockLength";
pub const FIXED_BLOCK_LENGTH: &str = "http://lv2plug.in/ns/ext/buf-size#fixedBlockLength";
pub const URID_MAP: &str = "http://lv2plug.in/ns/ext/urid#map";
pub const OPTIONS_INTERFACE: &str = "http://lv2plug.in/ns/ext/options#interface";
pub const STATE_INTERFACE: &str = "http://lv2plug.in/ns/ext/state#interface";
pub const PROGRAMS_INTERFACE: &str = "http://kxstudio.sf.net/ns/lv2ext/programs#Interface";
pub const PROGRAMS_UI_INTERFACE: &str = "http://kxstudio.sf.net/ns/lv2ext/programs#UIInterface";
pub const EXTERNAL_UI_WIDGET: &str = "http://kxstudio.sf.net/ns/lv2ext/external-ui#Widget";
pub const INSTANCE_ACCESS: &str = "http://lv2plug.in/ns/ext/instance-access";

pub const MIDI_EVENT: &str = "http://lv2plug.in/ns/ext/midi#MidiEvent";
pub const TIME_POSITION: &str = "http://lv2plug.in/ns/ext/time#Position";
pub const FREE_WHEELING: &str = "http://lv2plug.in/ns/lv2core#freeWheeling";
pub const LATENCY: &str = "http://lv2plug.in/ns/lv2core#latency";
pub const NOT_ON_GUI: &str = "http://lv2plug.in/ns/ext/port-props#notOnGUI";
pub const EXPENSIVE: &str = "http://lv2plug.in/ns/ext/port-props#expensive";

/// State keys used in presets.
pub const STATE_STRING: &str = "urn:duplex:stateString";
pub const STATE_BINARY: &str = "urn:duplex:stateBinary";

/// Native UI class for the current platform.
pub const fn parent_ui_class() -> &'static str {
    if cfg!(target_os = "macos") {
        "ui:CocoaUI"
    } else if cfg!(target_os = "windows") {
        "ui:WindowsUI"
    } else {
        "ui:X11UI"
    }
}
