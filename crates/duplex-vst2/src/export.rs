//! VST2 export macro and entry points.

/// Generate the VST2 entry points for a plugin.
///
/// Hosts look up `VSTPluginMain` and call it once per instance with their
/// callback. Older macOS hosts look for `main_macho` instead.
///
/// # Arguments
///
/// * `$config` - A static [`duplex_core::PluginConfig`] with the shared metadata
/// * `$vst2_config` - A static [`Vst2Config`](crate::Vst2Config) with the VST2 id
/// * `$plugin` - The plugin type implementing [`duplex_core::Plugin`]
///
/// # Example
///
/// ```rust,ignore
/// use duplex_core::{Category, PluginConfig};
/// use duplex_vst2::{export_vst2, Vst2Config};
///
/// static CONFIG: PluginConfig = PluginConfig::new("My Plugin", Category::Effect, "Mfgr", "plgn")
///     .with_vendor("My Company");
/// static VST2_CONFIG: Vst2Config = Vst2Config::new("MyPl");
///
/// export_vst2!(CONFIG, VST2_CONFIG, MyPlugin);
/// ```
#[macro_export]
macro_rules! export_vst2 {
    ($config:expr, $vst2_config:expr, $plugin:ty) => {
        #[no_mangle]
        pub extern "C" fn VSTPluginMain(
            callback: Option<$crate::abi::HostCallback>,
        ) -> *mut $crate::abi::AEffect {
            $crate::Vst2Wrapper::<$plugin>::instantiate(callback, &$config, &$vst2_config)
        }

        #[cfg(target_os = "macos")]
        #[no_mangle]
        pub extern "C" fn main_macho(
            callback: Option<$crate::abi::HostCallback>,
        ) -> *mut $crate::abi::AEffect {
            VSTPluginMain(callback)
        }
    };
}
