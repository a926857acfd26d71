//! LV2 export macro.

/// Generate the `lv2_generate_ttl` entry point for a plugin.
///
/// The bundler loads the built library and calls this function with the
/// binary's base name; it writes the bundle documents to the current
/// directory.
///
/// # Arguments
///
/// * `$config` - A static [`duplex_core::PluginConfig`] with the shared metadata
/// * `$lv2_config` - A static [`Lv2Config`](crate::Lv2Config) with the plugin URI
/// * `$plugin` - The plugin type implementing [`duplex_core::Plugin`]
///
/// # Example
///
/// ```rust,ignore
/// use duplex_lv2::{export_lv2, Lv2Config};
///
/// static LV2_CONFIG: Lv2Config = Lv2Config::new("urn:my-company:my-plugin");
///
/// export_lv2!(CONFIG, LV2_CONFIG, MyPlugin);
/// ```
#[macro_export]
macro_rules! export_lv2 {
    ($config:expr, $lv2_config:expr, $plugin:ty) => {
        #[no_mangle]
        pub extern "C" fn lv2_generate_ttl(basename: *const std::ffi::c_char) {
            // SAFETY: the bundler passes a null-terminated base name.
            unsafe { $crate::generate_ttl_entry::<$plugin>(basename, &$config, &$lv2_config) };
        }
    };
}

/// Body of the exported `lv2_generate_ttl`.
///
/// Failures are logged; nothing is retried.
///
/// # Safety
///
/// `basename` must be null or point to a null-terminated string.
#[doc(hidden)]
pub unsafe fn generate_ttl_entry<P: duplex_core::Plugin>(
    basename: *const std::ffi::c_char,
    config: &duplex_core::PluginConfig,
    lv2_config: &crate::Lv2Config,
) {
    if basename.is_null() {
        log::error!("lv2_generate_ttl called without a basename");
        return;
    }
    // SAFETY: non-null and terminated per the caller's contract.
    let basename = unsafe { std::ffi::CStr::from_ptr(basename) }.to_string_lossy();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        crate::write_lv2_files::<P>(&basename, config, lv2_config)
    }));
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::error!("Failed to write LV2 files for '{}': {}", basename, err),
        Err(_) => log::error!("Panic while writing LV2 files for '{}'", basename),
    }
}
