//! VST2 plugin bundling support.
//!
//! On macOS the plugin is a `.vst` bundle; elsewhere hosts scan plain shared
//! libraries, so the built library is copied under the plugin's name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::util::{install_bundle, install_file, remove_existing, shorten_path, to_vst2_name};

/// Creates the VST2 plugin from a compiled library.
///
/// macOS layout:
/// ```text
/// PluginName.vst/
/// └── Contents/
///     ├── Info.plist
///     ├── PkgInfo
///     ├── MacOS/
///     │   └── PluginName (binary)
///     └── Resources/
/// ```
pub fn bundle_vst2(
    package: &str,
    target_dir: &Path,
    dylib_path: &Path,
    version: &str,
    install: bool,
    verbose: bool,
) -> Result<(), String> {
    let plugin_name = to_vst2_name(package);

    crate::status!("  Creating VST2 plugin...");

    let output = if cfg!(target_os = "macos") {
        create_mac_bundle(package, &plugin_name, target_dir, dylib_path, version)?
    } else {
        let file_name = format!("{}{}", plugin_name, std::env::consts::DLL_SUFFIX);
        let dest = target_dir.join(&file_name);
        remove_existing(&dest)?;
        fs::copy(dylib_path, &dest).map_err(|e| format!("Failed to copy library: {}", e))?;
        dest
    };
    crate::verbose!(verbose, "    Path: {}", output.display());

    let output_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or("Invalid VST2 output path")?;

    if install {
        let dest = if output.is_dir() {
            install_bundle(&output, &output_name, &vst2_install_dir(), verbose)?
        } else {
            install_file(&output, &output_name, &vst2_install_dir(), verbose)?
        };
        crate::status!("✓ {} → {}", output_name, shorten_path(&dest));
    } else {
        crate::status!("✓ {}", output_name);
    }

    Ok(())
}

fn create_mac_bundle(
    package: &str,
    plugin_name: &str,
    target_dir: &Path,
    dylib_path: &Path,
    version: &str,
) -> Result<PathBuf, String> {
    let bundle_dir = target_dir.join(format!("{}.vst", plugin_name));
    let contents_dir = bundle_dir.join("Contents");
    let macos_dir = contents_dir.join("MacOS");
    let resources_dir = contents_dir.join("Resources");

    remove_existing(&bundle_dir)?;

    fs::create_dir_all(&macos_dir).map_err(|e| format!("Failed to create MacOS dir: {}", e))?;
    fs::create_dir_all(&resources_dir)
        .map_err(|e| format!("Failed to create Resources dir: {}", e))?;

    fs::copy(dylib_path, macos_dir.join(plugin_name))
        .map_err(|e| format!("Failed to copy dylib: {}", e))?;

    fs::write(contents_dir.join("Info.plist"), create_info_plist(package, plugin_name, version))
        .map_err(|e| format!("Failed to write Info.plist: {}", e))?;

    fs::write(contents_dir.join("PkgInfo"), "BNDL????")
        .map_err(|e| format!("Failed to write PkgInfo: {}", e))?;

    Ok(bundle_dir)
}

/// Creates the Info.plist content for a VST2 bundle.
fn create_info_plist(package: &str, executable_name: &str, version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleDevelopmentRegion</key>
    <string>English</string>
    <key>CFBundleExecutable</key>
    <string>{executable_name}</string>
    <key>CFBundleIdentifier</key>
    <string>com.duplex.{package}</string>
    <key>CFBundleInfoDictionaryVersion</key>
    <string>6.0</string>
    <key>CFBundleName</key>
    <string>{executable_name}</string>
    <key>CFBundlePackageType</key>
    <string>BNDL</string>
    <key>CFBundleSignature</key>
    <string>????</string>
    <key>CFBundleVersion</key>
    <string>{version}</string>
    <key>CFBundleShortVersionString</key>
    <string>{version}</string>
</dict>
</plist>
"#
    )
}

/// Per-user VST2 directory below `$HOME`.
fn vst2_install_dir() -> Vec<&'static str> {
    if cfg!(target_os = "macos") {
        vec!["Library", "Audio", "Plug-Ins", "VST"]
    } else {
        vec![".vst"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_plist_names_executable() {
        let plist = create_info_plist("gain", "DuplexGain", "0.1.0");
        assert!(plist.contains("<string>DuplexGain</string>"));
        assert!(plist.contains("<string>com.duplex.gain</string>"));
        assert!(plist.contains("<string>0.1.0</string>"));
    }

    #[test]
    fn test_bundle_copies_library() {
        let dir = std::env::temp_dir().join(format!("duplex-xtask-vst2-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let dylib = dir.join("libfake.so");
        fs::write(&dylib, b"binary").unwrap();

        bundle_vst2("fake-plugin", &dir, &dylib, "0.1.0", false, false).unwrap();

        let expected = if cfg!(target_os = "macos") {
            dir.join("DuplexFakePlugin.vst").join("Contents").join("MacOS").join("DuplexFakePlugin")
        } else {
            dir.join(format!("DuplexFakePlugin{}", std::env::consts::DLL_SUFFIX))
        };
        assert_eq!(fs::read(expected).unwrap(), b"binary");

        fs::remove_dir_all(&dir).unwrap();
    }
}
