//! Shared utilities for xtask.

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Print an error message, with red color if stderr is a terminal.
pub fn print_error(msg: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("\x1b[1;31mError:\x1b[0m {}", msg);
    } else {
        eprintln!("Error: {}", msg);
    }
}

/// Print status message (always shown)
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        println!($($arg)*)
    };
}

/// Print verbose message (only in verbose mode)
#[macro_export]
macro_rules! verbose {
    ($verbose:expr, $($arg:tt)*) => {
        if $verbose {
            println!($($arg)*)
        }
    };
}

/// Shorten home directory in path for display
#[must_use]
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = std::env::var_os("HOME") {
        let home_path = PathBuf::from(home);
        if let Ok(stripped) = path.strip_prefix(&home_path) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Convert plugin name to PascalCase for bundle names.
/// "midi-transform" → "MidiTransform"
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Crate library name for a package: "midi-transform" -> "midi_transform".
#[must_use]
pub fn to_lib_name(package: &str) -> String {
    package.replace('-', "_")
}

/// File name cargo gives the built cdylib on this platform.
/// "gain" -> "libgain.so" on Linux, "gain.dll" on Windows
#[must_use]
pub fn to_dylib_name(package: &str) -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        to_lib_name(package),
        std::env::consts::DLL_SUFFIX
    )
}

/// Convert package name to the VST2 plugin name, without extension.
/// "gain" -> "DuplexGain"
#[must_use]
pub fn to_vst2_name(package: &str) -> String {
    format!("Duplex{}", to_pascal_case(package))
}

/// Convert package name to LV2 bundle directory name.
/// "midi-transform" -> "midi_transform.lv2"
#[must_use]
pub fn to_lv2_bundle_name(package: &str) -> String {
    format!("{}.lv2", to_lib_name(package))
}

/// Resolve a per-user plugin directory below `$HOME`.
pub fn user_plugin_dir(install_subdir: &[&str]) -> Result<PathBuf, String> {
    let home = std::env::var("HOME").map_err(|_| "HOME not set")?;

    let mut dest_dir = PathBuf::from(&home);
    for part in install_subdir {
        dest_dir = dest_dir.join(part);
    }
    Ok(dest_dir)
}

/// Install a bundle directory to a user plugin directory.
///
/// 1. Resolve `$HOME/<install_subdir...>`
/// 2. Create directory if needed
/// 3. Remove existing installation if present
/// 4. Copy bundle to destination
///
/// Returns the destination path.
pub fn install_bundle(
    bundle_dir: &Path,
    bundle_name: &str,
    install_subdir: &[&str],
    verbose: bool,
) -> Result<PathBuf, String> {
    let dest_dir = user_plugin_dir(install_subdir)?;

    fs::create_dir_all(&dest_dir)
        .map_err(|e| format!("Failed to create install directory: {}", e))?;

    let dest = dest_dir.join(bundle_name);

    if dest.exists() {
        fs::remove_dir_all(&dest)
            .map_err(|e| format!("Failed to remove old installation: {}", e))?;
    }

    copy_dir_all(bundle_dir, &dest)?;

    crate::verbose!(verbose, "    Installed to: {}", dest.display());

    Ok(dest)
}

/// Install a single plugin file to a user plugin directory.
pub fn install_file(
    file: &Path,
    file_name: &str,
    install_subdir: &[&str],
    verbose: bool,
) -> Result<PathBuf, String> {
    let dest_dir = user_plugin_dir(install_subdir)?;

    fs::create_dir_all(&dest_dir)
        .map_err(|e| format!("Failed to create install directory: {}", e))?;

    let dest = dest_dir.join(file_name);
    fs::copy(file, &dest).map_err(|e| format!("Failed to copy plugin: {}", e))?;

    crate::verbose!(verbose, "    Installed to: {}", dest.display());

    Ok(dest)
}

/// Remove a previous bundle, file or directory, if present.
pub fn remove_existing(path: &Path) -> Result<(), String> {
    if path.is_dir() {
        fs::remove_dir_all(path)
            .map_err(|e| format!("Failed to remove {}: {}", path.display(), e))?;
    } else if path.exists() {
        fs::remove_file(path).map_err(|e| format!("Failed to remove {}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Recursively copy a directory, preserving symlinks.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), String> {
    fs::create_dir_all(dst).map_err(|e| format!("Failed to create dir: {}", e))?;

    for entry in fs::read_dir(src).map_err(|e| format!("Failed to read dir: {}", e))? {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let ty = entry
            .file_type()
            .map_err(|e| format!("Failed to get file type: {}", e))?;

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else if ty.is_symlink() {
            #[cfg(unix)]
            {
                let target = fs::read_link(&src_path)
                    .map_err(|e| format!("Failed to read symlink: {}", e))?;
                std::os::unix::fs::symlink(&target, &dst_path)
                    .map_err(|e| format!("Failed to create symlink: {}", e))?;
            }
            #[cfg(not(unix))]
            {
                fs::copy(&src_path, &dst_path)
                    .map_err(|e| format!("Failed to copy file: {}", e))?;
            }
        } else {
            fs::copy(&src_path, &dst_path)
                .map_err(|e| format!("Failed to copy file: {}", e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(to_pascal_case("midi-transform"), "MidiTransform");
        assert_eq!(to_pascal_case("gain"), "Gain");
        assert_eq!(to_vst2_name("midi-transform"), "DuplexMidiTransform");
        assert_eq!(to_lv2_bundle_name("midi-transform"), "midi_transform.lv2");
        assert!(to_dylib_name("my-gain").contains("my_gain"));
    }

    #[test]
    fn test_copy_dir_all_and_remove() {
        let root = std::env::temp_dir().join(format!("duplex-xtask-copy-{}", std::process::id()));
        let src = root.join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("a.ttl"), "a").unwrap();
        fs::write(src.join("nested").join("b.ttl"), "b").unwrap();

        let dst = root.join("dst");
        copy_dir_all(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst.join("nested").join("b.ttl")).unwrap(), "b");

        remove_existing(&dst).unwrap();
        assert!(!dst.exists());
        remove_existing(&dst).unwrap();

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_shorten_path_outside_home() {
        assert_eq!(shorten_path(Path::new("/definitely/not/home")), "/definitely/not/home");
    }
}
