//! LV2 bundle creation.
//!
//! The TTL documents are produced by the plugin itself: the bundler loads
//! the built library and calls its exported `lv2_generate_ttl` with the
//! bundle directory as working directory.
//!
//! ```text
//! name.lv2/
//! ├── libname.so
//! ├── manifest.ttl
//! ├── libname.ttl
//! └── presets.ttl   (when presets are enabled)
//! ```

use std::ffi::{c_char, CString};
use std::fs;
use std::path::Path;

use libloading::{Library, Symbol};

use crate::util::{install_bundle, remove_existing, shorten_path, to_lv2_bundle_name};

/// Exported TTL generator symbol.
const GENERATE_TTL_SYMBOL: &[u8] = b"lv2_generate_ttl\0";

type GenerateTtlFn = unsafe extern "C" fn(basename: *const c_char);

/// Creates an LV2 bundle from a compiled library.
pub fn bundle_lv2(
    package: &str,
    target_dir: &Path,
    dylib_path: &Path,
    install: bool,
    verbose: bool,
) -> Result<(), String> {
    let bundle_name = to_lv2_bundle_name(package);
    let bundle_dir = target_dir.join(&bundle_name);

    crate::status!("  Creating LV2 bundle...");
    crate::verbose!(verbose, "    Path: {}", bundle_dir.display());

    remove_existing(&bundle_dir)?;
    fs::create_dir_all(&bundle_dir)
        .map_err(|e| format!("Failed to create bundle dir: {}", e))?;

    let file_name = dylib_path
        .file_name()
        .ok_or_else(|| format!("Invalid library path: {}", dylib_path.display()))?;
    let bundled_lib = bundle_dir.join(file_name);
    fs::copy(dylib_path, &bundled_lib).map_err(|e| format!("Failed to copy library: {}", e))?;

    let basename = bundled_lib
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or("Invalid library name")?;

    generate_ttl(&bundled_lib, &bundle_dir, &basename, verbose)?;

    if !bundle_dir.join("manifest.ttl").exists() {
        return Err(format!(
            "{} did not write manifest.ttl (see its output above)",
            shorten_path(&bundled_lib)
        ));
    }

    if install {
        let dest = install_bundle(&bundle_dir, &bundle_name, &lv2_install_dir(), verbose)?;
        crate::status!("✓ {} → {}", bundle_name, shorten_path(&dest));
    } else {
        crate::status!("✓ {}", bundle_name);
    }

    Ok(())
}

/// Load `library` and run its TTL generator inside `bundle_dir`.
fn generate_ttl(
    library: &Path,
    bundle_dir: &Path,
    basename: &str,
    verbose: bool,
) -> Result<(), String> {
    crate::verbose!(verbose, "    Generating TTL for {}...", basename);

    let basename = CString::new(basename).map_err(|_| "Library name contains a NUL byte")?;

    // SAFETY: the library is one this workspace just built; its
    // initializers are plain Rust statics.
    let lib = unsafe { Library::new(library) }
        .map_err(|e| format!("Failed to load {}: {}", library.display(), e))?;

    // SAFETY: `export_lv2!` defines the symbol with this signature.
    let generate: Symbol<GenerateTtlFn> = unsafe { lib.get(GENERATE_TTL_SYMBOL) }
        .map_err(|e| {
            format!(
                "{} has no lv2_generate_ttl export (built without the lv2 feature?): {}",
                library.display(),
                e
            )
        })?;

    let previous_dir = std::env::current_dir()
        .map_err(|e| format!("Failed to read working directory: {}", e))?;
    std::env::set_current_dir(bundle_dir)
        .map_err(|e| format!("Failed to enter bundle dir: {}", e))?;

    // SAFETY: `basename` is a live null-terminated string.
    unsafe { generate(basename.as_ptr()) };

    std::env::set_current_dir(&previous_dir)
        .map_err(|e| format!("Failed to restore working directory: {}", e))?;

    Ok(())
}

/// Per-user LV2 directory below `$HOME`.
fn lv2_install_dir() -> Vec<&'static str> {
    if cfg!(target_os = "macos") {
        vec!["Library", "Audio", "Plug-Ins", "LV2"]
    } else {
        vec![".lv2"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_is_reported() {
        let dir = std::env::temp_dir().join(format!("duplex-xtask-lv2-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let err = generate_ttl(&dir.join("missing.so"), &dir, "missing", false).unwrap_err();
        assert!(err.contains("Failed to load"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_install_dir_is_per_user() {
        let dir = lv2_install_dir();
        assert!(dir.last().unwrap().to_lowercase().contains("lv2"));
    }
}
