//! Cargo invocations and build artifact handling.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::util::{remove_existing, to_dylib_name, to_lv2_bundle_name, to_vst2_name};

/// Plugin formats the bundler can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Vst2,
    Lv2,
}

impl Format {
    /// Cargo feature enabling the format's export macro.
    pub fn feature(self) -> &'static str {
        match self {
            Format::Vst2 => "vst2",
            Format::Lv2 => "lv2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Format::Vst2 => "VST2",
            Format::Lv2 => "LV2",
        }
    }
}

/// Read version from workspace Cargo.toml.
///
/// Returns the version string and the packed `0xMMmmbb` code.
pub fn get_version_info(workspace_root: &Path) -> Result<(String, u32), String> {
    let cargo_toml_path = workspace_root.join("Cargo.toml");
    let cargo_toml = fs::read_to_string(&cargo_toml_path)
        .map_err(|e| format!("Failed to read Cargo.toml: {}", e))?;
    parse_version_info(&cargo_toml)
}

fn parse_version_info(cargo_toml: &str) -> Result<(String, u32), String> {
    let version = cargo_toml
        .lines()
        .skip_while(|line| !line.contains("[workspace.package]"))
        .skip(1)
        .take_while(|line| !line.trim_start().starts_with('['))
        .find(|line| line.trim().starts_with("version"))
        .and_then(|line| line.split('=').nth(1))
        .map(|v| v.trim().trim_matches('"').to_string())
        .ok_or("Could not find version in Cargo.toml")?;

    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() < 3 {
        return Err(format!("Invalid version format: {}", version));
    }

    let major: u32 = parts[0].parse().map_err(|_| "Invalid major version")?;
    let minor: u32 = parts[1].parse().map_err(|_| "Invalid minor version")?;
    let patch: u32 = parts[2].parse().map_err(|_| "Invalid patch version")?;

    Ok((version, (major << 16) | (minor << 8) | patch))
}

/// Locate the workspace root through cargo.
pub fn get_workspace_root() -> Result<PathBuf, String> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .map_err(|e| format!("Failed to locate workspace: {}", e))?;

    if !output.status.success() {
        return Err("Failed to locate workspace".to_string());
    }

    let cargo_toml = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(cargo_toml.trim());
    path.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "Invalid workspace path".to_string())
}

/// Build the plugin library for the host platform with one format enabled.
///
/// Returns the path of the built cdylib.
pub fn build_native(
    package: &str,
    release: bool,
    workspace_root: &Path,
    format: Format,
    verbose: bool,
) -> Result<PathBuf, String> {
    crate::status!("  Building {}...", format.label());

    let profile = if release { "release" } else { "debug" };

    let mut cmd = Command::new("cargo");
    cmd.arg("build")
        .arg("-p")
        .arg(package)
        .arg("--features")
        .arg(format.feature())
        .current_dir(workspace_root);

    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().map_err(|e| format!("Failed to run cargo: {}", e))?;
    if !status.success() {
        return Err(format!("{} build failed", format.label()));
    }

    let dylib_path = workspace_root.join("target").join(profile).join(to_dylib_name(package));

    if !dylib_path.exists() {
        return Err(format!("Built library not found: {}", dylib_path.display()));
    }

    crate::verbose!(verbose, "    Binary: {}", dylib_path.display());
    Ok(dylib_path)
}

/// Remove previous bundles so the next build starts from scratch.
pub fn clean_build_caches(
    workspace_root: &Path,
    package: &str,
    release: bool,
    formats: &[Format],
    verbose: bool,
) -> Result<(), String> {
    let profile = if release { "release" } else { "debug" };
    let target_dir = workspace_root.join("target").join(profile);

    let labels: Vec<&str> = formats.iter().map(|f| f.label()).collect();
    crate::status!("  Cleaning ({})...", labels.join(", "));

    for format in formats {
        let paths = match format {
            Format::Vst2 => vec![
                target_dir.join(format!("{}.vst", to_vst2_name(package))),
                target_dir.join(format!("{}{}", to_vst2_name(package), std::env::consts::DLL_SUFFIX)),
            ],
            Format::Lv2 => vec![target_dir.join(to_lv2_bundle_name(package))],
        };
        for path in paths {
            if path.exists() {
                crate::verbose!(verbose, "    Removing: {}", path.display());
                remove_existing(&path)?;
            }
        }
    }

    // Stale cdylib would otherwise be bundled if the next build fails early.
    let dylib = target_dir.join(to_dylib_name(package));
    if dylib.exists() {
        crate::verbose!(verbose, "    Removing: {}", dylib.display());
        remove_existing(&dylib)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_info() {
        let toml = "[workspace]\nmembers = []\n\n[workspace.package]\nedition = \"2021\"\nversion = \"1.2.3\"\n";
        assert_eq!(parse_version_info(toml).unwrap(), ("1.2.3".to_string(), 0x01_02_03));
    }

    #[test]
    fn test_parse_version_info_errors() {
        assert!(parse_version_info("[package]\nversion = \"1.0.0\"\n").is_err());
        assert!(parse_version_info("[workspace.package]\nversion = \"1.0\"\n").is_err());
        assert!(parse_version_info("[workspace.package]\nversion = \"a.b.c\"\n").is_err());
    }

    #[test]
    fn test_format_features() {
        assert_eq!(Format::Vst2.feature(), "vst2");
        assert_eq!(Format::Lv2.label(), "LV2");
    }
}
