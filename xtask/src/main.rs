//! Build tooling for Duplex plugins.
//!
//! Usage: cargo xtask bundle <package> [--vst2] [--lv2] [--release] [--install] [--clean] [--verbose]

mod build;
mod lv2;
mod util;
mod vst2;

use build::{build_native, clean_build_caches, get_version_info, get_workspace_root, Format};
use util::print_error;

/// Parsed `bundle` command line.
#[derive(Debug, PartialEq)]
struct BundleArgs {
    package: String,
    formats: Vec<Format>,
    release: bool,
    install: bool,
    clean: bool,
    verbose: bool,
}

fn parse_args(args: &[String]) -> Result<BundleArgs, String> {
    if args.len() < 3 || args[1] != "bundle" {
        return Err("expected `bundle <package>`".to_string());
    }

    let package = args[2].clone();
    if package.starts_with("--") {
        return Err("missing package name".to_string());
    }

    let mut parsed = BundleArgs {
        package,
        formats: Vec::new(),
        release: false,
        install: false,
        clean: false,
        verbose: false,
    };

    for arg in &args[3..] {
        match arg.as_str() {
            "--vst2" => parsed.formats.push(Format::Vst2),
            "--lv2" => parsed.formats.push(Format::Lv2),
            "--release" => parsed.release = true,
            "--install" => parsed.install = true,
            "--clean" => parsed.clean = true,
            "--verbose" | "-v" => parsed.verbose = true,
            other => return Err(format!("unknown option: {}", other)),
        }
    }

    parsed.formats.dedup();
    // Default to both formats if none specified
    if parsed.formats.is_empty() {
        parsed.formats = vec![Format::Vst2, Format::Lv2];
    }

    Ok(parsed)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            print_error(&e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = bundle(&parsed) {
        print_error(&e);
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask bundle <package> [--vst2] [--lv2] [--release] [--install] [--clean]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  bundle    Build and bundle a plugin");
    eprintln!();
    eprintln!("Formats (both if none specified):");
    eprintln!("  --vst2    Build VST2 plugin (.vst bundle on macOS, shared library elsewhere)");
    eprintln!("  --lv2     Build LV2 bundle (.lv2 directory with generated TTL)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --release    Build in release mode");
    eprintln!("  --install    Install to per-user plugin directories");
    eprintln!("  --clean      Remove previous bundles before building");
    eprintln!("  --verbose    Print paths and intermediate steps");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  cargo xtask bundle gain --vst2 --release --install");
    eprintln!("  cargo xtask bundle gain --lv2 --release");
}

fn bundle(args: &BundleArgs) -> Result<(), String> {
    let BundleArgs { package, formats, release, install, clean, verbose } = args;
    status!("Bundling {} (release: {})...", package, release);

    let workspace_root = get_workspace_root()?;
    let (version, _) = get_version_info(&workspace_root)?;

    if *clean {
        clean_build_caches(&workspace_root, package, *release, formats, *verbose)?;
    }

    let profile = if *release { "release" } else { "debug" };
    let target_dir = workspace_root.join("target").join(profile);

    // Each format is its own build: the export macros are feature gated.
    for format in formats {
        let dylib_path = build_native(package, *release, &workspace_root, *format, *verbose)?;
        match format {
            Format::Vst2 => {
                vst2::bundle_vst2(package, &target_dir, &dylib_path, &version, *install, *verbose)?
            }
            Format::Lv2 => lv2::bundle_lv2(package, &target_dir, &dylib_path, *install, *verbose)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("xtask").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn test_parse_defaults_to_both_formats() {
        let parsed = parse_args(&args(&["bundle", "gain"])).unwrap();
        assert_eq!(parsed.package, "gain");
        assert_eq!(parsed.formats, vec![Format::Vst2, Format::Lv2]);
        assert!(!parsed.release && !parsed.install && !parsed.clean);
    }

    #[test]
    fn test_parse_flags() {
        let parsed =
            parse_args(&args(&["bundle", "gain", "--lv2", "--release", "--install", "-v"])).unwrap();
        assert_eq!(parsed.formats, vec![Format::Lv2]);
        assert!(parsed.release);
        assert!(parsed.install);
        assert!(parsed.verbose);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["build", "gain"])).is_err());
        assert!(parse_args(&args(&["bundle"])).is_err());
        assert!(parse_args(&args(&["bundle", "--vst2"])).is_err());
        assert!(parse_args(&args(&["bundle", "gain", "--vst3"])).is_err());
    }
}
