use super::{colorize_stage, json_pretty, EXIT_INVALID, EXIT_SUCCESS};
use apkspec_schema::BuildDescriptor;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn run(manifest: &Path, json: bool) -> Result<u8, String> {
    let text = fs::read_to_string(manifest)
        .map_err(|e| format!("failed to read manifest '{}': {e}", manifest.display()))?;

    tracing::debug!(manifest = %manifest.display(), "resolving manifest");

    match apkspec_schema::resolve_manifest_str(&text) {
        Ok(descriptor) => {
            tracing::debug!(package = %descriptor.package_name, "manifest accepted");
            if json {
                println!("{}", json_pretty(&descriptor)?);
            } else {
                print!("{}", render_descriptor(&descriptor));
            }
            Ok(EXIT_SUCCESS)
        }
        Err(diagnostics) => {
            tracing::debug!(count = diagnostics.len(), "manifest rejected");
            if json {
                println!("{}", json_pretty(&diagnostics)?);
            } else {
                for d in &diagnostics {
                    match &d.field {
                        Some(field) => {
                            eprintln!("{}: {field}: {}", colorize_stage(d.stage), d.message);
                        }
                        None => eprintln!("{}: {}", colorize_stage(d.stage), d.message),
                    }
                }
            }
            Ok(EXIT_INVALID)
        }
    }
}

fn join<I: IntoIterator<Item = T>, T: ToString>(items: I) -> String {
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_descriptor(d: &BuildDescriptor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "title: {}", d.title);
    let _ = writeln!(out, "package: {}.{}", d.package_domain, d.package_name);
    let _ = writeln!(out, "version: {}", d.version);
    let _ = writeln!(
        out,
        "entry point: {} (source dir: {})",
        d.entry_point,
        d.source_dir.display()
    );
    let _ = writeln!(out, "include exts: {}", join(&d.include_exts));
    let _ = writeln!(out, "requirements: {}", join(&d.requirements));
    let _ = writeln!(out, "orientation: {}", d.orientation);
    let _ = writeln!(out, "fullscreen: {}", d.fullscreen);
    let _ = writeln!(out, "permissions: {}", join(&d.permissions));
    let _ = writeln!(
        out,
        "android: api {} (min {}), sdk {}, ndk {}",
        d.api_level, d.min_api_level, d.sdk_version, d.ndk_version
    );
    let _ = writeln!(out, "archs: {}", join(&d.architectures));
    let _ = writeln!(out, "androidx: {}", d.enable_androidx);
    let _ = writeln!(out, "accept sdk license: {}", d.accept_sdk_license);
    if !d.gradle_dependencies.is_empty() {
        let _ = writeln!(out, "gradle dependencies: {}", join(&d.gradle_dependencies));
    }
    if let Some(icon) = &d.icon {
        let _ = writeln!(out, "icon: {}", icon.display());
    }
    if let Some(presplash) = &d.presplash {
        let _ = writeln!(out, "presplash: {}", presplash.display());
    }
    let _ = writeln!(out, "log level: {}", d.log_level);
    let _ = writeln!(out, "warn on root: {}", d.warn_on_root);
    out
}
