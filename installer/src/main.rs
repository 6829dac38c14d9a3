use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};

use gl_context_fix_core::LAYER_NAME;
use serde_json::json;

const MANIFEST_NAME: &str = "gl_context_fix.json";
const DISABLE_ENVIRONMENT: &str = "DISABLE_GL_CONTEXT_FIX_LAYER";

enum Command {
    Install,
    Uninstall,
    Print,
}

fn main() -> ExitCode {
    let mut command = Command::Install;
    let mut library = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match &arg[..] {
            "install" => command = Command::Install,
            "uninstall" => command = Command::Uninstall,
            "print" => command = Command::Print,
            "--library" => match args.next() {
                Some(path) => library = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--library expects a path");
                    return ExitCode::FAILURE;
                }
            },
            _ => {
                eprintln!("Unexpected argument `{}`", arg);
                eprintln!("Usage: installer [install|uninstall|print] [--library <path>]");
                return ExitCode::FAILURE;
            }
        }
    }

    let library = library.unwrap_or_else(default_layer_path);
    let result = match command {
        Command::Install => install(&library),
        Command::Uninstall => uninstall(),
        Command::Print => {
            println!("{}", manifest(&library));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn uninstall() -> Result<(), String> {
    let path = manifest_path().ok_or("Could not find the user data directory")?;
    if path.exists() {
        std::fs::remove_file(&path)
            .map_err(|err| format!("Failed to delete `{}`: {}", path.display(), err))?;
        println!("Successfully deleted `{}`", path.display());
    } else {
        eprintln!("Layer not installed");
    }
    Ok(())
}

fn install(library: &Path) -> Result<(), String> {
    if !library.exists() {
        return Err(format!(
            "Could not find layer at `{}`\nTry building crate in release mode (cargo build --release)",
            library.display()
        ));
    }
    let path = manifest_path().ok_or("Could not find the user data directory")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create `{}`: {}", parent.display(), err))?;
    }
    File::create(&path)
        .and_then(|mut file| file.write_all(manifest(library).as_bytes()))
        .map_err(|err| format!("Failed to write `{}`: {}", path.display(), err))?;
    println!("Successfully installed layer in `{}`", path.display());
    Ok(())
}

fn default_layer_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .join("target/release/libxr_gl_context_fix.so")
}

/// `$XDG_DATA_HOME/openxr/1/api_layers/implicit.d`, where the loader looks for
/// implicit layers installed by the user.
fn manifest_path() -> Option<PathBuf> {
    dirs::data_dir().map(|data| {
        data.join("openxr/1/api_layers/implicit.d")
            .join(MANIFEST_NAME)
    })
}

fn manifest(library: &Path) -> String {
    let manifest = json!({
        "file_format_version": "1.0.0",
        "api_layer": {
            "name": LAYER_NAME,
            "library_path": library.display().to_string(),
            "api_version": "1.0",
            "implementation_version": "1",
            "description": "Restores the application's GLX context after runtime calls that change it",
            "disable_environment": DISABLE_ENVIRONMENT,
        }
    });
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}
