use tauri_build::{AppManifest, Attributes};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // App commands need a manifest entry before remote pages may call them.
    let manifest = AppManifest::new().commands(&["should_block_request"]);
    tauri_build::try_build(Attributes::new().app_manifest(manifest))?;
    Ok(())
}
