use std::borrow::Cow;

use anyhow::{Context, Result};
use specta_typescript::Typescript;
use trail_compass_app_lib::mk_specta;

const DEFAULT_BINDINGS_PATH: &str = "../ui/bindings.ts";

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BINDINGS_PATH.to_string());

    let mut lang = Typescript::new();
    lang.header = Cow::Borrowed("/* eslint @typescript-eslint/no-unused-vars: 0 */");

    mk_specta()
        .export(lang, &path)
        .with_context(|| format!("Failed to export bindings to {path}"))?;

    println!("Exported commands, events, and types to {path}");
    Ok(())
}
