//! Build script rendering the `toxext-messages(1)` manual page from the CLI.

use std::{
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

const PAGE: &str = "toxext-messages.1";

fn man_dir() -> PathBuf {
    env::var_os("CARGO_MANIFEST_DIR")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join("target")
        .join("generated-man")
}

fn write_page(dir: &Path, roff: &[u8]) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(PAGE), roff)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let page = Man::new(cli::Cli::command())
        .title("TOXEXT-MESSAGES")
        .section("1")
        .source(format!("toxext_messages {}", env!("CARGO_PKG_VERSION")))
        .manual("toxext_messages manual");
    let mut roff = Vec::new();
    page.render(&mut roff)?;
    write_page(&man_dir(), &roff)
}
