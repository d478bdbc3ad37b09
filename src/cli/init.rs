use anyhow::{bail, Result};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = r#"[server]
host = "127.0.0.1"
port = 3000

[database]
path = "data/quill.db"
pool_size = 10

[api]
default_page_size = 10
max_page_size = 100
"#;

pub fn run(path: PathBuf) -> Result<()> {
    let config_path = path.join("quill.toml");
    if config_path.exists() {
        bail!("'{}' already exists", config_path.display());
    }

    std::fs::create_dir_all(&path)?;
    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created {}", config_path.display());
    println!("Start the server with: quill serve");

    Ok(())
}
