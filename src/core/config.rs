use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration (file values plus defaults).
    pub fn print(cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration:\n");
        println!("{}", cfg.to_yaml()?);
        Ok(())
    }

    fn default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    /// Open the config file in `editor`, falling back to $EDITOR / $VISUAL.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let fallback = Self::default_editor();
        let requested = editor.map(str::to_string).unwrap_or_else(|| fallback.clone());

        match Command::new(&requested).arg(path).status() {
            Ok(s) if s.success() => {
                println!("✅ Configuration file edited successfully using '{requested}'");
                return Ok(());
            }
            _ => eprintln!("⚠️  Editor '{requested}' not available, falling back to '{fallback}'"),
        }

        match Command::new(&fallback).arg(path).status() {
            Ok(s) if s.success() => {
                println!("✅ Configuration file edited successfully using fallback '{fallback}'");
                Ok(())
            }
            _ => Err(AppError::Config(format!(
                "failed to edit {} with '{fallback}'",
                path.display()
            ))),
        }
    }
}
