use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

fn is_stdio(path: Option<&PathBuf>) -> bool {
    path.map_or(true, |p| p.as_path() == Path::new("-"))
}

pub fn read_json<T: DeserializeOwned>(path: Option<&PathBuf>) -> anyhow::Result<T> {
    let (text, origin) = match path {
        Some(p) if !is_stdio(path) => (
            fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?,
            p.display().to_string(),
        ),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            (buf, "stdin".to_string())
        }
    };
    serde_json::from_str(&text).with_context(|| format!("parsing JSON from {origin}"))
}

pub fn write_json<T: Serialize>(value: &T, path: Option<&PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    match path {
        Some(p) if !is_stdio(path) => {
            fs::write(p, text).with_context(|| format!("writing {}", p.display()))
        }
        _ => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes()).context("writing stdout")?;
            out.flush().context("writing stdout")
        }
    }
}
