use crate::error::InputError;

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};

/// Looks up a WHATWG encoding label such as `latin1` or `windows-1252`.
/// Without a label the input is treated as UTF-8.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, InputError> {
    match label {
        None => Ok(UTF_8),
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| InputError::UnknownEncoding(label.to_string())),
    }
}

/// Decodes raw subtitle bytes. A byte order mark takes precedence over
/// `encoding`.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        debug!("Byte order mark selects {} over {}", used.name(), encoding.name());
    }
    if had_errors {
        warn!(
            "Input is not valid {}, undecodable bytes were replaced",
            used.name()
        );
    }
    text.into_owned()
}

/// Reads the whole input, from stdin when `path` is `-`.
pub fn read_input(path: &str, encoding: &'static Encoding) -> Result<String> {
    let bytes = if path == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        if !Path::new(path).exists() {
            return Err(InputError::NotFound(path.to_string()).into());
        }
        std::fs::read(path).context(format!("Failed to open input file: '{}'", path))?
    };
    Ok(decode(&bytes, encoding))
}
