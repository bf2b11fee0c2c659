use crate::srt::{Document, Subtitle};

use std::io::{BufWriter, Write};
use std::time::Duration;

use anyhow::{Context, Result};

pub fn serialise<W: Write>(subs: Document, dst: W) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    write_subs(&mut writer, subs).context("Failed to write to output file.")?;
    writer.flush().context("Failed to write to output file.")?;
    Ok(())
}

fn write_subs<W: Write>(buf: &mut W, subs: Document) -> Result<()> {
    for sub in subs {
        write_sub(buf, sub)?;
    }
    Ok(())
}

fn write_sub<W: Write>(buf: &mut W, sub: Subtitle) -> Result<()> {
    for line in sub.preamble {
        writeln!(buf, "{}", line)?;
    }
    write_ts(buf, sub.show_at)?;
    write!(buf, " --> ")?;
    write_ts(buf, sub.hide_at)?;
    writeln!(buf)?;
    for line in sub.text {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}

// Milliseconds are truncated, never rounded.
fn write_ts<W: Write>(buf: &mut W, timestamp: Duration) -> Result<()> {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.subsec_millis();
    write!(
        buf,
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, seconds, millis
    )?;
    Ok(())
}
