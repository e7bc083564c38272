//! Markdown summary for release notes.
//!
//! ```text
//! ### File Hashes
//!
//! - `app.zip`
//!   SHA256 digest: `...`
//!   MD5 digest: `...`
//!
//! ### VirusTotal
//!
//! [VirusTotal link](https://www.virustotal.com/gui/file/...)
//! ```

use std::io::{self, Write};

use crate::release::ReleaseEntry;

pub fn write_hashes_heading<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "### File Hashes")?;
    writeln!(out)
}

pub fn write_entry<W: Write>(out: &mut W, entry: &ReleaseEntry) -> io::Result<()> {
    writeln!(out, "- `{}`", entry.name)?;
    writeln!(out, "  SHA256 digest: `{}`", entry.digests.sha256)?;
    writeln!(out, "  MD5 digest: `{}`", entry.digests.md5)?;
    writeln!(out)
}

pub fn write_report_link<W: Write>(out: &mut W, report_url: &str) -> io::Result<()> {
    writeln!(out, "### VirusTotal")?;
    writeln!(out)?;
    writeln!(out, "[VirusTotal link]({})", report_url)
}
