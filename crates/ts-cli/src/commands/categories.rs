//! Categories command for listing the fixed category set.

use std::io::Write;

use anyhow::Result;

use ts_core::Category;

pub fn run<W: Write>(writer: &mut W) -> Result<()> {
    for category in Category::ALL {
        writeln!(writer, "{:<20}  {}", category.slug(), category.as_str())?;
    }
    Ok(())
}
