use anyhow::Result;

use lasframe::schema::PointFormat;

/// Print every point format with its standard fields
pub fn run() -> Result<()> {
    for format in PointFormat::all() {
        let heading = format!(
            "Point format {} ({} bytes, LAS {}+)",
            format,
            format.record_length(),
            format.min_version()
        );

        #[cfg(feature = "colorized_output")]
        println!("{}", console::style(heading).bold().cyan());

        #[cfg(not(feature = "colorized_output"))]
        println!("{}", heading);

        for field in format.fields() {
            println!("  {:<28} {:>3} bits  {}", field.name, field.bits, field.data_type);
        }
        println!();
    }
    Ok(())
}
