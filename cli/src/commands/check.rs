use bootmount::Volume;

/// Tokenize each entry and print its fields.
pub fn check_entries(entries: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    for entry in entries {
        let volume =
            Volume::parse(entry).map_err(|e| format!("Invalid entry {:?}: {}", entry, e))?;

        println!("{}", entry);
        println!("  source:          {}", volume.device());
        println!("  path:            {}", volume.path);
        println!(
            "  driver:          {}{}",
            volume.driver,
            if volume.is_extract() { " (archive extraction)" } else { "" }
        );
        println!("  flags:           {:#x}", volume.flags);
        println!("  options:         {}", volume.options.unwrap_or("-"));
        println!("  control options: {}", volume.control_options.unwrap_or("-"));
    }

    Ok(())
}
