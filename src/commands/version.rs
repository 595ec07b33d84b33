use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("sysmon version {}", env!("CARGO_PKG_VERSION"));
    println!(
        "platform: {}-{} (metrics {})",
        std::env::consts::OS,
        std::env::consts::ARCH,
        if sysinfo::IS_SUPPORTED_SYSTEM {
            "supported"
        } else {
            "unsupported"
        }
    );
    Ok(())
}
