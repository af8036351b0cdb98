use recon_core::error::ReconError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), ReconError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
