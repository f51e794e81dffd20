//! Print this device's identifier

use anyhow::Result;

use crate::App;

pub fn run(app: &App) -> Result<()> {
    let device_id = app.entitlements().device_id()?;
    println!("{device_id}");
    Ok(())
}
