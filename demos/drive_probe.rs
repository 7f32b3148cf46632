//! Bus device probe
//!
//! Opens a bus device by name, sends a probe burst and dumps every reply
//! byte in hex. Handy for checking that a drive answers at all before
//! wiring up the protocol layer.
//!
//! Usage: drive_probe <device> [hex bytes...]
//!
//!   drive_probe /dev/ttyUSB0 02 44 1F
//!   drive_probe 192.168.1.50:4001
//!   drive_probe FTDI0

use drivebus::{detected_device_count, detected_device_info, BusManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let device = match args.first() {
        Some(name) => name.clone(),
        None => {
            log::info!("No device given, listing detected USB-serial adapters");
            let count = detected_device_count();
            log::info!("{} adapter(s) detected", count);
            for index in 0..count {
                let info = detected_device_info(index)?;
                log::info!(
                    "  {} on {} (vid {:04X} pid {:04X}) product {:?}",
                    info.device_name,
                    info.port_name,
                    info.vid,
                    info.pid,
                    info.product
                );
            }
            return Ok(());
        }
    };

    let probe: Vec<u8> = if args.len() > 1 {
        args[1..]
            .iter()
            .map(|arg| u8::from_str_radix(arg, 16))
            .collect::<Result<_, _>>()?
    } else {
        vec![0x02, 0x44, 0x1F]
    };

    let mut bus = BusManager::new();
    log::info!("Opening bus device {}...", device);
    let handle = bus.open(&device)?;

    log::info!("Sending {} probe byte(s)", probe.len());
    for byte in &probe {
        bus.write(handle, *byte)?;
    }
    bus.transmit(handle)?;

    let mut replies = Vec::new();
    while let Ok(byte) = bus.read(handle) {
        replies.push(byte);
    }
    if replies.is_empty() {
        log::info!("No reply within the read timeout");
    } else {
        let hex_line: String = replies
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        log::info!("{} reply byte(s): {}", replies.len(), hex_line);
    }

    bus.close(handle)?;
    Ok(())
}
