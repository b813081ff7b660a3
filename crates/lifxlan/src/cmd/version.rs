use lifxlan_frame::{DEFAULT_PORT, PROTOCOL};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("lifxlan {}", env!("CARGO_PKG_VERSION"));
        println!("LIFX LAN protocol {PROTOCOL}, UDP port {DEFAULT_PORT}");
        return Ok(SUCCESS);
    }

    println!("name: lifxlan");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("LIFXLAN_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("protocol: {PROTOCOL}");
    println!("default_port: {DEFAULT_PORT}");

    Ok(SUCCESS)
}
