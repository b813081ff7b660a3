use lifxlan_device::{discover, LanConfig};
use lifxlan_frame::FrameSocket;
use lifxlan_transport::UdpTransport;

use crate::cmd::{parse_duration, DiscoverArgs};
use crate::exit::{device_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_devices, OutputFormat};

pub fn run(args: DiscoverArgs, format: OutputFormat) -> CliResult<i32> {
    let config = LanConfig {
        broadcast: args.broadcast,
        discovery_timeout: parse_duration(&args.timeout)?,
        ..args.lan.config()
    };

    let transport = UdpTransport::bind_any().map_err(|err| transport_error("bind failed", err))?;
    transport
        .enable_broadcast()
        .map_err(|err| transport_error("enable broadcast failed", err))?;

    let mut socket = FrameSocket::new(transport);
    let devices =
        discover(&mut socket, &config).map_err(|err| device_error("discovery failed", err))?;

    print_devices(&devices, format);
    Ok(SUCCESS)
}
