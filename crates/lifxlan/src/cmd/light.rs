use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lifxlan_device::{parse_target, serve, SimulatedLight};
use lifxlan_frame::{FrameSocket, Label};
use lifxlan_transport::UdpTransport;

use crate::cmd::LightArgs;
use crate::exit::{device_error, frame_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: LightArgs, format: OutputFormat) -> CliResult<i32> {
    let target = parse_target(&args.target).map_err(|err| device_error("bad target", err))?;
    let label =
        Label::try_from(args.label.as_str()).map_err(|err| frame_error("bad label", err))?;

    let transport = UdpTransport::bind(SocketAddr::new(args.bind, args.port))
        .map_err(|err| transport_error("bind failed", err))?;
    let mut socket = FrameSocket::new(transport);
    let local = socket
        .local_addr()
        .map_err(|err| frame_error("local address unavailable", err))?;
    let mut light = SimulatedLight::new(target, label, u32::from(local.port()));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut received = 0usize;
    serve(&mut light, &mut socket, &running, |frame, from| {
        print_frame(frame, from, format);
        received = received.saturating_add(1);
        if args.count.is_some_and(|count| received >= count) {
            running.store(false, Ordering::SeqCst);
        }
    })
    .map_err(|err| device_error("light stopped", err))?;

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
