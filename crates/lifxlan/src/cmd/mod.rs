use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use clap::{Args, Subcommand};
use lifxlan_device::config::DEFAULT_SOURCE;
use lifxlan_device::{format_target, parse_target, LanConfig, LightClient};
use lifxlan_frame::{FrameSocket, MessageType, DEFAULT_PORT};
use lifxlan_transport::UdpTransport;

use crate::exit::{device_error, transport_error, CliError, CliResult, USAGE};
use crate::output::{OutputFormat, ReplyOutput};

pub mod color;
pub mod discover;
pub mod echo;
pub mod label;
pub mod light;
pub mod power;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Broadcast GetService and list the devices that answer.
    Discover(DiscoverArgs),
    /// Set a light's color.
    Color(ColorArgs),
    /// Turn a light on or off.
    Power(PowerArgs),
    /// Read a light's label.
    Label(DeviceArgs),
    /// Send text to a light and print what it echoes back.
    Echo(EchoArgs),
    /// Run a simulated light and print every frame it receives.
    Light(LightArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Discover(args) => discover::run(args, format),
        Command::Color(args) => color::run(args, format),
        Command::Power(args) => power::run(args, format),
        Command::Label(args) => label::run(args, format),
        Command::Echo(args) => echo::run(args, format),
        Command::Light(args) => light::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Settings shared by every command that talks to the network.
#[derive(Args, Debug, Clone)]
pub struct LanArgs {
    /// Device UDP port.
    #[arg(long, env = "LIFXLAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Correlation id stamped on outgoing frames.
    #[arg(long, env = "LIFXLAN_SOURCE", default_value_t = DEFAULT_SOURCE)]
    pub source: u32,
}

impl LanArgs {
    pub fn config(&self) -> LanConfig {
        LanConfig {
            port: self.port,
            source: self.source,
            ..LanConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub lan: LanArgs,
    /// Where to send the discovery broadcast.
    #[arg(long, env = "LIFXLAN_BROADCAST", default_value_t = Ipv4Addr::BROADCAST)]
    pub broadcast: Ipv4Addr,
    /// How long to collect replies (e.g. 500ms, 2s).
    #[arg(long, default_value = "500ms")]
    pub timeout: String,
}

/// Addressing for commands aimed at one light.
#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device target: 12 (MAC) or 16 hex digits.
    pub target: String,
    /// Device address: IP or host, with optional :port.
    pub addr: String,
    #[command(flatten)]
    pub lan: LanArgs,
    /// How long to wait for a reply (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ColorArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    #[arg(long)]
    pub hue: u16,
    #[arg(long, default_value_t = u16::MAX)]
    pub saturation: u16,
    #[arg(long, default_value_t = u16::MAX)]
    pub brightness: u16,
    #[arg(long, default_value_t = 3500)]
    pub kelvin: u16,
    /// Transition time in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub duration_ms: u32,
    /// Wait for the light to acknowledge.
    #[arg(long)]
    pub ack: bool,
}

#[derive(Args, Debug)]
pub struct PowerArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// `on`, `off`, or a raw level 0-65535.
    #[arg(long)]
    pub level: String,
    /// Wait for the light to acknowledge.
    #[arg(long)]
    pub ack: bool,
}

#[derive(Args, Debug)]
pub struct EchoArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Text to echo, at most 64 bytes.
    pub text: String,
}

#[derive(Args, Debug)]
pub struct LightArgs {
    /// Address to listen on.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
    /// UDP port to listen on.
    #[arg(long, env = "LIFXLAN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Label reported in StateLabel.
    #[arg(long, default_value = "lifxlan")]
    pub label: String,
    /// Target the light answers as.
    #[arg(long, default_value = "d073d5000001")]
    pub target: String,
    /// Stop after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build details.
    #[arg(long)]
    pub extended: bool,
}

/// Bind an ephemeral socket and address the light named by `args`.
pub fn open_client(args: &DeviceArgs) -> CliResult<LightClient<UdpTransport>> {
    let target = parse_target(&args.target).map_err(|err| device_error("bad target", err))?;
    let addr = resolve_addr(&args.addr, args.lan.port)?;
    let config = LanConfig {
        response_timeout: parse_duration(&args.timeout)?,
        ..args.lan.config()
    };
    let transport = UdpTransport::bind_any().map_err(|err| transport_error("bind failed", err))?;
    Ok(LightClient::new(
        FrameSocket::new(transport),
        addr,
        target,
        &config,
    ))
}

pub fn reply_output(
    client: &LightClient<UdpTransport>,
    message: MessageType,
    acknowledged: bool,
    text: Option<String>,
) -> ReplyOutput {
    ReplyOutput {
        target: format_target(&client.target()),
        address: client.addr().to_string(),
        message: message.name(),
        sequence: client.sequence(),
        acknowledged,
        text,
    }
}

/// Accepts `ip`, `ip:port`, `host` or `host:port`; IPv4 only.
pub fn resolve_addr(input: &str, default_port: u16) -> CliResult<SocketAddr> {
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    let candidates = if input.contains(':') {
        input.to_socket_addrs()
    } else {
        (input, default_port).to_socket_addrs()
    };
    candidates
        .map_err(|err| CliError::new(USAGE, format!("cannot resolve {input}: {err}")))?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| CliError::new(USAGE, format!("no IPv4 address for {input}")))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

pub fn parse_power_level(input: &str) -> CliResult<u16> {
    match input.trim().to_ascii_lowercase().as_str() {
        "on" => Ok(u16::MAX),
        "off" => Ok(0),
        other => other
            .parse()
            .map_err(|_| CliError::new(USAGE, format!("invalid power level: {input}"))),
    }
}
