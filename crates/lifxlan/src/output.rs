use std::io::{IsTerminal, Write};
use std::net::SocketAddr;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use lifxlan_device::{format_target, Device};
use lifxlan_frame::{encode_frame_to_bytes, Bytes, Frame, FrameError, Payload, Service};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
pub struct DeviceOutput {
    pub target: String,
    pub address: String,
    pub service: String,
    pub port: u32,
}

impl From<&Device> for DeviceOutput {
    fn from(device: &Device) -> Self {
        Self {
            target: device.target_hex(),
            address: device.addr.to_string(),
            service: service_name(device.service),
            port: device.port,
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    from: String,
    size: u16,
    tagged: bool,
    source: u32,
    target: String,
    sequence: u8,
    ack_required: bool,
    res_required: bool,
    message_type: u16,
    message: &'static str,
    payload: Value,
}

/// Reply to a command sent to one light.
#[derive(Serialize)]
pub struct ReplyOutput {
    pub target: String,
    pub address: String,
    pub message: &'static str,
    pub sequence: u8,
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

pub fn print_devices(devices: &[Device], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<DeviceOutput> = devices.iter().map(DeviceOutput::from).collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TARGET", "ADDRESS", "SERVICE", "PORT"]);
            for device in devices {
                table.add_row(vec![
                    device.target_hex(),
                    device.addr.to_string(),
                    service_name(device.service),
                    device.port.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("Found {} device(s)", devices.len());
            for device in devices {
                println!(
                    "  {}  {}  {} port {}",
                    device.target_hex(),
                    device.addr,
                    service_name(device.service),
                    device.port
                );
            }
        }
        OutputFormat::Raw => {
            for device in devices {
                println!("{} {}", device.target_hex(), device.addr);
            }
        }
    }
}

/// Print one received frame. `Raw` writes the canonical re-encoding from
/// [`raw_frame_bytes`], not the datagram as it arrived.
pub fn print_frame(frame: &Frame, from: SocketAddr, format: OutputFormat) {
    let header = &frame.header;
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                from: from.to_string(),
                size: header.size,
                tagged: header.tagged,
                source: header.source,
                target: format_target(&header.target),
                sequence: header.sequence,
                ack_required: header.ack_required,
                res_required: header.res_required,
                message_type: header.message_type,
                message: frame.message_type().name(),
                payload: payload_json(&frame.payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FROM", "MESSAGE", "SOURCE", "SEQ", "TARGET", "PAYLOAD"])
                .add_row(vec![
                    from.to_string(),
                    frame.message_type().to_string(),
                    header.source.to_string(),
                    header.sequence.to_string(),
                    format_target(&header.target),
                    payload_summary(&frame.payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("frame from {from}");
            println!("  size:      {}", header.size);
            println!("  tagged:    {}", header.tagged);
            println!("  source:    {}", header.source);
            println!("  target:    {}", format_target(&header.target));
            println!(
                "  flags:     ack_required={} res_required={}",
                header.ack_required, header.res_required
            );
            println!("  sequence:  {}", header.sequence);
            println!("  type:      {}", frame.message_type());
            println!("  payload:   {}", payload_summary(&frame.payload));
        }
        OutputFormat::Raw => match raw_frame_bytes(frame) {
            Ok(bytes) => print_raw(&bytes),
            Err(err) => tracing::warn!(error = %err, "cannot re-encode frame"),
        },
    }
}

pub fn print_reply(reply: &ReplyOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(reply).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TARGET", "ADDRESS", "MESSAGE", "SEQ", "ACK", "TEXT"])
                .add_row(vec![
                    reply.target.clone(),
                    reply.address.clone(),
                    reply.message.to_string(),
                    reply.sequence.to_string(),
                    reply.acknowledged.to_string(),
                    reply.text.clone().unwrap_or_default(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let ack = if reply.acknowledged { " (acknowledged)" } else { "" };
            match &reply.text {
                Some(text) => println!("{} {}: {text}", reply.target, reply.message),
                None => println!("{} {} sent{ack}", reply.target, reply.message),
            }
        }
        OutputFormat::Raw => {
            if let Some(text) = &reply.text {
                print_raw(text.as_bytes());
            }
        }
    }
}

/// Encode `frame` with its size recomputed from the payload, so a header
/// that understated its length still prints.
pub fn raw_frame_bytes(frame: &Frame) -> Result<Bytes, FrameError> {
    encode_frame_to_bytes(&Frame::new(frame.header, frame.payload))
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn service_name(service: Service) -> String {
    match service {
        Service::Udp => "udp".to_string(),
        Service::Reserved(code) => format!("reserved({code})"),
        Service::Unknown(code) => format!("unknown({code})"),
    }
}

fn payload_json(payload: &Payload) -> Value {
    match payload {
        Payload::GetService | Payload::GetLabel | Payload::Acknowledgement => json!({}),
        Payload::StateService(state) => json!({
            "service": service_name(state.service),
            "port": state.port,
        }),
        Payload::SetPower(power) => json!({ "level": power.level }),
        Payload::StateLabel(label) => json!({ "label": label.to_string_lossy() }),
        Payload::EchoRequest(echo) => json!({ "echoing": trimmed_hex(&echo.echoing) }),
        Payload::EchoResponse(text) => json!({ "echoing": text.to_string_lossy() }),
        Payload::SetColor(color) => json!({
            "hue": color.hue,
            "saturation": color.saturation,
            "brightness": color.brightness,
            "kelvin": color.kelvin,
            "duration": color.duration,
        }),
    }
}

fn payload_summary(payload: &Payload) -> String {
    match payload {
        Payload::GetService | Payload::GetLabel | Payload::Acknowledgement => "-".to_string(),
        Payload::StateService(state) => {
            format!("service={} port={}", service_name(state.service), state.port)
        }
        Payload::SetPower(power) => format!("level={}", power.level),
        Payload::StateLabel(label) => format!("label=\"{label}\""),
        Payload::EchoRequest(echo) => format!("echoing={}", trimmed_hex(&echo.echoing)),
        Payload::EchoResponse(text) => format!("echoing=\"{text}\""),
        Payload::SetColor(color) => format!(
            "hue={} saturation={} brightness={} kelvin={} duration={}ms",
            color.hue, color.saturation, color.brightness, color.kelvin, color.duration
        ),
    }
}

/// Hex of `bytes` without trailing zero padding.
fn trimmed_hex(bytes: &[u8]) -> String {
    let used = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map_or(0, |last| last + 1);
    hex::encode(&bytes[..used])
}
