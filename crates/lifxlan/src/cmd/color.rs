use lifxlan_frame::{MessageType, SetColor};

use crate::cmd::{open_client, reply_output, ColorArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: ColorArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = open_client(&args.device)?;
    let color = SetColor {
        hue: args.hue,
        saturation: args.saturation,
        brightness: args.brightness,
        kelvin: args.kelvin,
        duration: args.duration_ms,
    };

    client
        .set_color(color, args.ack)
        .map_err(|err| device_error("set color failed", err))?;

    print_reply(
        &reply_output(&client, MessageType::SetColor, args.ack, None),
        format,
    );
    Ok(SUCCESS)
}
