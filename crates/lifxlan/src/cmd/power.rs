use lifxlan_frame::MessageType;

use crate::cmd::{open_client, parse_power_level, reply_output, PowerArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: PowerArgs, format: OutputFormat) -> CliResult<i32> {
    let level = parse_power_level(&args.level)?;
    let mut client = open_client(&args.device)?;

    client
        .set_power(level, args.ack)
        .map_err(|err| device_error("set power failed", err))?;

    print_reply(
        &reply_output(&client, MessageType::SetPower, args.ack, None),
        format,
    );
    Ok(SUCCESS)
}
