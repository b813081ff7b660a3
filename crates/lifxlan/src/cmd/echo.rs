use lifxlan_frame::MessageType;

use crate::cmd::{open_client, reply_output, EchoArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: EchoArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = open_client(&args.device)?;
    let echoed = client
        .echo(args.text.as_bytes())
        .map_err(|err| device_error("echo failed", err))?;

    print_reply(
        &reply_output(
            &client,
            MessageType::EchoResponse,
            false,
            Some(echoed.to_string_lossy()),
        ),
        format,
    );
    Ok(SUCCESS)
}
