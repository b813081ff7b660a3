use lifxlan_frame::MessageType;

use crate::cmd::{open_client, reply_output, DeviceArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat};

pub fn run(args: DeviceArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = open_client(&args)?;
    let label = client
        .get_label()
        .map_err(|err| device_error("get label failed", err))?;

    print_reply(
        &reply_output(
            &client,
            MessageType::StateLabel,
            false,
            Some(label.to_string_lossy()),
        ),
        format,
    );
    Ok(SUCCESS)
}
