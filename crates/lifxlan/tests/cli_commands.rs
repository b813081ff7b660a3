#![cfg(feature = "cli")]

use std::net::UdpSocket;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const TARGET: &str = "d073d5309d57";

fn lifxlan() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lifxlan"));
    cmd.env_remove("LIFXLAN_PORT")
        .env_remove("LIFXLAN_SOURCE")
        .env_remove("LIFXLAN_BROADCAST")
        .arg("--log-level")
        .arg("error");
    cmd
}

fn free_port() -> u16 {
    UdpSocket::bind("127.0.0.1:0")
        .expect("scratch socket should bind")
        .local_addr()
        .expect("scratch socket should have an address")
        .port()
}

struct LightProcess {
    child: Child,
    port: u16,
}

impl LightProcess {
    fn spawn(label: &str) -> Self {
        let port = free_port();
        let child = lifxlan()
            .args(["light", "--bind", "127.0.0.1", "--port"])
            .arg(port.to_string())
            .args(["--label", label, "--target", TARGET])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("light command should start");
        Self { child, port }
    }

    fn addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Retry discovery until the light has bound its socket.
    fn wait_until_discoverable(&self) -> serde_json::Value {
        let start = Instant::now();
        loop {
            let output = lifxlan()
                .args(["--format", "json", "discover", "--broadcast", "127.0.0.1"])
                .args(["--port", self.port.to_string().as_str(), "--timeout", "300ms"])
                .output()
                .expect("discover should run");
            assert!(output.status.success(), "discover failed: {output:?}");

            let devices: serde_json::Value =
                serde_json::from_slice(&output.stdout).expect("discover output should be json");
            if devices.as_array().is_some_and(|list| !list.is_empty()) {
                return devices;
            }
            if start.elapsed() >= Duration::from_secs(5) {
                panic!("light never answered discovery");
            }
            thread::sleep(Duration::from_millis(50));
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        lifxlan()
            .args(["--format", "json"])
            .args(args)
            .output()
            .expect("command should run")
    }
}

impl Drop for LightProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn version_prints_package_version() {
    let output = lifxlan().arg("version").output().expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            format!("lifxlan {}", env!("CARGO_PKG_VERSION")).as_str(),
            "LIFX LAN protocol 1024, UDP port 56700",
        ]
    );
}

#[test]
fn help_names_protocol_and_port() {
    let output = lifxlan().arg("--help").output().expect("help should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("protocol 1024"));
    assert!(stdout.contains("56700"));
}

#[test]
fn extended_version_reports_protocol() {
    let output = lifxlan()
        .args(["version", "--extended"])
        .output()
        .expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("protocol: 1024"));
    assert!(stdout.contains("default_port: 56700"));
}

#[test]
fn invalid_target_exits_with_usage() {
    let output = lifxlan()
        .args(["label", "not-a-target", "127.0.0.1"])
        .output()
        .expect("label should run");
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid target"));
}

#[test]
fn invalid_timeout_exits_with_usage() {
    let output = lifxlan()
        .args(["discover", "--timeout", "soon"])
        .output()
        .expect("discover should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn silent_device_times_out_with_124() {
    let port = free_port();
    let output = lifxlan()
        .args(["label", TARGET, "127.0.0.1", "--port"])
        .arg(port.to_string())
        .args(["--timeout", "200ms"])
        .output()
        .expect("label should run");
    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn discover_finds_simulated_light() {
    let light = LightProcess::spawn("Desk");
    let devices = light.wait_until_discoverable();

    let device = &devices[0];
    assert_eq!(device["target"], "d073d5309d570000");
    assert_eq!(device["address"], light.addr());
    assert_eq!(device["service"], "udp");
    assert_eq!(device["port"], u64::from(light.port));
}

#[test]
fn label_echo_and_commands_against_simulated_light() {
    let light = LightProcess::spawn("Kitchen");
    light.wait_until_discoverable();
    let addr = light.addr();
    let addr = addr.as_str();

    let label = stdout_json(&light.run(&["label", TARGET, addr]));
    assert_eq!(label["message"], "StateLabel");
    assert_eq!(label["text"], "Kitchen");

    let echo = stdout_json(&light.run(&["echo", TARGET, addr, "ping"]));
    assert_eq!(echo["message"], "EchoResponse");
    assert_eq!(echo["text"], "ping");

    let power = stdout_json(&light.run(&["power", TARGET, addr, "--level", "on", "--ack"]));
    assert_eq!(power["message"], "SetPower");
    assert_eq!(power["acknowledged"], true);

    let color = stdout_json(&light.run(&[
        "color", TARGET, addr, "--hue", "21845", "--kelvin", "3500", "--ack",
    ]));
    assert_eq!(color["message"], "SetColor");
    assert_eq!(color["acknowledged"], true);
    assert_eq!(color["sequence"], 1);
}

#[test]
fn oversized_echo_text_is_rejected() {
    let port = free_port();
    let text = "x".repeat(65);
    let output = lifxlan()
        .args(["echo", TARGET, "127.0.0.1", "--port"])
        .arg(port.to_string())
        .arg(&text)
        .output()
        .expect("echo should run");
    assert_eq!(output.status.code(), Some(64));
}
