// src/main.rs
use std::io::{self, BufRead};
use std::sync::mpsc;

use anyhow::Context;

use voltwatch::engine;
use voltwatch::{ConsoleSink, SerialProvider, UserCommand};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let (tx_cmd, rx_cmd) = mpsc::channel();
    let engine = engine::spawn_thread(SerialProvider::new(), ConsoleSink::new(), rx_cmd);

    println!("voltwatch: r = refresh devices, c = reset series, <port id> = select, EOF quits");
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let Some(command) = parse_command(line.trim()) else {
            continue;
        };
        if tx_cmd.send(command).is_err() {
            break;
        }
    }

    drop(tx_cmd);
    engine
        .join()
        .map_err(|_| anyhow::anyhow!("engine thread panicked"))?;
    Ok(())
}

fn parse_command(line: &str) -> Option<UserCommand> {
    match line {
        "" => None,
        "r" | "refresh" => Some(UserCommand::Refresh),
        "c" | "reset" => Some(UserCommand::ResetSeries),
        id => Some(UserCommand::Select(id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_lines_map_onto_user_commands() {
        assert!(matches!(parse_command("r"), Some(UserCommand::Refresh)));
        assert!(matches!(parse_command("refresh"), Some(UserCommand::Refresh)));
        assert!(matches!(parse_command("c"), Some(UserCommand::ResetSeries)));
        assert!(parse_command("").is_none());
        assert!(
            matches!(parse_command("/dev/ttyACM0"), Some(UserCommand::Select(id)) if id == "/dev/ttyACM0")
        );
    }
}
