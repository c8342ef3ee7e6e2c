use std::error::Error;
use std::process::ExitCode;
use chrono::Local;
use clap::Parser;
use custom_rsa::rsa::config::{set_silent, Config};
use custom_rsa::rsa::RunMode;

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let mut config = Config::parse();
    let to_stdout = config.output == "stdout" || (config.output.is_empty() && config.input == "stdin");
    if to_stdout && matches!(config.run_mode()?, RunMode::Encrypt | RunMode::Decrypt) {
        config.silent = true;
    }
    set_silent(config.silent);
    if !config.silent { println!("Run args: {:?}", config); }
    let start = Local::now().timestamp_millis();
    let ok = config.run()?;
    if !config.silent { println!("Time: {} ms.", Local::now().timestamp_millis() - start); }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
