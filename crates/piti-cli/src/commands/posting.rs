use clap::Args;
use serde_json::Value;

use piti_core::posting::{self, PaymentLinesInput};

use crate::input;

#[derive(Args)]
pub struct LinesArgs {
    /// Path to JSON input file with the split components and account map
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_lines(args: LinesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lines_input: PaymentLinesInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for line construction".into());
    };
    let result = posting::build_payment_lines(&lines_input)?;
    Ok(serde_json::to_value(result)?)
}
