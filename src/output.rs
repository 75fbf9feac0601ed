//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Parse
//!
//! ```text
//! photos/dog.jpg
//!     Size: 300 x _
//!     Options: quality(80) resize
//!     Encoder: quality 80, interlaced
//! ```
//!
//! ## Check
//!
//! ```text
//! match     uploads/dog-300x200.jpg
//! no match  uploads/dog.jpg
//! ```
//!
//! Formatting functions return lines instead of printing so they can be
//! tested without capturing stdout.

use crate::engine::EngineConfig;
use crate::instruction::Instruction;
use crate::options::OptionSet;

/// Lines describing a parsed instruction and the encoder settings it maps to.
pub fn format_instruction(instruction: &Instruction, engine: &EngineConfig) -> Vec<String> {
    let mut lines = vec![
        instruction.source_path.clone(),
        format!("    Size: {} x {}", instruction.width, instruction.height),
    ];
    if !instruction.options.is_empty() {
        lines.push(format!("    Options: {}", option_list(&instruction.options)));
    }
    lines.push(format!(
        "    Encoder: quality {}, {}",
        engine.jpeg_quality.value(),
        if engine.interlace {
            "interlaced"
        } else {
            "baseline"
        }
    ));
    lines
}

/// Space-separated tokens, each as it appears in the encoded path.
fn option_list(options: &OptionSet) -> String {
    options
        .entries()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per path checked against the route expression.
pub fn format_route_check(path: &str, matched: bool) -> String {
    let status = if matched { "match" } else { "no match" };
    format!("{status:<9} {path}")
}
