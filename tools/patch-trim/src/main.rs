//! patch-trim: preview how a patch is shortened before it is sent for review
//!
//! Usage:
//!   patch-trim <file>                          # truncate at low, risk from --name or the file path
//!   patch-trim <file> --level high             # pick a level
//!   patch-trim - --name src/auth/jwt.go        # read stdin, classify as the given path
//!   patch-trim <file> --keep-start 10 --keep-end 5   # raw head/tail cut, no risk rules
//!   patch-trim <file> --summary                # only print the decision (JSON)
//!
//! Exit code: 0 if the patch is unchanged, 1 if it was shortened, 2 on error.

use std::fs;
use std::io::{self, Read};
use std::process;

use clap::Parser;
use serde::Serialize;
use truncation_engine::patch::count_lines;
use truncation_engine::{
    classify_file_risk, should_truncate_file, truncate_patch, FileRiskLevel, TruncationLevel,
};

#[derive(Debug, Parser)]
#[command(name = "patch-trim", about = "Preview how a patch is shortened at a truncation level")]
struct Cli {
    /// Patch file, or `-` for stdin.
    file: String,

    /// Truncation level: low, moderate, high, extreme. Unknown names mean low.
    #[arg(long, default_value = "low")]
    level: String,

    /// Path used for risk classification. Defaults to the patch file path.
    #[arg(long)]
    name: Option<String>,

    /// Override the level's head line count (skips risk and size rules).
    #[arg(long, requires = "keep_end")]
    keep_start: Option<usize>,

    /// Override the level's tail line count (skips risk and size rules).
    #[arg(long, requires = "keep_start")]
    keep_end: Option<usize>,

    /// Print only the decision as JSON.
    #[arg(short, long)]
    summary: bool,
}

#[derive(Debug, Serialize)]
struct Decision {
    name: String,
    risk: FileRiskLevel,
    level: TruncationLevel,
    lines: usize,
    kept_lines: usize,
    truncated: bool,
    reason: &'static str,
}

fn read_patch(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut raw = String::new();
        io::stdin().lock().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        fs::read_to_string(path)
    }
}

fn decide(cli: &Cli, patch: &str) -> (String, Decision) {
    let name = cli.name.clone().unwrap_or_else(|| cli.file.clone());
    let risk = classify_file_risk(&name);
    let level = TruncationLevel::from_name(&cli.level);
    let params = level.params();
    let lines = count_lines(patch);

    let (out, reason) = match (cli.keep_start, cli.keep_end) {
        (Some(start), Some(end)) => (truncate_patch(patch, start, end), "explicit keep counts"),
        _ if lines < params.small_file_threshold => {
            (patch.to_string(), "below small-file threshold")
        }
        _ if !should_truncate_file(risk, level) => {
            (patch.to_string(), "risk tier protected at this level")
        }
        _ => (
            truncate_patch(patch, params.keep_start, params.keep_end),
            "eligible for truncation",
        ),
    };

    let decision = Decision {
        risk,
        level,
        lines,
        kept_lines: count_lines(&out),
        truncated: out != patch,
        reason,
        name,
    };
    (out, decision)
}

fn main() {
    let cli = Cli::parse();

    let patch = read_patch(&cli.file).unwrap_or_else(|e| {
        eprintln!("patch-trim: cannot read {}: {}", cli.file, e);
        process::exit(2);
    });

    let (out, decision) = decide(&cli, &patch);

    if cli.summary {
        match serde_json::to_string_pretty(&decision) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("patch-trim: {}", e);
                process::exit(2);
            }
        }
    } else {
        print!("{}", out);
        eprintln!(
            "patch-trim: {} ({} risk) at {}: {} -> {} lines ({})",
            decision.name,
            decision.risk,
            decision.level,
            decision.lines,
            decision.kept_lines,
            decision.reason
        );
    }

    process::exit(if decision.truncated { 1 } else { 0 });
}
