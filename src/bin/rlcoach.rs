//! Thin CLI over the analysis pipeline. Fatal errors print the two-key
//! error document to stdout and exit nonzero; nothing partial lands on
//! disk.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rlcoach::config::ParserMode;
use rlcoach::{process_replay, write_report, Config, Report};

#[derive(Parser)]
#[command(name = "rlcoach", about = "Offline Rocket League replay analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a replay and write the JSON report.
    Analyze {
        /// Path to the .replay file.
        path: PathBuf,
        /// Skip the network stream and analyze the header only.
        #[arg(long)]
        header_only: bool,
        /// Reports directory (default: ./reports).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Analyze a replay and write the JSON report plus a Markdown dossier.
    ReportMd {
        path: PathBuf,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the embedded report JSON schema.
    #[command(hide = true)]
    Schema,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(document) => {
            println!("{}", document);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), serde_json::Value> {
    match cli.command {
        Command::Analyze {
            path,
            header_only,
            out,
            pretty,
        } => {
            let config = build_config(header_only, out);
            let report = process_replay(&path, &config).map_err(|e| e.to_document())?;
            let written = write_report(&report, &config, pretty).map_err(|e| e.to_document())?;
            eprintln!("wrote {}", written.display());
            Ok(())
        }
        Command::ReportMd { path, out, pretty } => {
            let config = build_config(false, out);
            let report = process_replay(&path, &config).map_err(|e| e.to_document())?;
            let written = write_report(&report, &config, pretty).map_err(|e| e.to_document())?;
            let md_path = written.with_extension("md");
            std::fs::write(&md_path, render_markdown(&report))
                .map_err(|e| serde_json::json!({"error": "unreadable_replay_file", "details": format!("cannot write dossier: {}", e)}))?;
            eprintln!("wrote {}", written.display());
            eprintln!("wrote {}", md_path.display());
            Ok(())
        }
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&rlcoach::schema::report_schema_json())
                    .expect("schema serializes")
            );
            Ok(())
        }
    }
}

fn build_config(header_only: bool, out: Option<PathBuf>) -> Config {
    let mut config = Config::default();
    if header_only {
        config.parser = ParserMode::HeaderOnly;
    }
    if let Some(out) = out {
        config.paths.reports_dir = out;
    }
    config
}

/// Minimal human-readable dossier. Rendering is deliberately outside the
/// core: it consumes only the report shape.
fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# Match report - {}\n\n",
        report.metadata.map
    ));
    md.push_str(&format!(
        "**{} {} - {} {}** | {:.0}s | {} frames\n\n",
        report.teams.blue.name,
        report.teams.blue.score,
        report.teams.orange.score,
        report.teams.orange.name,
        report.metadata.duration_seconds,
        report.metadata.total_frames,
    ));

    md.push_str("| Player | Team | Goals | Assists | Saves | Shots | Score |\n");
    md.push_str("|---|---|---|---|---|---|---|\n");
    for player in &report.players {
        let blocks = report.analysis.per_player.get(&player.player_id);
        let f = blocks.map(|b| &b.fundamentals);
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            player.display_name,
            if player.team == 0 { "blue" } else { "orange" },
            f.map_or(0, |f| f.goals),
            f.map_or(0, |f| f.assists),
            f.map_or(0, |f| f.saves),
            f.map_or(0, |f| f.shots),
            f.map_or(0, |f| f.score),
        ));
    }

    if !report.analysis.coaching_insights.is_empty() {
        md.push_str("\n## Coaching insights\n\n");
        for insight in &report.analysis.coaching_insights {
            md.push_str(&format!(
                "- **{}**: {} ({})\n",
                insight.code,
                insight.message,
                insight.evidence.players.join(", ")
            ));
        }
    }

    if !report.quality.warnings.is_empty() {
        md.push_str("\n## Quality warnings\n\n");
        for warning in &report.quality.warnings {
            md.push_str(&format!("- `{}`\n", warning));
        }
    }
    md
}
