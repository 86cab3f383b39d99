use crate::config::BillingConfig;
use crate::loader::{load_logins, load_schedule, session_from_fields};
use crate::report::{BillingReport, ReportLine};
use crate::schedule::{Evaluation, WeekSchedule};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::settings::Style;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod flight;
mod loader;
mod report;
mod schedule;
mod session;
mod time;
mod workstation;

#[derive(Parser)]
struct Args {
    /// Path to the counter login CSV
    #[arg(short, long, value_name = "FILE")]
    logins: PathBuf,

    /// Path to the departure schedule CSV
    #[arg(short, long, value_name = "FILE")]
    schedule: PathBuf,

    /// Optional JSON billing configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where the CSV report is written
    #[arg(short, long, value_name = "FILE", default_value = "Report.csv")]
    output: PathBuf,

    /// Write the report and exit without starting the shell
    #[arg(long)]
    no_repl: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match pager {
        Ok(pager) => pager,
        Err(_) => {
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn print_table<T: tabled::Tabled>(rows: &[T]) {
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = match &args.config {
        Some(path) => BillingConfig::load_from_file(path)?,
        None => BillingConfig::default(),
    };

    let week = WeekSchedule::build(load_schedule(&args.schedule)?)?;
    let sessions = load_logins(&args.logins)?;
    let report = BillingReport::build(&week, &sessions, &config);
    report.save(&args.output)?;
    println!(
        "Billed {} sessions for {} airlines, total {}. Report written to {}",
        report.lines().count(),
        report.airlines.len(),
        report.grand_total(),
        args.output.display()
    );

    if args.no_repl {
        return Ok(());
    }

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "totals".to_string(),
            "eval".to_string(),
            "export".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let lines: Vec<&ReportLine> = match parts.get(1) {
                            Some(code) => report
                                .bill_for(code)
                                .map(|bill| bill.lines.iter().collect())
                                .unwrap_or_default(),
                            None => report.lines().collect(),
                        };
                        if lines.is_empty() {
                            println!("No billed sessions found.")
                        } else {
                            print_table(&lines);
                        }
                    },
                    "totals" => {
                        let totals = report.totals();
                        if totals.is_empty() {
                            println!("No airlines in the login records.")
                        } else {
                            print_table(&totals);
                            println!("Grand total: {}", report.grand_total().to_string().bold());
                        }
                    },
                    "eval" => {
                        if let [_, workstation, airline, date, time, minutes] = parts.as_slice() {
                            let timestamp = format!("{} {}", date, time);
                            match session_from_fields(workstation, airline, &timestamp, minutes) {
                                Ok(session) => {
                                    let policy = config.policy_for(&session.workstation);
                                    match week.evaluate(&session, &policy) {
                                        Ok(Evaluation::Charged(outcome)) => {
                                            let summary = format!(
                                                "{} {} {}-{}: {} min, {} h, charge {}",
                                                outcome.counter, outcome.airline, outcome.login, outcome.logout,
                                                outcome.chargeable_minutes, outcome.chargeable_hours, outcome.charge
                                            );
                                            if outcome.charge > 0 {
                                                println!("{}", summary.red());
                                            } else {
                                                println!("{}", summary.green());
                                            }
                                        },
                                        Ok(Evaluation::NoSchedule) => {
                                            println!("{}", format!("No schedule for {} on {}", airline, session.date).yellow())
                                        },
                                        Err(e) => println!("{}", e.to_string().red()),
                                    }
                                },
                                Err(reason) => println!("Invalid session: {}", reason),
                            }
                        } else {
                            println!("Usage: eval <workstation> <airline> <M/d/yyyy> <H:mm> <minutes>");
                        }
                    },
                    "export" => {
                        let path = parts.get(1).map(PathBuf::from).unwrap_or_else(|| args.output.clone());
                        match report.save(&path) {
                            Ok(()) => println!("Report written to {}", path.display()),
                            Err(e) => println!("Error: {}", e),
                        }
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [airline]             - List billed sessions, optionally for one airline");
                        println!("  totals                   - Show the charge total per airline");
                        println!("  eval <ws> <al> <d> <t> <m> - Evaluate a login at workstation <ws> for airline <al>");
                        println!("                             on date <d> at time <t> lasting <m> minutes");
                        println!("  export [file]            - Write the CSV report (default: --output)");
                        println!("  help / ?                 - Show this help menu");
                        println!("  exit / quit              - Exit\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
