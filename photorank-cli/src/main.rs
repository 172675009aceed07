mod config;
mod output;

use clap::Parser;
use photorank_core::{RankingSession, RemovalOutcome};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "photorank", version, about = "Rank photos (or anything else) by answering pairwise comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run an interactive pairwise ranking session
    Rank(RankArgs),
    /// Create a default config file at ~/.config/photorank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with one item per line, or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write the final ranking to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Stop after this many comparisons even if not converged
    #[arg(long)]
    max_comparisons: Option<usize>,

    /// Keep asking until the pair pool is exhausted instead of stopping
    /// once the ranking is confident
    #[arg(long)]
    no_auto_stop: bool,

    /// Show progress during the session
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/photorank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Parse a string as either a JSON array of strings or plain text (one item
/// per line).
fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    } else {
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Load items from all sources: --items file, --item inline args, or stdin.
fn load_items(args: &RankArgs) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_from_str(&content);
    }

    items.extend(args.inline_items.iter().cloned());

    // From stdin, only if no file and no inline items. Piped items leave no
    // terminal for decisions, so the session goes straight to results.
    if items.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No items provided. Use --items <file> or --item <name>.");
        }
        let content: String = stdin
            .lock()
            .lines()
            .map(|l| l.unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}"))))
            .collect::<Vec<_>>()
            .join("\n");
        items = parse_items_from_str(&content);
    }

    if items.len() < 2 {
        bail(format!("Need at least 2 items to rank, got {}", items.len()));
    }
    items
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set a comparison budget or disable auto-stop.");
        }
    }
}

fn run_rank(args: RankArgs) {
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let max_comparisons = args.max_comparisons.or(cfg.max_comparisons);
    let auto_stop = !args.no_auto_stop && cfg.auto_stop.unwrap_or(true);

    let names = load_items(&args);
    let item_ids: Vec<i64> = (0..names.len() as i64).collect();
    let mut session = RankingSession::new(&item_ids);

    if args.verbose {
        eprintln!(
            "Ranking {} items (~{} comparisons to go)",
            names.len(),
            session.estimated_remaining(),
        );
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        if auto_stop && session.check_convergence() {
            if args.verbose {
                eprintln!(
                    "Ranking converged after {} comparisons",
                    session.comparisons_completed(),
                );
            }
            break;
        }

        if let Some(limit) = max_comparisons {
            if session.comparisons_completed() >= limit {
                if args.verbose {
                    eprintln!("Comparison budget of {limit} reached");
                }
                break;
            }
        }

        let Some((left, right)) = session.offer_next_pair() else {
            if args.verbose {
                eprintln!("No more pairs to compare");
            }
            break;
        };

        println!();
        println!("  [1] {}", names[left as usize]);
        println!("  [2] {}", names[right as usize]);
        print!("Pick 1 or 2 (s = results now, d1/d2 = drop item, q = quit): ");
        io::stdout().flush().unwrap_or_else(|e| bail(format!("Failed to write prompt: {e}")));

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .unwrap_or_else(|e| bail(format!("Failed to read input: {e}")));
        if read == 0 {
            // EOF: finish with the current ratings.
            break;
        }

        match line.trim() {
            "1" => session.record_decision(left),
            "2" => session.record_decision(right),
            "s" => break,
            "q" => std::process::exit(0),
            choice @ ("d1" | "d2") => {
                let dropped = if choice == "d1" { left } else { right };
                if args.verbose {
                    eprintln!("Dropping \"{}\"", names[dropped as usize]);
                }
                match session.remove_item(dropped) {
                    RemovalOutcome::TooFewItems => {
                        bail("Fewer than two items remain; nothing left to rank")
                    }
                    RemovalOutcome::Removed { next_pair: None } => break,
                    RemovalOutcome::Removed { next_pair: Some(_) } => continue,
                }
            }
            other => {
                eprintln!("Unrecognized input \"{other}\"");
                continue;
            }
        }

        if args.verbose {
            eprintln!(
                "~{} comparisons remaining ({:.0}% complete)",
                session.estimated_remaining(),
                session.progress() * 100.0,
            );
        }
    }

    let rankings = session.finalize();

    if let Some(ref path) = args.csv {
        output::write_csv(path, &rankings, &names);
        if args.verbose {
            eprintln!("Wrote CSV to {}", path.display());
        }
    }

    if args.json {
        output::print_json(&rankings, &names, session.comparisons_completed());
    } else {
        output::print_table(&rankings, &names, session.comparisons_completed());
    }
}

#[cfg(test)]
mod tests {
    use super::parse_items_from_str;

    #[test]
    fn test_parse_plain_lines() {
        let items = parse_items_from_str("sunset.jpg\n\n  portrait.jpg  \nbeach.jpg\n");
        assert_eq!(items, vec!["sunset.jpg", "portrait.jpg", "beach.jpg"]);
    }

    #[test]
    fn test_parse_json_array() {
        let items = parse_items_from_str(r#"["a.jpg", "b.jpg", ""]"#);
        assert_eq!(items, vec!["a.jpg", "b.jpg"]);
    }
}
