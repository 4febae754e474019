use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Thunder - interactive shell for bucket store files
#[derive(Parser, Debug)]
#[command(name = "thunder")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,

    /// How long to wait for the store file lock
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    timeout: u64,

    /// Store file to open; it must already exist
    store_file: PathBuf,

    /// Run this single command instead of a shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::new().filter_or("THUNDER_LOG", "warn")).init();

    // Set edit mode override if specified
    if args.vi {
        std::env::set_var("THUNDER_EDIT_MODE", "vi");
    } else if args.emacs {
        std::env::set_var("THUNDER_EDIT_MODE", "emacs");
    }

    let options = thunder_repl::Options {
        store_file: args.store_file,
        command: args.command,
        lock_timeout: Duration::from_millis(args.timeout),
    };

    match thunder_repl::run(&options) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
