#![forbid(unsafe_code)]

//! Token field demo binary entry point.

use std::process;

use tokenfield::{BatchUpdate, TextToken, Token};
use tokenfield_demo::cli;
use tokenfield_demo::terminal::{self, TerminalField};
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();

    if opts.log_json {
        tokenfield::core::logging::init_json();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    let config = match tokenfield_demo::load_config(&opts) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let mut field = match terminal::terminal_field(config) {
        Ok(field) => field.on_text_changed(|text| tracing::info!(?text, "text changed")),
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            process::exit(1);
        }
    };

    field.append(
        opts.tokens.iter().map(|title| TextToken::new(title.as_str())),
        BatchUpdate::immediate(),
    );
    if let Some(text) = opts.text.as_deref() {
        field.set_text(Some(text));
    }

    print_frame(&mut field, opts.width);

    for title in &opts.remove {
        let token = TextToken::new(title.as_str());
        let before = field.tokens().len();
        let removed = title.clone();
        field.remove(
            std::slice::from_ref(&token),
            BatchUpdate::animated()
                .on_complete(move |finished| tracing::info!(%removed, finished, "removal done")),
        );
        if field.tokens().len() == before {
            eprintln!("no token titled {:?}", token.title());
            continue;
        }
        println!();
        print_frame(&mut field, opts.width);
    }
}

fn print_frame(field: &mut TerminalField, width: u16) {
    for line in terminal::render(field, width) {
        println!("|{line:<width$}|", width = usize::from(width));
    }
}
