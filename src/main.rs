use clap::Parser;
use notetree::search::engine::{parse_find, parse_get, parse_join};
use notetree::ui::cli::{Cli, View};
use notetree::ui::format::display_width;
use notetree::{BrowserSession, Config, Result, ViewMode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(root) = &cli.root {
        config.rootdir = root.clone();
    }

    let mut session = BrowserSession::open(config)?;
    session.set_mode(match cli.view {
        View::Path => ViewMode::Path,
        View::Tags => ViewMode::Tags,
    });

    let width = cli.width.unwrap_or_else(display_width);
    session.set_width(width);
    session.set_max_depth(cli.max);
    if cli.hide_notes {
        session.toggle_show_notes();
    }
    if cli.hide_nodes {
        session.toggle_show_nodes();
    }
    if let Some(get) = &cli.get {
        session.set_path_filter(Some(parse_get(get)?));
    }
    if let Some(join) = &cli.join {
        session.set_tag_join(Some(parse_join(join)?));
    }

    if let Some(find) = &cli.find {
        session.render();
        let query = parse_find(find)?;
        print_page(&session.find(&query), width);
        return Ok(());
    }

    if let Some(ident) = &cli.id {
        session.render();
        print_page(&session.inspect(ident)?, width);
        return Ok(());
    }

    if let Some(ident) = &cli.edit {
        session.render();
        match session.edit(ident) {
            Ok(message) => println!("{}", message),
            Err(e) => println!("error: {}", e),
        }
        return Ok(());
    }

    if let Some(entry) = &cli.add {
        session.render();
        let mut parts = entry.split_whitespace();
        let ident = parts.next().unwrap_or_default().to_string();
        let child: Vec<&str> = parts.collect();
        let child = if child.is_empty() {
            None
        } else {
            Some(child.join("_"))
        };
        match session.add(&ident, child.as_deref()) {
            Ok(message) => println!("{}", message),
            Err(e) => println!("error: {}", e),
        }
        return Ok(());
    }

    print_page(&session.render(), width);
    Ok(())
}

fn print_page(lines: &[String], width: usize) {
    for line in lines {
        println!("{}", line);
    }
    println!("{}", "_".repeat(width));
}
