use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_view::{
    api::{TodoApi, TodoBackend},
    cli::{Cli, Commands},
    tui::run_tui,
    view::{TodoView, ViewStatus},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let api = TodoApi::new(cli.base_url, cli.token);
    let mut view = TodoView::new(api);

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => return run_tui(&mut view).await,
        Commands::List => view.refresh().await,
        Commands::Add { name, description } => {
            view.open_form();
            if let Some(form) = view.form_mut() {
                form.name = name;
                form.description = description.unwrap_or_default();
            }
            view.submit_form().await;
        }
        Commands::Toggle { id } => view.toggle(id).await,
        Commands::Delete { id } => view.delete(id).await,
    }

    print_todos(&view)?;
    if let Some(notice) = view.notice() {
        bail!("{notice}");
    }
    Ok(())
}

// The terminal belongs to the TUI, so logs go to stderr and only on request.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_todos<B: TodoBackend>(view: &TodoView<B>) -> Result<()> {
    if let ViewStatus::Failed(message) = view.status() {
        bail!("could not load todos: {message}");
    }
    for todo in view.ordered() {
        let mark = if todo.completed { "[x]" } else { "[ ]" };
        match todo.description.as_deref() {
            Some(description) => println!("{mark} {:>4}  {}  ({description})", todo.id, todo.name),
            None => println!("{mark} {:>4}  {}", todo.id, todo.name),
        }
    }
    Ok(())
}
