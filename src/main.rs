mod chart_list;
mod cli;
mod commands;
mod controller;
mod error;
mod render;
mod selection;
mod store;
#[cfg(test)]
mod test_support;
mod theme;
mod widget;

use clap::Parser;
use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use cli::Cli;
use commands::ShellAction;
use controller::{AppCommand, AppEvent, Controller};
use render::{RenderManager, RetryPolicy, TokioScheduler};
use store::{ChartStore, HttpChartStore};
use widget::LoggingBackend;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store: Arc<dyn ChartStore> = Arc::new(HttpChartStore::new(cli.resolved_store_url()));

    let (tx_cmd, rx_cmd) = mpsc::unbounded_channel::<AppCommand>();
    let (tx_evt, mut rx_evt) = mpsc::unbounded_channel::<AppEvent>();

    let policy = RetryPolicy {
        max_attempts: cli.resize_attempts,
        settle_delay: Duration::from_millis(cli.settle_ms),
    };
    let render = RenderManager::new(
        Box::new(LoggingBackend::new()),
        Box::new(TokioScheduler),
        policy,
    );
    let controller = Controller::new(
        store,
        render,
        tx_evt,
        Duration::from_millis(cli.resize_debounce_ms),
    );
    let controller_task = tokio::spawn(controller.run(rx_cmd));

    tokio::spawn(async move {
        while let Some(ev) = rx_evt.recv().await {
            print_event(ev);
        }
    });

    println!("celldash — type 'help' for commands");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match commands::parse(&line) {
            ShellAction::Command(AppCommand::Quit) => {
                let _ = tx_cmd.send(AppCommand::Quit);
                break;
            }
            ShellAction::Command(cmd) => {
                let _ = tx_cmd.send(cmd);
            }
            ShellAction::Help => println!("{}", commands::HELP),
            ShellAction::Empty => {}
            ShellAction::Unknown(msg) => println!("{msg} — type 'help' for commands"),
        }
    }

    drop(tx_cmd);
    controller_task.await?;
    Ok(())
}

fn print_event(ev: AppEvent) {
    match ev {
        AppEvent::MenuOptions(options) => println!(
            "buildings: {:?}  floors: {:?}  stations: {:?}",
            options.buildings, options.floors, options.stations
        ),
        AppEvent::CellsRefreshed(cells) => println!("storage cells: {cells:?}"),
        AppEvent::ChartsLoaded(count) => println!("{count} saved chart(s) loaded"),
        AppEvent::ChartAdded(id) => println!("chart {id} added"),
        AppEvent::ChartRemoved(id) => println!("chart {id} removed"),
        AppEvent::ChartsCleared => println!("all charts cleared"),
        AppEvent::ExpandedSet { id, expanded } => {
            println!("chart {id} {}", if expanded { "expanded" } else { "collapsed" })
        }
        AppEvent::SelectionIncomplete => println!("pick a storage cell before adding a chart"),
        AppEvent::CreationRejected(msg) => println!("!! chart creation rejected: {msg}"),
        AppEvent::LookupFailed(msg) => println!("lookup failed: {msg}"),
        AppEvent::Error(msg) => println!("error: {msg}"),
    }
}
