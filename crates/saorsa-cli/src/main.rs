//! saorsa-cli: a small demo terminal application built on `saorsa-core`.
//!
//! Renders a bordered, scrollable list with a status bar. List navigation
//! (Up/Down) and focus cycling (Tab/Shift+Tab) come from the framework's
//! defaults; a `Ctrl+K Ctrl+Q` chord bound at the root quits the app.

use std::sync::atomic::Ordering;

use clap::Parser;
use saorsa_core::app::{App, AppOptions, CancellationFlag};
use saorsa_core::geometry::Size;
use saorsa_core::input::binding::ChordStep;
use saorsa_core::input::event::{Key, Modifiers};
use saorsa_core::pipeline::{ChannelWorkloadAdapter, TtyPresentationAdapter};
use saorsa_core::widget::Widget;

/// saorsa-cli: demo terminal application built on saorsa-core.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Record the session to an asciicast v2 file at this path.
    #[arg(long)]
    record: Option<std::path::PathBuf>,
}

fn build_ui(items: &[String], cancellation: CancellationFlag) -> Widget {
    Widget::border_titled("saorsa-cli demo")
        .with_child(
            Widget::vstack().with_children(vec![
                Widget::vscroll(true)
                    .fill(1)
                    .with_child(Widget::list(items.to_vec(), None)),
                Widget::text("Up/Down select · Tab cycles focus · Ctrl+K Ctrl+Q quits").height(1),
            ]),
        )
        .with_input_bindings(move |bindings| {
            bindings.bind_key(
                vec![
                    ChordStep::new(Key::Char('k'), Modifiers::CTRL),
                    ChordStep::new(Key::Char('q'), Modifiers::CTRL),
                ],
                move || cancellation.store(true, Ordering::Relaxed),
            );
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let items: Vec<String> = (1..=40).map(|i| format!("Item {i}")).collect();

    let cancellation: CancellationFlag = Default::default();
    let cancel_for_signal = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.store(true, Ordering::Relaxed);
        }
    });

    let (workload, _injector) = ChannelWorkloadAdapter::new(64);
    let mut options = AppOptions {
        initial_size: Size::new(80, 24),
        presentation: Some(Box::new(TtyPresentationAdapter::new())),
        cancellation: Some(cancellation.clone()),
        ..Default::default()
    };

    if let Some(path) = cli.record {
        let file = std::fs::File::create(&path)?;
        options
            .workload_filters
            .push(Box::new(saorsa_core::pipeline::AsciicastRecorder::new(file)));
    }

    let app = App::new(workload, options, move |_ctx| {
        build_ui(&items, cancellation.clone())
    });

    app.run().await?;
    Ok(())
}
