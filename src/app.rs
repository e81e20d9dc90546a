use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    cli::shell::{stdin_lines, Shell},
    focus::{config::FocusConfig, create_focus_module, notifier::SoundNotifier},
    shutdown::detect_shutdown,
    store::json_store::KeyValueStore,
    utils::clock::DefaultClock,
    view::View,
    workspace::Workspace,
};

/// Represents the starting point for the interactive application. The focus module is
/// created here, once, and runs next to the shell until either side stops.
pub async fn start_app<S: KeyValueStore + Clone + 'static>(
    store: S,
    view: View,
    config: FocusConfig,
) -> Result<()> {
    info!("Starting with {config:?}");
    let shutdown_token = CancellationToken::new();

    let (focus, handle) = create_focus_module(
        store.clone(),
        config,
        Box::new(SoundNotifier::new(config.sound)),
        shutdown_token.clone(),
        Box::new(DefaultClock),
    )
    .await?;
    let workspace = Workspace::load(store, Box::new(DefaultClock)).await?;

    let mut shell = Shell::new(workspace, handle, view, std::io::stdout());
    let shell_run = async {
        let result = shell.run(stdin_lines(), &shutdown_token).await;
        shutdown_token.cancel();
        result
    };

    let (_, focus_result, shell_result) = tokio::join!(
        detect_shutdown(shutdown_token.clone()),
        focus.run(),
        shell_run,
    );

    if let Err(focus_result) = focus_result {
        error!("Focus timer got an error {:?}", focus_result);
    }

    shell_result
}
