use anyhow::Result;
use quartz_client::ChatBackendFactory;
use quartz_widget::application::cli;
use quartz_widget::application::ui;
use quartz_widget::configuration::Config;
use quartz_widget::configuration::ConfigKey;
use quartz_widget::domain::models::Action;
use quartz_widget::domain::models::Event;
use quartz_widget::domain::services::ActionsService;
use quartz_widget::domain::services::ViewState;
use quartz_widget::domain::services::WidgetController;
use quartz_widget::domain::services::WidgetControllerProps;
use quartz_widget::infrastructure::storage::StoreManager;
use tokio::sync::mpsc;
use tokio::task;

#[tokio::main]
async fn main() -> Result<()> {
    if !cli::parse().await? {
        return Ok(());
    }
    let _log_guard = cli::init_tracing()?;

    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let backend_url = Config::get(ConfigKey::BackendUrl);
    let backend = ChatBackendFactory::create_http_backend(backend_url.clone(), Config::request_timeout()?);
    let store = StoreManager::get(&Config::get(ConfigKey::StorageFile))?;
    tracing::info!(backend_url = %backend_url, "starting quartz widget");

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::<Result<()>>::new();

    let health_backend = backend.clone();
    background_futures.spawn(async move {
        if let Err(err) = health_backend.health_check().await {
            tracing::warn!(error = %err, "backend health check failed");
        }
        Ok(())
    });

    background_futures
        .spawn(async move { ActionsService::start(backend, event_tx, &mut action_rx).await });

    let controller = WidgetController::new(WidgetControllerProps {
        settings: Config::settings()?,
        store,
        view: ViewState::default(),
        action_tx,
    });

    let result = ui::run(controller, Config::get_bool(ConfigKey::Resume), event_rx).await;

    background_futures.abort_all();
    result?;

    return Ok(());
}
