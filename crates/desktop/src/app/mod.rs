//! Main application module

mod panels;
mod state;

use crate::config::Config;
use crate::supabase::SupabaseClient;
use crate::ui::{AppEvent, EventReceiver};
use jbk_core::connectivity::ConnectivityMonitor;
use jbk_core::ui::StatsPanelConfig;
use jbk_core::{AppModel, JbkError, Screen};

use eframe::egui;
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct JbkApp {
    pub(crate) model: AppModel,
    pub(crate) connectivity: ConnectivityMonitor,
    pub(crate) client: Option<Arc<SupabaseClient>>,
    pub(crate) runtime: Option<tokio::runtime::Runtime>,
    pub(crate) sender: Sender<AppEvent>,
    pub(crate) receiver: EventReceiver,
    pub(crate) ctx: egui::Context,
    pub(crate) stats_config: StatsPanelConfig,
}

impl JbkApp {
    pub fn new(ctx: egui::Context, config: Config) -> Self {
        let (sender, receiver) = channel();

        let backend = start_backend(&config);
        let (runtime, client, status) = match backend {
            Ok((runtime, client)) => (Some(runtime), Some(client), Ok(())),
            Err(e) => (None, None, Err(e)),
        };

        let mut app = Self {
            model: AppModel::new(),
            // a native window is always the installed app
            connectivity: ConnectivityMonitor::new(true),
            client,
            runtime,
            sender,
            receiver,
            ctx,
            stats_config: StatsPanelConfig::default(),
        };

        let commands = app.model.start(status);
        app.dispatch(commands);
        app.start_health_checks(Duration::from_secs(config.health_check_secs.max(1)));
        app
    }
}

fn start_backend(config: &Config) -> Result<(tokio::runtime::Runtime, Arc<SupabaseClient>), JbkError> {
    let client = SupabaseClient::new(config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| JbkError::Config(format!("Failed to start async runtime: {}", e)))?;
    tracing::info!("Backend client ready for {}", config.supabase_url);
    Ok((runtime, Arc::new(client)))
}

impl eframe::App for JbkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_progress();

        if let Some(wait) = self.connectivity.next_change(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        self.render_top_panel(ctx);
        match self.model.screen.clone() {
            Screen::Starting => self.render_starting(ctx),
            Screen::Unavailable(message) => self.render_unavailable(ctx, &message),
            Screen::Login => self.render_login(ctx),
            Screen::Shell => {
                self.render_sections(ctx);
                self.render_dialogs(ctx);
            }
        }
    }
}
