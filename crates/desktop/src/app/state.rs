//! Background work: command dispatch, event draining and the health check

use crate::ui::AppEvent;
use jbk_core::{execute, Backend, Command};

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::JbkApp;

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

impl JbkApp {
    /// Run each command on the runtime; results come back through the channel
    pub(crate) fn dispatch(&mut self, commands: Vec<Command>) {
        if commands.is_empty() {
            return;
        }
        let (Some(runtime), Some(client)) = (&self.runtime, &self.client) else {
            tracing::error!("No backend available for {} command(s)", commands.len());
            return;
        };

        for command in commands {
            let backend: Arc<dyn Backend> = client.clone();
            let tx = self.sender.clone();
            let ctx = self.ctx.clone();
            runtime.spawn(async move {
                let event = execute(backend.as_ref(), command, today()).await;
                if tx.send(AppEvent::Model(event)).is_err() {
                    tracing::debug!("UI closed, dropping completion");
                }
                ctx.request_repaint();
            });
        }
    }

    /// Drain finished work; follow-up commands are dispatched right away
    pub(crate) fn check_progress(&mut self) {
        let mut commands = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            match event {
                AppEvent::Model(event) => commands.extend(self.model.handle(event)),
                AppEvent::Connectivity(online) => {
                    self.connectivity.set_online(online, Instant::now());
                }
            }
        }
        self.dispatch(commands);
    }

    /// Poll the health endpoint; only transitions are reported
    pub(crate) fn start_health_checks(&self, interval: Duration) {
        let (Some(runtime), Some(client)) = (&self.runtime, &self.client) else {
            return;
        };
        let client = client.clone();
        let tx = self.sender.clone();
        let ctx = self.ctx.clone();

        runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut last = None;
            loop {
                ticker.tick().await;
                let online = client.health().await;
                if last == Some(online) {
                    continue;
                }
                last = Some(online);
                if tx.send(AppEvent::Connectivity(online)).is_err() {
                    break;
                }
                ctx.request_repaint();
            }
        });
    }
}
