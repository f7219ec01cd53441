// src/services/progress_simulator.rs
use crate::config::ProgressConfig;
use crate::models::ServiceError;
use log::{debug, info};
use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const COMPLETE_AT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    // Progress moved but has not reached 100 yet
    Advanced(u32),
    // Reached 100 on this tick; reported once
    Completed(u32),
    // Already complete, nothing changed
    Idle,
}

// Cosmetic progress counter: `processing` until it reaches 100, then `completed`
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSimulator {
    progress: u32,
    step: u32,
    generated: bool,
}

impl ProgressSimulator {
    pub fn new(step: u32) -> Self {
        Self::starting_at(0, step)
    }

    pub fn starting_at(progress: u32, step: u32) -> Self {
        Self {
            progress,
            step,
            generated: progress >= COMPLETE_AT,
        }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.generated {
            return TickOutcome::Idle;
        }

        self.progress = self.progress.saturating_add(self.step);
        if self.progress >= COMPLETE_AT {
            self.generated = true;
            TickOutcome::Completed(self.progress)
        } else {
            TickOutcome::Advanced(self.progress)
        }
    }
}

struct RunningSimulator {
    project_id: String,
    token: u64,
    cancel: oneshot::Sender<()>,
}

// One timer task per view session, cancelled when the session leaves the detail view
#[derive(Clone, Default)]
pub struct SimulatorRegistry {
    running: Arc<Mutex<HashMap<String, RunningSimulator>>>,
    next_token: Arc<Mutex<u64>>,
}

impl SimulatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Start ticking `project_id` for the session. Returns false when the session
    // already runs a timer for that project. `on_tick` is called after every
    // tick and stops the timer by returning `Break`.
    pub fn start<F>(
        &self,
        session_id: &str,
        project_id: &str,
        starting_progress: u32,
        config: ProgressConfig,
        mut on_tick: F,
    ) -> Result<bool, ServiceError>
    where
        F: FnMut(TickOutcome) -> ControlFlow<()> + 'static,
    {
        let token = {
            let mut next = self.next_token.lock()?;
            *next += 1;
            *next
        };

        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        {
            let mut running = self.running.lock()?;
            if let Some(existing) = running.get(session_id) {
                if existing.project_id == project_id {
                    return Ok(false);
                }
            }
            if let Some(previous) = running.insert(
                session_id.to_string(),
                RunningSimulator {
                    project_id: project_id.to_string(),
                    token,
                    cancel: cancel_tx,
                },
            ) {
                debug!("Replacing timer for project {} in session {}", previous.project_id, session_id);
                let _ = previous.cancel.send(());
            }
        }

        info!("⏱️ Starting progress timer for project {} in session {}", project_id, session_id);

        let registry = self.clone();
        let session_id = session_id.to_string();
        let project_id = project_id.to_string();

        actix_web::rt::spawn(async move {
            let mut simulator = ProgressSimulator::starting_at(starting_progress, config.step);
            let mut ticker = tokio::time::interval(config.interval);
            // The first tick of a tokio interval fires immediately
            ticker.tick().await;

            while !simulator.is_generated() {
                tokio::select! {
                    _ = &mut cancel_rx => {
                        debug!("Progress timer for project {} cancelled", project_id);
                        return;
                    }
                    _ = ticker.tick() => {
                        let outcome = simulator.tick();
                        debug!("Project {} progress tick: {:?}", project_id, outcome);
                        if on_tick(outcome).is_break() {
                            break;
                        }
                    }
                }
            }

            registry.finish(&session_id, token);
        });

        Ok(true)
    }

    // Stop the session's timer, if any
    pub fn cancel(&self, session_id: &str) -> Result<bool, ServiceError> {
        let removed = self.running.lock()?.remove(session_id);
        match removed {
            Some(simulator) => {
                info!("⏹️ Cancelling progress timer for project {} in session {}",
                    simulator.project_id, session_id);
                let _ = simulator.cancel.send(());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn running_project(&self, session_id: &str) -> Result<Option<String>, ServiceError> {
        let running = self.running.lock()?;
        Ok(running.get(session_id).map(|s| s.project_id.clone()))
    }

    // Drop the bookkeeping entry of a finished timer unless a newer one replaced it
    fn finish(&self, session_id: &str, token: u64) {
        if let Ok(mut running) = self.running.lock() {
            if running.get(session_id).map(|s| s.token) == Some(token) {
                running.remove(session_id);
            }
        }
    }
}
