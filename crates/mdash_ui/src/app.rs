//! Live dashboard loop.
//!
//! Redraws whenever any panel changes. Reads commands line by line from
//! stdin: `r` refreshes every panel, `q` quits. Ctrl-C also quits.

use std::future::pending;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use mdash_core::config::DashboardConfig;
use mdash_core::panels::Dashboard;
use mdash_core::source::DataSource;

use crate::render::render_dashboard;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Interrupted,
    Elapsed,
}

/// Run the dashboard on the terminal until the user quits.
pub async fn watch(
    source: Arc<DataSource>,
    config: Arc<DashboardConfig>,
    duration: Option<Duration>,
) -> Result<()> {
    let describe = source.describe();
    let dashboard = Dashboard::start(source, Arc::clone(&config));
    let input = BufReader::new(tokio::io::stdin());

    let exit = run_loop(&dashboard, input, duration, |dashboard| {
        let screen = render_dashboard(dashboard, &config.display, &describe);
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "{}{}", CLEAR_SCREEN, screen);
        let _ = stdout.flush();
    })
    .await;

    dashboard.stop();
    info!("Dashboard closed ({:?})", exit);
    Ok(())
}

/// Drive `dashboard` from `input` lines until quit, Ctrl-C or `duration`.
///
/// `redraw` runs once up front and after every panel change.
pub async fn run_loop<R, F>(dashboard: &Dashboard, input: R, duration: Option<Duration>, mut redraw: F) -> Exit
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&Dashboard),
{
    let mut metrics = dashboard.metrics.subscribe();
    let mut system = dashboard.system.subscribe();
    let mut benchmarks = dashboard.benchmarks.subscribe();
    let mut model_status = dashboard.model_status.subscribe();
    let mut health = dashboard.health.subscribe();

    let mut lines = input.lines();
    let mut input_open = true;

    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    redraw(dashboard);

    loop {
        tokio::select! {
            _ = &mut deadline => return Exit::Elapsed,
            _ = &mut ctrl_c => return Exit::Interrupted,
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match line.trim() {
                    "q" | "quit" => return Exit::Quit,
                    "r" | "refresh" => {
                        info!("Refreshing all panels");
                        dashboard.refresh_all();
                    }
                    "" => {}
                    other => debug!("Ignoring input '{}'", other),
                },
                Ok(None) => {
                    debug!("Input closed");
                    input_open = false;
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    input_open = false;
                }
            },
            Ok(()) = metrics.changed() => redraw(dashboard),
            Ok(()) = system.changed() => redraw(dashboard),
            Ok(()) = benchmarks.changed() => redraw(dashboard),
            Ok(()) = model_status.changed() => redraw(dashboard),
            Ok(()) = health.changed() => redraw(dashboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdash_core::config::DisplaySettings;
    use mdash_core::source::MockSource;

    fn start_dashboard() -> Dashboard {
        let source = Arc::new(DataSource::Mock(MockSource::with_seed(DisplaySettings::default(), 9)));
        Dashboard::start(source, Arc::new(DashboardConfig::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_then_quit() {
        let dashboard = start_dashboard();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let exit = run_loop(&dashboard, &b"r\nq\n"[..], None, |_| {}).await;
        assert_eq!(exit, Exit::Quit);
        assert!(dashboard.handles().iter().all(|h| h.issued() == 2));
        dashboard.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_duration() {
        let dashboard = start_dashboard();
        let mut redraws = 0;

        let exit = run_loop(&dashboard, &b""[..], Some(Duration::from_secs(12)), |_| redraws += 1).await;
        assert_eq!(exit, Exit::Elapsed);
        assert_eq!(dashboard.metrics.subscribe().borrow().label(), "ready");
        assert!(redraws > 1);
        dashboard.stop();
    }
}
